//! Symbols and their per-kind payloads.

use cppmeta_core::{ConstValue, DeclFlags, Span, TypeHash};

use super::{ScopeId, SymbolKind};
use crate::ast::{Access, ClassKey, ClassSpecifier, Node};
use crate::template::{ParamKind, TemplateArguments, TemplateParamList};
use crate::type_id::TypeIdRef;

/// Index of a symbol in its [`SymbolTable`](super::SymbolTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        SymbolId(index as u32)
    }
}

/// A named entity.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    mangled: String,
    hash: TypeHash,
    enclosing: ScopeId,
    scope: Option<ScopeId>,
    defined: bool,
    type_id: Option<TypeIdRef>,
    span: Span,
    data: SymbolData,
}

impl Symbol {
    pub(crate) fn new(
        name: String,
        mangled: String,
        hash: TypeHash,
        enclosing: ScopeId,
        data: SymbolData,
        span: Span,
    ) -> Self {
        Self {
            name,
            mangled,
            hash,
            enclosing,
            scope: None,
            defined: false,
            type_id: None,
            span,
            data,
        }
    }

    /// Display name: the source name, or `Box<int, A>` for template instances.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Internal name: the length-prefixed source name, or the instance key.
    pub fn mangled_name(&self) -> &str {
        &self.mangled
    }

    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    pub fn kind(&self) -> SymbolKind {
        self.data.kind()
    }

    /// The scope this symbol was declared in.
    pub fn enclosing(&self) -> ScopeId {
        self.enclosing
    }

    /// The scope this symbol owns (namespace body, class body, template parameters).
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Cached canonical type-id of a class or enum.
    pub fn type_id(&self) -> Option<TypeIdRef> {
        self.type_id
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn data(&self) -> &SymbolData {
        &self.data
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            SymbolData::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_template(&self) -> Option<&TemplateData> {
        match &self.data {
            SymbolData::Template(template) => Some(template),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumData> {
        match &self.data {
            SymbolData::Enum(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut SymbolData {
        &mut self.data
    }

    pub(crate) fn set_scope(&mut self, scope: ScopeId) {
        self.scope = Some(scope);
    }

    pub(crate) fn set_defined(&mut self) {
        self.defined = true;
    }

    pub(crate) fn set_type_id(&mut self, type_id: TypeIdRef) {
        self.type_id = Some(type_id);
    }
}

/// Kind-specific information carried by a symbol.
#[derive(Debug, Clone)]
pub enum SymbolData {
    Namespace,
    Class(ClassData),
    Enum(EnumData),
    Enumerator(ConstValue),
    Typedef(TypeIdRef),
    Function(FunctionData),
    Object(ObjectData),
    Template(TemplateData),
    TemplateParam(TemplateParamData),
}

impl SymbolData {
    pub fn kind(&self) -> SymbolKind {
        match self {
            SymbolData::Namespace => SymbolKind::Namespace,
            SymbolData::Class(_) => SymbolKind::Class,
            SymbolData::Enum(_) => SymbolKind::Enum,
            SymbolData::Enumerator(_) => SymbolKind::Enumerator,
            SymbolData::Typedef(_) => SymbolKind::Typedef,
            SymbolData::Function(_) => SymbolKind::Function,
            SymbolData::Object(_) => SymbolKind::Object,
            SymbolData::Template(_) => SymbolKind::Template,
            SymbolData::TemplateParam(_) => SymbolKind::TemplateParam,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassData {
    pub key: ClassKey,
    /// Direct bases in declaration order, with pack expansions already expanded.
    pub bases: Vec<BaseClass>,
    /// Member declarations as written (for instances: after substitution).
    pub members: Vec<Node>,
    /// Set on classes produced by instantiation.
    pub instance_of: Option<InstanceOrigin>,
}

impl ClassData {
    pub fn new(key: ClassKey) -> Self {
        Self {
            key,
            bases: Vec::new(),
            members: Vec::new(),
            instance_of: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseClass {
    pub symbol: SymbolId,
    pub access: Access,
    pub is_virtual: bool,
}

/// Which template, with which arguments, a class instance came from.
#[derive(Debug, Clone)]
pub struct InstanceOrigin {
    pub template: SymbolId,
    pub arguments: TemplateArguments,
}

#[derive(Debug, Clone, Default)]
pub struct EnumData {
    pub scoped: bool,
    pub underlying: Option<TypeIdRef>,
    pub enumerators: Vec<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    pub type_id: TypeIdRef,
    pub flags: DeclFlags,
    /// Mangled parameter list, which tells overloads apart.
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct ObjectData {
    pub type_id: TypeIdRef,
    pub flags: DeclFlags,
    /// Known value of a constant object.
    pub value: Option<ConstValue>,
}

/// The entity a template declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatedEntity {
    Class(ClassKey),
    /// Alias template.
    Typedef,
    /// Variable template.
    Object,
}

impl TemplatedEntity {
    pub fn kind(self) -> SymbolKind {
        match self {
            TemplatedEntity::Class(_) => SymbolKind::Class,
            TemplatedEntity::Typedef => SymbolKind::Typedef,
            TemplatedEntity::Object => SymbolKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplatedEntity::Class(key) => key.as_str(),
            TemplatedEntity::Typedef => "alias",
            TemplatedEntity::Object => "variable",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateData {
    pub params: TemplateParamList,
    pub entity: TemplatedEntity,
    /// Dependent class body, once the template is defined.
    pub pattern: Option<ClassSpecifier>,
    /// Whether the templated entity has a definition.
    pub entity_defined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateParamData {
    pub index: usize,
    pub kind: ParamKind,
    pub is_pack: bool,
}
