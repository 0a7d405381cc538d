//! Declarations driven by the grammar: namespaces, templates, classes,
//! enums, typedefs, objects and functions.
//!
//! Each operation declares into the context's current scope. While a
//! template parameter list is open, the declaration that follows it is
//! redirected by the symbol table and produces a template symbol; the
//! context then continues inside the template's scope until
//! [`SemaContext::end_template`].

use cppmeta_core::{ConstValue, DeclFlags, SemaError, SemaResult, Span};
use tracing::debug;

use crate::ast::{
    ClassKey, ClassSpecifier, DeclSpecifiers, DeclaratorNode, MemberNode, Node, StaticAssertNode,
};
use crate::context::SemaContext;
use crate::symbols::{
    ClassData, EnumData, LookupMask, ObjectData, ScopeId, ScopeKind, SymbolData, SymbolId,
    SymbolKind, TemplateParamData, TemplatedEntity,
};
use crate::template::{TemplateParamList, convert_constant};
use crate::type_id::{BaseKey, TypeIdRef, TypeNode};

/// One enumerator of an enum definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumeratorDecl {
    pub name: String,
    /// Explicit value; otherwise the previous value plus one.
    pub value: Option<Node>,
    pub span: Span,
}

impl EnumeratorDecl {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: None,
            span,
        }
    }

    pub fn with_value(mut self, value: Node) -> Self {
        self.value = Some(value);
        self
    }
}

impl SemaContext {
    // ========================================================================
    // Namespaces
    // ========================================================================

    /// Open (or re-open) a namespace and make its scope current.
    pub fn open_namespace(&mut self, name: &str, span: Span) -> SemaResult<SymbolId> {
        let declared = self.table.declare_or_redeclare(
            self.current,
            name,
            SymbolKind::Namespace,
            LookupMask::NAMESPACE,
            span,
            || SymbolData::Namespace,
        )?;
        self.current = self.owned_scope(declared.symbol, span)?;
        Ok(declared.symbol)
    }

    pub fn close_namespace(&mut self, span: Span) -> SemaResult<()> {
        let scope = self.table.scope(self.current);
        if scope.kind() != ScopeKind::Namespace || scope.enclosing().is_none() {
            return Err(SemaError::internal("no namespace is open", span));
        }
        self.leave_scope(span)?;
        Ok(())
    }

    fn owned_scope(&self, symbol: SymbolId, span: Span) -> SemaResult<ScopeId> {
        self.table.symbol(symbol).scope().ok_or_else(|| {
            SemaError::internal(
                format!("'{}' has no scope of its own", self.table.symbol(symbol).name()),
                span,
            )
        })
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Open a template parameter scope for the declaration that follows.
    ///
    /// The parameters become visible as template parameter symbols. The scope
    /// has no owner until the templated entity is declared.
    pub fn begin_template(&mut self, params: TemplateParamList, span: Span) -> SemaResult<ScopeId> {
        if params.is_empty() {
            return Err(SemaError::unsupported("explicit template specialization", span));
        }
        if matches!(self.table.scope(self.current).kind(), ScopeKind::Class | ScopeKind::Template) {
            return Err(SemaError::unsupported("member templates", span));
        }
        params.validate()?;

        let scope = self.table.new_scope(ScopeKind::Template, None, self.current);
        for (index, param) in params.iter().enumerate() {
            if param.name.is_empty() {
                continue;
            }
            self.table.insert_entity(
                scope,
                &param.name,
                SymbolData::TemplateParam(TemplateParamData {
                    index,
                    kind: param.kind,
                    is_pack: param.is_pack,
                }),
                param.span,
            );
        }
        self.table.scope_mut(scope).set_pending_params(params);
        self.current = scope;
        Ok(scope)
    }

    /// Close the template whose declaration was just completed.
    pub fn end_template(&mut self, span: Span) -> SemaResult<SymbolId> {
        let scope = self.table.scope(self.current);
        let owner = match (scope.kind(), scope.owner()) {
            (ScopeKind::Template, Some(owner)) => owner,
            (ScopeKind::Template, None) => {
                return Err(SemaError::internal("template parameter list declares nothing", span));
            }
            _ => return Err(SemaError::internal("no template is open", span)),
        };
        self.leave_scope(span)?;
        Ok(owner)
    }

    /// Whether the current scope is a template parameter list still waiting for its entity.
    fn in_template_header(&self) -> bool {
        self.table.scope(self.current).is_unowned_template()
    }

    /// Record the entity of a template declared from the current parameter
    /// scope and continue inside the template's own scope.
    fn enter_template(
        &mut self,
        template: SymbolId,
        is_new: bool,
        entity: TemplatedEntity,
        defined: bool,
        span: Span,
    ) -> SemaResult<()> {
        let scope = self.owned_scope(template, span)?;
        let name = self.table.symbol(template).name().to_string();
        let data = self.table.template_data_mut(template, span)?;
        if is_new {
            data.entity = entity;
        }
        if defined {
            if data.entity_defined {
                return Err(SemaError::Redefinition { name, span });
            }
            data.entity_defined = true;
        }
        self.current = scope;
        Ok(())
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Declare a class, or find its earlier declaration.
    ///
    /// Inside a template header this declares (or redeclares) a class
    /// template instead and returns the template symbol.
    pub fn declare_class(&mut self, name: &str, key: ClassKey, span: Span) -> SemaResult<SymbolId> {
        let in_template = self.in_template_header();
        let declared = self.table.declare_or_redeclare(
            self.current,
            name,
            SymbolKind::Class,
            LookupMask::CLASS,
            span,
            || SymbolData::Class(ClassData::new(key)),
        )?;
        if in_template {
            self.enter_template(declared.symbol, declared.is_new, TemplatedEntity::Class(key), false, span)?;
        }
        Ok(declared.symbol)
    }

    /// Complete a class (or class template) declared by [`declare_class`](Self::declare_class).
    ///
    /// A class gets its bases registered and its members declared in its
    /// scope. A class template stores the body as its pattern. Completing
    /// either twice is an error.
    pub fn define_class(&mut self, symbol: SymbolId, spec: ClassSpecifier) -> SemaResult<()> {
        let span = spec.span;
        let target = self.table.symbol(symbol);
        let name = target.name().to_string();
        let already_defined = match target.data() {
            SymbolData::Template(template) => {
                if !matches!(template.entity, TemplatedEntity::Class(_)) {
                    return Err(SemaError::NotAClass { name, span });
                }
                template.entity_defined
            }
            SymbolData::Class(_) => target.is_defined(),
            _ => return Err(SemaError::NotAClass { name, span }),
        };
        if already_defined {
            return Err(SemaError::Redefinition { name, span });
        }

        if target.as_template().is_some() {
            let data = self.table.template_data_mut(symbol, span)?;
            data.entity = TemplatedEntity::Class(spec.key);
            data.pattern = Some(spec);
            data.entity_defined = true;
            debug!(template = %name, "defined class template");
            return Ok(());
        }

        // 1. Bases, which must be complete classes
        for base in &spec.bases {
            self.register_base(symbol, base)?;
        }

        // 2. Members, declared inside the class scope
        let class_scope = self.owned_scope(symbol, span)?;
        let previous = std::mem::replace(&mut self.current, class_scope);
        let declared = spec
            .members
            .iter()
            .try_for_each(|member| self.declare_member(member));
        self.current = previous;
        declared?;

        let class = self.table.class_data_mut(symbol, span)?;
        class.key = spec.key;
        class.members = spec.members;
        self.table.symbol_mut(symbol).set_defined();
        debug!(class = %name, "defined class");
        Ok(())
    }

    fn declare_member(&mut self, member: &Node) -> SemaResult<()> {
        match member {
            Node::Member(m) => self.declare_data_or_function_member(m),
            Node::StaticAssert(s) => self.check_static_assert(s),
            Node::ClassSpecifier(nested) => {
                let symbol = self.declare_class(&nested.name, nested.key, nested.span)?;
                self.define_class(symbol, nested.clone())
            }
            other => Err(SemaError::unsupported(
                format!("{} as a class member", other.describe()),
                other.span(),
            )),
        }
    }

    fn declare_data_or_function_member(&mut self, member: &MemberNode) -> SemaResult<()> {
        if member.bit_width.is_some() {
            return Err(SemaError::unsupported("bit-fields", member.span));
        }
        self.declare_simple(
            &member.specifiers,
            member.declarator.as_ref(),
            member.initializer.as_deref(),
            member.span,
        )?;
        Ok(())
    }

    /// Evaluate a `static_assert`; a false condition is fatal.
    pub fn check_static_assert(&mut self, assertion: &StaticAssertNode) -> SemaResult<()> {
        if assertion.condition.evaluate(&self.table)?.is_truthy() {
            return Ok(());
        }
        Err(SemaError::StaticAssertFailed {
            message: assertion
                .message
                .clone()
                .unwrap_or_else(|| assertion.condition.to_string()),
            span: assertion.span,
        })
    }

    // ========================================================================
    // Simple declarations
    // ========================================================================

    /// Declare whatever a decl-specifier sequence and declarator introduce:
    /// a typedef, a function or an object.
    pub fn declare_simple(
        &mut self,
        specifiers: &DeclSpecifiers,
        declarator: Option<&DeclaratorNode>,
        initializer: Option<&Node>,
        span: Span,
    ) -> SemaResult<SymbolId> {
        let Some(name) = declarator.and_then(DeclaratorNode::name) else {
            return Err(SemaError::InvalidTypeSpecifier {
                detail: "declaration does not declare anything".to_string(),
                span,
            });
        };
        let name = name.to_string();
        if specifiers.flags.contains(DeclFlags::TYPEDEF) {
            let specifiers = DeclSpecifiers {
                flags: specifiers.flags - DeclFlags::TYPEDEF,
                type_name: specifiers.type_name.clone(),
            };
            return self.declare_typedef(&name, &specifiers, declarator, span);
        }
        if declarator.is_some_and(DeclaratorNode::is_function) {
            return self.declare_function(&name, specifiers, declarator, span);
        }
        self.declare_object(&name, specifiers, declarator, initializer, span)
    }

    /// Declare a typedef, or an alias template inside a template header.
    ///
    /// Redeclaring a typedef is allowed only with the same type.
    pub fn declare_typedef(
        &mut self,
        name: &str,
        specifiers: &DeclSpecifiers,
        declarator: Option<&DeclaratorNode>,
        span: Span,
    ) -> SemaResult<SymbolId> {
        if self.in_template_header() {
            let declared = self
                .table
                .declare_template(self.current, name, SymbolKind::Typedef, span)?;
            self.enter_template(declared.symbol, declared.is_new, TemplatedEntity::Typedef, true, span)?;
            return Ok(declared.symbol);
        }

        let target = self.resolve_type_id(specifiers, declarator, span)?;
        let declared = self.table.declare_or_redeclare(
            self.current,
            name,
            SymbolKind::Typedef,
            LookupMask::TYPEDEF,
            span,
            || SymbolData::Typedef(target),
        )?;
        if !declared.is_new && !matches!(self.table.symbol(declared.symbol).data(), SymbolData::Typedef(t) if *t == target) {
            return Err(SemaError::Redefinition {
                name: name.to_string(),
                span,
            });
        }
        Ok(declared.symbol)
    }

    /// Declare an object, or a variable template inside a template header.
    ///
    /// A `constexpr` object, or a `const` object of integral type with an
    /// initializer, gets its value evaluated so it can appear in constant
    /// expressions. A declarator of function type declares a function.
    pub fn declare_object(
        &mut self,
        name: &str,
        specifiers: &DeclSpecifiers,
        declarator: Option<&DeclaratorNode>,
        initializer: Option<&Node>,
        span: Span,
    ) -> SemaResult<SymbolId> {
        if self.in_template_header() {
            let declared = self
                .table
                .declare_template(self.current, name, SymbolKind::Object, span)?;
            let defined = initializer.is_some();
            self.enter_template(declared.symbol, declared.is_new, TemplatedEntity::Object, defined, span)?;
            return Ok(declared.symbol);
        }

        let type_id = self.resolve_type_id(specifiers, declarator, span)?;
        if self.types.is_function(type_id) {
            return self.declare_function(name, specifiers, declarator, span);
        }
        let value = self.constant_value(type_id, specifiers.flags, initializer)?;

        let flags = specifiers.flags;
        let declared = self.table.declare_or_redeclare(
            self.current,
            name,
            SymbolKind::Object,
            LookupMask::OBJECT,
            span,
            || SymbolData::Object(ObjectData { type_id, flags, value }),
        )?;
        let symbol = self.table.symbol_mut(declared.symbol);
        if !declared.is_new {
            let SymbolData::Object(existing) = symbol.data_mut() else {
                return Err(SemaError::internal(format!("'{name}' is not an object"), span));
            };
            if existing.type_id != type_id || (existing.value.is_some() && value.is_some()) {
                return Err(SemaError::Redefinition {
                    name: name.to_string(),
                    span,
                });
            }
            if value.is_some() {
                existing.value = value;
            }
        }
        if !flags.contains(DeclFlags::EXTERN) || initializer.is_some() {
            symbol.set_defined();
        }
        Ok(declared.symbol)
    }

    fn constant_value(
        &mut self,
        type_id: TypeIdRef,
        flags: DeclFlags,
        initializer: Option<&Node>,
    ) -> SemaResult<Option<ConstValue>> {
        let Some(initializer) = initializer else {
            return Ok(None);
        };
        let prim = match self.types.node(type_id) {
            TypeNode::Base(BaseKey::Primitive(prim, _)) => Some(*prim),
            _ => None,
        };
        if flags.contains(DeclFlags::CONSTEXPR) {
            let value = initializer.evaluate(&self.table)?;
            return match prim {
                Some(prim) => convert_constant(value, prim, initializer.span()).map(Some),
                None => Ok(Some(value)),
            };
        }
        let is_const_integral = flags.contains(DeclFlags::CONST) && prim.is_some_and(|p| p.is_integral());
        match (is_const_integral, prim) {
            // A const integral object is usable in constant expressions only
            // when its initializer is itself constant.
            (true, Some(prim)) => Ok(initializer
                .evaluate(&self.table)
                .and_then(|value| convert_constant(value, prim, initializer.span()))
                .ok()),
            _ => Ok(None),
        }
    }

    /// Declare a function overload; the overload set is keyed by parameter types.
    pub fn declare_function(
        &mut self,
        name: &str,
        specifiers: &DeclSpecifiers,
        declarator: Option<&DeclaratorNode>,
        span: Span,
    ) -> SemaResult<SymbolId> {
        if self.in_template_header() {
            return Err(SemaError::unsupported("function templates", span));
        }
        let type_id = self.resolve_type_id(specifiers, declarator, span)?;
        let signature = self.types.mangle_signature(type_id, &self.table).ok_or_else(|| {
            SemaError::InvalidTypeSpecifier {
                detail: format!("'{name}' is not declared with a function type"),
                span,
            }
        })?;
        let declared = self.table.declare_function_overload(
            self.current,
            name,
            type_id,
            &signature,
            specifiers.flags,
            span,
        )?;
        Ok(declared.symbol)
    }

    // ========================================================================
    // Enums
    // ========================================================================

    /// Declare an enum, or find its earlier declaration.
    pub fn declare_enum(
        &mut self,
        name: &str,
        scoped: bool,
        underlying: Option<TypeIdRef>,
        span: Span,
    ) -> SemaResult<SymbolId> {
        let declared = self.table.declare_or_redeclare(
            self.current,
            name,
            SymbolKind::Enum,
            LookupMask::ENUM,
            span,
            || {
                SymbolData::Enum(EnumData {
                    scoped,
                    underlying,
                    enumerators: Vec::new(),
                })
            },
        )?;
        Ok(declared.symbol)
    }

    /// Complete an enum with its enumerators.
    ///
    /// Enumerators without a value continue from the previous one plus one,
    /// starting at zero. Enumerators of an unscoped enum are also visible in
    /// the enclosing scope.
    pub fn define_enum(
        &mut self,
        symbol: SymbolId,
        enumerators: &[EnumeratorDecl],
        span: Span,
    ) -> SemaResult<()> {
        let target = self.table.symbol(symbol);
        let name = target.name().to_string();
        let Some(data) = target.as_enum() else {
            return Err(SemaError::NotAType { name, span });
        };
        if target.is_defined() {
            return Err(SemaError::Redefinition { name, span });
        }

        // Clone data we need before mutable borrow
        let scoped = data.scoped;
        let underlying = data.underlying.and_then(|ty| match self.types.node(ty) {
            TypeNode::Base(BaseKey::Primitive(prim, _)) => Some(*prim),
            _ => None,
        });
        let enclosing = target.enclosing();
        let enum_scope = self.owned_scope(symbol, span)?;

        let mut next = ConstValue::Int(0);
        let mut ids = Vec::with_capacity(enumerators.len());
        for enumerator in enumerators {
            let clash = self
                .table
                .lookup_qualified(enum_scope, &enumerator.name, LookupMask::ANY)
                .or_else(|| {
                    (!scoped)
                        .then(|| self.table.lookup_qualified(enclosing, &enumerator.name, LookupMask::ANY))
                        .flatten()
                });
            if clash.is_some() {
                return Err(SemaError::Redefinition {
                    name: enumerator.name.clone(),
                    span: enumerator.span,
                });
            }

            let value = match &enumerator.value {
                Some(expr) => expr.evaluate(&self.table)?,
                None => next,
            };
            let value = match underlying {
                Some(prim) => convert_constant(value, prim, enumerator.span)?,
                None if value.is_integral() => value,
                None => {
                    return Err(SemaError::not_constant(
                        format!("enumerator value {value} is not integral"),
                        enumerator.span,
                    ));
                }
            };
            next = successor(value, enumerator.span)?;

            let id = self.table.insert_entity(
                enum_scope,
                &enumerator.name,
                SymbolData::Enumerator(value),
                enumerator.span,
            );
            if !scoped {
                self.table.alias(enclosing, &enumerator.name, id);
            }
            ids.push(id);
        }

        let symbol_mut = self.table.symbol_mut(symbol);
        if let SymbolData::Enum(data) = symbol_mut.data_mut() {
            data.enumerators = ids;
        }
        symbol_mut.set_defined();
        debug!(enumeration = %name, "defined enum");
        Ok(())
    }
}

/// Value of the enumerator following one with `value`.
fn successor(value: ConstValue, span: Span) -> SemaResult<ConstValue> {
    let overflow = || SemaError::not_constant("enumerator value overflows", span);
    match value {
        ConstValue::Int(v) => v.checked_add(1).map(ConstValue::Int).ok_or_else(overflow),
        ConstValue::UInt(v) => v.checked_add(1).map(ConstValue::UInt).ok_or_else(overflow),
        ConstValue::Bool(v) => Ok(ConstValue::Int(v as i64 + 1)),
        ConstValue::Float(_) => Err(overflow()),
    }
}
