//! Declaration nodes: decl-specifiers, declarators, type-ids, template-ids,
//! base-specifiers, members and class specifiers.
//!
//! A declarator is a singly linked chain of parts stored in application
//! order: the first part applies directly to the decl-specifier type and
//! each `next` part applies to the result. `int* [3]` (an array of three
//! pointers) is `Pointer -> Array(3)`; the declared name, if any, is an
//! [`DeclaratorOp::Id`] part at the end of the chain.

use cppmeta_core::{CvQualifiers, DeclFlags, Primitive, Span};
use std::fmt;

use super::Node;
use crate::symbols::SymbolId;
use crate::type_id::TypeIdRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

impl ClassKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKey::Class => "class",
            ClassKey::Struct => "struct",
            ClassKey::Union => "union",
        }
    }

    /// Access of members and bases declared without an access specifier.
    pub fn default_access(self) -> Access {
        match self {
            ClassKey::Class => Access::Private,
            ClassKey::Struct | ClassKey::Union => Access::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

/// The decl-specifier sequence of a declaration.
///
/// Either `flags` carries primitive type specifiers or `type_name` names the
/// type; cv-qualifiers and storage specifiers live in `flags` in both cases.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclSpecifiers {
    pub flags: DeclFlags,
    pub type_name: Option<Box<Node>>,
}

impl DeclSpecifiers {
    pub fn primitive(flags: DeclFlags) -> Self {
        Self {
            flags,
            type_name: None,
        }
    }

    pub fn named(type_name: Node) -> Self {
        Self {
            flags: DeclFlags::empty(),
            type_name: Some(Box::new(type_name)),
        }
    }

    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags |= flags;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclaratorOp {
    /// The declared name.
    Id(String),
    Pointer(CvQualifiers),
    LvalueRef,
    RvalueRef,
    /// Array with an optional bound expression.
    Array(Option<Box<Node>>),
    Function {
        params: Vec<ParameterNode>,
        variadic: bool,
        cv: CvQualifiers,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclaratorNode {
    pub op: DeclaratorOp,
    pub next: Option<Box<DeclaratorNode>>,
    pub span: Span,
}

impl DeclaratorNode {
    pub fn new(op: DeclaratorOp, span: Span) -> Self {
        Self {
            op,
            next: None,
            span,
        }
    }

    /// Build a chain from parts listed in application order.
    ///
    /// Returns `None` for an empty list (an abstract declarator with no parts).
    pub fn chain(ops: Vec<DeclaratorOp>, span: Span) -> Option<Self> {
        ops.into_iter().rev().fold(None::<DeclaratorNode>, |next, op| {
            Some(DeclaratorNode {
                op,
                next: next.map(Box::new),
                span,
            })
        })
    }

    /// Just a name.
    pub fn id(name: impl Into<String>, span: Span) -> Self {
        Self::new(DeclaratorOp::Id(name.into()), span)
    }

    /// Iterate over the parts in application order.
    pub fn parts(&self) -> impl Iterator<Item = &DeclaratorNode> {
        std::iter::successors(Some(self), |part| part.next.as_deref())
    }

    /// The declared name, if the chain contains one.
    pub fn name(&self) -> Option<&str> {
        self.parts().find_map(|part| match &part.op {
            DeclaratorOp::Id(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Whether the outermost type-forming part is a function.
    pub fn is_function(&self) -> bool {
        self.parts()
            .filter(|part| !matches!(part.op, DeclaratorOp::Id(_)))
            .last()
            .is_some_and(|part| matches!(part.op, DeclaratorOp::Function { .. }))
    }
}

/// One function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub specifiers: DeclSpecifiers,
    pub declarator: Option<DeclaratorNode>,
    pub default: Option<Box<Node>>,
    pub span: Span,
}

impl ParameterNode {
    pub fn new(specifiers: DeclSpecifiers, declarator: Option<DeclaratorNode>, span: Span) -> Self {
        Self {
            specifiers,
            declarator,
            default: None,
            span,
        }
    }
}

/// A type-id: decl-specifiers plus an abstract declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeIdNode {
    pub specifiers: DeclSpecifiers,
    pub declarator: Option<DeclaratorNode>,
    pub span: Span,
}

/// A type that has already been resolved to a canonical type-id.
///
/// Produced when a dependent type name is substituted; `text` keeps the
/// human-readable spelling for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTypeNode {
    pub type_id: TypeIdRef,
    pub text: String,
    pub span: Span,
}

/// `name<args...>` where `name` resolved to a template symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateIdNode {
    pub template: SymbolId,
    pub name: String,
    pub arguments: Vec<Node>,
    pub span: Span,
}

/// `pattern...` inside a template argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct PackExpansionNode {
    pub pattern: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseSpecifier {
    pub access: Access,
    pub is_virtual: bool,
    pub name: Box<Node>,
    /// `Bases...`: expands to one base per element of the pack.
    pub is_pack_expansion: bool,
    pub span: Span,
}

impl BaseSpecifier {
    pub fn new(access: Access, name: Node, span: Span) -> Self {
        Self {
            access,
            is_virtual: false,
            name: Box::new(name),
            is_pack_expansion: false,
            span,
        }
    }

    pub fn pack_expansion(access: Access, name: Node, span: Span) -> Self {
        Self {
            is_pack_expansion: true,
            ..Self::new(access, name, span)
        }
    }
}

/// A member declaration inside a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberNode {
    pub access: Access,
    pub specifiers: DeclSpecifiers,
    pub declarator: Option<DeclaratorNode>,
    pub bit_width: Option<Box<Node>>,
    pub initializer: Option<Box<Node>>,
    pub span: Span,
}

impl MemberNode {
    pub fn new(
        access: Access,
        specifiers: DeclSpecifiers,
        declarator: Option<DeclaratorNode>,
        span: Span,
    ) -> Self {
        Self {
            access,
            specifiers,
            declarator,
            bit_width: None,
            initializer: None,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticAssertNode {
    pub condition: Box<Node>,
    pub message: Option<String>,
    pub span: Span,
}

/// A class body: key, name, base-specifiers and member declarations.
///
/// For a class template this is the pattern that instantiation substitutes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSpecifier {
    pub key: ClassKey,
    pub name: String,
    pub bases: Vec<BaseSpecifier>,
    pub members: Vec<Node>,
    pub span: Span,
}

impl ClassSpecifier {
    pub fn new(key: ClassKey, name: impl Into<String>, span: Span) -> Self {
        Self {
            key,
            name: name.into(),
            bases: Vec::new(),
            members: Vec::new(),
            span,
        }
    }

    pub fn with_base(mut self, base: BaseSpecifier) -> Self {
        self.bases.push(base);
        self
    }

    pub fn with_member(mut self, member: Node) -> Self {
        self.members.push(member);
        self
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for DeclSpecifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cv = self.flags.cv();
        if !cv.is_empty() {
            write!(f, "{cv} ")?;
        }
        match &self.type_name {
            Some(name) => write!(f, "{name}"),
            None => match Primitive::from_flags(self.flags) {
                Ok(prim) => f.write_str(prim.name()),
                Err(_) => f.write_str("<invalid>"),
            },
        }
    }
}

impl fmt::Display for DeclaratorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in self.parts() {
            match &part.op {
                DeclaratorOp::Id(name) => write!(f, " {name}")?,
                DeclaratorOp::Pointer(cv) if cv.is_empty() => f.write_str("*")?,
                DeclaratorOp::Pointer(cv) => write!(f, "* {cv}")?,
                DeclaratorOp::LvalueRef => f.write_str("&")?,
                DeclaratorOp::RvalueRef => f.write_str("&&")?,
                DeclaratorOp::Array(Some(bound)) => write!(f, "[{bound}]")?,
                DeclaratorOp::Array(None) => f.write_str("[]")?,
                DeclaratorOp::Function {
                    params,
                    variadic,
                    cv,
                } => {
                    f.write_str("(")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{param}")?;
                    }
                    if *variadic {
                        f.write_str(if params.is_empty() { "..." } else { ", ..." })?;
                    }
                    f.write_str(")")?;
                    if !cv.is_empty() {
                        write!(f, " {cv}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ParameterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specifiers)?;
        if let Some(declarator) = &self.declarator {
            write!(f, "{declarator}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeIdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specifiers)?;
        if let Some(declarator) = &self.declarator {
            write!(f, "{declarator}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TemplateIdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for BaseSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            f.write_str("virtual ")?;
        }
        write!(f, "{} {}", self.access.as_str(), self.name)?;
        if self.is_pack_expansion {
            f.write_str("...")?;
        }
        Ok(())
    }
}

impl fmt::Display for MemberNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specifiers)?;
        if let Some(declarator) = &self.declarator {
            write!(f, "{declarator}")?;
        }
        if let Some(width) = &self.bit_width {
            write!(f, " : {width}")?;
        }
        if let Some(init) = &self.initializer {
            write!(f, " = {init}")?;
        }
        f.write_str(";")
    }
}

impl fmt::Display for StaticAssertNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "static_assert({}, {message:?});", self.condition),
            None => write!(f, "static_assert({});", self.condition),
        }
    }
}

impl fmt::Display for ClassSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.as_str(), self.name)?;
        for (i, base) in self.bases.iter().enumerate() {
            f.write_str(if i == 0 { " : " } else { ", " })?;
            write!(f, "{base}")?;
        }
        f.write_str(" {")?;
        for member in &self.members {
            write!(f, " {member}")?;
        }
        f.write_str(" }")
    }
}
