//! Syntax tree consumed by semantic analysis.
//!
//! The grammar hands over an owned tree of [`Node`]s with names already
//! resolved. Template definitions keep their bodies as *dependent* trees in
//! which template parameters appear as [`DependentName`]s carrying the
//! parameter's index; [`Substitute::resolve_dependent`] rebuilds such a tree
//! against a concrete argument vector.
//!
//! Every node exclusively owns its children, so a substituted tree never
//! aliases the pattern it was built from.

mod decl;
mod eval;
mod expr;
mod substitute;

pub use decl::{
    Access, BaseSpecifier, ClassKey, ClassSpecifier, DeclSpecifiers, DeclaratorNode,
    DeclaratorOp, MemberNode, PackExpansionNode, ParameterNode, ResolvedTypeNode,
    StaticAssertNode, TemplateIdNode, TypeIdNode,
};
pub use eval::EvalResult;
pub use expr::{
    BinaryNode, BinaryOp, ConditionalNode, DependentName, LiteralNode, NameNode, ParenNode,
    UnaryNode, UnaryOp,
};
pub use substitute::{Substitute, expand_bases, expand_pack};

use cppmeta_core::{ConstValue, DeclFlags, Span};
use std::fmt;

use crate::symbols::SymbolId;
use crate::type_id::TypeIdRef;

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(LiteralNode),
    Name(NameNode),
    /// A template type parameter used as a type.
    DependentTypeName(DependentName),
    /// A template non-type parameter used as a value.
    DependentNonTypeName(DependentName),
    Unary(UnaryNode),
    Binary(BinaryNode),
    Conditional(ConditionalNode),
    Paren(ParenNode),
    TypeId(TypeIdNode),
    ResolvedType(ResolvedTypeNode),
    TemplateId(TemplateIdNode),
    PackExpansion(PackExpansionNode),
    BaseSpecifier(BaseSpecifier),
    Member(MemberNode),
    StaticAssert(StaticAssertNode),
    ClassSpecifier(ClassSpecifier),
}

impl Node {
    pub fn literal(value: ConstValue, span: Span) -> Node {
        Node::Literal(LiteralNode { value, span })
    }

    pub fn int(value: i64, span: Span) -> Node {
        Node::literal(ConstValue::Int(value), span)
    }

    pub fn boolean(value: bool, span: Span) -> Node {
        Node::literal(ConstValue::Bool(value), span)
    }

    pub fn name(name: impl Into<String>, symbol: SymbolId, span: Span) -> Node {
        Node::Name(NameNode {
            name: name.into(),
            symbol,
            span,
        })
    }

    pub fn dependent_type(name: impl Into<String>, param_index: usize, span: Span) -> Node {
        Node::DependentTypeName(DependentName {
            name: name.into(),
            param_index,
            span,
        })
    }

    pub fn dependent_value(name: impl Into<String>, param_index: usize, span: Span) -> Node {
        Node::DependentNonTypeName(DependentName {
            name: name.into(),
            param_index,
            span,
        })
    }

    pub fn unary(op: UnaryOp, operand: Node, span: Span) -> Node {
        Node::Unary(UnaryNode {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node, span: Span) -> Node {
        Node::Binary(BinaryNode {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    pub fn conditional(condition: Node, then_branch: Node, else_branch: Node, span: Span) -> Node {
        Node::Conditional(ConditionalNode {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            span,
        })
    }

    pub fn paren(inner: Node, span: Span) -> Node {
        Node::Paren(ParenNode {
            inner: Box::new(inner),
            span,
        })
    }

    pub fn type_id(
        specifiers: DeclSpecifiers,
        declarator: Option<DeclaratorNode>,
        span: Span,
    ) -> Node {
        Node::TypeId(TypeIdNode {
            specifiers,
            declarator,
            span,
        })
    }

    /// A type-id made of primitive specifiers only, such as `unsigned int`.
    pub fn primitive_type(flags: DeclFlags, span: Span) -> Node {
        Node::type_id(DeclSpecifiers::primitive(flags), None, span)
    }

    pub fn resolved_type(type_id: TypeIdRef, text: impl Into<String>, span: Span) -> Node {
        Node::ResolvedType(ResolvedTypeNode {
            type_id,
            text: text.into(),
            span,
        })
    }

    pub fn template_id(
        template: SymbolId,
        name: impl Into<String>,
        arguments: Vec<Node>,
        span: Span,
    ) -> Node {
        Node::TemplateId(TemplateIdNode {
            template,
            name: name.into(),
            arguments,
            span,
        })
    }

    pub fn pack_expansion(pattern: Node, span: Span) -> Node {
        Node::PackExpansion(PackExpansionNode {
            pattern: Box::new(pattern),
            span,
        })
    }

    pub fn static_assert(condition: Node, message: Option<&str>, span: Span) -> Node {
        Node::StaticAssert(StaticAssertNode {
            condition: Box::new(condition),
            message: message.map(str::to_string),
            span,
        })
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Literal(n) => n.span,
            Node::Name(n) => n.span,
            Node::DependentTypeName(n) | Node::DependentNonTypeName(n) => n.span,
            Node::Unary(n) => n.span,
            Node::Binary(n) => n.span,
            Node::Conditional(n) => n.span,
            Node::Paren(n) => n.span,
            Node::TypeId(n) => n.span,
            Node::ResolvedType(n) => n.span,
            Node::TemplateId(n) => n.span,
            Node::PackExpansion(n) => n.span,
            Node::BaseSpecifier(n) => n.span,
            Node::Member(n) => n.span,
            Node::StaticAssert(n) => n.span,
            Node::ClassSpecifier(n) => n.span,
        }
    }

    /// Short description of the variant, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Name(_) => "name",
            Node::DependentTypeName(_) => "dependent type name",
            Node::DependentNonTypeName(_) => "dependent value",
            Node::Unary(_) | Node::Binary(_) | Node::Conditional(_) | Node::Paren(_) => {
                "expression"
            }
            Node::TypeId(_) | Node::ResolvedType(_) => "type-id",
            Node::TemplateId(_) => "template-id",
            Node::PackExpansion(_) => "pack expansion",
            Node::BaseSpecifier(_) => "base specifier",
            Node::Member(_) => "member declaration",
            Node::StaticAssert(_) => "static_assert",
            Node::ClassSpecifier(_) => "class specifier",
        }
    }

    /// Whether the node is type syntax regardless of what its names resolve to.
    pub fn is_type_syntax(&self) -> bool {
        matches!(
            self,
            Node::TypeId(_) | Node::ResolvedType(_) | Node::DependentTypeName(_) | Node::TemplateId(_)
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(n) => write!(f, "{}", n.value),
            Node::Name(n) => f.write_str(&n.name),
            Node::DependentTypeName(n) | Node::DependentNonTypeName(n) => f.write_str(&n.name),
            Node::Unary(n) => write!(f, "{}{}", n.op, n.operand),
            Node::Binary(n) => write!(f, "{} {} {}", n.lhs, n.op, n.rhs),
            Node::Conditional(n) => write!(
                f,
                "{} ? {} : {}",
                n.condition, n.then_branch, n.else_branch
            ),
            Node::Paren(n) => write!(f, "({})", n.inner),
            Node::TypeId(n) => write!(f, "{n}"),
            Node::ResolvedType(n) => f.write_str(&n.text),
            Node::TemplateId(n) => write!(f, "{n}"),
            Node::PackExpansion(n) => write!(f, "{}...", n.pattern),
            Node::BaseSpecifier(n) => write!(f, "{n}"),
            Node::Member(n) => write!(f, "{n}"),
            Node::StaticAssert(n) => write!(f, "{n}"),
            Node::ClassSpecifier(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cppmeta_core::CvQualifiers;

    #[test]
    fn expression_display() {
        let span = Span::default();
        let expr = Node::binary(
            BinaryOp::Mul,
            Node::paren(
                Node::binary(BinaryOp::Add, Node::int(1, span), Node::dependent_value("N", 0, span), span),
                span,
            ),
            Node::unary(UnaryOp::Minus, Node::int(2, span), span),
            span,
        );
        assert_eq!(expr.to_string(), "(1 + N) * -2");
    }

    #[test]
    fn type_id_display_uses_suffix_order() {
        let span = Span::default();
        let declarator = DeclaratorNode::chain(
            vec![
                DeclaratorOp::Pointer(CvQualifiers::CONST),
                DeclaratorOp::Array(Some(Box::new(Node::int(3, span)))),
            ],
            span,
        );
        let node = Node::type_id(
            DeclSpecifiers::primitive(DeclFlags::CONST | DeclFlags::INT),
            declarator,
            span,
        );
        assert_eq!(node.to_string(), "const int* const[3]");
    }

    #[test]
    fn declarator_chain_order() {
        let span = Span::default();
        let Some(declarator) = DeclaratorNode::chain(
            vec![
                DeclaratorOp::Pointer(CvQualifiers::empty()),
                DeclaratorOp::Id("p".into()),
            ],
            span,
        ) else {
            panic!("expected a declarator");
        };
        assert!(matches!(declarator.op, DeclaratorOp::Pointer(_)));
        assert_eq!(declarator.name(), Some("p"));
        assert!(!declarator.is_function());
        assert!(DeclaratorNode::chain(Vec::new(), span).is_none());
    }

    #[test]
    fn function_declarator_detection() {
        let span = Span::default();
        let Some(declarator) = DeclaratorNode::chain(
            vec![
                DeclaratorOp::Function {
                    params: Vec::new(),
                    variadic: false,
                    cv: CvQualifiers::empty(),
                },
                DeclaratorOp::Id("f".into()),
            ],
            span,
        ) else {
            panic!("expected a declarator");
        };
        assert!(declarator.is_function());
    }

    #[test]
    fn type_syntax_classification() {
        let span = Span::default();
        assert!(Node::dependent_type("T", 0, span).is_type_syntax());
        assert!(Node::primitive_type(DeclFlags::INT, span).is_type_syntax());
        assert!(!Node::int(1, span).is_type_syntax());
        assert!(!Node::dependent_value("N", 0, span).is_type_syntax());
    }
}
