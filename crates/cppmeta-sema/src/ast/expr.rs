//! Expression nodes.
//!
//! Expressions appear as array bounds, enumerator values, non-type template
//! arguments, default arguments and `static_assert` conditions. Names are
//! already resolved by the parser: a [`NameNode`] points at its symbol and a
//! [`DependentName`] at a template parameter slot.

use cppmeta_core::{ConstValue, Span};
use std::fmt;

use super::Node;
use crate::symbols::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value: ConstValue,
    pub span: Span,
}

/// A name the parser resolved to a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct NameNode {
    pub name: String,
    pub symbol: SymbolId,
    pub span: Span,
}

/// A reference to a template parameter by its position in the parameter list.
///
/// The same struct backs both dependent type names and dependent non-type
/// names; the [`Node`] variant says which one it is.
#[derive(Debug, Clone, PartialEq)]
pub struct DependentName {
    pub name: String,
    pub param_index: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    pub op: UnaryOp,
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNode {
    pub op: BinaryOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalNode {
    pub condition: Box<Node>,
    pub then_branch: Box<Node>,
    pub else_branch: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenNode {
    pub inner: Box<Node>,
    pub span: Span,
}
