//! Constant evaluation of expression trees.
//!
//! Arithmetic follows the usual conversions in a simplified form: if either
//! operand is floating the operation is done in `f64`, otherwise if either is
//! unsigned in `u64` with wrap-around, otherwise in `i64` where overflow makes
//! the expression non-constant. Division by zero and out-of-range shifts are
//! never constant.

use cppmeta_core::{ConstValue, SemaError, SemaResult, Span};

use super::{BinaryOp, Node, UnaryOp};
use crate::symbols::{SymbolData, SymbolTable};

/// Result of evaluating an expression.
pub type EvalResult = SemaResult<ConstValue>;

impl Node {
    /// Evaluate this expression to a constant.
    ///
    /// Names are looked through to enumerators and constant objects;
    /// anything still depending on a template parameter is not constant.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn evaluate(&self, table: &SymbolTable) -> EvalResult {
        match self {
            Node::Literal(n) => Ok(n.value),
            Node::Paren(n) => n.inner.evaluate(table),
            Node::Name(n) => match table.symbol(n.symbol).data() {
                SymbolData::Enumerator(value) => Ok(*value),
                SymbolData::Object(object) => object.value.ok_or_else(|| {
                    SemaError::not_constant(format!("'{}' is not a constant", n.name), n.span)
                }),
                SymbolData::TemplateParam(_) => Err(SemaError::not_constant(
                    format!("'{}' is value-dependent", n.name),
                    n.span,
                )),
                _ => Err(SemaError::not_constant(
                    format!("'{}' does not name a value", n.name),
                    n.span,
                )),
            },
            Node::DependentNonTypeName(n) => Err(SemaError::not_constant(
                format!("'{}' is value-dependent", n.name),
                n.span,
            )),
            Node::Unary(n) => {
                let operand = n.operand.evaluate(table)?;
                eval_unary(n.op, operand, n.span)
            }
            Node::Binary(n) if n.op.is_logical() => {
                let lhs = n.lhs.evaluate(table)?.is_truthy();
                let value = match n.op {
                    BinaryOp::LogicalAnd => lhs && n.rhs.evaluate(table)?.is_truthy(),
                    _ => lhs || n.rhs.evaluate(table)?.is_truthy(),
                };
                Ok(ConstValue::Bool(value))
            }
            Node::Binary(n) => {
                let lhs = n.lhs.evaluate(table)?;
                let rhs = n.rhs.evaluate(table)?;
                eval_binary(n.op, lhs, rhs, n.span)
            }
            Node::Conditional(n) => {
                if n.condition.evaluate(table)?.is_truthy() {
                    n.then_branch.evaluate(table)
                } else {
                    n.else_branch.evaluate(table)
                }
            }
            other => Err(SemaError::not_constant(
                format!("a {} is not an expression", other.describe()),
                other.span(),
            )),
        }
    }
}

fn eval_unary(op: UnaryOp, value: ConstValue, span: Span) -> EvalResult {
    use ConstValue::*;
    match (op, value) {
        (UnaryOp::Not, v) => Ok(Bool(!v.is_truthy())),
        (UnaryOp::Plus, Bool(b)) => Ok(Int(b as i64)),
        (UnaryOp::Plus, v) => Ok(v),
        (UnaryOp::Minus, Int(v)) => v
            .checked_neg()
            .map(Int)
            .ok_or_else(|| overflow(span)),
        (UnaryOp::Minus, UInt(v)) => Ok(UInt(v.wrapping_neg())),
        (UnaryOp::Minus, Bool(b)) => Ok(Int(-(b as i64))),
        (UnaryOp::Minus, Float(v)) => Ok(ConstValue::float(-v.0)),
        (UnaryOp::BitNot, Int(v)) => Ok(Int(!v)),
        (UnaryOp::BitNot, UInt(v)) => Ok(UInt(!v)),
        (UnaryOp::BitNot, Bool(b)) => Ok(Int(!(b as i64))),
        (UnaryOp::BitNot, Float(_)) => Err(invalid_operand(op.as_str(), span)),
    }
}

/// Operands after the usual arithmetic conversions.
enum Operands {
    Signed(i64, i64),
    Unsigned(u64, u64),
    Floating(f64, f64),
}

fn convert(lhs: ConstValue, rhs: ConstValue) -> Operands {
    use ConstValue::*;
    match (lhs, rhs) {
        (Float(_), _) | (_, Float(_)) => Operands::Floating(lhs.as_f64(), rhs.as_f64()),
        (UInt(_), _) | (_, UInt(_)) => Operands::Unsigned(to_unsigned(lhs), to_unsigned(rhs)),
        _ => Operands::Signed(to_signed(lhs), to_signed(rhs)),
    }
}

fn to_unsigned(value: ConstValue) -> u64 {
    match value {
        ConstValue::Int(v) => v as u64,
        ConstValue::UInt(v) => v,
        ConstValue::Bool(b) => b as u64,
        ConstValue::Float(v) => v.0 as u64,
    }
}

fn to_signed(value: ConstValue) -> i64 {
    match value {
        ConstValue::Int(v) => v,
        ConstValue::UInt(v) => v as i64,
        ConstValue::Bool(b) => b as i64,
        ConstValue::Float(v) => v.0 as i64,
    }
}

fn eval_binary(op: BinaryOp, lhs: ConstValue, rhs: ConstValue, span: Span) -> EvalResult {
    let operands = convert(lhs, rhs);
    if op.is_comparison() {
        let ordering = match operands {
            Operands::Signed(a, b) => a.partial_cmp(&b),
            Operands::Unsigned(a, b) => a.partial_cmp(&b),
            Operands::Floating(a, b) => a.partial_cmp(&b),
        };
        let result = ordering.is_some_and(|o| match op {
            BinaryOp::Eq => o.is_eq(),
            BinaryOp::Ne => o.is_ne(),
            BinaryOp::Lt => o.is_lt(),
            BinaryOp::Le => o.is_le(),
            BinaryOp::Gt => o.is_gt(),
            _ => o.is_ge(),
        });
        // NaN compares unequal to everything.
        let result = if ordering.is_none() && op == BinaryOp::Ne { true } else { result };
        return Ok(ConstValue::Bool(result));
    }

    match operands {
        Operands::Signed(a, b) => eval_signed(op, a, b, span).map(ConstValue::Int),
        Operands::Unsigned(a, b) => eval_unsigned(op, a, b, span).map(ConstValue::UInt),
        Operands::Floating(a, b) => eval_floating(op, a, b, span).map(ConstValue::float),
    }
}

fn eval_signed(op: BinaryOp, a: i64, b: i64, span: Span) -> SemaResult<i64> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(division_by_zero(span)),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Rem => a.checked_rem(b),
        BinaryOp::Shl | BinaryOp::Shr => {
            let shift = shift_amount(b, span)?;
            if op == BinaryOp::Shl {
                a.checked_shl(shift)
            } else {
                a.checked_shr(shift)
            }
        }
        BinaryOp::BitAnd => Some(a & b),
        BinaryOp::BitOr => Some(a | b),
        BinaryOp::BitXor => Some(a ^ b),
        _ => return Err(invalid_operand(op.as_str(), span)),
    };
    result.ok_or_else(|| overflow(span))
}

fn eval_unsigned(op: BinaryOp, a: u64, b: u64, span: Span) -> SemaResult<u64> {
    Ok(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(division_by_zero(span)),
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Shl => a << shift_amount(b as i64, span)?,
        BinaryOp::Shr => a >> shift_amount(b as i64, span)?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return Err(invalid_operand(op.as_str(), span)),
    })
}

fn eval_floating(op: BinaryOp, a: f64, b: f64, span: Span) -> SemaResult<f64> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div if b == 0.0 => Err(division_by_zero(span)),
        BinaryOp::Div => Ok(a / b),
        _ => Err(invalid_operand(op.as_str(), span)),
    }
}

fn shift_amount(amount: i64, span: Span) -> SemaResult<u32> {
    u32::try_from(amount)
        .ok()
        .filter(|&s| s < 64)
        .ok_or_else(|| SemaError::not_constant(format!("shift count {amount} is out of range"), span))
}

fn overflow(span: Span) -> SemaError {
    SemaError::not_constant("arithmetic overflow", span)
}

fn division_by_zero(span: Span) -> SemaError {
    SemaError::not_constant("division by zero", span)
}

fn invalid_operand(op: &str, span: Span) -> SemaError {
    SemaError::not_constant(format!("invalid operands to '{op}'"), span)
}
