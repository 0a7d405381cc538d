//! Compile-time constant values.
//!
//! Produced by constant evaluation and consumed as array bounds, enumerator
//! values, non-type template arguments and `static_assert` conditions.

use ordered_float::OrderedFloat;
use std::fmt;

/// The value of a constant expression.
///
/// Floats are wrapped in [`OrderedFloat`] so values can be compared and
/// hashed when they appear in template argument tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    Bool(bool),
}

impl ConstValue {
    pub fn float(v: f64) -> Self {
        ConstValue::Float(OrderedFloat(v))
    }

    /// Integral view, if the value is integral (bools count as 0/1).
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ConstValue::Int(v) => Some(v),
            ConstValue::UInt(v) => i64::try_from(v).ok(),
            ConstValue::Bool(v) => Some(v as i64),
            ConstValue::Float(_) => None,
        }
    }

    /// Integral view wide enough for every signed and unsigned value.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            ConstValue::Int(v) => Some(i128::from(v)),
            ConstValue::UInt(v) => Some(i128::from(v)),
            ConstValue::Bool(v) => Some(i128::from(v)),
            ConstValue::Float(_) => None,
        }
    }

    /// Non-negative integral view, used for array bounds.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            ConstValue::Int(v) => u64::try_from(v).ok(),
            ConstValue::UInt(v) => Some(v),
            ConstValue::Bool(v) => Some(v as u64),
            ConstValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            ConstValue::Int(v) => v as f64,
            ConstValue::UInt(v) => v as f64,
            ConstValue::Bool(v) => v as u8 as f64,
            ConstValue::Float(v) => v.0,
        }
    }

    /// Contextual conversion to `bool`.
    pub fn is_truthy(&self) -> bool {
        match *self {
            ConstValue::Int(v) => v != 0,
            ConstValue::UInt(v) => v != 0,
            ConstValue::Bool(v) => v,
            ConstValue::Float(v) => v.0 != 0.0,
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, ConstValue::Float(_))
    }

    /// Canonical encoding used inside mangled names: `L<type><value>E`.
    ///
    /// Negative integers use an `n` prefix; floats are encoded by their IEEE
    /// bit pattern so equal values always produce equal text.
    pub fn mangle(&self) -> String {
        match *self {
            ConstValue::Int(v) if v < 0 => format!("Lin{}E", v.unsigned_abs()),
            ConstValue::Int(v) => format!("Li{v}E"),
            ConstValue::UInt(v) => format!("Lj{v}E"),
            ConstValue::Bool(v) => format!("Lb{}E", v as u8),
            ConstValue::Float(v) => format!("Ld{:016x}E", v.0.to_bits()),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::UInt(v) => write!(f, "{v}u"),
            ConstValue::Bool(v) => write!(f, "{v}"),
            ConstValue::Float(v) => write!(f, "{:?}", v.0),
        }
    }
}
