//! Host-side representation of a field value.

use core::fmt;

/// A value read from or written to a native struct field.
///
/// Reads always produce the canonical variant for the field's kind:
/// `U64` for unsigned integers, `I64` for signed integers, `F32`/`F64` for
/// floats and `Bool` for booleans.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U64(v) => Some(v),
            Value::I64(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I64(v) => Some(v),
            Value::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as _)
                }
            }
        )*
    };
}

impl_from!(U64: u8, u16, u32, u64, usize);
impl_from!(I64: i8, i16, i32, i64, isize);
impl_from!(F32: f32);
impl_from!(F64: f64);
impl_from!(Bool: bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(7u8), Value::U64(7));
        assert_eq!(Value::from(-7i16), Value::I64(-7));
        assert_eq!(Value::from(1.5f32), Value::F32(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::I64(3).as_u64(), Some(3));
        assert_eq!(Value::I64(-3).as_u64(), None);
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::F32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::U64(1).as_bool(), None);
    }
}
