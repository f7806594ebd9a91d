//! The closed set of primitive field kinds a native structure may contain.
//!
//! Every kind carries its native size, alignment and legal value domain.
//! Kinds are resolved either from a textual type marker ([lookup]) or, on the
//! static declaration surface, from a Rust type implementing [Primitive].

use core::ffi::{c_long, c_ulong};
use core::fmt;
use core::mem::{align_of, size_of};

use crate::value::Value;

/// A native primitive field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PrimitiveKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// Pointer-sized signed integer (`ssize_t`).
    Isize,
    /// Pointer-sized unsigned integer (`size_t`).
    Usize,
    F32,
    F64,
}

/// Broad numeric class of a [PrimitiveKind].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Bool,
    Signed,
    Unsigned,
    Float,
}

impl PrimitiveKind {
    /// Every supported kind, in registry order.
    pub const ALL: [PrimitiveKind; 13] = [
        PrimitiveKind::Bool,
        PrimitiveKind::I8,
        PrimitiveKind::U8,
        PrimitiveKind::I16,
        PrimitiveKind::U16,
        PrimitiveKind::I32,
        PrimitiveKind::U32,
        PrimitiveKind::I64,
        PrimitiveKind::U64,
        PrimitiveKind::Isize,
        PrimitiveKind::Usize,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    /// Size in bytes of the native representation.
    pub const fn size(self) -> usize {
        match self {
            PrimitiveKind::Bool => size_of::<bool>(),
            PrimitiveKind::I8 => size_of::<i8>(),
            PrimitiveKind::U8 => size_of::<u8>(),
            PrimitiveKind::I16 => size_of::<i16>(),
            PrimitiveKind::U16 => size_of::<u16>(),
            PrimitiveKind::I32 => size_of::<i32>(),
            PrimitiveKind::U32 => size_of::<u32>(),
            PrimitiveKind::I64 => size_of::<i64>(),
            PrimitiveKind::U64 => size_of::<u64>(),
            PrimitiveKind::Isize => size_of::<isize>(),
            PrimitiveKind::Usize => size_of::<usize>(),
            PrimitiveKind::F32 => size_of::<f32>(),
            PrimitiveKind::F64 => size_of::<f64>(),
        }
    }

    /// Alignment in bytes the platform ABI requires for this kind inside a struct.
    pub const fn align(self) -> usize {
        match self {
            PrimitiveKind::Bool => align_of::<bool>(),
            PrimitiveKind::I8 => align_of::<i8>(),
            PrimitiveKind::U8 => align_of::<u8>(),
            PrimitiveKind::I16 => align_of::<i16>(),
            PrimitiveKind::U16 => align_of::<u16>(),
            PrimitiveKind::I32 => align_of::<i32>(),
            PrimitiveKind::U32 => align_of::<u32>(),
            PrimitiveKind::I64 => align_of::<i64>(),
            PrimitiveKind::U64 => align_of::<u64>(),
            PrimitiveKind::Isize => align_of::<isize>(),
            PrimitiveKind::Usize => align_of::<usize>(),
            PrimitiveKind::F32 => align_of::<f32>(),
            PrimitiveKind::F64 => align_of::<f64>(),
        }
    }

    pub const fn bits(self) -> u32 {
        (self.size() * 8) as u32
    }

    pub const fn class(self) -> KindClass {
        match self {
            PrimitiveKind::Bool => KindClass::Bool,
            PrimitiveKind::I8
            | PrimitiveKind::I16
            | PrimitiveKind::I32
            | PrimitiveKind::I64
            | PrimitiveKind::Isize => KindClass::Signed,
            PrimitiveKind::U8
            | PrimitiveKind::U16
            | PrimitiveKind::U32
            | PrimitiveKind::U64
            | PrimitiveKind::Usize => KindClass::Unsigned,
            PrimitiveKind::F32 | PrimitiveKind::F64 => KindClass::Float,
        }
    }

    /// Canonical marker name, as accepted by [lookup].
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::Isize => "isize",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    /// The set of values a field of this kind may hold.
    pub fn domain(self) -> Domain {
        match self.class() {
            KindClass::Bool => Domain::Bool,
            KindClass::Unsigned => Domain::Unsigned {
                max: u64::MAX >> (64 - self.bits()),
            },
            KindClass::Signed => Domain::Signed {
                min: i64::MIN >> (64 - self.bits()),
                max: i64::MAX >> (64 - self.bits()),
            },
            KindClass::Float if self == PrimitiveKind::F32 => Domain::Float32,
            KindClass::Float => Domain::Float64,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a declared type marker to its kind, or `None` when the marker
/// names a type outside the registry.
///
/// Both Rust primitive names (`u32`) and C names (`c_uint32`, `c_long`) are
/// accepted. C types whose width depends on the platform resolve to the
/// width of the platform's C type.
pub fn lookup(marker: &str) -> Option<PrimitiveKind> {
    let kind = match marker {
        "bool" | "c_bool" => PrimitiveKind::Bool,
        "i8" | "c_int8" | "c_byte" => PrimitiveKind::I8,
        "u8" | "c_uint8" | "c_ubyte" => PrimitiveKind::U8,
        "i16" | "c_int16" | "c_short" => PrimitiveKind::I16,
        "u16" | "c_uint16" | "c_ushort" => PrimitiveKind::U16,
        "i32" | "c_int32" | "c_int" => PrimitiveKind::I32,
        "u32" | "c_uint32" | "c_uint" => PrimitiveKind::U32,
        "i64" | "c_int64" | "c_longlong" => PrimitiveKind::I64,
        "u64" | "c_uint64" | "c_ulonglong" => PrimitiveKind::U64,
        "isize" | "c_ssize_t" => PrimitiveKind::Isize,
        "usize" | "c_size_t" => PrimitiveKind::Usize,
        "f32" | "c_float" => PrimitiveKind::F32,
        "f64" | "c_double" => PrimitiveKind::F64,
        "c_long" if size_of::<c_long>() == 8 => PrimitiveKind::I64,
        "c_long" => PrimitiveKind::I32,
        "c_ulong" if size_of::<c_ulong>() == 8 => PrimitiveKind::U64,
        "c_ulong" => PrimitiveKind::U32,
        _ => return None,
    };

    Some(kind)
}

/// Legal value domain of a [PrimitiveKind].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    Bool,
    Unsigned { max: u64 },
    Signed { min: i64, max: i64 },
    Float32,
    Float64,
}

impl Domain {
    /// Converts `value` into the canonical [Value] variant for this domain,
    /// or returns `None` when the value lies outside it.
    ///
    /// Integers are accepted by float domains only when exactly representable.
    /// Floats are never accepted by integer domains.
    pub fn admit(&self, value: Value) -> Option<Value> {
        match (*self, value) {
            (Domain::Bool, Value::Bool(b)) => Some(Value::Bool(b)),
            (Domain::Unsigned { max }, Value::U64(v)) => (v <= max).then_some(Value::U64(v)),
            (Domain::Unsigned { max }, Value::I64(v)) => {
                (v >= 0 && (v as u64) <= max).then_some(Value::U64(v as u64))
            }
            (Domain::Signed { min, max }, Value::I64(v)) => {
                (min <= v && v <= max).then_some(Value::I64(v))
            }
            (Domain::Signed { max, .. }, Value::U64(v)) => {
                (v <= (max as u64)).then_some(Value::I64(v as i64))
            }
            (Domain::Float32, Value::F32(v)) => Some(Value::F32(v)),
            (Domain::Float32, Value::F64(v)) => {
                let narrowed = v as f32;
                (v.is_nan() || (narrowed as f64) == v).then_some(Value::F32(narrowed))
            }
            (Domain::Float64, Value::F64(v)) => Some(Value::F64(v)),
            (Domain::Float64, Value::F32(v)) => Some(Value::F64(v as f64)),
            (Domain::Float32, Value::I64(v)) => exact_f32(v as i128).map(Value::F32),
            (Domain::Float32, Value::U64(v)) => exact_f32(v as i128).map(Value::F32),
            (Domain::Float64, Value::I64(v)) => exact_f64(v as i128).map(Value::F64),
            (Domain::Float64, Value::U64(v)) => exact_f64(v as i128).map(Value::F64),
            _ => None,
        }
    }

    pub fn contains(&self, value: Value) -> bool {
        self.admit(value).is_some()
    }
}

fn exact_f32(v: i128) -> Option<f32> {
    let f = v as f32;
    ((f as i128) == v).then_some(f)
}

fn exact_f64(v: i128) -> Option<f64> {
    let f = v as f64;
    ((f as i128) == v).then_some(f)
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Bool => write!(f, "{{false, true}}"),
            Domain::Unsigned { max } => write!(f, "[0, {max}]"),
            Domain::Signed { min, max } => write!(f, "[{min}, {max}]"),
            Domain::Float32 => write!(f, "32-bit float"),
            Domain::Float64 => write!(f, "64-bit float"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust type usable as a native struct field.
///
/// Implemented for exactly the types of the registry; the set is closed.
/// Values travel through the storage layer as raw bit patterns held in the
/// low bits of a `u64`.
pub trait Primitive: Copy + sealed::Sealed + 'static {
    const KIND: PrimitiveKind;

    fn to_bits(self) -> u64;

    fn from_bits(bits: u64) -> Self;

    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$kind;

                fn to_bits(self) -> u64 {
                    self as u64
                }

                fn from_bits(bits: u64) -> Self {
                    bits as $ty
                }

                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

impl_primitive! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    isize => Isize,
    usize => Usize,
}

impl sealed::Sealed for bool {}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn to_bits(self) -> u64 {
        self as u64
    }

    fn from_bits(bits: u64) -> Self {
        bits & 0xff != 0
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl sealed::Sealed for f32 {}

impl Primitive for f32 {
    const KIND: PrimitiveKind = PrimitiveKind::F32;

    fn to_bits(self) -> u64 {
        f32::to_bits(self) as u64
    }

    fn from_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn into_value(self) -> Value {
        Value::F32(self)
    }
}

impl sealed::Sealed for f64 {}

impl Primitive for f64 {
    const KIND: PrimitiveKind = PrimitiveKind::F64;

    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn into_value(self) -> Value {
        Value::F64(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_rust_names() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(lookup(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_lookup_c_names() {
        assert_eq!(lookup("c_uint32"), Some(PrimitiveKind::U32));
        assert_eq!(lookup("c_ubyte"), Some(PrimitiveKind::U8));
        assert_eq!(lookup("c_double"), Some(PrimitiveKind::F64));
        assert_eq!(lookup("c_size_t"), Some(PrimitiveKind::Usize));
        assert_eq!(lookup("c_long").map(PrimitiveKind::size), Some(size_of::<c_long>()));
    }

    #[test]
    fn test_lookup_unsupported() {
        assert_eq!(lookup("str"), None);
        assert_eq!(lookup("c_char_p"), None);
        assert_eq!(lookup("U32"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_sizes_match_rust_types() {
        assert_eq!(PrimitiveKind::U8.size(), 1);
        assert_eq!(PrimitiveKind::I16.size(), 2);
        assert_eq!(PrimitiveKind::U32.size(), 4);
        assert_eq!(PrimitiveKind::F64.size(), 8);
        assert_eq!(PrimitiveKind::U64.align(), align_of::<u64>());
        assert_eq!(PrimitiveKind::Usize.size(), size_of::<usize>());
    }

    #[test]
    fn test_domains() {
        assert_eq!(PrimitiveKind::U8.domain(), Domain::Unsigned { max: 255 });
        assert_eq!(
            PrimitiveKind::I8.domain(),
            Domain::Signed {
                min: -128,
                max: 127
            }
        );
        assert_eq!(
            PrimitiveKind::I64.domain(),
            Domain::Signed {
                min: i64::MIN,
                max: i64::MAX
            }
        );
        assert_eq!(PrimitiveKind::U64.domain(), Domain::Unsigned { max: u64::MAX });
        assert_eq!(PrimitiveKind::F32.domain(), Domain::Float32);
    }

    #[test]
    fn test_admit_integers() {
        let u8_domain = PrimitiveKind::U8.domain();
        assert_eq!(u8_domain.admit(Value::U64(255)), Some(Value::U64(255)));
        assert_eq!(u8_domain.admit(Value::U64(256)), None);
        assert_eq!(u8_domain.admit(Value::I64(7)), Some(Value::U64(7)));
        assert_eq!(u8_domain.admit(Value::I64(-1)), None);
        assert_eq!(u8_domain.admit(Value::F64(1.0)), None);
        assert_eq!(u8_domain.admit(Value::Bool(true)), None);

        let i16_domain = PrimitiveKind::I16.domain();
        assert_eq!(i16_domain.admit(Value::I64(-32768)), Some(Value::I64(-32768)));
        assert_eq!(i16_domain.admit(Value::I64(-32769)), None);
        assert_eq!(i16_domain.admit(Value::U64(32767)), Some(Value::I64(32767)));
        assert_eq!(i16_domain.admit(Value::U64(32768)), None);
    }

    #[test]
    fn test_admit_floats() {
        let f32_domain = PrimitiveKind::F32.domain();
        assert_eq!(f32_domain.admit(Value::F64(0.5)), Some(Value::F32(0.5)));
        assert_eq!(f32_domain.admit(Value::F64(0.1)), None);
        assert_eq!(f32_domain.admit(Value::I64(16_777_216)), Some(Value::F32(16_777_216.0)));
        assert_eq!(f32_domain.admit(Value::I64(16_777_217)), None);
        assert_eq!(f32_domain.admit(Value::U64(u64::MAX)), None);

        let f64_domain = PrimitiveKind::F64.domain();
        assert_eq!(f64_domain.admit(Value::F32(1.5)), Some(Value::F64(1.5)));
        assert_eq!(f64_domain.admit(Value::I64(i64::MAX)), None);
        assert_eq!(f64_domain.admit(Value::Bool(false)), None);
    }

    #[test]
    fn test_primitive_bits() {
        assert_eq!(<i8 as Primitive>::from_bits((-5i8).to_bits()), -5);
        assert_eq!(<u16 as Primitive>::from_bits(0x1_2345), 0x2345);
        assert_eq!(<f32 as Primitive>::from_bits(1.25f32.to_bits() as u64), 1.25);
        assert!(<bool as Primitive>::from_bits(1));
        assert_eq!(<i32 as Primitive>::KIND, PrimitiveKind::I32);
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(PrimitiveKind::U8.domain().to_string(), "[0, 255]");
        assert_eq!(PrimitiveKind::I8.domain().to_string(), "[-128, 127]");
        assert_eq!(PrimitiveKind::Bool.domain().to_string(), "{false, true}");
    }
}
