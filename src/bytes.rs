//! Byte-order aware loads and stores of primitive bit patterns.
//!
//! A field value travels as a `u64` bit pattern: integers in two's
//! complement, floats as their IEEE 754 bits, booleans as 0 or 1. Only the
//! low `bytes.len()` bytes of the pattern are stored.

use crate::{
    registry::{KindClass, PrimitiveKind},
    value::Value,
};

/// Byte order of multi-byte fields in a native struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Whatever the target platform uses. Required for structs shared with native code.
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    pub const fn is_little(self) -> bool {
        match self {
            ByteOrder::Native => cfg!(target_endian = "little"),
            ByteOrder::Little => true,
            ByteOrder::Big => false,
        }
    }
}

/// Reads up to 8 bytes as an unsigned bit pattern.
pub fn load(bytes: &[u8], order: ByteOrder) -> u64 {
    debug_assert!(bytes.len() <= 8);

    if order.is_little() {
        bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | b as u64)
    } else {
        bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u64)
    }
}

/// Writes the low `out.len()` bytes of `bits`.
pub fn store(bits: u64, order: ByteOrder, out: &mut [u8]) {
    debug_assert!(out.len() <= 8);

    let le = bits.to_le_bytes();
    let n = out.len();
    out.copy_from_slice(&le[..n]);

    if !order.is_little() {
        out.reverse();
    }
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Interprets a loaded bit pattern as a canonical [Value] of `kind`.
pub fn decode(kind: PrimitiveKind, bits: u64) -> Value {
    match kind.class() {
        KindClass::Bool => Value::Bool(bits & 0xff != 0),
        KindClass::Unsigned => Value::U64(bits),
        KindClass::Signed => Value::I64(sign_extend(bits, kind.bits())),
        KindClass::Float if kind == PrimitiveKind::F32 => Value::F32(f32::from_bits(bits as u32)),
        KindClass::Float => Value::F64(f64::from_bits(bits)),
    }
}

/// Bit pattern of a canonical value. Integer patterns are truncated on store.
pub fn encode(value: Value) -> u64 {
    match value {
        Value::Bool(v) => v as u64,
        Value::I64(v) => v as u64,
        Value::U64(v) => v,
        Value::F32(v) => v.to_bits() as u64,
        Value::F64(v) => v.to_bits(),
    }
}
