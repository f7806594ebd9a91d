//! Native ABI structure layout.
//!
//! Fields are placed in declaration order, each at the next offset that is a
//! multiple of its alignment. The total size is rounded up to the largest
//! field alignment. An empty structure has size 0 and alignment 1.
//!
//! The `const fn` variants exist so the [crate::native_struct] macro can
//! check its computed layout against the compiler's `#[repr(C)]` layout at
//! compile time.

use crate::registry::PrimitiveKind;

/// Computed layout of an ordered field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Byte offset of each field, in declaration order.
    pub offsets: Vec<usize>,
    pub size: usize,
    pub align: usize,
}

impl Layout {
    pub fn compute(kinds: &[PrimitiveKind]) -> Self {
        let mut offsets = Vec::with_capacity(kinds.len());
        let mut cursor = 0;
        let mut align = 1;

        for kind in kinds {
            let offset = align_up(cursor, kind.align());
            offsets.push(offset);
            cursor = offset + kind.size();
            align = align.max(kind.align());
        }

        Layout {
            offsets,
            size: align_up(cursor, align),
            align,
        }
    }
}

/// Rounds `offset` up to the next multiple of `align` (a power of two).
pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

pub const fn struct_align(kinds: &[PrimitiveKind]) -> usize {
    let mut align = 1;
    let mut i = 0;
    while i < kinds.len() {
        if kinds[i].align() > align {
            align = kinds[i].align();
        }
        i += 1;
    }
    align
}

pub const fn struct_size(kinds: &[PrimitiveKind]) -> usize {
    let mut cursor = 0;
    let mut i = 0;
    while i < kinds.len() {
        cursor = align_up(cursor, kinds[i].align()) + kinds[i].size();
        i += 1;
    }
    align_up(cursor, struct_align(kinds))
}

/// Offset of the field at `index`. Fails const evaluation when out of range.
pub const fn field_offset(kinds: &[PrimitiveKind], index: usize) -> usize {
    assert!(index < kinds.len(), "field index out of range");

    let mut cursor = 0;
    let mut i = 0;
    while i < index {
        cursor = align_up(cursor, kinds[i].align()) + kinds[i].size();
        i += 1;
    }
    align_up(cursor, kinds[index].align())
}

/// Index of `name` in `names`. Fails const evaluation when absent.
pub const fn position(names: &[&str], name: &str) -> usize {
    let mut i = 0;
    while i < names.len() {
        if str_eq(names[i], name) {
            return i;
        }
        i += 1;
    }
    panic!("field name not declared")
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }

    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
