//! Field declarations and the resolved field specs stored in a [crate::schema::Schema].

use crate::registry::PrimitiveKind;

/// Declared type of a field: a kind that is already resolved, or a marker
/// name still to be looked up in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Kind(PrimitiveKind),
    Named(String),
}

impl From<PrimitiveKind> for Marker {
    fn from(value: PrimitiveKind) -> Self {
        Marker::Kind(value)
    }
}

impl From<&str> for Marker {
    fn from(value: &str) -> Self {
        Marker::Named(value.to_string())
    }
}

impl From<String> for Marker {
    fn from(value: String) -> Self {
        Marker::Named(value)
    }
}

impl Marker {
    /// Text of the marker as it appears in error messages.
    pub fn as_str(&self) -> &str {
        match self {
            Marker::Kind(kind) => kind.name(),
            Marker::Named(name) => name,
        }
    }
}

/// One declared field: a name and its type marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub marker: Marker,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, marker: impl Into<Marker>) -> Self {
        FieldDecl {
            name: name.into(),
            marker: marker.into(),
        }
    }
}

/// A validated field with its position in the native layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) kind: PrimitiveKind,
    pub(crate) index: usize,
    pub(crate) offset: usize,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Position in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset from the start of the structure.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    /// Byte range the field occupies in the structure.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.kind.size()
    }
}
