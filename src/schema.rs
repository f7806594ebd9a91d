//! Schema: the validated, immutable field list and layout of one structure type.

use std::collections::HashSet;

use crate::{
    bytes::ByteOrder,
    errors::{FieldAccessError, SchemaDefinitionError},
    field::{FieldDecl, FieldSpec, Marker},
    layout::Layout,
    registry::{self, PrimitiveKind},
};

/// Ordered fields of a structure type plus their native layout.
///
/// Use [Schema::builder] or [Schema::build] to construct one from field
/// declarations. Two schemas built from the same declarations compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
    size: usize,
    align: usize,
    byte_order: ByteOrder,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            byte_order: ByteOrder::Native,
            fields: Vec::new(),
        }
    }

    /// Validates `decls` against the primitive registry and computes their
    /// layout in native byte order.
    pub fn build(name: &str, decls: &[FieldDecl]) -> Result<Self, SchemaDefinitionError> {
        Self::build_with_order(name, decls, ByteOrder::Native)
    }

    pub fn build_with_order(
        name: &str,
        decls: &[FieldDecl],
        byte_order: ByteOrder,
    ) -> Result<Self, SchemaDefinitionError> {
        let mut kinds: Vec<PrimitiveKind> = Vec::with_capacity(decls.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(decls.len());

        for decl in decls {
            if decl.name.is_empty() {
                return Err(SchemaDefinitionError::InvalidFieldName {
                    structure: name.to_string(),
                    field: decl.name.clone(),
                });
            }

            if !seen.insert(&decl.name) {
                return Err(SchemaDefinitionError::DuplicateField {
                    structure: name.to_string(),
                    field: decl.name.clone(),
                });
            }

            let kind = match &decl.marker {
                Marker::Kind(kind) => *kind,
                Marker::Named(marker) => registry::lookup(marker).ok_or_else(|| {
                    SchemaDefinitionError::UnsupportedType {
                        structure: name.to_string(),
                        field: decl.name.clone(),
                        declared: marker.clone(),
                    }
                })?,
            };

            kinds.push(kind);
        }

        let layout = Layout::compute(&kinds);
        let fields = decls
            .iter()
            .zip(kinds)
            .zip(layout.offsets)
            .enumerate()
            .map(|(index, ((decl, kind), offset))| FieldSpec {
                name: decl.name.clone(),
                kind,
                index,
                offset,
            })
            .collect();

        let schema = Schema {
            name: name.to_string(),
            fields,
            size: layout.size,
            align: layout.align,
            byte_order,
        };

        log::debug!(
            "declared {}: {} fields, size {}, align {}",
            schema.name,
            schema.fields.len(),
            schema.size,
            schema.align
        );

        Ok(schema)
    }

    /// Builds the schema of a macro-declared structure.
    ///
    /// # Panics
    ///
    /// Panics when the declaration is invalid, which makes the structure type
    /// unusable. The [crate::native_struct] macro rejects unsupported types and
    /// duplicate names at compile time, so this does not happen for its input.
    #[doc(hidden)]
    pub fn declare(name: &str, names: &[&str], kinds: &[PrimitiveKind]) -> Self {
        let decls: Vec<FieldDecl> = names
            .iter()
            .zip(kinds)
            .map(|(name, kind)| FieldDecl::new(*name, *kind))
            .collect();

        match Self::build(name, &decls) {
            Ok(schema) => schema,
            Err(err) => panic!("invalid structure declaration: {err}"),
        }
    }

    /// Name of the structure type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Total size in bytes, including trailing padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn align(&self) -> usize {
        self.align
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Result<&FieldSpec, FieldAccessError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FieldAccessError {
                structure: self.name.clone(),
                field: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Collects field declarations in order, then validates them with [SchemaBuilder::build].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    byte_order: ByteOrder,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    /// Appends a field. `marker` is a [PrimitiveKind] or a type name such as
    /// `"u32"` or `"c_uint32"`.
    pub fn field(mut self, name: impl Into<String>, marker: impl Into<Marker>) -> Self {
        self.fields.push(FieldDecl::new(name, marker));
        self
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn build(self) -> Result<Schema, SchemaDefinitionError> {
        Schema::build_with_order(&self.name, &self.fields, self.byte_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty() {
        let schema = Schema::build("Empty", &[]).unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.size(), 0);
        assert_eq!(schema.align(), 1);
    }

    #[test]
    fn test_build_uint_char() {
        let schema = Schema::builder("Struct")
            .field("uint", "c_uint32")
            .field("char", "c_uint8")
            .build()
            .unwrap();

        let uint = schema.field("uint").unwrap();
        let char = schema.field("char").unwrap();
        assert_eq!((uint.offset(), uint.size(), uint.index()), (0, 4, 0));
        assert_eq!((char.offset(), char.size(), char.index()), (4, 1, 1));
        assert_eq!(schema.size(), 8);
        assert_eq!(schema.align(), 4);
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["uint", "char"]);
    }

    #[test]
    fn test_build_unsupported_type() {
        let result = Schema::builder("Record")
            .field("id", "u32")
            .field("label", "str")
            .build();

        assert_eq!(
            result,
            Err(SchemaDefinitionError::UnsupportedType {
                structure: "Record".to_string(),
                field: "label".to_string(),
                declared: "str".to_string(),
            })
        );
    }

    #[test]
    fn test_build_duplicate_field() {
        let result = Schema::builder("Record")
            .field("id", PrimitiveKind::U32)
            .field("id", PrimitiveKind::U8)
            .build();

        assert_eq!(
            result,
            Err(SchemaDefinitionError::DuplicateField {
                structure: "Record".to_string(),
                field: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_build_empty_name() {
        let result = Schema::builder("Record").field("", "u8").build();
        assert!(matches!(result, Err(SchemaDefinitionError::InvalidFieldName { .. })));
    }

    #[test]
    fn test_build_idempotent() {
        let decls = vec![
            FieldDecl::new("a", "u8"),
            FieldDecl::new("b", "f64"),
            FieldDecl::new("c", PrimitiveKind::I16),
        ];
        let first = Schema::build("Twice", &decls).unwrap();
        let second = Schema::build("Twice", &decls).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_missing() {
        let schema = Schema::builder("Struct").field("uint", "u32").build().unwrap();
        assert_eq!(
            schema.field("missing"),
            Err(FieldAccessError {
                structure: "Struct".to_string(),
                field: "missing".to_string(),
            })
        );
        assert!(!schema.contains("missing"));
    }

    #[test]
    fn test_byte_order_config() {
        let schema = Schema::builder("Wire")
            .field("len", "u16")
            .byte_order(ByteOrder::Big)
            .build()
            .unwrap();
        assert_eq!(schema.byte_order(), ByteOrder::Big);
        assert_ne!(
            schema,
            Schema::builder("Wire").field("len", "u16").build().unwrap()
        );
    }

    #[test]
    #[should_panic(expected = "invalid structure declaration")]
    fn test_declare_panics_on_duplicate() {
        Schema::declare("Bad", &["a", "a"], &[PrimitiveKind::U8, PrimitiveKind::U8]);
    }
}
