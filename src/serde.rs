//! JSON-deserializable structure description.
//!
//! With the `serde` feature, [crate::Value], [ByteOrder] and
//! [crate::PrimitiveKind] also implement `Serialize` and `Deserialize`. Kinds
//! use their canonical marker names (`"u32"`, `"f64"`).
//!
//! These types describe a structure type as data, for example a schema file
//! shipped with an application, and are compiled into a [Schema] with
//! `Schema::try_from`. Field types use the same markers as
//! [crate::registry::lookup].
//!
//! ```json
//! {
//!   "name": "Packet",
//!   "byte_order": "Big",
//!   "fields": [
//!     { "name": "len", "type": "u16" },
//!     { "name": "flags", "type": "c_uint8" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{bytes::ByteOrder, errors::SchemaDefinitionError, field::FieldDecl, schema::Schema};

/// Top-level description of one structure type.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    /// Name of the structure type; used in error messages.
    pub name: String,
    #[serde(default)]
    pub byte_order: ByteOrder,
    /// Fields in native declaration order.
    pub fields: Vec<FieldDef>,
}

/// One declared field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Type marker such as `u32` or `c_double`.
    #[serde(rename = "type")]
    pub ty: String,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaDefinitionError;

    fn try_from(value: SchemaDef) -> Result<Self, Self::Error> {
        let decls: Vec<FieldDecl> = value
            .fields
            .into_iter()
            .map(|f| FieldDecl::new(f.name, f.ty))
            .collect();

        Schema::build_with_order(&value.name, &decls, value.byte_order)
    }
}

impl From<&Schema> for SchemaDef {
    fn from(value: &Schema) -> Self {
        SchemaDef {
            name: value.name().to_string(),
            byte_order: value.byte_order(),
            fields: value
                .fields()
                .iter()
                .map(|f| FieldDef {
                    name: f.name().to_string(),
                    ty: f.kind().name().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_json() {
        let def: SchemaDef = serde_json::from_str(
            r#"{
                "name": "Packet",
                "byte_order": "Big",
                "fields": [
                    { "name": "len", "type": "u16" },
                    { "name": "flags", "type": "c_uint8" },
                    { "name": "crc", "type": "u32" }
                ]
            }"#,
        )
        .unwrap();

        let schema = Schema::try_from(def).unwrap();
        assert_eq!(schema.byte_order(), ByteOrder::Big);
        assert_eq!(schema.field("crc").unwrap().offset(), 4);
        assert_eq!(schema.size(), 8);
    }

    #[test]
    fn test_schema_from_json_unsupported() {
        let def: SchemaDef = serde_json::from_str(
            r#"{ "name": "Packet", "fields": [{ "name": "label", "type": "c_char_p" }] }"#,
        )
        .unwrap();

        let err = Schema::try_from(def).unwrap_err();
        assert_eq!(err.field(), "label");
    }

    #[test]
    fn test_schema_def_round_trip() {
        let schema = Schema::builder("Point")
            .field("x", "c_int")
            .field("y", "c_int")
            .build()
            .unwrap();
        let def = SchemaDef::from(&schema);
        assert_eq!(def.fields[0].ty, "i32");
        assert_eq!(Schema::try_from(def).unwrap(), schema);
    }

    #[test]
    fn test_registry_types_round_trip() {
        use crate::{registry::PrimitiveKind, value::Value};

        for kind in PrimitiveKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            assert_eq!(serde_json::from_str::<PrimitiveKind>(&json).unwrap(), kind);
        }

        let order: ByteOrder = serde_json::from_str("\"Little\"").unwrap();
        assert_eq!(order, ByteOrder::Little);
        assert_eq!(serde_json::to_string(&ByteOrder::default()).unwrap(), "\"Native\"");

        for value in [
            Value::Bool(true),
            Value::I64(-3),
            Value::U64(u64::MAX),
            Value::F32(0.5),
            Value::F64(-2.25),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
        }
        assert_eq!(serde_json::to_string(&Value::U64(7)).unwrap(), r#"{"U64":7}"#);
    }
}
