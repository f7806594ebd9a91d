//! Error types for schema declaration, binding and field access.

use core::fmt;

use crate::{registry::Domain, value::Value};

/// Errors produced while declaring a structure type. Fatal to that declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDefinitionError {
    /// The field's declared type is not in the primitive registry.
    UnsupportedType {
        structure: String,
        field: String,
        declared: String,
    },
    /// The field name appears more than once.
    DuplicateField { structure: String, field: String },
    /// The field name is empty.
    InvalidFieldName { structure: String, field: String },
}

impl SchemaDefinitionError {
    pub fn structure(&self) -> &str {
        match self {
            SchemaDefinitionError::UnsupportedType { structure, .. }
            | SchemaDefinitionError::DuplicateField { structure, .. }
            | SchemaDefinitionError::InvalidFieldName { structure, .. } => structure,
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            SchemaDefinitionError::UnsupportedType { field, .. }
            | SchemaDefinitionError::DuplicateField { field, .. }
            | SchemaDefinitionError::InvalidFieldName { field, .. } => field,
        }
    }
}

impl fmt::Display for SchemaDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDefinitionError::UnsupportedType {
                structure,
                field,
                declared,
            } => write!(
                f,
                "{structure}.{field}: unsupported field type `{declared}`"
            ),
            SchemaDefinitionError::DuplicateField { structure, field } => {
                write!(f, "{structure}.{field}: field declared more than once")
            }
            SchemaDefinitionError::InvalidFieldName { structure, field } => {
                write!(f, "{structure}: invalid field name {field:?}")
            }
        }
    }
}

impl std::error::Error for SchemaDefinitionError {}

/// Access to a field name the schema does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessError {
    pub structure: String,
    pub field: String,
}

impl fmt::Display for FieldAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has no field `{}`", self.structure, self.field)
    }
}

impl std::error::Error for FieldAccessError {}

/// A write of a value outside the field's legal domain. Nothing was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRangeError {
    pub field: String,
    pub value: Value,
    pub domain: Domain,
}

impl fmt::Display for ValueRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} is outside the domain {} of field `{}`",
            self.value, self.domain, self.field
        )
    }
}

impl std::error::Error for ValueRangeError {}

/// Errors produced by writes through a proxy.
#[derive(Debug, Clone, PartialEq)]
pub enum SetError {
    Access(FieldAccessError),
    Range(ValueRangeError),
    /// The same field was given more than one initial value.
    Repeated { field: String },
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::Access(err) => err.fmt(f),
            SetError::Range(err) => err.fmt(f),
            SetError::Repeated { field } => write!(f, "got multiple values for field `{field}`"),
        }
    }
}

impl std::error::Error for SetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetError::Access(err) => Some(err),
            SetError::Range(err) => Some(err),
            SetError::Repeated { .. } => None,
        }
    }
}

impl From<FieldAccessError> for SetError {
    fn from(value: FieldAccessError) -> Self {
        SetError::Access(value)
    }
}

impl From<ValueRangeError> for SetError {
    fn from(value: ValueRangeError) -> Self {
        SetError::Range(value)
    }
}

/// Native storage cannot hold the structure it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The storage is smaller than the structure.
    TooSmall {
        structure: String,
        expected: usize,
        actual: usize,
    },
    /// The storage is itself a declared structure, and one of the bound
    /// structure's fields does not coincide with a storage field of the same
    /// kind at the same offset.
    Mismatch {
        structure: String,
        storage: String,
        field: String,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::TooSmall {
                structure,
                expected,
                actual,
            } => write!(
                f,
                "{structure} needs {expected} bytes of native storage, got {actual}"
            ),
            BindError::Mismatch {
                structure,
                storage,
                field,
            } => write!(
                f,
                "{structure}.{field} has no field of the same kind and offset in {storage}"
            ),
        }
    }
}

impl std::error::Error for BindError {}
