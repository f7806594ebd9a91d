//! # nativestruct
//!
//! Declare native, ABI-compatible structures and access their fields
//! through a validated schema.
//!
//! A structure type is declared once, either statically with
//! [native_struct!] or at runtime with [Schema::builder]. Declaration
//! validates every field type against the closed set of primitive kinds in
//! [registry] and computes the `#[repr(C)]` layout. All reads and writes then
//! go through a proxy that rejects undeclared field names and values outside
//! a field's domain.
//!
//! ## Example
//!
//! ```
//! use nativestruct::{Proxy, Schema, StructProxy, Value, native_struct};
//!
//! native_struct! {
//!     pub struct Sample {
//!         pub uint: u32,
//!         pub char: u8,
//!     }
//! }
//!
//! let mut sample = Proxy::<Sample>::new();
//! sample.write(Sample::uint, 1);
//! assert_eq!(sample.read(Sample::uint), 1);
//! assert_eq!(Proxy::<Sample>::sizeof(), 8);
//! assert!(sample.set("char", 256u32).is_err());
//!
//! let schema = Schema::builder("Sample")
//!     .field("uint", "c_uint32")
//!     .field("char", "c_uint8")
//!     .build()
//!     .unwrap();
//! let mut dynamic = StructProxy::zeroed(&schema);
//! dynamic.set("uint", 1u32).unwrap();
//! assert_eq!(dynamic.get("uint"), Ok(Value::U64(1)));
//! ```

pub mod bytes;
pub mod errors;
pub mod field;
pub mod layout;
mod macros;
pub mod native;
pub mod proxy;
pub mod registry;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use bytes::ByteOrder;
pub use errors::{BindError, FieldAccessError, SchemaDefinitionError, SetError, ValueRangeError};
pub use native::{NativeStruct, RawStruct};
pub use proxy::{FieldRef, Proxy, StructProxy, Structure};
pub use registry::{Domain, Primitive, PrimitiveKind};
pub use schema::{Schema, SchemaBuilder};
pub use value::Value;
