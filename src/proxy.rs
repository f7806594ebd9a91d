//! Schema-checked access to native structure instances.
//!
//! [StructProxy] binds a runtime [Schema] to native storage and offers
//! string-keyed `get`/`set`. [Proxy] ties the schema to a structure type
//! declared with [crate::native_struct], which adds typed, compile-time
//! checked access through [FieldRef] handles.

use core::fmt;
use core::marker::PhantomData;
use std::collections::{BTreeMap, HashSet};

use crate::{
    bytes,
    errors::{BindError, FieldAccessError, SetError, ValueRangeError},
    field::FieldSpec,
    native::{NativeStruct, RawStruct},
    registry::Primitive,
    schema::Schema,
    value::Value,
};

/// A structure type with a schema built once and shared by all its instances.
pub trait Structure: Sized + 'static {
    fn schema() -> &'static Schema;
}

/// Typed handle to one declared field of structure `S` holding a `T`.
///
/// Generated as associated constants by [crate::native_struct]; an access to
/// an undeclared field through a handle is a compile error.
pub struct FieldRef<S, T> {
    index: usize,
    name: &'static str,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T> FieldRef<S, T> {
    #[doc(hidden)]
    pub const fn new(index: usize, name: &'static str) -> Self {
        FieldRef {
            index,
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<S, T> Clone for FieldRef<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for FieldRef<S, T> {}

impl<S, T> fmt::Debug for FieldRef<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

/// A [Schema] bound to native storage `N`.
pub struct StructProxy<'s, N> {
    schema: &'s Schema,
    native: N,
}

impl<'s> StructProxy<'s, RawStruct> {
    /// Binds `schema` to fresh zero-filled storage.
    pub fn zeroed(schema: &'s Schema) -> Self {
        StructProxy {
            schema,
            native: RawStruct::for_schema(schema),
        }
    }
}

impl<'s, N: NativeStruct> StructProxy<'s, N> {
    /// Binds `schema` to `native`.
    ///
    /// Fails when the storage is smaller than the schema, or when the storage
    /// is a declared structure lacking a field of the same kind at the offset
    /// of one of the schema's fields.
    pub fn bind(schema: &'s Schema, native: N) -> Result<Self, BindError> {
        if let Err(err) = check_storage(schema, &native) {
            log::debug!("rejected bind: {err}");
            return Err(err);
        }

        Ok(StructProxy { schema, native })
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Reads the field named `name`.
    pub fn get(&self, name: &str) -> Result<Value, FieldAccessError> {
        match self.schema.field(name) {
            Ok(field) => Ok(self.load(field)),
            Err(err) => {
                log::debug!("rejected read: {err}");
                Err(err)
            }
        }
    }

    /// Writes `value` to the field named `name`.
    ///
    /// The value must lie in the field's domain; nothing is written otherwise.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SetError> {
        let value = value.into();
        let result = self.try_store(name, value);

        match &result {
            Ok(()) => log::trace!("{}.{} = {}", self.schema.name(), name, value),
            Err(err) => log::debug!("rejected write: {err}"),
        }

        result
    }

    fn try_store(&mut self, name: &str, value: Value) -> Result<(), SetError> {
        let field = self.schema.field(name)?;
        let domain = field.kind().domain();
        let admitted = domain.admit(value).ok_or_else(|| ValueRangeError {
            field: name.to_string(),
            value,
            domain,
        })?;

        Self::store(&mut self.native, self.schema, field, bytes::encode(admitted));
        Ok(())
    }

    fn load(&self, field: &FieldSpec) -> Value {
        bytes::decode(field.kind(), self.load_bits(field))
    }

    fn load_bits(&self, field: &FieldSpec) -> u64 {
        let mut buf = [0u8; 8];
        let raw = &mut buf[..field.size()];
        self.native.read_at(field.offset(), raw);
        bytes::load(raw, self.schema.byte_order())
    }

    fn store(native: &mut N, schema: &Schema, field: &FieldSpec, bits: u64) {
        let mut buf = [0u8; 8];
        let raw = &mut buf[..field.size()];
        bytes::store(bits, schema.byte_order(), raw);
        native.write_at(field.offset(), raw);
    }

    /// Field values in declaration order.
    pub fn values(&self) -> Vec<Value> {
        self.schema.fields().iter().map(|f| self.load(f)).collect()
    }

    /// All fields by name.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), self.load(f)))
            .collect()
    }

    /// Applies initial values, rejecting unknown fields and fields given twice.
    pub fn set_all<I, K, V>(&mut self, values: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        for (name, value) in values {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(SetError::Repeated {
                    field: name.to_string(),
                });
            }
            self.set(name, value)?;
        }

        Ok(())
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    /// Mutable access to the underlying storage, bypassing schema checks.
    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn into_native(self) -> N {
        self.native
    }
}

fn check_storage<N: NativeStruct>(schema: &Schema, native: &N) -> Result<(), BindError> {
    if native.byte_len() < schema.size() {
        return Err(BindError::TooSmall {
            structure: schema.name().to_string(),
            expected: schema.size(),
            actual: native.byte_len(),
        });
    }

    let Some(storage) = native.declared() else {
        return Ok(());
    };
    let unmatched = schema.fields().iter().find(|field| {
        !storage
            .fields()
            .iter()
            .any(|s| s.offset() == field.offset() && s.kind() == field.kind())
    });

    match unmatched {
        Some(field) => Err(BindError::Mismatch {
            structure: schema.name().to_string(),
            storage: storage.name().to_string(),
            field: field.name().to_string(),
        }),
        None => Ok(()),
    }
}

impl<N: NativeStruct> fmt::Debug for StructProxy<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.schema.name());
        for field in self.schema.fields() {
            out.field(field.name(), &DisplayValue(self.load(field)));
        }
        out.finish()
    }
}

struct DisplayValue(Value);

impl fmt::Debug for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<N: NativeStruct, M: NativeStruct> PartialEq<StructProxy<'_, M>> for StructProxy<'_, N> {
    fn eq(&self, other: &StructProxy<'_, M>) -> bool {
        self.schema == other.schema && self.values() == other.values()
    }
}

/// Proxy over native storage `N` for the structure type `S`.
///
/// The schema comes from `S`, so every proxy of the same structure type
/// shares it. `N` defaults to `S` itself, the `#[repr(C)]` struct generated
/// by [crate::native_struct].
pub struct Proxy<S: Structure, N = S> {
    inner: StructProxy<'static, N>,
    _structure: PhantomData<fn() -> S>,
}

impl<S: Structure + NativeStruct + Default> Proxy<S> {
    /// A proxy over `S::default()`: declared field defaults, zero elsewhere.
    pub fn new() -> Self {
        Self::from_struct(S::default())
    }

    /// A default instance with the given initial field values applied on top.
    pub fn from_values<I, K, V>(values: I) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut proxy = Self::new();
        proxy.inner.set_all(values)?;
        Ok(proxy)
    }
}

impl<S: Structure + NativeStruct + Default> Default for Proxy<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Structure + NativeStruct> Proxy<S> {
    /// Wraps an existing instance of `S`.
    pub fn from_struct(native: S) -> Self {
        Proxy {
            inner: StructProxy {
                schema: S::schema(),
                native,
            },
            _structure: PhantomData,
        }
    }
}

impl<S: Structure> Proxy<S, RawStruct> {
    /// A proxy over zero-filled, schema-sized raw storage.
    pub fn zeroed() -> Self {
        Proxy {
            inner: StructProxy::zeroed(S::schema()),
            _structure: PhantomData,
        }
    }
}

impl<S: Structure, N: NativeStruct> Proxy<S, N> {
    /// Binds `S`'s schema to foreign storage. Fails as [StructProxy::bind] does.
    pub fn from_native(native: N) -> Result<Self, BindError> {
        Ok(Proxy {
            inner: StructProxy::bind(S::schema(), native)?,
            _structure: PhantomData,
        })
    }

    pub fn schema() -> &'static Schema {
        S::schema()
    }

    /// Size in bytes of the native structure.
    pub fn sizeof() -> usize {
        S::schema().size()
    }

    pub fn get(&self, name: &str) -> Result<Value, FieldAccessError> {
        self.inner.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SetError> {
        self.inner.set(name, value)
    }

    /// Reads a field through its typed handle.
    pub fn read<T: Primitive>(&self, field: FieldRef<S, T>) -> T {
        let spec = &S::schema().fields()[field.index];
        debug_assert_eq!(spec.kind(), T::KIND);
        T::from_bits(self.inner.load_bits(spec))
    }

    /// Writes a field through its typed handle. The type guarantees the value is in domain.
    pub fn write<T: Primitive>(&mut self, field: FieldRef<S, T>, value: T) {
        let schema = S::schema();
        let spec = &schema.fields()[field.index];
        debug_assert_eq!(spec.kind(), T::KIND);
        StructProxy::store(&mut self.inner.native, schema, spec, value.to_bits());
    }

    pub fn values(&self) -> Vec<Value> {
        self.inner.values()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.snapshot()
    }

    /// The string-keyed view of this proxy.
    pub fn as_dyn(&self) -> &StructProxy<'static, N> {
        &self.inner
    }

    pub fn as_dyn_mut(&mut self) -> &mut StructProxy<'static, N> {
        &mut self.inner
    }

    pub fn native(&self) -> &N {
        self.inner.native()
    }

    pub fn native_mut(&mut self) -> &mut N {
        self.inner.native_mut()
    }

    pub fn into_native(self) -> N {
        self.inner.into_native()
    }
}

impl<S: Structure, N: NativeStruct> fmt::Debug for Proxy<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<S: Structure, N: NativeStruct, M: NativeStruct> PartialEq<Proxy<S, M>> for Proxy<S, N> {
    fn eq(&self, other: &Proxy<S, M>) -> bool {
        self.inner == other.inner
    }
}

impl<S: Structure, N: NativeStruct + Clone> Clone for Proxy<S, N> {
    fn clone(&self) -> Self {
        Proxy {
            inner: StructProxy {
                schema: self.inner.schema,
                native: self.inner.native.clone(),
            },
            _structure: PhantomData,
        }
    }
}
