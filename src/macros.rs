//! The static declaration surface.

/// Declares a `#[repr(C)]` native structure together with its schema.
///
/// For every field the macro generates a typed [FieldRef](crate::proxy::FieldRef)
/// handle as an associated constant with the field's name, so
/// `Proxy::read(Name::field)` is checked by the compiler. Field types must
/// implement [Primitive](crate::registry::Primitive); any other type fails
/// to compile. The computed layout is asserted at compile time to equal the
/// compiler's own layout of the generated struct.
///
/// A field may carry a default (`= expr`), which `Default` and
/// [Proxy::new](crate::proxy::Proxy::new) apply; other fields start at zero.
///
/// ```
/// use nativestruct::{Proxy, native_struct};
///
/// native_struct! {
///     pub struct Header {
///         pub magic: u32 = 0xcafe,
///         pub version: u8,
///     }
/// }
///
/// let mut header = Proxy::<Header>::new();
/// assert_eq!(header.read(Header::magic), 0xcafe);
/// header.write(Header::version, 2);
/// assert_eq!(header.read(Header::version), 2);
/// assert!(header.get("missing").is_err());
/// ```
#[macro_export]
macro_rules! native_struct {
    (@default) => {
        ::core::default::Default::default()
    };
    (@default $value:expr) => {
        $value
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                $name {
                    $($field: $crate::native_struct!(@default $($default)?),)*
                }
            }
        }

        #[allow(non_upper_case_globals)]
        impl $name {
            #[doc(hidden)]
            pub const __FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

            #[doc(hidden)]
            pub const __FIELD_KINDS: &'static [$crate::registry::PrimitiveKind] =
                &[$(<$ty as $crate::registry::Primitive>::KIND),*];

            #[doc(hidden)]
            #[allow(unused_mut)]
            pub fn __image(&self) -> [u8; ::core::mem::size_of::<$name>()] {
                let mut image = [0u8; ::core::mem::size_of::<$name>()];
                $(
                    $crate::native::put_field(
                        &mut image,
                        ::core::mem::offset_of!($name, $field),
                        self.$field,
                    );
                )*
                image
            }

            $(
                $field_vis const $field: $crate::proxy::FieldRef<$name, $ty> =
                    $crate::proxy::FieldRef::new(
                        $crate::layout::position(Self::__FIELD_NAMES, stringify!($field)),
                        stringify!($field),
                    );
            )*
        }

        const _: () = {
            assert!(
                $crate::layout::struct_size($name::__FIELD_KINDS)
                    == ::core::mem::size_of::<$name>(),
                "computed size differs from the repr(C) size"
            );
            assert!(
                $crate::layout::struct_align($name::__FIELD_KINDS)
                    == ::core::mem::align_of::<$name>(),
                "computed alignment differs from the repr(C) alignment"
            );
            $(
                assert!(
                    $crate::layout::field_offset(
                        $name::__FIELD_KINDS,
                        $crate::layout::position($name::__FIELD_NAMES, stringify!($field)),
                    ) == ::core::mem::offset_of!($name, $field),
                    "computed field offset differs from the repr(C) offset"
                );
            )*
        };

        impl $crate::proxy::Structure for $name {
            fn schema() -> &'static $crate::schema::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::schema::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::schema::Schema::declare(
                        stringify!($name),
                        Self::__FIELD_NAMES,
                        Self::__FIELD_KINDS,
                    )
                })
            }
        }

        impl $crate::native::NativeStruct for $name {
            fn byte_len(&self) -> usize {
                ::core::mem::size_of::<Self>()
            }

            fn read_at(&self, offset: usize, out: &mut [u8]) {
                let image = self.__image();
                out.copy_from_slice(&image[offset..offset + out.len()]);
            }

            fn write_at(&mut self, offset: usize, bytes: &[u8]) {
                let mut image = self.__image();
                image[offset..offset + bytes.len()].copy_from_slice(bytes);
                $(
                    self.$field = $crate::native::take_field(
                        &image,
                        ::core::mem::offset_of!($name, $field),
                    );
                )*
            }

            fn declared(&self) -> ::core::option::Option<&'static $crate::schema::Schema> {
                ::core::option::Option::Some(<Self as $crate::proxy::Structure>::schema())
            }
        }
    };
}
