//! Native storage a proxy can be bound to.
//!
//! The proxy never interprets native memory directly; it reads and writes
//! whole fields through [NativeStruct]. Storage is either a `#[repr(C)]`
//! struct generated by [crate::native_struct], an owned aligned block
//! ([RawStruct]) or a plain byte buffer.

use zerocopy::IntoBytes;

use crate::{
    bytes::{self, ByteOrder},
    registry::Primitive,
    schema::Schema,
};

/// Byte-addressed access to a native structure instance.
///
/// Implementations panic when asked for a range outside their storage, the
/// same way slice indexing does. Proxies only request ranges of declared
/// fields, after checking the storage is large enough.
pub trait NativeStruct {
    /// Size of the storage in bytes.
    fn byte_len(&self) -> usize;

    /// Copies `out.len()` bytes starting at `offset` into `out`.
    fn read_at(&self, offset: usize, out: &mut [u8]);

    /// Copies `bytes` into the storage starting at `offset`.
    fn write_at(&mut self, offset: usize, bytes: &[u8]);

    /// Schema of the storage when it is itself a declared structure.
    ///
    /// Binding checks every bound field against it, so a proxy never
    /// reinterprets one storage field as a different kind.
    fn declared(&self) -> Option<&'static Schema> {
        None
    }
}

impl NativeStruct for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        out.copy_from_slice(&self[offset..offset + out.len()]);
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl<const N: usize> NativeStruct for [u8; N] {
    fn byte_len(&self) -> usize {
        N
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        self.as_slice().read_at(offset, out)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self.as_mut_slice().write_at(offset, bytes)
    }
}

impl NativeStruct for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        self.as_slice().read_at(offset, out)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self.as_mut_slice().write_at(offset, bytes)
    }
}

impl<N: NativeStruct + ?Sized> NativeStruct for &mut N {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        (**self).read_at(offset, out)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        (**self).write_at(offset, bytes)
    }

    fn declared(&self) -> Option<&'static Schema> {
        (**self).declared()
    }
}

impl<N: NativeStruct + ?Sized> NativeStruct for Box<N> {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        (**self).read_at(offset, out)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        (**self).write_at(offset, bytes)
    }

    fn declared(&self) -> Option<&'static Schema> {
        (**self).declared()
    }
}

/// Owned, zero-initialised native storage aligned for any primitive kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStruct {
    words: Vec<u64>,
    len: usize,
}

impl RawStruct {
    pub fn zeroed(len: usize) -> Self {
        RawStruct {
            words: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Storage sized for `schema`.
    pub fn for_schema(schema: &Schema) -> Self {
        Self::zeroed(schema.size())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.words.as_bytes()[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.words.as_mut_bytes()[..self.len]
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.as_bytes_mut().as_mut_ptr()
    }
}

impl NativeStruct for RawStruct {
    fn byte_len(&self) -> usize {
        self.len
    }

    fn read_at(&self, offset: usize, out: &mut [u8]) {
        self.as_bytes().read_at(offset, out)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self.as_bytes_mut().write_at(offset, bytes)
    }
}

/// Stores `value` in native byte order at `offset` of a struct's byte image.
#[doc(hidden)]
pub fn put_field<T: Primitive>(image: &mut [u8], offset: usize, value: T) {
    let size = T::KIND.size();
    bytes::store(value.to_bits(), ByteOrder::Native, &mut image[offset..offset + size]);
}

/// Loads the value at `offset` of a struct's byte image.
///
/// `bool` fields read any non-zero byte as `true`.
#[doc(hidden)]
pub fn take_field<T: Primitive>(image: &[u8], offset: usize) -> T {
    let size = T::KIND.size();
    T::from_bits(bytes::load(&image[offset..offset + size], ByteOrder::Native))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_struct_zeroed() {
        let raw = RawStruct::zeroed(13);
        assert_eq!(raw.byte_len(), 13);
        assert_eq!(raw.as_bytes(), &[0u8; 13]);
        assert_eq!(raw.as_ptr() as usize % 8, 0);
    }

    #[test]
    fn test_raw_struct_read_write() {
        let mut raw = RawStruct::zeroed(8);
        raw.write_at(4, &[1, 2]);
        let mut out = [0u8; 2];
        raw.read_at(4, &mut out);
        assert_eq!(out, [1, 2]);
        assert_eq!(raw.as_bytes(), &[0, 0, 0, 0, 1, 2, 0, 0]);
    }

    #[test]
    fn test_byte_array() {
        let mut buf = [0u8; 4];
        buf.write_at(1, &[0xaa]);
        assert_eq!(buf, [0, 0xaa, 0, 0]);
        assert_eq!(NativeStruct::byte_len(&buf), 4);
    }

    #[test]
    fn test_image_fields() {
        let mut image = [0u8; 8];
        put_field(&mut image, 0, -2i16);
        put_field(&mut image, 2, true);
        put_field(&mut image, 4, 1.5f32);
        assert_eq!(&image[..2], &(-2i16).to_ne_bytes());
        assert_eq!(image[2], 1);
        assert_eq!(take_field::<i16>(&image, 0), -2);
        assert_eq!(take_field::<f32>(&image, 4), 1.5);

        image[2] = 7;
        assert!(take_field::<bool>(&image, 2));
    }

    #[test]
    fn test_buffers_are_not_declared() {
        assert!(RawStruct::zeroed(4).declared().is_none());
        assert!(vec![0u8; 4].declared().is_none());
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let raw = RawStruct::zeroed(2);
        let mut out = [0u8; 4];
        raw.read_at(0, &mut out);
    }
}
