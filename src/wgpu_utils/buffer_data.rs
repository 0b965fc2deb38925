//! Byte views over CPU data headed for a [`Buffer`](crate::gfx::resources::Buffer).

use std::borrow::Cow;

/// Bytes for one upload, borrowed from the caller when possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferData<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> BufferData<'a> {
    /// View over a slice of `Pod` items, e.g. vertices or faces.
    pub fn make_data<T: bytemuck::Pod>(items: &'a [T]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytemuck::cast_slice(items)),
        }
    }

    /// View over a single `Pod` value, e.g. a material or light block.
    pub fn make_data_of<T: bytemuck::Pod>(value: &'a T) -> Self {
        Self {
            bytes: Cow::Borrowed(bytemuck::bytes_of(value)),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for BufferData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}
