//! small utilities used in tests

use std::collections::HashMap;

use typeface_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position under `tag`, so that it
    /// can be patched later with [`write_at`](Self::write_at).
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations.insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    /// Overwrite the scalar previously written with [`push_with_tag`](Self::push_with_tag).
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        let data = &mut self.data[offset..];
        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        data[..new_data.len()].copy_from_slice(new_data);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(value: BeBuffer) -> Self {
        value.data
    }
}

/// Build a [`BeBuffer`] from a comma separated list of scalars.
///
/// ```
/// # use typeface_test_data::be_buffer;
/// let buf = be_buffer! { 1_u16, -2_i16, 0x00010000_u32 };
/// assert_eq!(buf.as_slice(), &[0, 1, 0xff, 0xfe, 0, 1, 0, 0]);
/// ```
#[macro_export]
macro_rules! be_buffer {
    ($($item:expr),* $(,)?) => {{
        let buffer = $crate::bebuffer::BeBuffer::new();
        $(let buffer = buffer.push($item);)*
        buffer
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_write() {
        let mut buf = BeBuffer::new()
            .push(1u8)
            .push_with_tag(0u32, "offset")
            .push(2u8);
        buf.write_at("offset", 0xdeadbeef_u32);
        assert_eq!(buf.as_slice(), &[1, 0xde, 0xad, 0xbe, 0xef, 2]);
        assert_eq!(buf.offset_for("offset"), 1);
    }
}
