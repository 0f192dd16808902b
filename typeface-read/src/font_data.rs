//! raw font bytes

use std::ops::{Bound, Range, RangeBounds};

use types::{F2Dot14, FWord, Fixed, Scalar, Uint24};

use crate::read::{FontReadWithArgs, ReadError};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for reading sequential values out of [`FontData`].
///
/// Every read advances the cursor by the number of bytes consumed. A read
/// that would move past the end of the data fails with
/// [`ReadError::OutOfBounds`] and leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Returns the data for `offset..offset + len`, checking for overflow.
    pub fn slice_len(&self, offset: usize, len: usize) -> Option<FontData<'a>> {
        let end = offset.checked_add(len)?;
        self.slice(offset..end)
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn read_with_args<T>(&self, range: Range<usize>, args: &T::Args) -> Result<T, ReadError>
    where
        T: FontReadWithArgs<'a>,
    {
        self.slice(range)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| T::read_with_args(data, args))
    }

    /// Returns the bytes in `range`.
    pub fn read_bytes(&self, range: Range<usize>) -> Result<&'a [u8], ReadError> {
        self.bytes.get(range).ok_or(ReadError::OutOfBounds)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Returns a cursor positioned at `pos`.
    pub fn cursor_at(&self, pos: usize) -> Result<Cursor<'a>, ReadError> {
        if pos > self.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Cursor { pos, data: *self })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: Scalar>(&mut self) -> Result<(), ReadError> {
        self.advance_by(T::RAW_BYTE_LEN)
    }

    pub fn advance_by(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        let new_pos = self
            .pos
            .checked_add(n_bytes)
            .filter(|pos| *pos <= self.data.len())
            .ok_or(ReadError::OutOfBounds)?;
        self.pos = new_pos;
        Ok(())
    }

    /// Read a big-endian scalar.
    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let value = self.data.read_at(self.pos)?;
        self.pos += T::RAW_BYTE_LEN;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read()
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.read()
    }

    pub fn read_u24(&mut self) -> Result<u32, ReadError> {
        self.read::<Uint24>().map(Uint24::to_u32)
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read()
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        self.read()
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.read()
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.read()
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        self.read()
    }

    /// Read a 16.16 fixed point value.
    pub fn read_fixed(&mut self) -> Result<Fixed, ReadError> {
        self.read()
    }

    /// Read a 2.14 fixed point value.
    pub fn read_f2dot14(&mut self) -> Result<F2Dot14, ReadError> {
        self.read()
    }

    pub fn read_fword(&mut self) -> Result<FWord, ReadError> {
        self.read()
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.data.read_bytes(self.pos..end)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Read `len` bytes as an ASCII string.
    ///
    /// Bytes outside of the ASCII range are replaced with `?`.
    pub fn read_char_array(&mut self, len: usize) -> Result<String, ReadError> {
        let bytes = self.read_bytes(len)?;
        Ok(bytes
            .iter()
            .map(|b| if b.is_ascii() { *b as char } else { '?' })
            .collect())
    }

    /// Read an unsigned offset stored in `size` bytes.
    pub fn read_offset(&mut self, size: u8) -> Result<u32, ReadError> {
        match size {
            1 => self.read::<u8>().map(u32::from),
            2 => self.read::<u16>().map(u32::from),
            3 => self.read_u24(),
            4 => self.read::<u32>(),
            _ => Err(ReadError::InvalidFormat(size as i64)),
        }
    }

    /// Read a `255UInt16` variable length value.
    ///
    /// See <https://www.w3.org/TR/WOFF2/#255UInt16>
    pub fn read_255_u16(&mut self) -> Result<u16, ReadError> {
        const ONE_MORE_BYTE_CODE_1: u8 = 255;
        const ONE_MORE_BYTE_CODE_2: u8 = 254;
        const WORD_CODE: u8 = 253;
        const LOWEST_U_CODE: u16 = 253;
        let code = self.read::<u8>()?;
        Ok(match code {
            WORD_CODE => self.read::<u16>()?,
            ONE_MORE_BYTE_CODE_2 => self.read::<u8>()? as u16 + LOWEST_U_CODE * 2,
            ONE_MORE_BYTE_CODE_1 => self.read::<u8>()? as u16 + LOWEST_U_CODE,
            _ => code as u16,
        })
    }

    /// Read a `UIntBase128` variable length value.
    ///
    /// See <https://www.w3.org/TR/WOFF2/#DataTypes>
    pub fn read_uint_base128(&mut self) -> Result<u32, ReadError> {
        let start = self.pos;
        let result = self.read_uint_base128_impl();
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_uint_base128_impl(&mut self) -> Result<u32, ReadError> {
        let mut accum = 0u32;
        for i in 0..5 {
            let byte = self.read::<u8>()?;
            if i == 0 && byte == 0x80 {
                return Err(ReadError::InvalidVarInt("UIntBase128 has leading zeros"));
            }
            if accum & 0xFE00_0000 != 0 {
                return Err(ReadError::InvalidVarInt("UIntBase128 overflows 32 bits"));
            }
            accum = (accum << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(accum);
            }
        }
        Err(ReadError::InvalidVarInt("UIntBase128 longer than 5 bytes"))
    }

    /// return the current position, or an error if we are out of bounds
    pub fn position(&self) -> Result<usize, ReadError> {
        if self.pos <= self.data.len() {
            Ok(self.pos)
        } else {
            Err(ReadError::OutOfBounds)
        }
    }

    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The unread portion of the data.
    pub fn remaining(&self) -> FontData<'a> {
        self.data.split_off(self.pos).unwrap_or_default()
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}
