//! Parsing for PostScript INDEX objects.
//!
//! See "5 INDEX Data" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use super::Error;
use crate::{FontData, ReadError};

/// An array of variable sized objects.
///
/// An empty INDEX consists of only a two byte count of zero.
#[derive(Copy, Clone, Default, Debug)]
pub struct Index<'a> {
    count: u16,
    off_size: u8,
    offsets: &'a [u8],
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// Creates a new index from the given data.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        Self::read(FontData::new(data))
    }

    /// Reads an index from the start of the given data.
    ///
    /// Trailing bytes after the final object are ignored; use
    /// [`size_in_bytes`](Self::size_in_bytes) to find the end.
    pub fn read(data: FontData<'a>) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let count = cursor.read::<u16>()?;
        if count == 0 {
            return Ok(Self::default());
        }
        let off_size = cursor.read::<u8>()?;
        if !(1..=4).contains(&off_size) {
            return Err(Error::InvalidIndexOffsetSize(off_size));
        }
        let offsets_len = (count as usize + 1) * off_size as usize;
        let offsets = cursor.read_bytes(offsets_len)?;
        let data_len = read_offset(count as usize, count as usize, off_size, offsets)?;
        let data = cursor.read_bytes(data_len)?;
        Ok(Self {
            count,
            off_size,
            offsets,
            data,
        })
    }

    /// Returns the number of objects in the index.
    pub fn count(&self) -> u32 {
        self.count as u32
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The size in bytes of each element of the offset array.
    pub fn off_size(&self) -> u8 {
        self.off_size
    }

    /// Computes a bias that is added to a subroutine operator in a
    /// charstring.
    ///
    /// See "4.7 Subroutine Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=29>
    pub fn subr_bias(&self) -> i32 {
        calc_bias(self.count())
    }

    /// Returns the total size in bytes of the index table.
    pub fn size_in_bytes(&self) -> Result<usize, ReadError> {
        // 2 byte count + 1 byte off_size
        const HEADER_SIZE: usize = 3;
        // An empty CFF index contains only a 2 byte count field
        const EMPTY_SIZE: usize = 2;
        let count = self.count as usize;
        Ok(match count {
            0 => EMPTY_SIZE,
            _ => {
                HEADER_SIZE
                    + self.offsets.len()
                    + self.get_offset(count).map_err(|_| ReadError::OutOfBounds)?
            }
        })
    }

    /// Returns the offset of the object at the given index.
    pub fn get_offset(&self, index: usize) -> Result<usize, Error> {
        read_offset(index, self.count as usize, self.off_size, self.offsets)
    }

    /// Returns the data for the object at the given index.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = self.get_offset(index)?;
        let end = self.get_offset(index + 1)?;
        self.data
            .get(start..end)
            .ok_or(ReadError::OutOfBounds.into())
    }

    /// Returns an iterator over the objects in the index.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8], Error>> + '_ {
        (0..self.count as usize).map(|ix| self.get(ix))
    }
}

/// Computes the bias for subroutine numbers in an INDEX with `count`
/// entries.
pub fn calc_bias(count: u32) -> i32 {
    if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}

/// Reads an offset which is encoded as a variable sized integer.
fn read_offset(
    index: usize,
    count: usize,
    offset_size: u8,
    offset_data: &[u8],
) -> Result<usize, Error> {
    // There are count + 1 entries in the offset array.
    //
    // "Offsets in the offset array are relative to the byte that precedes
    // the object data. Therefore the first element of the offset array is
    // always 1."
    if index > count {
        Err(ReadError::OutOfBounds)?;
    }
    let data_offset = index * offset_size as usize;
    let mut cursor = FontData::new(offset_data).cursor_at(data_offset)?;
    let offset = match offset_size {
        1..=4 => cursor.read_offset(offset_size)? as usize,
        _ => return Err(Error::InvalidIndexOffsetSize(offset_size)),
    };
    // As above, subtract one to get the actual offset.
    offset.checked_sub(1).ok_or(Error::ZeroOffsetInIndex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeface_test_data::bebuffer::BeBuffer;
    use typeface_test_data::cff;
    use types::Uint24;

    #[test]
    fn index_offsize1_count4() {
        test_index(1, 4);
    }

    #[test]
    fn index_offsize2_count64() {
        test_index(2, 64);
    }

    #[test]
    fn index_offsize3_count128() {
        test_index(3, 128);
    }

    #[test]
    fn index_offsize4_count256() {
        test_index(4, 256);
    }

    fn test_index(off_size: u8, count: usize) {
        let buf = make_index(off_size, count);
        let index = Index::new(&buf).unwrap();
        assert_eq!(index.off_size(), off_size);
        assert_eq!(index.count(), count as u32);
        assert_eq!(index.size_in_bytes().unwrap(), buf.len());
        for i in 0..count {
            let object = index.get(i).unwrap();
            let expected_len = (i + 1) * 10;
            let expected_bytes = vec![i as u8; expected_len];
            assert_eq!(object, expected_bytes);
        }
        assert!(index.get(count).is_err());
    }

    fn make_index(off_size: u8, count: usize) -> BeBuffer {
        // We'll add `count` objects to the INDEX, each containing
        // `(i + 1) * 10` bytes of the value `i`.
        let mut buf = BeBuffer::new().push(count as u16).push(off_size);
        // Offsets start at 1.
        let mut offset = 1usize;
        for i in 0..count + 1 {
            buf = match off_size {
                1 => buf.push(offset as u8),
                2 => buf.push(offset as u16),
                3 => buf.push(Uint24::checked_new(offset as u32).unwrap()),
                4 => buf.push(offset as u32),
                _ => panic!("off_size should be 1-4"),
            };
            offset += (i + 1) * 10;
        }
        for i in 0..count {
            buf = buf.extend(std::iter::repeat(i as u8).take((i + 1) * 10));
        }
        buf
    }

    #[test]
    fn empty_index() {
        let index = Index::new(&[0, 0, 0xFF]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.count(), 0);
        assert_eq!(index.size_in_bytes().unwrap(), 2);
        assert!(index.get(0).is_err());
    }

    #[test]
    fn builder_index() {
        let data = cff::index(&[b"ab".as_slice(), b"".as_slice(), b"cde".as_slice()]);
        let index = Index::new(&data).unwrap();
        let items = index.iter().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(items, [b"ab".as_slice(), b"", b"cde"]);
    }

    #[test]
    fn invalid_offset_size() {
        let data = [0, 1, 5, 0, 0, 0, 0, 1, 0, 0, 0, 0, 2, 0];
        assert!(matches!(
            Index::new(&data),
            Err(Error::InvalidIndexOffsetSize(5))
        ));
    }

    #[test]
    fn zero_offset() {
        // one object; the final offset is 0
        let data = [0, 1, 1, 1, 0];
        assert!(matches!(Index::new(&data), Err(Error::ZeroOffsetInIndex)));
    }

    #[test]
    fn truncated_data() {
        let data = [0, 1, 1, 1, 5, b'a'];
        assert!(matches!(
            Index::new(&data),
            Err(Error::Read(ReadError::OutOfBounds))
        ));
    }

    #[test]
    fn subr_bias_boundaries() {
        assert_eq!(calc_bias(0), 107);
        assert_eq!(calc_bias(1239), 107);
        assert_eq!(calc_bias(1240), 1131);
        assert_eq!(calc_bias(33899), 1131);
        assert_eq!(calc_bias(33900), 32768);
        assert_eq!(calc_bias(65535), 32768);
    }
}
