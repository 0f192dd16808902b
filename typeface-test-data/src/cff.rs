//! Encoders for the Compact Font Format.

use crate::BeBuffer;

/// Encode an INDEX containing the given objects.
pub fn index(items: &[&[u8]]) -> Vec<u8> {
    if items.is_empty() {
        return vec![0, 0];
    }
    let data_len: usize = items.iter().map(|item| item.len()).sum();
    let off_size: u8 = match data_len + 1 {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFFFFFF => 3,
        _ => 4,
    };
    let mut buf = BeBuffer::new().push(items.len() as u16).push(off_size);
    let mut offset = 1u32;
    let write_offset = |buf: BeBuffer, offset: u32| {
        let bytes = offset.to_be_bytes();
        buf.extend_bytes(&bytes[4 - off_size as usize..])
    };
    buf = write_offset(buf, offset);
    for item in items {
        offset += item.len() as u32;
        buf = write_offset(buf, offset);
    }
    for item in items {
        buf = buf.extend_bytes(item);
    }
    buf.into_vec()
}

/// Builds a DICT.
#[derive(Clone, Debug, Default)]
pub struct DictBuilder(Vec<u8>);

impl DictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an integer operand using the most compact encoding.
    pub fn int(mut self, value: i32) -> Self {
        encode_int(&mut self.0, value, true);
        self
    }

    /// Push an integer operand using the fixed size 5 byte encoding, which
    /// is handy for offsets that are patched after layout.
    pub fn long(mut self, value: i32) -> Self {
        self.0.push(29);
        self.0.extend(value.to_be_bytes());
        self
    }

    /// Push a real number operand, given as its decimal string form.
    ///
    /// Accepts digits, `.`, `-` and exponents written as `E` or `E-`.
    pub fn real(mut self, value: &str) -> Self {
        let mut nibbles = Vec::new();
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            let nibble = match c {
                '0'..='9' => c as u8 - b'0',
                '.' => 0xA,
                'E' | 'e' => {
                    if chars.peek() == Some(&'-') {
                        chars.next();
                        0xC
                    } else {
                        0xB
                    }
                }
                '-' => 0xE,
                _ => panic!("invalid character in real number"),
            };
            nibbles.push(nibble);
        }
        nibbles.push(0xF);
        if nibbles.len() % 2 == 1 {
            nibbles.push(0xF);
        }
        self.0.push(30);
        for pair in nibbles.chunks(2) {
            self.0.push((pair[0] << 4) | pair[1]);
        }
        self
    }

    pub fn op(mut self, op: u8) -> Self {
        self.0.push(op);
        self
    }

    /// A two byte operator, `12 op`.
    pub fn escape(mut self, op: u8) -> Self {
        self.0.extend([12, op]);
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Builds a Type2 charstring.
#[derive(Clone, Debug, Default)]
pub struct CharstringBuilder(Vec<u8>);

impl CharstringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num(mut self, value: i32) -> Self {
        encode_int(&mut self.0, value, false);
        self
    }

    pub fn nums(mut self, values: &[i32]) -> Self {
        for value in values {
            encode_int(&mut self.0, *value, false);
        }
        self
    }

    /// Push a 16.16 fixed point operand.
    pub fn fixed(mut self, value: f64) -> Self {
        self.0.push(255);
        self.0.extend(((value * 65536.0).round() as i32).to_be_bytes());
        self
    }

    pub fn op(mut self, op: u8) -> Self {
        self.0.push(op);
        self
    }

    pub fn escape(mut self, op: u8) -> Self {
        self.0.extend([12, op]);
        self
    }

    /// Raw bytes, such as a hint mask.
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

fn encode_int(buf: &mut Vec<u8>, value: i32, dict: bool) {
    match value {
        -107..=107 => buf.push((value + 139) as u8),
        108..=1131 => {
            let v = value - 108;
            buf.extend([(v / 256 + 247) as u8, (v % 256) as u8]);
        }
        -1131..=-108 => {
            let v = -value - 108;
            buf.extend([(v / 256 + 251) as u8, (v % 256) as u8]);
        }
        -32768..=32767 => {
            buf.push(28);
            buf.extend((value as i16).to_be_bytes());
        }
        _ if dict => {
            buf.push(29);
            buf.extend(value.to_be_bytes());
        }
        _ => panic!("charstring integers must fit in 16 bits"),
    }
}

/// Charstring operators.
pub mod op {
    pub const HSTEM: u8 = 1;
    pub const VSTEM: u8 = 3;
    pub const VMOVETO: u8 = 4;
    pub const RLINETO: u8 = 5;
    pub const HLINETO: u8 = 6;
    pub const VLINETO: u8 = 7;
    pub const RRCURVETO: u8 = 8;
    pub const CALLSUBR: u8 = 10;
    pub const RETURN: u8 = 11;
    pub const ENDCHAR: u8 = 14;
    pub const HSTEMHM: u8 = 18;
    pub const HINTMASK: u8 = 19;
    pub const CNTRMASK: u8 = 20;
    pub const RMOVETO: u8 = 21;
    pub const HMOVETO: u8 = 22;
    pub const VSTEMHM: u8 = 23;
    pub const RCURVELINE: u8 = 24;
    pub const RLINECURVE: u8 = 25;
    pub const VVCURVETO: u8 = 26;
    pub const HHCURVETO: u8 = 27;
    pub const CALLGSUBR: u8 = 29;
    pub const VHCURVETO: u8 = 30;
    pub const HVCURVETO: u8 = 31;

    // escaped
    pub const ADD: u8 = 10;
    pub const SUB: u8 = 11;
    pub const DIV: u8 = 12;
    pub const NEG: u8 = 14;
    pub const DUP: u8 = 27;
    pub const EXCH: u8 = 28;
    pub const INDEX: u8 = 29;
    pub const ROLL: u8 = 30;
    pub const HFLEX: u8 = 34;
    pub const FLEX: u8 = 35;
    pub const HFLEX1: u8 = 36;
    pub const FLEX1: u8 = 37;
}

/// DICT operators used by the builders.
pub mod dict_op {
    pub const VERSION: u8 = 0;
    pub const FULL_NAME: u8 = 2;
    pub const BLUE_VALUES: u8 = 6;
    pub const STD_HW: u8 = 10;
    pub const STD_VW: u8 = 11;
    pub const FONT_BBOX: u8 = 5;
    pub const CHARSET: u8 = 15;
    pub const CHAR_STRINGS: u8 = 17;
    pub const PRIVATE: u8 = 18;
    pub const SUBRS: u8 = 19;
    pub const DEFAULT_WIDTH_X: u8 = 20;
    pub const NOMINAL_WIDTH_X: u8 = 21;

    // escaped
    pub const CHARSTRING_TYPE: u8 = 6;
    pub const BLUE_SCALE: u8 = 9;
    pub const ROS: u8 = 30;
    pub const FD_ARRAY: u8 = 36;
    pub const FD_SELECT: u8 = 37;
}

/// A private DICT together with its local subroutines.
#[derive(Clone, Debug, Default)]
pub struct PrivateSpec {
    pub default_width_x: i32,
    pub nominal_width_x: i32,
    pub blue_values: Vec<i32>,
    pub subrs: Vec<Vec<u8>>,
}

impl PrivateSpec {
    /// The encoded DICT, with the Subrs offset pointing directly past the
    /// DICT itself.
    fn encode(&self) -> Vec<u8> {
        let mut dict = DictBuilder::new();
        if !self.blue_values.is_empty() {
            // stored as deltas
            let mut last = 0;
            for value in &self.blue_values {
                dict = dict.int(value - last);
                last = *value;
            }
            dict = dict.op(dict_op::BLUE_VALUES);
        }
        dict = dict
            .int(self.default_width_x)
            .op(dict_op::DEFAULT_WIDTH_X)
            .int(self.nominal_width_x)
            .op(dict_op::NOMINAL_WIDTH_X)
            .int(40)
            .op(dict_op::STD_HW)
            .int(80)
            .op(dict_op::STD_VW);
        if self.subrs.is_empty() {
            return dict.build();
        }
        // Subrs offset is relative to the start of the DICT; the long form
        // keeps the DICT length independent of the value.
        let len_without_subrs = dict.clone().long(0).op(dict_op::SUBRS).build().len();
        dict.long(len_without_subrs as i32)
            .op(dict_op::SUBRS)
            .build()
    }

    /// The private DICT followed by its subroutine INDEX.
    fn encode_with_subrs(&self) -> (Vec<u8>, usize) {
        let mut data = self.encode();
        let dict_len = data.len();
        if !self.subrs.is_empty() {
            let subrs: Vec<&[u8]> = self.subrs.iter().map(Vec::as_slice).collect();
            data.extend(index(&subrs));
        }
        (data, dict_len)
    }
}

/// Describes a CFF table to build.
#[derive(Clone, Debug, Default)]
pub struct CffSpec {
    pub name: String,
    pub strings: Vec<String>,
    pub global_subrs: Vec<Vec<u8>>,
    pub charstrings: Vec<Vec<u8>>,
    pub private: PrivateSpec,
    /// If non-empty, builds a CID-keyed font with one font DICT per entry.
    pub font_dicts: Vec<PrivateSpec>,
    /// Format 3 FDSelect ranges as `(first_glyph, fd)`.
    pub fd_ranges: Vec<(u16, u8)>,
    /// Overrides the CharstringType entry in the top DICT.
    pub charstring_type: Option<i32>,
}

impl CffSpec {
    pub fn build(&self) -> Vec<u8> {
        // the top DICT only uses long offsets so its size is stable
        let top_dict_len = self.top_dict(&Layout::default()).len();
        let header = [1u8, 0, 4, 4];
        let name_index = index(&[self.name.as_bytes()]);
        let top_dict_index_len = index(&[vec![0u8; top_dict_len].as_slice()]).len();
        let strings: Vec<&[u8]> = self.strings.iter().map(|s| s.as_bytes()).collect();
        let string_index = index(&strings);
        let gsubrs: Vec<&[u8]> = self.global_subrs.iter().map(Vec::as_slice).collect();
        let gsubr_index = index(&gsubrs);
        let charstrings: Vec<&[u8]> = self.charstrings.iter().map(Vec::as_slice).collect();
        let charstrings_index = index(&charstrings);

        let mut layout = Layout::default();
        let mut offset = header.len()
            + name_index.len()
            + top_dict_index_len
            + string_index.len()
            + gsubr_index.len();
        layout.charstrings = offset;
        offset += charstrings_index.len();

        let mut tail = Vec::new();
        if self.font_dicts.is_empty() {
            let (private, dict_len) = self.private.encode_with_subrs();
            layout.private = (dict_len, offset);
            tail.extend(private);
        } else {
            // private dicts first, then the FDArray and FDSelect
            let mut privates = Vec::new();
            for fd in &self.font_dicts {
                let (private, dict_len) = fd.encode_with_subrs();
                privates.push((dict_len, offset + tail.len()));
                tail.extend(private);
            }
            let font_dicts: Vec<Vec<u8>> = privates
                .iter()
                .map(|(len, off)| {
                    DictBuilder::new()
                        .long(*len as i32)
                        .long(*off as i32)
                        .op(dict_op::PRIVATE)
                        .build()
                })
                .collect();
            let font_dict_refs: Vec<&[u8]> = font_dicts.iter().map(Vec::as_slice).collect();
            layout.fd_array = offset + tail.len();
            tail.extend(index(&font_dict_refs));
            layout.fd_select = offset + tail.len();
            let mut fd_select = BeBuffer::new()
                .push(3u8)
                .push(self.fd_ranges.len() as u16);
            for (first, fd) in &self.fd_ranges {
                fd_select = fd_select.push(*first).push(*fd);
            }
            fd_select = fd_select.push(self.charstrings.len() as u16);
            tail.extend(fd_select.into_vec());
        }

        let top_dict = self.top_dict(&layout);
        assert_eq!(top_dict.len(), top_dict_len);
        let mut result = header.to_vec();
        result.extend(name_index);
        result.extend(index(&[top_dict.as_slice()]));
        result.extend(string_index);
        result.extend(gsubr_index);
        result.extend(charstrings_index);
        result.extend(tail);
        result
    }

    fn top_dict(&self, layout: &Layout) -> Vec<u8> {
        let mut dict = DictBuilder::new();
        if !self.font_dicts.is_empty() {
            // Adobe-Identity-0, using the first two custom strings
            dict = dict.long(391).long(392).long(0).escape(dict_op::ROS);
        }
        if !self.strings.is_empty() {
            dict = dict.long(391).op(dict_op::VERSION);
        }
        dict = dict
            .long(-10)
            .long(-200)
            .long(1100)
            .long(900)
            .op(dict_op::FONT_BBOX);
        if let Some(charstring_type) = self.charstring_type {
            dict = dict.long(charstring_type).escape(dict_op::CHARSTRING_TYPE);
        }
        dict = dict
            .long(layout.charstrings as i32)
            .op(dict_op::CHAR_STRINGS);
        if self.font_dicts.is_empty() {
            dict = dict
                .long(layout.private.0 as i32)
                .long(layout.private.1 as i32)
                .op(dict_op::PRIVATE);
        } else {
            dict = dict
                .long(layout.fd_array as i32)
                .escape(dict_op::FD_ARRAY)
                .long(layout.fd_select as i32)
                .escape(dict_op::FD_SELECT);
        }
        dict.build()
    }
}

#[derive(Default)]
struct Layout {
    charstrings: usize,
    private: (usize, usize),
    fd_array: usize,
    fd_select: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_offsets() {
        let data = index(&[b"ab".as_slice(), b"".as_slice(), b"cde".as_slice()]);
        assert_eq!(data, [0, 3, 1, 1, 3, 3, 6, b'a', b'b', b'c', b'd', b'e']);
        assert_eq!(index(&[]), [0, 0]);
    }

    #[test]
    fn int_encodings() {
        let dict = DictBuilder::new()
            .int(0)
            .int(1000)
            .int(-1000)
            .int(10000)
            .int(100000)
            .build();
        assert_eq!(
            dict,
            [139, 250, 124, 254, 124, 28, 0x27, 0x10, 29, 0x00, 0x01, 0x86, 0xa0]
        );
    }

    #[test]
    fn real_encoding() {
        let dict = DictBuilder::new().real("-2.25").real("0.14E-3").build();
        assert_eq!(dict, [30, 0xe2, 0xa2, 0x5f, 30, 0x0a, 0x14, 0xc3, 0xff]);
    }
}
