//! Parsing for PostScript DICTs.

use std::ops::Range;

use super::{Error, Number, Stack, StringId};
use crate::{types::Fixed, Cursor, FontData, ReadError};

/// PostScript DICT operator.
///
/// See "Table 9 Top DICT Operator Entries" and "Table 23 Private DICT
/// Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Version,
    Notice,
    FullName,
    FamilyName,
    Weight,
    FontBbox,
    CharstringsOffset,
    PrivateDictRange,
    Copyright,
    IsFixedPitch,
    ItalicAngle,
    UnderlinePosition,
    UnderlineThickness,
    PaintType,
    CharstringType,
    FontMatrix,
    StrokeWidth,
    FdArrayOffset,
    FdSelectOffset,
    BlueValues,
    OtherBlues,
    FamilyBlues,
    FamilyOtherBlues,
    SubrsOffset,
    BlueScale,
    BlueShift,
    BlueFuzz,
    LanguageGroup,
    ExpansionFactor,
    Encoding,
    Charset,
    UniqueId,
    Xuid,
    SyntheticBase,
    PostScript,
    BaseFontName,
    BaseFontBlend,
    Ros,
    CidFontVersion,
    CidFontRevision,
    CidFontType,
    CidCount,
    UidBase,
    FontName,
    StdHw,
    StdVw,
    DefaultWidthX,
    NominalWidthX,
    StemSnapH,
    StemSnapV,
    ForceBold,
    InitialRandomSeed,
}

impl Operator {
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            // Top DICT operators
            0 => Version,
            1 => Notice,
            2 => FullName,
            3 => FamilyName,
            4 => Weight,
            5 => FontBbox,
            13 => UniqueId,
            14 => Xuid,
            15 => Charset,
            16 => Encoding,
            17 => CharstringsOffset,
            18 => PrivateDictRange,
            // Private DICT operators
            6 => BlueValues,
            7 => OtherBlues,
            8 => FamilyBlues,
            9 => FamilyOtherBlues,
            10 => StdHw,
            11 => StdVw,
            19 => SubrsOffset,
            20 => DefaultWidthX,
            21 => NominalWidthX,
            _ => return None,
        })
    }

    fn from_extended_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            // Top DICT operators
            0 => Copyright,
            1 => IsFixedPitch,
            2 => ItalicAngle,
            3 => UnderlinePosition,
            4 => UnderlineThickness,
            5 => PaintType,
            6 => CharstringType,
            7 => FontMatrix,
            8 => StrokeWidth,
            20 => SyntheticBase,
            21 => PostScript,
            22 => BaseFontName,
            23 => BaseFontBlend,
            30 => Ros,
            31 => CidFontVersion,
            32 => CidFontRevision,
            33 => CidFontType,
            34 => CidCount,
            35 => UidBase,
            36 => FdArrayOffset,
            37 => FdSelectOffset,
            38 => FontName,
            // Private DICT operators
            9 => BlueScale,
            10 => BlueShift,
            11 => BlueFuzz,
            12 => StemSnapH,
            13 => StemSnapV,
            14 => ForceBold,
            17 => LanguageGroup,
            18 => ExpansionFactor,
            19 => InitialRandomSeed,
            _ => return None,
        })
    }
}

/// Either a PostScript DICT operator or a (numeric) operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
    /// An operator parsed from a DICT.
    Operator(Operator),
    /// A number parsed from a DICT.
    Operand(Number),
}

impl From<Operator> for Token {
    fn from(value: Operator) -> Self {
        Self::Operator(value)
    }
}

impl<T> From<T> for Token
where
    T: Into<Number>,
{
    fn from(value: T) -> Self {
        Self::Operand(value.into())
    }
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// raw operands and operators.
///
/// This does not perform any additional processing such as type conversion
/// or delta decoding.
pub fn tokens(dict_data: &[u8]) -> impl Iterator<Item = Result<Token, Error>> + '_ + Clone {
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || {
        if cursor.remaining_bytes() == 0 {
            None
        } else {
            Some(parse_token(&mut cursor))
        }
    })
}

fn parse_token(cursor: &mut Cursor) -> Result<Token, Error> {
    // Escape opcode for accessing extensions.
    const ESCAPE: u8 = 12;
    let b0 = cursor.read::<u8>()?;
    Ok(if b0 == ESCAPE {
        let b1 = cursor.read::<u8>()?;
        Token::Operator(Operator::from_extended_opcode(b1).ok_or(Error::InvalidDictOperator(b1))?)
    } else {
        // See "Table 3 Operand Encoding" in the CFF specification
        match b0 {
            28 | 29 | 32..=254 => Token::Operand(parse_int(cursor, b0)?.into()),
            30 => Token::Operand(parse_real(cursor)?.into()),
            _ => Token::Operator(Operator::from_opcode(b0).ok_or(Error::InvalidDictOperator(b0))?),
        }
    })
}

/// PostScript DICT Operator with its associated operands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Entry {
    Version(StringId),
    Notice(StringId),
    FullName(StringId),
    FamilyName(StringId),
    Weight(StringId),
    FontBbox([Fixed; 4]),
    CharstringsOffset(usize),
    PrivateDictRange(Range<usize>),
    Copyright(StringId),
    IsFixedPitch(bool),
    ItalicAngle(Fixed),
    UnderlinePosition(Fixed),
    UnderlineThickness(Fixed),
    PaintType(i32),
    CharstringType(i32),
    FontMatrix([Fixed; 6]),
    StrokeWidth(Fixed),
    FdArrayOffset(usize),
    FdSelectOffset(usize),
    BlueValues(Blues),
    OtherBlues(Blues),
    FamilyBlues(Blues),
    FamilyOtherBlues(Blues),
    SubrsOffset(usize),
    BlueScale(Fixed),
    BlueShift(Fixed),
    BlueFuzz(Fixed),
    LanguageGroup(i32),
    ExpansionFactor(Fixed),
    Encoding(usize),
    Charset(usize),
    UniqueId(i32),
    Xuid,
    SyntheticBase(i32),
    PostScript(StringId),
    BaseFontName(StringId),
    BaseFontBlend,
    Ros {
        registry: StringId,
        ordering: StringId,
        supplement: Fixed,
    },
    CidFontVersion(Fixed),
    CidFontRevision(Fixed),
    CidFontType(i32),
    CidCount(u32),
    UidBase(i32),
    FontName(StringId),
    StdHw(Fixed),
    StdVw(Fixed),
    DefaultWidthX(Fixed),
    NominalWidthX(Fixed),
    StemSnapH(StemSnaps),
    StemSnapV(StemSnaps),
    ForceBold(bool),
    InitialRandomSeed(i32),
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// each operator with its associated operands.
///
/// This performs appropriate type conversions and decodes deltas. Operands
/// left over at the end of the data produce a final
/// [`Error::DictOperandResidue`].
pub fn entries(dict_data: &[u8]) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
    let mut stack = Stack::new();
    let mut cursor = FontData::new(dict_data).cursor();
    let mut done = false;
    std::iter::from_fn(move || loop {
        if done {
            return None;
        }
        if cursor.remaining_bytes() == 0 {
            done = true;
            return (!stack.is_empty()).then_some(Err(Error::DictOperandResidue));
        }
        let token = match parse_token(&mut cursor) {
            Ok(token) => token,
            Err(e) => {
                done = true;
                return Some(Err(e));
            }
        };
        match token {
            Token::Operand(number) => match stack.push(number) {
                Ok(_) => continue,
                Err(e) => {
                    done = true;
                    return Some(Err(e));
                }
            },
            Token::Operator(op) => {
                let entry = parse_entry(op, &mut stack);
                stack.clear();
                return Some(entry);
            }
        }
    })
}

fn parse_entry(op: Operator, stack: &mut Stack) -> Result<Entry, Error> {
    use Operator::*;
    Ok(match op {
        Version => Entry::Version(stack.pop_i32()?.into()),
        Notice => Entry::Notice(stack.pop_i32()?.into()),
        FullName => Entry::FullName(stack.pop_i32()?.into()),
        FamilyName => Entry::FamilyName(stack.pop_i32()?.into()),
        Weight => Entry::Weight(stack.pop_i32()?.into()),
        FontBbox => Entry::FontBbox(stack.fixed_array::<4>(0)?),
        CharstringsOffset => Entry::CharstringsOffset(pop_offset(stack)?),
        PrivateDictRange => {
            let len = offset(stack.get_i32(0)?)?;
            let start = offset(stack.get_i32(1)?)?;
            let end = start.checked_add(len).ok_or(ReadError::OutOfBounds)?;
            Entry::PrivateDictRange(start..end)
        }
        Copyright => Entry::Copyright(stack.pop_i32()?.into()),
        IsFixedPitch => Entry::IsFixedPitch(stack.pop_i32()? != 0),
        ItalicAngle => Entry::ItalicAngle(stack.pop_fixed()?),
        UnderlinePosition => Entry::UnderlinePosition(stack.pop_fixed()?),
        UnderlineThickness => Entry::UnderlineThickness(stack.pop_fixed()?),
        PaintType => Entry::PaintType(stack.pop_i32()?),
        CharstringType => Entry::CharstringType(stack.pop_i32()?),
        FontMatrix => Entry::FontMatrix(stack.fixed_array::<6>(0)?),
        StrokeWidth => Entry::StrokeWidth(stack.pop_fixed()?),
        FdArrayOffset => Entry::FdArrayOffset(pop_offset(stack)?),
        FdSelectOffset => Entry::FdSelectOffset(pop_offset(stack)?),
        BlueValues => {
            stack.accumulate_deltas();
            Entry::BlueValues(Blues::new(stack.fixed_values()))
        }
        OtherBlues => {
            stack.accumulate_deltas();
            Entry::OtherBlues(Blues::new(stack.fixed_values()))
        }
        FamilyBlues => {
            stack.accumulate_deltas();
            Entry::FamilyBlues(Blues::new(stack.fixed_values()))
        }
        FamilyOtherBlues => {
            stack.accumulate_deltas();
            Entry::FamilyOtherBlues(Blues::new(stack.fixed_values()))
        }
        SubrsOffset => Entry::SubrsOffset(pop_offset(stack)?),
        BlueScale => Entry::BlueScale(stack.pop_fixed()?),
        BlueShift => Entry::BlueShift(stack.pop_fixed()?),
        BlueFuzz => Entry::BlueFuzz(stack.pop_fixed()?),
        LanguageGroup => Entry::LanguageGroup(stack.pop_i32()?),
        ExpansionFactor => Entry::ExpansionFactor(stack.pop_fixed()?),
        Encoding => Entry::Encoding(pop_offset(stack)?),
        Charset => Entry::Charset(pop_offset(stack)?),
        UniqueId => Entry::UniqueId(stack.pop_i32()?),
        Xuid => Entry::Xuid,
        SyntheticBase => Entry::SyntheticBase(stack.pop_i32()?),
        PostScript => Entry::PostScript(stack.pop_i32()?.into()),
        BaseFontName => Entry::BaseFontName(stack.pop_i32()?.into()),
        BaseFontBlend => Entry::BaseFontBlend,
        Ros => Entry::Ros {
            registry: stack.get_i32(0)?.into(),
            ordering: stack.get_i32(1)?.into(),
            supplement: stack.get_fixed(2)?,
        },
        CidFontVersion => Entry::CidFontVersion(stack.pop_fixed()?),
        CidFontRevision => Entry::CidFontRevision(stack.pop_fixed()?),
        CidFontType => Entry::CidFontType(stack.pop_i32()?),
        CidCount => Entry::CidCount(stack.pop_i32()? as u32),
        UidBase => Entry::UidBase(stack.pop_i32()?),
        FontName => Entry::FontName(stack.pop_i32()?.into()),
        StdHw => Entry::StdHw(stack.pop_fixed()?),
        StdVw => Entry::StdVw(stack.pop_fixed()?),
        DefaultWidthX => Entry::DefaultWidthX(stack.pop_fixed()?),
        NominalWidthX => Entry::NominalWidthX(stack.pop_fixed()?),
        StemSnapH => {
            stack.accumulate_deltas();
            Entry::StemSnapH(StemSnaps::new(stack.fixed_values()))
        }
        StemSnapV => {
            stack.accumulate_deltas();
            Entry::StemSnapV(StemSnaps::new(stack.fixed_values()))
        }
        ForceBold => Entry::ForceBold(stack.pop_i32()? != 0),
        InitialRandomSeed => Entry::InitialRandomSeed(stack.pop_i32()?),
    })
}

fn offset(value: i32) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| ReadError::OutOfBounds.into())
}

fn pop_offset(stack: &mut Stack) -> Result<usize, Error> {
    offset(stack.pop_i32()?)
}

/// Maximum number of zone pairs in a blue values array.
const MAX_BLUE_VALUES: usize = 7;

/// Operand for the `BlueValues`, `OtherBlues`, `FamilyBlues` and
/// `FamilyOtherBlues` operators.
///
/// These are used to generate zones when applying hints.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Blues {
    values: [(Fixed, Fixed); MAX_BLUE_VALUES],
    len: u32,
}

impl Blues {
    pub fn new(values: impl Iterator<Item = Fixed>) -> Self {
        let mut blues = Self::default();
        let mut stash = Fixed::ZERO;
        for (i, value) in values.take(MAX_BLUE_VALUES * 2).enumerate() {
            if (i & 1) == 0 {
                stash = value;
            } else {
                blues.values[i / 2] = (stash, value);
                blues.len += 1;
            }
        }
        blues
    }

    pub fn values(&self) -> &[(Fixed, Fixed)] {
        &self.values[..self.len as usize]
    }
}

/// Older PostScript interpreters accept two values, but newer ones accept
/// 12. We'll assume that as maximum.
const MAX_STEM_SNAPS: usize = 12;

/// Operand for the `StemSnapH` and `StemSnapV` operators.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct StemSnaps {
    values: [Fixed; MAX_STEM_SNAPS],
    len: u32,
}

impl StemSnaps {
    fn new(values: impl Iterator<Item = Fixed>) -> Self {
        let mut snaps = Self::default();
        for (value, target_value) in values.take(MAX_STEM_SNAPS).zip(&mut snaps.values) {
            *target_value = value;
            snaps.len += 1;
        }
        snaps
    }

    pub fn values(&self) -> &[Fixed] {
        &self.values[..self.len as usize]
    }
}

#[inline]
pub(crate) fn parse_int(cursor: &mut Cursor, b0: u8) -> Result<i32, Error> {
    // Size   b0 range     Value range              Value calculation
    //--------------------------------------------------------------------------------
    // 1      32 to 246    -107 to +107             b0 - 139
    // 2      247 to 250   +108 to +1131            (b0 - 247) * 256 + b1 + 108
    // 2      251 to 254   -1131 to -108            -(b0 - 251) * 256 - b1 - 108
    // 3      28           -32768 to +32767         b1 << 8 | b2
    // 5      29           -(2^31) to +(2^31 - 1)   b1 << 24 | b2 << 16 | b3 << 8 | b4
    Ok(match b0 {
        32..=246 => b0 as i32 - 139,
        247..=250 => (b0 as i32 - 247) * 256 + cursor.read::<u8>()? as i32 + 108,
        251..=254 => -(b0 as i32 - 251) * 256 - cursor.read::<u8>()? as i32 - 108,
        28 => cursor.read::<i16>()? as i32,
        29 => cursor.read::<i32>()?,
        _ => {
            return Err(Error::InvalidNumber);
        }
    })
}

/// Digits beyond this mantissa only shift the decimal exponent.
const REAL_MANTISSA_LIMIT: u64 = 100_000_000_000_000_000;

/// Exponents this large already saturate the 16.16 range.
const REAL_EXPONENT_LIMIT: i32 = 1000;

/// Parses a real number stored as packed nibbles.
///
/// Digits accumulate into an integer mantissa with a decimal exponent and
/// the value is formed once at the end. The result saturates to the 16.16
/// range.
fn parse_real(cursor: &mut Cursor) -> Result<Fixed, Error> {
    // Nibble value    Represents
    //----------------------------------
    // 0 to 9          0 to 9
    // a               . (decimal point)
    // b               E
    // c               E-
    // d               <reserved>
    // e               - (minus)
    // f               end of number
    #[derive(Copy, Clone, PartialEq)]
    enum Phase {
        Integer,
        Fraction,
        Exponent,
    }
    let mut phase = Phase::Integer;
    let mut negative = false;
    let mut seen_digit = false;
    let mut mantissa = 0u64;
    // power of ten applied to the mantissa by the digit positions
    let mut scale = 0i32;
    let mut exponent = 0i32;
    let mut exponent_negative = false;
    'outer: loop {
        let b = cursor.read::<u8>()?;
        for nibble in [(b >> 4) & 0xF, b & 0xF] {
            match (phase, nibble) {
                (Phase::Exponent, 0x0..=0x9) => {
                    exponent = (exponent * 10 + nibble as i32).min(REAL_EXPONENT_LIMIT);
                }
                (_, 0x0..=0x9) => {
                    seen_digit = true;
                    let fraction = phase == Phase::Fraction;
                    if mantissa < REAL_MANTISSA_LIMIT {
                        mantissa = mantissa * 10 + nibble as u64;
                        scale -= fraction as i32;
                    } else if !fraction {
                        scale += 1;
                    }
                }
                (Phase::Integer, 0xA) => phase = Phase::Fraction,
                (Phase::Integer | Phase::Fraction, 0xB | 0xC) => {
                    phase = Phase::Exponent;
                    exponent_negative = nibble == 0xC;
                }
                (Phase::Integer, 0xE) if !negative && !seen_digit => negative = true,
                (_, 0xF) => break 'outer,
                _ => return Err(Error::InvalidNumber),
            }
        }
    }
    if mantissa == 0 {
        return Ok(Fixed::ZERO);
    }
    let exponent = scale + if exponent_negative { -exponent } else { exponent };
    let power = 10f64.powi(exponent.abs());
    let magnitude = if exponent < 0 {
        mantissa as f64 / power
    } else {
        mantissa as f64 * power
    };
    let value = if negative { -magnitude } else { magnitude };
    Ok(Fixed::from_f64(value.clamp(
        Fixed::MIN.to_f64(),
        Fixed::MAX.to_f64(),
    )))
}

/// The parsed Top DICT of a CFF font.
///
/// Fields that are absent from the DICT hold the defaults given in
/// "Table 9 Top DICT Operator Entries".
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TopDict {
    pub version: Option<StringId>,
    pub notice: Option<StringId>,
    pub copyright: Option<StringId>,
    pub full_name: Option<StringId>,
    pub family_name: Option<StringId>,
    pub weight: Option<StringId>,
    pub is_fixed_pitch: bool,
    pub italic_angle: Fixed,
    pub underline_position: Fixed,
    pub underline_thickness: Fixed,
    pub paint_type: i32,
    pub charstring_type: i32,
    pub font_matrix: [Fixed; 6],
    pub unique_id: Option<i32>,
    pub font_bbox: [Fixed; 4],
    pub stroke_width: Fixed,
    pub charset_offset: usize,
    pub encoding_offset: usize,
    pub charstrings_offset: Option<usize>,
    pub private_dict_range: Option<Range<usize>>,
    pub synthetic_base: Option<i32>,
    pub postscript: Option<StringId>,
    pub base_font_name: Option<StringId>,
    pub ros: Option<(StringId, StringId, Fixed)>,
    pub cid_font_version: Fixed,
    pub cid_count: u32,
    pub fd_array_offset: Option<usize>,
    pub fd_select_offset: Option<usize>,
    pub font_name: Option<StringId>,
}

impl Default for TopDict {
    fn default() -> Self {
        Self {
            version: None,
            notice: None,
            copyright: None,
            full_name: None,
            family_name: None,
            weight: None,
            is_fixed_pitch: false,
            italic_angle: Fixed::ZERO,
            underline_position: Fixed::from_i32(-100),
            underline_thickness: Fixed::from_i32(50),
            paint_type: 0,
            charstring_type: 2,
            font_matrix: [
                Fixed::from_f64(0.001),
                Fixed::ZERO,
                Fixed::ZERO,
                Fixed::from_f64(0.001),
                Fixed::ZERO,
                Fixed::ZERO,
            ],
            unique_id: None,
            font_bbox: [Fixed::ZERO; 4],
            stroke_width: Fixed::ZERO,
            charset_offset: 0,
            encoding_offset: 0,
            charstrings_offset: None,
            private_dict_range: None,
            synthetic_base: None,
            postscript: None,
            base_font_name: None,
            ros: None,
            cid_font_version: Fixed::ZERO,
            cid_count: 8720,
            fd_array_offset: None,
            fd_select_offset: None,
            font_name: None,
        }
    }
}

impl TopDict {
    /// Parses a Top DICT (or a Font DICT from an FDArray).
    pub fn new(dict_data: &[u8]) -> Result<Self, Error> {
        let mut dict = Self::default();
        for entry in entries(dict_data) {
            match entry? {
                Entry::Version(id) => dict.version = Some(id),
                Entry::Notice(id) => dict.notice = Some(id),
                Entry::Copyright(id) => dict.copyright = Some(id),
                Entry::FullName(id) => dict.full_name = Some(id),
                Entry::FamilyName(id) => dict.family_name = Some(id),
                Entry::Weight(id) => dict.weight = Some(id),
                Entry::IsFixedPitch(value) => dict.is_fixed_pitch = value,
                Entry::ItalicAngle(value) => dict.italic_angle = value,
                Entry::UnderlinePosition(value) => dict.underline_position = value,
                Entry::UnderlineThickness(value) => dict.underline_thickness = value,
                Entry::PaintType(value) => dict.paint_type = value,
                Entry::CharstringType(value) => dict.charstring_type = value,
                Entry::FontMatrix(value) => dict.font_matrix = value,
                Entry::UniqueId(value) => dict.unique_id = Some(value),
                Entry::FontBbox(value) => dict.font_bbox = value,
                Entry::StrokeWidth(value) => dict.stroke_width = value,
                Entry::Charset(offset) => dict.charset_offset = offset,
                Entry::Encoding(offset) => dict.encoding_offset = offset,
                Entry::CharstringsOffset(offset) => dict.charstrings_offset = Some(offset),
                Entry::PrivateDictRange(range) => dict.private_dict_range = Some(range),
                Entry::SyntheticBase(value) => dict.synthetic_base = Some(value),
                Entry::PostScript(id) => dict.postscript = Some(id),
                Entry::BaseFontName(id) => dict.base_font_name = Some(id),
                Entry::Ros {
                    registry,
                    ordering,
                    supplement,
                } => dict.ros = Some((registry, ordering, supplement)),
                Entry::CidFontVersion(value) => dict.cid_font_version = value,
                Entry::CidCount(value) => dict.cid_count = value,
                Entry::FdArrayOffset(offset) => dict.fd_array_offset = Some(offset),
                Entry::FdSelectOffset(offset) => dict.fd_select_offset = Some(offset),
                Entry::FontName(id) => dict.font_name = Some(id),
                _ => {}
            }
        }
        Ok(dict)
    }

    /// Returns true if the DICT describes a CID-keyed font.
    pub fn is_cid(&self) -> bool {
        self.ros.is_some() && self.fd_array_offset.is_some() && self.fd_select_offset.is_some()
    }
}

/// The parsed Private DICT of a CFF font or Font DICT.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PrivateDict {
    pub blue_values: Blues,
    pub other_blues: Blues,
    pub family_blues: Blues,
    pub family_other_blues: Blues,
    pub blue_scale: Fixed,
    pub blue_shift: Fixed,
    pub blue_fuzz: Fixed,
    pub std_hw: Fixed,
    pub std_vw: Fixed,
    pub stem_snap_h: StemSnaps,
    pub stem_snap_v: StemSnaps,
    pub force_bold: bool,
    pub language_group: i32,
    pub expansion_factor: Fixed,
    pub initial_random_seed: i32,
    /// Offset to the local subroutines, relative to the start of the
    /// Private DICT.
    pub subrs_offset: Option<usize>,
    pub default_width_x: Fixed,
    pub nominal_width_x: Fixed,
}

impl Default for PrivateDict {
    fn default() -> Self {
        Self {
            blue_values: Blues::default(),
            other_blues: Blues::default(),
            family_blues: Blues::default(),
            family_other_blues: Blues::default(),
            blue_scale: Fixed::from_f64(0.039625),
            blue_shift: Fixed::from_i32(7),
            blue_fuzz: Fixed::ONE,
            std_hw: Fixed::ZERO,
            std_vw: Fixed::ZERO,
            stem_snap_h: StemSnaps::default(),
            stem_snap_v: StemSnaps::default(),
            force_bold: false,
            language_group: 0,
            expansion_factor: Fixed::from_f64(0.06),
            initial_random_seed: 0,
            subrs_offset: None,
            default_width_x: Fixed::ZERO,
            nominal_width_x: Fixed::ZERO,
        }
    }
}

impl PrivateDict {
    pub fn new(dict_data: &[u8]) -> Result<Self, Error> {
        let mut dict = Self::default();
        for entry in entries(dict_data) {
            match entry? {
                Entry::BlueValues(values) => dict.blue_values = values,
                Entry::OtherBlues(values) => dict.other_blues = values,
                Entry::FamilyBlues(values) => dict.family_blues = values,
                Entry::FamilyOtherBlues(values) => dict.family_other_blues = values,
                Entry::BlueScale(value) => dict.blue_scale = value,
                Entry::BlueShift(value) => dict.blue_shift = value,
                Entry::BlueFuzz(value) => dict.blue_fuzz = value,
                Entry::StdHw(value) => dict.std_hw = value,
                Entry::StdVw(value) => dict.std_vw = value,
                Entry::StemSnapH(value) => dict.stem_snap_h = value,
                Entry::StemSnapV(value) => dict.stem_snap_v = value,
                Entry::ForceBold(value) => dict.force_bold = value,
                Entry::LanguageGroup(value) => dict.language_group = value,
                Entry::ExpansionFactor(value) => dict.expansion_factor = value,
                Entry::InitialRandomSeed(value) => dict.initial_random_seed = value,
                Entry::SubrsOffset(offset) => dict.subrs_offset = Some(offset),
                Entry::DefaultWidthX(value) => dict.default_width_x = value,
                Entry::NominalWidthX(value) => dict.nominal_width_x = value,
                _ => {}
            }
        }
        Ok(dict)
    }
}
