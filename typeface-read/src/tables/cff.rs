//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table

use std::ops::Range;

use types::{Fixed, GlyphId, Tag};

use super::postscript::{
    charstring::Charstring,
    dict::{PrivateDict, TopDict},
    Error, FdSelect, Index, Latin1String, StringId,
};
use crate::{FontData, ReadError};

/// 'CFF '
pub const TAG: Tag = Tag::new(b"CFF ");

/// The fixed header at the start of a CFF table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CffHeader {
    pub major: u8,
    pub minor: u8,
    /// Size of the header in bytes; the Name INDEX starts here.
    pub hdr_size: u8,
    /// Absolute offset size used in the font set.
    pub off_size: u8,
}

/// A Private DICT together with its local subroutines.
#[derive(Clone, Default, Debug)]
pub struct PrivateFont<'a> {
    pub dict: PrivateDict,
    pub subrs: Option<Index<'a>>,
}

impl<'a> PrivateFont<'a> {
    /// Reads the Private DICT at `range`, followed by its local subroutines
    /// if the DICT references them.
    ///
    /// The Subrs offset is relative to the start of the Private DICT.
    fn read(data: FontData<'a>, range: Range<usize>) -> Result<Self, Error> {
        let start = range.start;
        let dict_data = data.read_bytes(range)?;
        let dict = PrivateDict::new(dict_data)?;
        let subrs = match dict.subrs_offset {
            Some(subrs_offset) => {
                let subrs_data = start
                    .checked_add(subrs_offset)
                    .and_then(|offset| data.split_off(offset))
                    .ok_or(ReadError::OutOfBounds)?;
                Some(Index::read(subrs_data)?)
            }
            None => None,
        };
        Ok(Self { dict, subrs })
    }
}

/// Per glyph hinting and subroutine data.
#[derive(Clone, Debug)]
enum Fonts<'a> {
    /// A name-keyed font with a single, optional, Private DICT.
    Simple(Option<PrivateFont<'a>>),
    /// A CID-keyed font where each glyph selects one of several font DICTs.
    Cid {
        fonts: Vec<PrivateFont<'a>>,
        fd_select: FdSelect<'a>,
    },
}

/// The [Compact Font Format](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table.
///
/// Only the first (and, in OpenType, only) font of the font set is exposed.
#[derive(Clone, Debug)]
pub struct Cff<'a> {
    data: FontData<'a>,
    header: CffHeader,
    names: Index<'a>,
    strings: Index<'a>,
    global_subrs: Index<'a>,
    charstrings: Index<'a>,
    top_dict: TopDict,
    fonts: Fonts<'a>,
}

impl<'a> Cff<'a> {
    /// Parses the table along with all of the structures referenced by its
    /// Top DICT.
    ///
    /// Each nested structure is read at an absolute offset from the start
    /// of the table.
    pub fn new(data: FontData<'a>) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let header = CffHeader {
            major: cursor.read()?,
            minor: cursor.read()?,
            hdr_size: cursor.read()?,
            off_size: cursor.read()?,
        };
        let mut offset = header.hdr_size as usize;
        let mut next_index = || -> Result<Index<'a>, Error> {
            let index = Index::read(data.split_off(offset).ok_or(ReadError::OutOfBounds)?)?;
            offset += index.size_in_bytes()?;
            Ok(index)
        };
        let names = next_index()?;
        if names.count() != 1 {
            return Err(Error::InvalidIndexCount(names.count() as u16));
        }
        let top_dicts = next_index()?;
        if top_dicts.count() != 1 {
            return Err(Error::InvalidIndexCount(top_dicts.count() as u16));
        }
        let strings = next_index()?;
        let global_subrs = next_index()?;
        let top_dict = TopDict::new(top_dicts.get(0)?)?;
        if top_dict.charstring_type != 2 {
            return Err(Error::UnsupportedCharstringType(top_dict.charstring_type));
        }
        let charstrings = match top_dict.charstrings_offset {
            Some(offset) => Index::read(data.split_off(offset).ok_or(ReadError::OutOfBounds)?)?,
            None => Index::default(),
        };
        let fonts = if top_dict.is_cid() {
            Self::read_cid_fonts(data, &top_dict, charstrings.count() as u16)?
        } else {
            let private = top_dict
                .private_dict_range
                .clone()
                .map(|range| PrivateFont::read(data, range))
                .transpose()?;
            Fonts::Simple(private)
        };
        Ok(Self {
            data,
            header,
            names,
            strings,
            global_subrs,
            charstrings,
            top_dict,
            fonts,
        })
    }

    fn read_cid_fonts(
        data: FontData<'a>,
        top_dict: &TopDict,
        num_glyphs: u16,
    ) -> Result<Fonts<'a>, Error> {
        let split = |offset: Option<usize>| {
            offset
                .and_then(|offset| data.split_off(offset))
                .ok_or(ReadError::OutOfBounds)
        };
        let fd_array = Index::read(split(top_dict.fd_array_offset)?)?;
        let fonts = fd_array
            .iter()
            .map(|font_dict| {
                let font_dict = TopDict::new(font_dict?)?;
                match font_dict.private_dict_range {
                    Some(range) => PrivateFont::read(data, range),
                    None => Ok(PrivateFont::default()),
                }
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let fd_select = FdSelect::new(split(top_dict.fd_select_offset)?, num_glyphs)?;
        Ok(Fonts::Cid { fonts, fd_select })
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn header(&self) -> CffHeader {
        self.header
    }

    /// Returns the PostScript name of the font.
    ///
    /// See "Name INDEX" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=13>
    pub fn name(&self) -> Option<Latin1String<'a>> {
        Some(Latin1String::new(self.names.get(0).ok()?))
    }

    pub fn top_dict(&self) -> &TopDict {
        &self.top_dict
    }

    /// Returns the string index.
    ///
    /// See "String INDEX" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=17>
    pub fn strings(&self) -> Index<'a> {
        self.strings
    }

    /// Returns the custom string for the given identifier.
    ///
    /// Standard strings are not expanded, so this returns `None` for
    /// identifiers below 391.
    pub fn string(&self, id: StringId) -> Option<Latin1String<'a>> {
        let index = id.custom_index()?;
        self.strings.get(index).ok().map(Latin1String::new)
    }

    /// Returns the global subroutine index.
    ///
    /// See "Local/Global Subrs INDEXes" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=25>
    pub fn global_subrs(&self) -> Index<'a> {
        self.global_subrs
    }

    /// Returns the charstrings index, containing one entry per glyph.
    pub fn charstrings(&self) -> Index<'a> {
        self.charstrings
    }

    pub fn num_glyphs(&self) -> u32 {
        self.charstrings.count()
    }

    /// Returns true if this is a CID-keyed font.
    pub fn is_cid(&self) -> bool {
        matches!(self.fonts, Fonts::Cid { .. })
    }

    /// Returns the FDSelect structure of a CID-keyed font.
    pub fn fd_select(&self) -> Option<&FdSelect<'a>> {
        match &self.fonts {
            Fonts::Cid { fd_select, .. } => Some(fd_select),
            Fonts::Simple(_) => None,
        }
    }

    /// Returns the Private DICT and local subroutines used by the given
    /// glyph.
    ///
    /// For name-keyed fonts, this is `None` when the font lacks a Private
    /// DICT.
    pub fn private_font(&self, glyph_id: GlyphId) -> Result<Option<&PrivateFont<'a>>, Error> {
        match &self.fonts {
            Fonts::Simple(private) => Ok(private.as_ref()),
            Fonts::Cid { fonts, fd_select } => {
                let fd_index = fd_select
                    .font_index(glyph_id)
                    .ok_or(Error::MissingPrivateDict)?;
                fonts
                    .get(fd_index as usize)
                    .map(Some)
                    .ok_or(Error::MissingPrivateDict)
            }
        }
    }

    /// Evaluates the charstring for the given glyph.
    pub fn charstring(&self, glyph_id: GlyphId) -> Result<Charstring, Error> {
        let data = self.charstrings.get(glyph_id.to_usize())?;
        let subrs = self
            .private_font(glyph_id)?
            .and_then(|private| private.subrs);
        Charstring::parse(data, self.global_subrs, subrs)
    }

    /// Computes the advance width of a glyph from its charstring width
    /// operand.
    ///
    /// Glyphs without an encoded width use the `defaultWidthX` of their
    /// Private DICT; otherwise the operand is added to `nominalWidthX`.
    pub fn advance_width(
        &self,
        glyph_id: GlyphId,
        charstring: &Charstring,
    ) -> Result<Fixed, Error> {
        let (default_width, nominal_width) = match self.private_font(glyph_id)? {
            Some(private) => (private.dict.default_width_x, private.dict.nominal_width_x),
            None => (Fixed::ZERO, Fixed::ZERO),
        };
        Ok(charstring
            .width()
            .map(|width| nominal_width + width)
            .unwrap_or(default_width))
    }
}
