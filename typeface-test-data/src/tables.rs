//! Encoders for individual tables.
//!
//! These write the binary layout of each table from a few parameters; they
//! are intentionally simple and only produce well-formed data.

use typeface_types::{BoundingBox, F2Dot14, Fixed, Tag};

use crate::BeBuffer;

/// Parameters for the `head` table.
#[derive(Clone, Debug)]
pub struct Head {
    pub units_per_em: u16,
    pub bbox: BoundingBox<i16>,
    pub mac_style: u16,
    pub long_loca: bool,
}

impl Default for Head {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            bbox: BoundingBox::default(),
            mac_style: 0,
            long_loca: false,
        }
    }
}

pub fn head(params: &Head) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16) // major version
        .push(0u16) // minor version
        .push(Fixed::from_f64(1.5)) // font revision
        .push(0u32) // checksum adjustment
        .push(0x5F0F3CF5u32) // magic
        .push(0x0003u16) // flags
        .push(params.units_per_em)
        .push(3_600_000_000i64) // created
        .push(3_700_000_000i64) // modified
        .push(params.bbox.x_min)
        .push(params.bbox.y_min)
        .push(params.bbox.x_max)
        .push(params.bbox.y_max)
        .push(params.mac_style)
        .push(8u16) // lowest rec ppem
        .push(2i16) // font direction hint
        .push(params.long_loca as i16)
        .push(0i16) // glyph data format
        .into_vec()
}

/// Parameters shared by the `hhea` and `vhea` tables.
#[derive(Clone, Debug, Default)]
pub struct HVhea {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_max: u16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub number_of_long_metrics: u16,
}

fn hvhea(version: u32, params: &HVhea) -> Vec<u8> {
    BeBuffer::new()
        .push(version)
        .push(params.ascender)
        .push(params.descender)
        .push(params.line_gap)
        .push(params.advance_max)
        .push(0i16) // min leading bearing
        .push(0i16) // min trailing bearing
        .push(params.advance_max as i16) // max extent
        .push(params.caret_slope_rise)
        .push(params.caret_slope_run)
        .push(0i16) // caret offset
        .extend([0i16; 4])
        .push(0i16) // metric data format
        .push(params.number_of_long_metrics)
        .into_vec()
}

pub fn hhea(params: &HVhea) -> Vec<u8> {
    hvhea(0x00010000, params)
}

pub fn vhea(params: &HVhea) -> Vec<u8> {
    hvhea(0x00011000, params)
}

/// Encode an `hmtx` or `vmtx` table.
pub fn hvmtx(long_metrics: &[(u16, i16)], bearings: &[i16]) -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for (advance, bearing) in long_metrics {
        buf = buf.push(*advance).push(*bearing);
    }
    buf.extend(bearings.iter().copied()).into_vec()
}

/// A version 0.5 `maxp` table, as used by CFF fonts.
pub fn maxp_v05(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00005000u32)
        .push(num_glyphs)
        .into_vec()
}

/// A version 1.0 `maxp` table.
pub fn maxp_v1(num_glyphs: u16, max_component_depth: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(num_glyphs)
        .push(64u16) // max points
        .push(4u16) // max contours
        .push(96u16) // max composite points
        .push(6u16) // max composite contours
        .push(2u16) // max zones
        .push(0u16) // max twilight points
        .push(16u16) // max storage
        .push(8u16) // max function defs
        .push(0u16) // max instruction defs
        .push(64u16) // max stack elements
        .push(12u16) // max size of instructions
        .push(2u16) // max component elements
        .push(max_component_depth)
        .into_vec()
}

/// Parameters for the `OS/2` table.
#[derive(Clone, Debug)]
pub struct Os2 {
    pub version: u16,
    pub weight_class: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub x_height: i16,
    pub cap_height: i16,
    pub fs_selection: u16,
}

impl Default for Os2 {
    fn default() -> Self {
        Self {
            version: 4,
            weight_class: 400,
            strikeout_size: 50,
            strikeout_position: 300,
            typo_ascender: 800,
            typo_descender: -200,
            typo_line_gap: 90,
            win_ascent: 900,
            win_descent: 250,
            x_height: 500,
            cap_height: 700,
            fs_selection: 0x0040,
        }
    }
}

pub fn os2(params: &Os2) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(params.version)
        .push(480i16) // avg char width
        .push(params.weight_class)
        .push(5u16) // width class
        .push(0u16) // fs type
        .extend([650i16, 600, 0, 75, 650, 600, 0, 350]) // sub/superscript
        .push(params.strikeout_size)
        .push(params.strikeout_position)
        .push(0i16) // family class
        .extend([2u8, 11, 5, 3, 3, 4, 3, 2, 2, 4]) // panose
        .extend([1u32, 0, 0, 0]) // unicode ranges
        .push(Tag::new(b"TEST"))
        .push(params.fs_selection)
        .push(0x20u16) // first char
        .push(0xFFFFu16) // last char
        .push(params.typo_ascender)
        .push(params.typo_descender)
        .push(params.typo_line_gap)
        .push(params.win_ascent)
        .push(params.win_descent);
    if params.version >= 1 {
        buf = buf.push(1u32).push(0u32);
    }
    if params.version >= 2 {
        buf = buf
            .push(params.x_height)
            .push(params.cap_height)
            .push(0u16) // default char
            .push(0x20u16) // break char
            .push(2u16); // max context
    }
    if params.version >= 5 {
        buf = buf.push(8u16).push(72u16);
    }
    buf.into_vec()
}

/// A version 3 `post` table.
pub fn post(italic_angle: f64, underline_position: i16, underline_thickness: i16, fixed_pitch: bool) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00030000u32)
        .push(Fixed::from_f64(italic_angle))
        .push(underline_position)
        .push(underline_thickness)
        .push(fixed_pitch as u32)
        .extend([0u32; 4])
        .into_vec()
}

/// An empty `name` table.
pub fn name() -> Vec<u8> {
    BeBuffer::new()
        .push(0u16) // format
        .push(0u16) // count
        .push(6u16) // storage offset
        .into_vec()
}

/// Assemble a `cmap` table from `(platform, encoding, subtable)` records.
pub fn cmap(records: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut header = BeBuffer::new().push(0u16).push(records.len() as u16);
    let mut offset = 4 + records.len() * 8;
    let mut body = Vec::new();
    for (platform, encoding, subtable) in records {
        header = header
            .push(*platform)
            .push(*encoding)
            .push(offset as u32);
        offset += subtable.len();
        body.extend_from_slice(subtable);
    }
    let mut result = header.into_vec();
    result.extend(body);
    result
}

/// A format 4 subtable mapping each code point individually.
///
/// Every mapping gets its own segment using `idDelta`, which keeps the
/// encoder trivial.
pub fn cmap_format4(mappings: &[(u16, u16)]) -> Vec<u8> {
    let mut mappings = mappings.to_vec();
    mappings.sort();
    let seg_count = mappings.len() as u16 + 1;
    let length = 16 + seg_count * 8;
    let mut buf = BeBuffer::new()
        .push(4u16)
        .push(length)
        .push(0u16) // language
        .push(seg_count * 2)
        .extend([0u16; 3]); // search params, unused
    buf = buf
        .extend(mappings.iter().map(|(code, _)| *code))
        .push(0xFFFFu16)
        .push(0u16); // reserved pad
    buf = buf
        .extend(mappings.iter().map(|(code, _)| *code))
        .push(0xFFFFu16);
    buf = buf
        .extend(
            mappings
                .iter()
                .map(|(code, gid)| gid.wrapping_sub(*code) as i16),
        )
        .push(1i16);
    buf.extend(std::iter::repeat(0u16).take(seg_count as usize))
        .into_vec()
}

/// A format 12 subtable from `(start, end, start_glyph)` groups.
pub fn cmap_format12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(12u16)
        .push(0u16)
        .push(16 + groups.len() as u32 * 12)
        .push(0u32) // language
        .push(groups.len() as u32);
    for (start, end, glyph) in groups {
        buf = buf.push(*start).push(*end).push(*glyph);
    }
    buf.into_vec()
}

/// A format 14 subtable.
///
/// Each selector record lists its default UVS ranges as
/// `(start, additional_count)` and its non-default mappings as
/// `(codepoint, glyph)`.
pub fn cmap_format14(records: &[(u32, Vec<(u32, u8)>, Vec<(u32, u16)>)]) -> Vec<u8> {
    let header_len = 10 + records.len() * 11;
    let mut header = BeBuffer::new()
        .push(14u16)
        .push_with_tag(0u32, "length")
        .push(records.len() as u32);
    let mut body = BeBuffer::new();
    for (selector, defaults, non_defaults) in records {
        let selector = typeface_types::Uint24::new(*selector);
        header = header.push(selector);
        if defaults.is_empty() {
            header = header.push(0u32);
        } else {
            header = header.push((header_len + body.len()) as u32);
            body = body.push(defaults.len() as u32);
            for (start, count) in defaults {
                body = body.push(typeface_types::Uint24::new(*start)).push(*count);
            }
        }
        if non_defaults.is_empty() {
            header = header.push(0u32);
        } else {
            header = header.push((header_len + body.len()) as u32);
            body = body.push(non_defaults.len() as u32);
            for (code, glyph) in non_defaults {
                body = body.push(typeface_types::Uint24::new(*code)).push(*glyph);
            }
        }
    }
    let total = (header.len() + body.len()) as u32;
    header.write_at("length", total);
    let mut result = header.into_vec();
    result.extend(body.into_vec());
    result
}

/// A point in a simple glyph contour: `(x, y, on_curve)`.
pub type ContourPoint = (i16, i16, bool);

const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;

/// Encode a simple glyph, using the compact flag and coordinate forms
/// where possible.
pub fn simple_glyph(contours: &[&[ContourPoint]], instructions: &[u8]) -> Vec<u8> {
    let points: Vec<ContourPoint> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let mut bbox = BoundingBox {
        x_min: i16::MAX,
        y_min: i16::MAX,
        x_max: i16::MIN,
        y_max: i16::MIN,
    };
    for (x, y, _) in &points {
        bbox.x_min = bbox.x_min.min(*x);
        bbox.y_min = bbox.y_min.min(*y);
        bbox.x_max = bbox.x_max.max(*x);
        bbox.y_max = bbox.y_max.max(*y);
    }
    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .push(bbox.x_min)
        .push(bbox.y_min)
        .push(bbox.x_max)
        .push(bbox.y_max);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    buf = buf
        .push(instructions.len() as u16)
        .extend(instructions.iter().copied());

    let mut flags = Vec::new();
    let mut xs = BeBuffer::new();
    let mut ys = BeBuffer::new();
    let (mut last_x, mut last_y) = (0i16, 0i16);
    for (x, y, on_curve) in &points {
        let mut flag = if *on_curve { ON_CURVE_POINT } else { 0 };
        let (dx, dy) = (x - last_x, y - last_y);
        (last_x, last_y) = (*x, *y);
        xs = encode_delta(dx, &mut flag, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE, xs);
        ys = encode_delta(dy, &mut flag, Y_SHORT_VECTOR, Y_IS_SAME_OR_POSITIVE, ys);
        flags.push(flag);
    }

    // run length encode the flags
    let mut encoded = Vec::new();
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i..]
            .iter()
            .take(256)
            .take_while(|f| **f == flag)
            .count();
        if run > 1 {
            encoded.push(flag | REPEAT_FLAG);
            encoded.push((run - 1) as u8);
        } else {
            encoded.push(flag);
        }
        i += run;
    }
    buf.extend_bytes(&encoded)
        .extend_bytes(&xs)
        .extend_bytes(&ys)
        .into_vec()
}

fn encode_delta(delta: i16, flag: &mut u8, short: u8, same_or_positive: u8, buf: BeBuffer) -> BeBuffer {
    if delta == 0 {
        *flag |= same_or_positive;
        buf
    } else if delta.unsigned_abs() <= 255 {
        *flag |= short;
        if delta > 0 {
            *flag |= same_or_positive;
        }
        buf.push(delta.unsigned_abs() as u8)
    } else {
        buf.push(delta)
    }
}

/// How a component is positioned within a composite glyph.
#[derive(Clone, Copy, Debug)]
pub enum ComponentAnchor {
    Offset(i16, i16),
    /// Match a point in the parent (`base`) to a point in the component.
    Points(u16, u16),
}

/// The transform applied to a component.
#[derive(Clone, Copy, Debug)]
pub enum ComponentScale {
    None,
    Scale(f32),
    XyScale(f32, f32),
    TwoByTwo([f32; 4]),
}

#[derive(Clone, Copy, Debug)]
pub struct Component {
    pub glyph: u16,
    pub anchor: ComponentAnchor,
    pub scale: ComponentScale,
    pub flags: u16,
}

impl Component {
    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph,
            anchor: ComponentAnchor::Offset(dx, dy),
            scale: ComponentScale::None,
            flags: 0,
        }
    }

    pub fn with_scale(mut self, scale: ComponentScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }
}

pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
pub const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
pub const USE_MY_METRICS: u16 = 0x0200;
pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;

/// Encode a composite glyph.
pub fn composite_glyph(bbox: BoundingBox<i16>, components: &[Component], instructions: &[u8]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(-1i16)
        .push(bbox.x_min)
        .push(bbox.y_min)
        .push(bbox.x_max)
        .push(bbox.y_max);
    for (i, component) in components.iter().enumerate() {
        let mut flags = component.flags;
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        } else if !instructions.is_empty() {
            flags |= WE_HAVE_INSTRUCTIONS;
        }
        let (args, words) = match component.anchor {
            ComponentAnchor::Offset(dx, dy) => {
                flags |= ARGS_ARE_XY_VALUES;
                let fits = i8::try_from(dx).is_ok() && i8::try_from(dy).is_ok();
                (BeBuffer::new().push(dx).push(dy), !fits)
            }
            ComponentAnchor::Points(base, component) => {
                let fits = base <= 255 && component <= 255;
                (BeBuffer::new().push(base).push(component), !fits)
            }
        };
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        let scales: Vec<f32> = match component.scale {
            ComponentScale::None => vec![],
            ComponentScale::Scale(s) => {
                flags |= WE_HAVE_A_SCALE;
                vec![s]
            }
            ComponentScale::XyScale(x, y) => {
                flags |= WE_HAVE_AN_X_AND_Y_SCALE;
                vec![x, y]
            }
            ComponentScale::TwoByTwo(m) => {
                flags |= WE_HAVE_A_TWO_BY_TWO;
                m.to_vec()
            }
        };
        buf = buf.push(flags).push(component.glyph);
        if words {
            buf = buf.extend_bytes(&args);
        } else {
            // each argument is stored in the low byte of its word
            buf = buf.extend_bytes(&[args[1], args[3]]);
        }
        buf = buf.extend(scales.into_iter().map(F2Dot14::from_f32));
    }
    if !instructions.is_empty() {
        buf = buf
            .push(instructions.len() as u16)
            .extend_bytes(instructions);
    }
    buf.into_vec()
}

/// Build `glyf` and `loca` tables from encoded glyph records.
///
/// Returns `(glyf, loca)`.
pub fn glyf_loca(glyphs: &[Vec<u8>], long_loca: bool) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0usize];
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        glyf.resize((glyf.len() + 3) & !3, 0);
        offsets.push(glyf.len());
    }
    let loca = if long_loca {
        BeBuffer::new().extend(offsets.iter().map(|o| *o as u32))
    } else {
        BeBuffer::new().extend(offsets.iter().map(|o| (*o / 2) as u16))
    };
    (glyf, loca.into_vec())
}
