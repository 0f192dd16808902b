//! Complete synthetic fonts.
//!
//! The glyphs in these fonts are small and hand-picked so that tests can
//! state exact expected outlines and metrics.

use typeface_types::{BoundingBox, Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{
    cff::{op, CffSpec, CharstringBuilder, PrivateSpec},
    sfnt::SfntBuilder,
    tables::{self, Component, ComponentAnchor, ComponentScale, ContourPoint, HVhea},
};

/// Facts about the fonts built by [`truetype_builder`] and [`cff_builder`].
pub mod info {
    pub const UNITS_PER_EM: u16 = 1000;
    pub const TRUETYPE_GLYPH_COUNT: u16 = 8;
    pub const CFF_GLYPH_COUNT: u16 = 5;

    pub const GID_NOTDEF: u16 = 0;
    /// A contour made only of off-curve points.
    pub const GID_O: u16 = 1;
    /// A triangle with one off-curve point.
    pub const GID_A: u16 = 2;
    pub const GID_SPACE: u16 = 3;
    /// A composite of `A` and a scaled, offset `.notdef`.
    pub const GID_COMPOSITE: u16 = 4;
    /// Two composites referencing each other.
    pub const GID_CYCLE_A: u16 = 5;
    pub const GID_CYCLE_B: u16 = 6;
    /// A composite positioned with point anchors.
    pub const GID_ANCHORED: u16 = 7;

    /// Advances in the `hmtx` table of the TrueType font; the last advance
    /// repeats for glyphs 5..8.
    pub const TRUETYPE_ADVANCES: [u16; 5] = [500, 550, 520, 250, 1100];
    pub const TRUETYPE_LSBS: [i16; 8] = [50, 0, 0, 0, 0, 0, 0, 10];

    pub const CFF_ADVANCES: [u16; 5] = [600, 450, 700, 450, 550];

    pub const HHEA_ASCENDER: i16 = 850;
    pub const HHEA_DESCENDER: i16 = -250;
}

pub const NOTDEF: &[ContourPoint] = &[(50, 0, true), (50, 700, true), (450, 700, true), (450, 0, true)];
pub const O_CONTOUR: &[ContourPoint] =
    &[(0, 0, false), (0, 700, false), (500, 700, false), (500, 0, false)];
pub const A_CONTOUR: &[ContourPoint] = &[(0, 0, true), (250, 700, false), (500, 0, true)];

fn bbox(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> BoundingBox<i16> {
    BoundingBox {
        x_min,
        y_min,
        x_max,
        y_max,
    }
}

/// The `glyf` records of the TrueType test font.
pub fn truetype_glyphs() -> Vec<Vec<u8>> {
    vec![
        tables::simple_glyph(&[NOTDEF], &[]),
        tables::simple_glyph(&[O_CONTOUR], &[]),
        // a couple of instruction bytes, which are stored but never run
        tables::simple_glyph(&[A_CONTOUR], &[0xB0, 0x01]),
        Vec::new(),
        tables::composite_glyph(
            bbox(0, 0, 825, 700),
            &[
                Component::offset(2, 0, 0),
                Component::offset(0, 600, 100).with_scale(ComponentScale::Scale(0.5)),
            ],
            &[],
        ),
        tables::composite_glyph(bbox(0, 0, 500, 700), &[Component::offset(6, 0, 0)], &[]),
        tables::composite_glyph(bbox(0, 0, 500, 700), &[Component::offset(5, 10, 10)], &[]),
        tables::composite_glyph(
            bbox(10, 20, 660, 1420),
            &[
                Component::offset(2, 10, 20),
                Component {
                    glyph: 0,
                    anchor: ComponentAnchor::Points(1, 0),
                    scale: ComponentScale::None,
                    flags: 0,
                },
            ],
            &[],
        ),
    ]
}

/// The `cmap` table shared by the test fonts.
pub fn truetype_cmap() -> Vec<u8> {
    let bmp = [(0x20, 3), (0x41, 2), (0x4F, 1), (0xC4, 4)];
    let full = [
        (0x20, 0x20, 3),
        (0x41, 0x41, 2),
        (0x4F, 0x4F, 1),
        (0xC4, 0xC4, 4),
        (0x1F600, 0x1F600, 1),
    ];
    tables::cmap(&[
        (0, 3, tables::cmap_format4(&bmp)),
        (
            0,
            5,
            tables::cmap_format14(&[
                (0xFE00, vec![(0x41, 0)], vec![]),
                (0xFE01, vec![], vec![(0x4F, 2)]),
            ]),
        ),
        (3, 1, tables::cmap_format4(&bmp)),
        (3, 10, tables::cmap_format12(&full)),
    ])
}

/// Tables shared between the TrueType and CFF test fonts, except `hmtx`
/// and `maxp`.
fn common_tables(builder: &mut SfntBuilder, number_of_long_metrics: u16) {
    builder
        .add_table(
            Tag::new(b"hhea"),
            tables::hhea(&HVhea {
                ascender: info::HHEA_ASCENDER,
                descender: info::HHEA_DESCENDER,
                line_gap: 0,
                advance_max: 1100,
                caret_slope_rise: 1,
                caret_slope_run: 0,
                number_of_long_metrics,
            }),
        )
        .add_table(Tag::new(b"OS/2"), tables::os2(&Default::default()))
        .add_table(Tag::new(b"post"), tables::post(0.0, -100, 50, false))
        .add_table(Tag::new(b"name"), tables::name());
}

/// A builder for the TrueType test font, so tests can add or remove tables.
pub fn truetype_builder() -> SfntBuilder {
    let (glyf, loca) = tables::glyf_loca(&truetype_glyphs(), false);
    let long_metrics: Vec<(u16, i16)> = info::TRUETYPE_ADVANCES
        .iter()
        .zip(info::TRUETYPE_LSBS)
        .map(|(advance, lsb)| (*advance, lsb))
        .collect();
    let mut builder = SfntBuilder::new(TT_SFNT_VERSION);
    builder
        .add_table(
            Tag::new(b"head"),
            tables::head(&tables::Head {
                units_per_em: info::UNITS_PER_EM,
                bbox: bbox(0, 0, 1100, 1420),
                ..Default::default()
            }),
        )
        .add_table(Tag::new(b"maxp"), tables::maxp_v1(info::TRUETYPE_GLYPH_COUNT, 1))
        .add_table(
            Tag::new(b"hmtx"),
            tables::hvmtx(&long_metrics, &info::TRUETYPE_LSBS[5..]),
        )
        .add_table(Tag::new(b"cmap"), truetype_cmap())
        .add_table(Tag::new(b"glyf"), glyf)
        .add_table(Tag::new(b"loca"), loca);
    common_tables(&mut builder, info::TRUETYPE_ADVANCES.len() as u16);
    builder
}

/// The TrueType test font.
pub fn simple_truetype() -> Vec<u8> {
    truetype_builder().build()
}

/// The TrueType test font with `vhea` and `vmtx` tables.
///
/// Two long vertical metrics `(1000, 100)` and `(900, 50)` are followed by
/// top side bearings of 0 for the remaining glyphs.
pub fn truetype_with_vertical() -> Vec<u8> {
    let mut builder = truetype_builder();
    builder
        .add_table(
            Tag::new(b"vhea"),
            tables::vhea(&HVhea {
                ascender: 500,
                descender: -500,
                line_gap: 0,
                advance_max: 1000,
                caret_slope_rise: 0,
                caret_slope_run: 1,
                number_of_long_metrics: 2,
            }),
        )
        .add_table(
            Tag::new(b"vmtx"),
            tables::hvmtx(&[(1000, 100), (900, 50)], &[0; 6]),
        );
    builder.build()
}

fn local_subrs() -> Vec<Vec<u8>> {
    vec![
        // a right angle
        CharstringBuilder::new()
            .nums(&[100, 100])
            .op(op::RMOVETO)
            .nums(&[200, 0])
            .op(op::RLINETO)
            .nums(&[0, 200])
            .op(op::RLINETO)
            .op(op::RETURN)
            .build(),
        // a moveto carrying the width
        CharstringBuilder::new()
            .nums(&[50, 100, 100])
            .op(op::RMOVETO)
            .op(op::RETURN)
            .build(),
    ]
}

fn global_subrs() -> Vec<Vec<u8>> {
    vec![CharstringBuilder::new()
        .nums(&[100, 0, 100, 100, 0, 100])
        .op(op::RRCURVETO)
        .op(op::RETURN)
        .build()]
}

/// The charstrings of the CFF test font.
///
/// - 0: a rectangle with a hint and a hint mask; width 600
/// - 1: a local subroutine call; default width
/// - 2: a moveto with width followed by a global subroutine call; width 700
/// - 3: empty; default width
/// - 4: a local subroutine supplying the width; width 550
pub fn cff_charstrings() -> Vec<Vec<u8>> {
    vec![
        CharstringBuilder::new()
            .nums(&[100, 0, 50])
            .op(op::HSTEM)
            .op(op::HINTMASK)
            .bytes(&[0x80])
            .nums(&[50, 0])
            .op(op::RMOVETO)
            .nums(&[400, 700, -400])
            .op(op::HLINETO)
            .op(op::ENDCHAR)
            .build(),
        CharstringBuilder::new()
            .num(-107)
            .op(op::CALLSUBR)
            .op(op::ENDCHAR)
            .build(),
        CharstringBuilder::new()
            .nums(&[200, 0, 0])
            .op(op::RMOVETO)
            .num(-107)
            .op(op::CALLGSUBR)
            .op(op::ENDCHAR)
            .build(),
        CharstringBuilder::new().op(op::ENDCHAR).build(),
        CharstringBuilder::new()
            .num(-106)
            .op(op::CALLSUBR)
            .nums(&[10, 0])
            .op(op::RLINETO)
            .op(op::ENDCHAR)
            .build(),
    ]
}

/// The description of the `CFF ` table in the CFF test font.
pub fn cff_spec() -> CffSpec {
    CffSpec {
        name: "TestCFF".into(),
        strings: vec!["1.000".into(), "Test Sans".into()],
        global_subrs: global_subrs(),
        charstrings: cff_charstrings(),
        private: PrivateSpec {
            default_width_x: 450,
            nominal_width_x: 500,
            blue_values: vec![-10, 0, 700, 710],
            subrs: local_subrs(),
        },
        ..Default::default()
    }
}

/// The description of a CID-keyed variant of [`cff_spec`].
///
/// Glyphs 0..3 and 4 use font DICT 0, which matches the private DICT of
/// the name-keyed font. Glyph 3 uses font DICT 1, which has a default width
/// of 250 and no local subroutines.
pub fn cid_cff_spec() -> CffSpec {
    let base = cff_spec();
    CffSpec {
        name: "TestCID".into(),
        strings: vec!["Adobe".into(), "Identity".into()],
        font_dicts: vec![
            base.private.clone(),
            PrivateSpec {
                default_width_x: 250,
                nominal_width_x: 300,
                ..Default::default()
            },
        ],
        fd_ranges: vec![(0, 0), (3, 1), (4, 0)],
        ..base
    }
}

/// A builder for an OpenType font with CFF outlines using `spec`.
pub fn cff_builder(spec: &CffSpec) -> SfntBuilder {
    let long_metrics: Vec<(u16, i16)> = info::CFF_ADVANCES.iter().map(|adv| (*adv, 0)).collect();
    let glyph_count = spec.charstrings.len() as u16;
    let mut builder = SfntBuilder::new(CFF_SFNT_VERSION);
    builder
        .add_table(
            Tag::new(b"head"),
            tables::head(&tables::Head {
                units_per_em: info::UNITS_PER_EM,
                bbox: bbox(-10, -200, 1100, 900),
                ..Default::default()
            }),
        )
        .add_table(Tag::new(b"maxp"), tables::maxp_v05(glyph_count))
        .add_table(Tag::new(b"hmtx"), tables::hvmtx(&long_metrics, &[]))
        .add_table(
            Tag::new(b"cmap"),
            tables::cmap(&[(3, 1, tables::cmap_format4(&[(0x41, 2), (0x42, 1)]))]),
        )
        .add_table(Tag::new(b"CFF "), spec.build());
    common_tables(&mut builder, long_metrics.len() as u16);
    builder
}

/// The CFF test font.
pub fn simple_cff() -> Vec<u8> {
    cff_builder(&cff_spec()).build()
}

/// The CID-keyed CFF test font.
pub fn cid_cff() -> Vec<u8> {
    cff_builder(&cid_cff_spec()).build()
}
