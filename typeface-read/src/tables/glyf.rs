//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use std::ops::BitOr;

use types::{BoundingBox, F2Dot14, GlyphId, Tag};

use crate::{Cursor, FontData, FontRead, ReadError};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table.
///
/// Individual glyphs are located through the [`Loca`](super::loca::Loca) table.
#[derive(Clone, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    pub fn data(&self) -> FontData<'a> {
        self.data
    }
}

/// Flags used in [`SimpleGlyph`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    /// Bit 0: If set, the point is on the curve; otherwise, it is off the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);
    /// Bit 1: If set, the corresponding x-coordinate is 1 byte long, and the
    /// sign is determined by [`Self::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR`].
    pub const X_SHORT_VECTOR: Self = Self(0x02);
    /// Bit 2: If set, the corresponding y-coordinate is 1 byte long.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);
    /// Bit 3: If set, the next byte specifies the number of additional times
    /// this flag byte is to be repeated.
    pub const REPEAT_FLAG: Self = Self(0x08);
    /// Bit 4: the sign of a short x-coordinate, or "unchanged" for a long one.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);
    /// Bit 5: the sign of a short y-coordinate, or "unchanged" for a long one.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);
    /// Bit 6: contours in the glyph description may overlap.
    pub const OVERLAP_SIMPLE: Self = Self(0x40);

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Flags used in [`Component`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    /// Bit 0: If this is set, the arguments are 16-bit (uint16 or int16);
    /// otherwise, they are bytes (uint8 or int8).
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    /// Bit 1: If this is set, the arguments are signed xy values; otherwise,
    /// they are unsigned point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    /// Bit 2: round the xy values to the grid.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    /// Bit 3: This indicates that there is a simple scale for the component.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    /// Bit 5: Indicates at least one more glyph after this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    /// Bit 6: The x direction will use a different scale from the y direction.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    /// Bit 7: There is a 2 by 2 transformation that will be used to scale the
    /// component.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    /// Bit 8: Following the last component are instructions for the composite
    /// character.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    /// Bit 9: use this component's metrics for the composite glyph.
    pub const USE_MY_METRICS: Self = Self(0x0200);
    /// Bit 10: the components of the compound glyph overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);
    /// Bit 11: The composite is designed to have the component offset scaled.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);
    /// Bit 12: The composite is designed not to have the component offset
    /// scaled.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x1FFF)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CompositeGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A glyph record from the `glyf` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Glyph<'a> {
    /// A glyph with no outline data, such as a space.
    Empty,
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(Glyph::Empty);
        }
        let mut cursor = data.cursor();
        let number_of_contours = cursor.read_i16()?;
        let bbox = BoundingBox {
            x_min: cursor.read_i16()?,
            y_min: cursor.read_i16()?,
            x_max: cursor.read_i16()?,
            y_max: cursor.read_i16()?,
        };
        match number_of_contours {
            0 => Ok(Glyph::Empty),
            n if n > 0 => SimpleGlyph::read_body(cursor, n as usize, bbox).map(Glyph::Simple),
            _ => CompositeGlyph::read_body(cursor, bbox).map(Glyph::Composite),
        }
    }
}

impl Glyph<'_> {
    /// The bounding box from the glyph header.
    pub fn bbox(&self) -> Option<BoundingBox<i16>> {
        match self {
            Glyph::Empty => None,
            Glyph::Simple(glyph) => Some(glyph.bbox),
            Glyph::Composite(glyph) => Some(glyph.bbox),
        }
    }
}

/// A point in a simple glyph, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// X cooordinate.
    pub x: i16,
    /// Y cooordinate.
    pub y: i16,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i16, y: i16, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, false)
    }
}

/// A glyph made of one or more contours of quadratic curves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleGlyph<'a> {
    pub bbox: BoundingBox<i16>,
    /// The index of the last point of each contour.
    pub end_pts_of_contours: Vec<u16>,
    /// TrueType hinting instructions; stored but never executed.
    pub instructions: &'a [u8],
    /// Absolute point coordinates.
    pub points: Vec<CurvePoint>,
    /// True if the first flag has [`SimpleGlyphFlags::OVERLAP_SIMPLE`] set.
    pub has_overlapping_contours: bool,
}

impl<'a> SimpleGlyph<'a> {
    fn read_body(
        mut cursor: Cursor<'a>,
        number_of_contours: usize,
        bbox: BoundingBox<i16>,
    ) -> Result<Self, ReadError> {
        let end_pts_of_contours = (0..number_of_contours)
            .map(|_| cursor.read_u16())
            .collect::<Result<Vec<_>, _>>()?;
        if end_pts_of_contours.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ReadError::MalformedData(
                "contour end points are not increasing",
            ));
        }
        let num_points = end_pts_of_contours
            .last()
            .map(|last| *last as usize + 1)
            .unwrap_or(0);
        let instruction_length = cursor.read_u16()? as usize;
        let instructions = cursor.read_bytes(instruction_length)?;

        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag = SimpleGlyphFlags::from_bits_truncate(cursor.read_u8()?);
            let repeats = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                cursor.read_u8()? as usize + 1
            } else {
                1
            };
            if flags.len() + repeats > num_points {
                return Err(ReadError::MalformedData("flag run exceeds point count"));
            }
            flags.extend(std::iter::repeat(flag).take(repeats));
        }

        let mut points = flags
            .iter()
            .map(|flag| CurvePoint::new(0, 0, flag.contains(SimpleGlyphFlags::ON_CURVE_POINT)))
            .collect::<Vec<_>>();
        let mut x = 0i16;
        for (point, flag) in points.iter_mut().zip(&flags) {
            x = x.wrapping_add(read_delta(
                &mut cursor,
                *flag,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            )?);
            point.x = x;
        }
        let mut y = 0i16;
        for (point, flag) in points.iter_mut().zip(&flags) {
            y = y.wrapping_add(read_delta(
                &mut cursor,
                *flag,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            )?);
            point.y = y;
        }
        let has_overlapping_contours = flags
            .first()
            .map(|flag| flag.contains(SimpleGlyphFlags::OVERLAP_SIMPLE))
            .unwrap_or(false);
        Ok(SimpleGlyph {
            bbox,
            end_pts_of_contours,
            instructions,
            points,
            has_overlapping_contours,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns an iterator over the points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[CurvePoint]> + '_ {
        let mut start = 0;
        self.end_pts_of_contours.iter().map(move |end| {
            let end = (*end as usize + 1).min(self.points.len());
            let contour = self.points.get(start..end).unwrap_or_default();
            start = end;
            contour
        })
    }
}

fn read_delta(
    cursor: &mut Cursor,
    flag: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<i16, ReadError> {
    Ok(match (flag.contains(short), flag.contains(same_or_positive)) {
        (true, true) => cursor.read_u8()? as i16,
        (true, false) => -(cursor.read_u8()? as i16),
        (false, true) => 0,
        (false, false) => cursor.read_i16()?,
    })
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Anchor position for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    Offset { x: i16, y: i16 },
    /// Align the point numbered `component` in the child with the point
    /// numbered `base` in the parent.
    Point { base: u16, component: u16 },
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// A glyph built from transformed references to other glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeGlyph<'a> {
    pub bbox: BoundingBox<i16>,
    pub components: Vec<Component>,
    /// TrueType hinting instructions; stored but never executed.
    pub instructions: &'a [u8],
}

impl<'a> CompositeGlyph<'a> {
    fn read_body(mut cursor: Cursor<'a>, bbox: BoundingBox<i16>) -> Result<Self, ReadError> {
        let mut components = Vec::new();
        let mut flags = CompositeGlyphFlags::MORE_COMPONENTS;
        while flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            flags = CompositeGlyphFlags::from_bits_truncate(cursor.read_u16()?);
            let glyph = GlyphId::new(cursor.read_u16()?);
            let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
            let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
            let anchor = match (args_are_xy_values, args_are_words) {
                (true, true) => Anchor::Offset {
                    x: cursor.read()?,
                    y: cursor.read()?,
                },
                (true, false) => Anchor::Offset {
                    x: cursor.read::<i8>()? as _,
                    y: cursor.read::<i8>()? as _,
                },
                (false, true) => Anchor::Point {
                    base: cursor.read()?,
                    component: cursor.read()?,
                },
                (false, false) => Anchor::Point {
                    base: cursor.read::<u8>()? as _,
                    component: cursor.read::<u8>()? as _,
                },
            };
            let mut transform = Transform::default();
            if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
                transform.xx = cursor.read_f2dot14()?;
                transform.yy = transform.xx;
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
                transform.xx = cursor.read_f2dot14()?;
                transform.yy = cursor.read_f2dot14()?;
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
                transform.xx = cursor.read_f2dot14()?;
                transform.yx = cursor.read_f2dot14()?;
                transform.xy = cursor.read_f2dot14()?;
                transform.yy = cursor.read_f2dot14()?;
            }
            components.push(Component {
                flags,
                glyph,
                anchor,
                transform,
            });
        }
        let instructions = if flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS) {
            let len = cursor.read_u16()? as usize;
            cursor.read_bytes(len)?
        } else {
            &[]
        };
        Ok(CompositeGlyph {
            bbox,
            components,
            instructions,
        })
    }
}
