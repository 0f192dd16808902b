//! Loading and composition of TrueType outlines.

use std::sync::{Arc, OnceLock};

use typeface_read::{
    tables::{
        glyf::{Anchor, CompositeGlyph, CompositeGlyphFlags, Glyf, Glyph, SimpleGlyph, Transform},
        loca::Loca,
    },
    types::{BoundingBox, GlyphId},
    FontRef, TableProvider,
};

use super::{chain::CompositeChain, pen::OutlinePen};
use crate::Error;

/// Maximum nesting depth of composite glyphs.
pub const COMPOSITE_DEPTH_LIMIT: usize = 64;

/// A point of a resolved outline, in font design units.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct OutlinePoint {
    pub x: f64,
    pub y: f64,
    pub on_curve: bool,
}

impl OutlinePoint {
    fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
            on_curve: true,
        }
    }
}

/// The outline of a glyph with all composite components resolved into
/// a flat list of contours.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct UnscaledOutline {
    pub points: Vec<OutlinePoint>,
    /// Index of the last point of each contour.
    pub contour_ends: Vec<usize>,
}

impl UnscaledOutline {
    fn from_simple(glyph: &SimpleGlyph) -> Self {
        Self {
            points: glyph
                .points
                .iter()
                .map(|point| OutlinePoint {
                    x: point.x as f64,
                    y: point.y as f64,
                    on_curve: point.on_curve,
                })
                .collect(),
            contour_ends: glyph
                .end_pts_of_contours
                .iter()
                .map(|end| *end as usize)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns an iterator over the points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[OutlinePoint]> + '_ {
        let mut start = 0;
        self.contour_ends.iter().map(move |end| {
            let end = (end + 1).min(self.points.len());
            let contour = self.points.get(start..end).unwrap_or_default();
            start = end;
            contour
        })
    }

    /// Emits the outline to `pen` in font design units.
    pub fn draw(&self, pen: &mut impl OutlinePen) {
        for contour in self.contours() {
            draw_contour(contour, pen);
        }
    }
}

/// Converts a single quadratic contour to path commands.
///
/// The contour starts at the last point when it is on-curve, else at the
/// first point when that is on-curve, else at the midpoint of the last and
/// first points. Consecutive off-curve points are separated by an implied
/// on-curve point at their midpoint.
fn draw_contour(points: &[OutlinePoint], pen: &mut impl OutlinePen) {
    let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
        return;
    };
    let (start, rest) = if last.on_curve {
        (last, &points[..points.len() - 1])
    } else if first.on_curve {
        (first, &points[1..])
    } else {
        (last.midpoint(first), points)
    };
    pen.move_to(start.x, start.y);
    let mut pending: Option<OutlinePoint> = None;
    for point in rest {
        match (pending, point.on_curve) {
            (Some(control), true) => {
                pen.quad_to(control.x, control.y, point.x, point.y);
                pending = None;
            }
            (None, true) => pen.line_to(point.x, point.y),
            (Some(control), false) => {
                let mid = control.midpoint(*point);
                pen.quad_to(control.x, control.y, mid.x, mid.y);
                pending = Some(*point);
            }
            (None, false) => pending = Some(*point),
        }
    }
    if let Some(control) = pending {
        pen.quad_to(control.x, control.y, start.x, start.y);
    }
    pen.close();
}

/// Applies the 2x2 component transform to a point.
///
/// `x' = xx * x + xy * y` and `y' = yx * x + yy * y`.
fn apply(transform: &Transform, x: f64, y: f64) -> (f64, f64) {
    let [xx, yx, xy, yy] = [transform.xx, transform.yx, transform.xy, transform.yy]
        .map(|value| value.to_f32() as f64);
    (xx * x + xy * y, yx * x + yy * y)
}

/// TrueType outline source with a write-once cache of resolved outlines.
pub(crate) struct GlyfOutlines<'a> {
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    cache: Vec<OnceLock<Arc<UnscaledOutline>>>,
}

impl<'a> GlyfOutlines<'a> {
    pub fn new(font: &FontRef<'a>, glyph_count: u16) -> Result<Self, Error> {
        Ok(Self {
            loca: font.loca()?,
            glyf: font.glyf()?,
            cache: (0..glyph_count).map(|_| OnceLock::new()).collect(),
        })
    }

    /// Returns the resolved outline for the given glyph.
    pub fn outline(&self, glyph_id: GlyphId) -> Result<Arc<UnscaledOutline>, Error> {
        self.load(glyph_id, &mut CompositeChain::new())
    }

    /// Returns the bounding box stored in the glyph header.
    pub fn header_bounds(&self, glyph_id: GlyphId) -> Result<Option<BoundingBox<i16>>, Error> {
        Ok(self.loca.get_glyf(glyph_id, &self.glyf)?.bbox())
    }

    fn load(
        &self,
        glyph_id: GlyphId,
        chain: &mut CompositeChain,
    ) -> Result<Arc<UnscaledOutline>, Error> {
        let slot = self
            .cache
            .get(glyph_id.to_usize())
            .ok_or(Error::GlyphOutOfRange(glyph_id))?;
        if let Some(outline) = slot.get() {
            return Ok(outline.clone());
        }
        let outline = match self.loca.get_glyf(glyph_id, &self.glyf)? {
            Glyph::Empty => UnscaledOutline::default(),
            Glyph::Simple(simple) => UnscaledOutline::from_simple(&simple),
            Glyph::Composite(composite) => {
                chain.resolve(glyph_id, |chain| self.compose(glyph_id, &composite, chain))?
            }
        };
        log::trace!(
            "cached outline for {glyph_id}: {} points in {} contours",
            outline.points.len(),
            outline.contour_ends.len()
        );
        Ok(slot.get_or_init(|| Arc::new(outline)).clone())
    }

    fn compose(
        &self,
        glyph_id: GlyphId,
        composite: &CompositeGlyph,
        chain: &mut CompositeChain,
    ) -> Result<UnscaledOutline, Error> {
        let mut outline = UnscaledOutline::default();
        for component in &composite.components {
            let child = self.load(component.glyph, chain)?;
            let transform = &component.transform;
            let (dx, dy) = match component.anchor {
                Anchor::Offset { x, y } => {
                    let (x, y) = (x as f64, y as f64);
                    if component
                        .flags
                        .contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET)
                    {
                        apply(transform, x, y)
                    } else {
                        (x, y)
                    }
                }
                Anchor::Point { base, component } => {
                    let base_point = outline
                        .points
                        .get(base as usize)
                        .ok_or(Error::InvalidAnchorPoint(glyph_id, base))?;
                    let child_point = child
                        .points
                        .get(component as usize)
                        .ok_or(Error::InvalidAnchorPoint(glyph_id, component))?;
                    let (x, y) = apply(transform, child_point.x, child_point.y);
                    (base_point.x - x, base_point.y - y)
                }
            };
            let base = outline.points.len();
            outline.points.extend(child.points.iter().map(|point| {
                let (x, y) = apply(transform, point.x, point.y);
                OutlinePoint {
                    x: x + dx,
                    y: y + dy,
                    on_curve: point.on_curve,
                }
            }));
            outline
                .contour_ends
                .extend(child.contour_ends.iter().map(|end| end + base));
        }
        Ok(outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::pen::PathElement;
    use pretty_assertions::assert_eq;
    use typeface_test_data::fonts::{self, info};

    fn outlines(data: &[u8]) -> GlyfOutlines<'_> {
        let font = FontRef::new(data).unwrap();
        GlyfOutlines::new(&font, info::TRUETYPE_GLYPH_COUNT).unwrap()
    }

    fn point(x: f64, y: f64, on_curve: bool) -> OutlinePoint {
        OutlinePoint { x, y, on_curve }
    }

    fn draw(points: &[OutlinePoint]) -> Vec<PathElement> {
        let mut path = Vec::new();
        draw_contour(points, &mut path);
        path
    }

    #[test]
    fn contour_starts_at_last_on_curve() {
        let path = draw(&[
            point(0.0, 0.0, true),
            point(0.0, 10.0, true),
            point(10.0, 10.0, true),
        ]);
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 10.0, y: 10.0 },
                PathElement::LineTo { x: 0.0, y: 0.0 },
                PathElement::LineTo { x: 0.0, y: 10.0 },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn contour_starts_at_first_on_curve() {
        let path = draw(&[
            point(0.0, 0.0, true),
            point(5.0, 10.0, false),
            point(10.0, 0.0, false),
        ]);
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 0.0, y: 0.0 },
                PathElement::QuadTo {
                    cx0: 5.0,
                    cy0: 10.0,
                    x: 7.5,
                    y: 5.0
                },
                PathElement::QuadTo {
                    cx0: 10.0,
                    cy0: 0.0,
                    x: 0.0,
                    y: 0.0
                },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn all_off_curve_contour() {
        let path = draw(&[
            point(0.0, 0.0, false),
            point(0.0, 10.0, false),
            point(10.0, 10.0, false),
            point(10.0, 0.0, false),
        ]);
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 5.0, y: 0.0 },
                PathElement::QuadTo {
                    cx0: 0.0,
                    cy0: 0.0,
                    x: 0.0,
                    y: 5.0
                },
                PathElement::QuadTo {
                    cx0: 0.0,
                    cy0: 10.0,
                    x: 5.0,
                    y: 10.0
                },
                PathElement::QuadTo {
                    cx0: 10.0,
                    cy0: 10.0,
                    x: 10.0,
                    y: 5.0
                },
                PathElement::QuadTo {
                    cx0: 10.0,
                    cy0: 0.0,
                    x: 5.0,
                    y: 0.0
                },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn empty_and_single_point_contours() {
        assert!(draw(&[]).is_empty());
        assert_eq!(
            draw(&[point(3.0, 4.0, true)]),
            vec![PathElement::MoveTo { x: 3.0, y: 4.0 }, PathElement::Close]
        );
    }

    #[test]
    fn simple_glyph() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let outline = outlines.outline(GlyphId::new(info::GID_A)).unwrap();
        assert_eq!(outline.contour_ends, vec![2]);
        assert_eq!(
            outline.points,
            vec![
                point(0.0, 0.0, true),
                point(250.0, 700.0, false),
                point(500.0, 0.0, true),
            ]
        );
    }

    #[test]
    fn empty_glyph() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let outline = outlines.outline(GlyphId::new(info::GID_SPACE)).unwrap();
        assert!(outline.is_empty());
        assert_eq!(outline.contours().count(), 0);
    }

    #[test]
    fn composite_glyph() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let outline = outlines.outline(GlyphId::new(info::GID_COMPOSITE)).unwrap();
        // A followed by .notdef scaled by 0.5 and moved by (600, 100)
        assert_eq!(outline.contour_ends, vec![2, 6]);
        let notdef: Vec<_> = outline.points[3..].iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            notdef,
            vec![(625.0, 100.0), (625.0, 450.0), (825.0, 450.0), (825.0, 100.0)]
        );
    }

    #[test]
    fn composite_is_cached() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let gid = GlyphId::new(info::GID_COMPOSITE);
        let first = outlines.outline(gid).unwrap();
        let second = outlines.outline(gid).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // components were cached along the way
        assert!(outlines.cache[info::GID_A as usize].get().is_some());
        assert!(outlines.cache[info::GID_NOTDEF as usize].get().is_some());
    }

    #[test]
    fn anchored_component() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let outline = outlines.outline(GlyphId::new(info::GID_ANCHORED)).unwrap();
        // point 1 of the parent is A's apex moved by (10, 20): (260, 720)
        // point 0 of .notdef is (50, 0), so .notdef moves by (210, 720)
        assert_eq!(outline.contour_ends, vec![2, 6]);
        assert_eq!((outline.points[3].x, outline.points[3].y), (260.0, 720.0));
        assert_eq!((outline.points[5].x, outline.points[5].y), (660.0, 1420.0));
    }

    #[test]
    fn composite_cycle() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        for gid in [info::GID_CYCLE_A, info::GID_CYCLE_B] {
            let result = outlines.outline(GlyphId::new(gid));
            assert!(
                matches!(result, Err(Error::CompositeCycle(_))),
                "{gid}: {result:?}"
            );
            // failures are not cached
            assert!(outlines.cache[gid as usize].get().is_none());
        }
    }

    #[test]
    fn out_of_range() {
        let data = fonts::simple_truetype();
        let outlines = outlines(&data);
        let gid = GlyphId::new(info::TRUETYPE_GLYPH_COUNT);
        assert_eq!(outlines.outline(gid), Err(Error::GlyphOutOfRange(gid)));
    }

    #[test]
    fn transforms() {
        use typeface_read::types::F2Dot14;
        let transform = Transform {
            xx: F2Dot14::from_f32(0.5),
            yx: F2Dot14::from_f32(0.25),
            xy: F2Dot14::from_f32(-1.0),
            yy: F2Dot14::from_f32(2.0),
        };
        assert_eq!(apply(&transform, 100.0, 10.0), (40.0, 45.0));
        assert_eq!(apply(&Transform::default(), 3.0, -7.0), (3.0, -7.0));
    }
}
