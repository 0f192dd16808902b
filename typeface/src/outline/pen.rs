//! Types for collecting the output when drawing a glyph outline.

use typeface_types::Point;

use crate::geometry::{FillRule, PathFigure, PathGeometry, PathSegment};

/// Interface for accepting a sequence of path commands.
///
/// Coordinates are in font design units with y pointing up.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Single element of a path.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub enum PathElement {
    /// Begin a new subpath at (x, y).
    MoveTo { x: f64, y: f64 },
    /// Draw a line from the current point to (x, y).
    LineTo { x: f64, y: f64 },
    /// Draw a quadratic bezier from the current point with a control point at
    /// (cx0, cy0) and ending at (x, y).
    QuadTo { cx0: f64, cy0: f64, x: f64, y: f64 },
    /// Draw a cubic bezier from the current point with control points at
    /// (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    CurveTo {
        cx0: f64,
        cy0: f64,
        cx1: f64,
        cy1: f64,
        x: f64,
        y: f64,
    },
    /// Close the current subpath.
    Close,
}

impl OutlinePen for Vec<PathElement> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(PathElement::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(PathElement::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        self.push(PathElement::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.push(PathElement::CurveTo {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close(&mut self) {
        self.push(PathElement::Close)
    }
}

/// Pen that builds a [`PathGeometry`].
///
/// Incoming coordinates are multiplied by `scale` and the y axis is flipped
/// so that the resulting geometry is y-down. Every subpath becomes a
/// [`PathFigure`]; a subpath that is not explicitly closed is left open.
#[derive(Clone, Debug)]
pub struct GeometryPen {
    scale: f64,
    geometry: PathGeometry,
    figure: Option<PathFigure>,
}

impl GeometryPen {
    pub fn new(scale: f64, fill_rule: FillRule) -> Self {
        Self {
            scale,
            geometry: PathGeometry::new(fill_rule),
            figure: None,
        }
    }

    /// Finishes any pending figure and returns the geometry.
    pub fn finish(mut self) -> PathGeometry {
        self.flush();
        self.geometry
    }

    fn point(&self, x: f64, y: f64) -> Point<f64> {
        Point::new(x * self.scale, -y * self.scale)
    }

    fn flush(&mut self) {
        if let Some(figure) = self.figure.take() {
            self.geometry.figures.push(figure);
        }
    }

    fn push(&mut self, segment: PathSegment) {
        match self.figure.as_mut() {
            Some(figure) => figure.segments.push(segment),
            None => {
                // no move_to yet; start at the origin
                let mut figure = PathFigure::new(Point::default());
                figure.segments.push(segment);
                self.figure = Some(figure);
            }
        }
    }
}

impl OutlinePen for GeometryPen {
    fn move_to(&mut self, x: f64, y: f64) {
        self.flush();
        self.figure = Some(PathFigure::new(self.point(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let segment = PathSegment::line(self.point(x, y));
        self.push(segment);
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        let segment = PathSegment::quadratic(self.point(cx0, cy0), self.point(x, y));
        self.push(segment);
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let segment = PathSegment::cubic(
            self.point(cx0, cy0),
            self.point(cx1, cy1),
            self.point(x, y),
        );
        self.push(segment);
    }

    fn close(&mut self) {
        if let Some(mut figure) = self.figure.take() {
            figure.is_closed = true;
            self.geometry.figures.push(figure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scales_and_flips() {
        let mut pen = GeometryPen::new(0.5, FillRule::Nonzero);
        pen.move_to(10.0, 20.0);
        pen.line_to(30.0, 0.0);
        pen.quad_to(40.0, 10.0, 50.0, -20.0);
        pen.curve_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        pen.close();
        let geometry = pen.finish();
        assert_eq!(geometry.fill_rule, FillRule::Nonzero);
        assert_eq!(
            geometry.to_string(),
            "M5,-10L15,0Q20,-5 25,10C0.5,-1 1.5,-2 2.5,-3z "
        );
    }

    #[test]
    fn open_and_closed_figures() {
        let mut pen = GeometryPen::new(1.0, FillRule::EvenOdd);
        pen.move_to(0.0, 0.0);
        pen.line_to(1.0, 0.0);
        // implicitly ends the first figure without closing it
        pen.move_to(5.0, 5.0);
        pen.line_to(6.0, 5.0);
        pen.close();
        // close without a current figure is ignored
        pen.close();
        pen.move_to(9.0, 9.0);
        let geometry = pen.finish();
        assert_eq!(geometry.figures.len(), 3);
        assert!(!geometry.figures[0].is_closed);
        assert!(geometry.figures[1].is_closed);
        assert!(geometry.figures[2].segments.is_empty());
        assert_eq!(geometry.to_string(), "M0,0L1,0 M5,-5L6,-5z M9,-9 ");
    }

    #[test]
    fn path_elements() {
        let mut path = Vec::new();
        path.move_to(1.0, 2.0);
        path.quad_to(3.0, 4.0, 5.0, 6.0);
        path.close();
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 1.0, y: 2.0 },
                PathElement::QuadTo {
                    cx0: 3.0,
                    cy0: 4.0,
                    x: 5.0,
                    y: 6.0
                },
                PathElement::Close,
            ]
        );
    }
}
