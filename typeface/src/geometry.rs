//! Resolution independent path geometry.
//!
//! Outlines are emitted as a [`PathGeometry`]: a list of figures, each with a
//! start point and a sequence of line and Bezier segments. Coordinates are in
//! a y-down space, scaled to the caller's chosen em size.
//!
//! The [`Display`](fmt::Display) implementations produce a compact SVG-like
//! serialization that is stable across platforms and is used to compare
//! geometry in tests.

use std::fmt;

use typeface_types::Point;

/// Number of digits printed after the decimal point when serializing.
const PRECISION: usize = 4;

/// Rule for determining the interior of overlapping figures.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    EvenOdd,
    #[default]
    Nonzero,
}

/// Single segment of a [`PathFigure`].
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// A straight line from the current point.
    Line { point: Point<f64>, is_stroked: bool },
    /// A quadratic Bezier curve from the current point.
    QuadraticBezier {
        control: Point<f64>,
        end: Point<f64>,
        is_stroked: bool,
    },
    /// A cubic Bezier curve from the current point.
    CubicBezier {
        control1: Point<f64>,
        control2: Point<f64>,
        end: Point<f64>,
        is_stroked: bool,
    },
}

impl PathSegment {
    pub fn line(point: Point<f64>) -> Self {
        Self::Line {
            point,
            is_stroked: true,
        }
    }

    pub fn quadratic(control: Point<f64>, end: Point<f64>) -> Self {
        Self::QuadraticBezier {
            control,
            end,
            is_stroked: true,
        }
    }

    pub fn cubic(control1: Point<f64>, control2: Point<f64>, end: Point<f64>) -> Self {
        Self::CubicBezier {
            control1,
            control2,
            end,
            is_stroked: true,
        }
    }

    /// The point where the segment ends.
    pub fn end_point(&self) -> Point<f64> {
        match self {
            Self::Line { point, .. } => *point,
            Self::QuadraticBezier { end, .. } | Self::CubicBezier { end, .. } => *end,
        }
    }

    pub fn is_stroked(&self) -> bool {
        match self {
            Self::Line { is_stroked, .. }
            | Self::QuadraticBezier { is_stroked, .. }
            | Self::CubicBezier { is_stroked, .. } => *is_stroked,
        }
    }
}

/// A connected sequence of segments.
///
/// A closed figure implicitly ends with a line back to `start_point`.
#[derive(Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathFigure {
    pub start_point: Point<f64>,
    pub is_closed: bool,
    pub segments: Vec<PathSegment>,
}

impl PathFigure {
    pub fn new(start_point: Point<f64>) -> Self {
        Self {
            start_point,
            is_closed: false,
            segments: Vec::new(),
        }
    }
}

/// An outline made of zero or more figures.
#[derive(Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGeometry {
    pub fill_rule: FillRule,
    pub figures: Vec<PathFigure>,
}

impl PathGeometry {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            fill_rule,
            figures: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

/// Formats a coordinate with fixed precision, trimming trailing zeros and
/// never printing negative zero.
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.*}", PRECISION, self.0);
        let text = if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.')
        } else {
            text.as_str()
        };
        if text == "-0" {
            f.write_str("0")
        } else {
            f.write_str(text)
        }
    }
}

struct XY(Point<f64>);

impl fmt::Display for XY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", Coord(self.0.x), Coord(self.0.y))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line { point, .. } => write!(f, "L{}", XY(*point)),
            Self::QuadraticBezier { control, end, .. } => {
                write!(f, "Q{} {}", XY(*control), XY(*end))
            }
            Self::CubicBezier {
                control1,
                control2,
                end,
                ..
            } => write!(f, "C{} {} {}", XY(*control1), XY(*control2), XY(*end)),
        }
    }
}

impl fmt::Display for PathFigure {
    /// Writes `M` followed by the start point and the segments, then `z` if
    /// the figure is closed, then a single space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", XY(self.start_point))?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        if self.is_closed {
            f.write_str("z")?;
        }
        f.write_str(" ")
    }
}

impl fmt::Display for PathGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for figure in &self.figures {
            write!(f, "{figure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pt(x: f64, y: f64) -> Point<f64> {
        Point::new(x, y)
    }

    #[test]
    fn serialize_figure() {
        let figure = PathFigure {
            start_point: pt(1.2, 2.3),
            is_closed: true,
            segments: vec![
                PathSegment::cubic(pt(1.2, 2.3), pt(3.4, 4.5), pt(5.6, 6.7)),
                PathSegment::quadratic(pt(1.2, 2.3), pt(3.4, 4.5)),
                PathSegment::line(pt(1.2, 2.3)),
            ],
        };
        assert_eq!(
            figure.to_string(),
            "M1.2,2.3C1.2,2.3 3.4,4.5 5.6,6.7Q1.2,2.3 3.4,4.5L1.2,2.3z "
        );
    }

    #[test]
    fn serialize_geometry() {
        let mut geometry = PathGeometry::new(FillRule::Nonzero);
        assert!(geometry.is_empty());
        assert_eq!(geometry.to_string(), "");
        geometry.figures.push(PathFigure {
            start_point: pt(0.0, 0.0),
            is_closed: true,
            segments: vec![PathSegment::line(pt(10.0, 0.0))],
        });
        geometry.figures.push(PathFigure {
            start_point: pt(5.0, 5.0),
            is_closed: false,
            segments: vec![PathSegment::line(pt(6.0, 5.0))],
        });
        assert_eq!(geometry.to_string(), "M0,0L10,0z M5,5L6,5 ");
    }

    #[test]
    fn coordinate_formatting() {
        let cases = [
            (0.0, "0"),
            (-0.0, "0"),
            (-0.00001, "0"),
            (1.0, "1"),
            (-2.5, "-2.5"),
            (0.123456, "0.1235"),
            (1234.5, "1234.5"),
            (100.0, "100"),
            (1.0 / 3.0, "0.3333"),
        ];
        for (value, expected) in cases {
            assert_eq!(Coord(value).to_string(), expected, "{value}");
        }
    }

    #[test]
    fn segment_accessors() {
        let segment = PathSegment::quadratic(pt(1.0, 2.0), pt(3.0, 4.0));
        assert_eq!(segment.end_point(), pt(3.0, 4.0));
        assert!(segment.is_stroked());
        let hidden = PathSegment::Line {
            point: pt(0.0, 0.0),
            is_stroked: false,
        };
        assert!(!hidden.is_stroked());
    }
}
