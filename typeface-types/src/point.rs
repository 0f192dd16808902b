/// A coordinate pair.
///
/// Used for outline coordinates in font units, for charstring points in
/// [`Fixed`](crate::Fixed) and for scaled path geometry in `f64`.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixed;

    #[test]
    fn default_is_origin() {
        assert_eq!(Point::<f64>::default(), Point::new(0.0, 0.0));
        assert_eq!(Point::<Fixed>::default(), Point::new(Fixed::ZERO, Fixed::ZERO));
    }
}
