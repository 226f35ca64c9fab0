//! Axis-aligned bounding envelopes.

use geo::{Coord, Rect};

use crate::distance::DistanceMethod;

/// Axis-aligned bounding box in planar coordinates.
///
/// A point is represented as a degenerate envelope whose minimum and maximum
/// coincide. Envelopes are closed: touching boundaries intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Envelope {
    /// Creates an envelope spanning two corners given in any order.
    pub fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Creates the degenerate envelope of a single point.
    pub fn from_point(p: Coord<f64>) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Creates the square envelope of side `2 * radius` centred on `center`.
    pub fn around(center: Coord<f64>, radius: f64) -> Self {
        Self::from_point(center).expanded_by(radius)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area of the envelope; zero for points and axis-parallel segments.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Centre coordinate.
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns true if every bound is finite.
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Smallest envelope containing both `self` and `other`.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows this envelope in place to contain `other`.
    pub fn expand_to_include(&mut self, other: &Envelope) {
        *self = self.union(other);
    }

    /// Returns a copy grown by `delta` on every side.
    pub fn expanded_by(&self, delta: f64) -> Envelope {
        Envelope {
            min_x: self.min_x - delta,
            min_y: self.min_y - delta,
            max_x: self.max_x + delta,
            max_y: self.max_y + delta,
        }
    }

    /// Returns true if the two closed envelopes share at least one point.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns true if `p` lies inside or on the boundary.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Per-axis separation `(dx, dy)` between two envelopes, zero on an axis
    /// where they overlap.
    pub fn gaps(&self, other: &Envelope) -> (f64, f64) {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        (dx, dy)
    }

    /// Minimum Euclidean distance between the two envelopes (0 if they
    /// intersect).
    pub fn distance(&self, other: &Envelope) -> f64 {
        self.distance_with(other, DistanceMethod::Euclidean)
    }

    /// Minimum distance between the two envelopes under `method`.
    pub fn distance_with(&self, other: &Envelope, method: DistanceMethod) -> f64 {
        let (dx, dy) = self.gaps(other);
        method.from_gaps(dx, dy)
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(rect: Rect<f64>) -> Self {
        Envelope::new(rect.min(), rect.max())
    }
}

impl From<Coord<f64>> for Envelope {
    fn from(p: Coord<f64>) -> Self {
        Envelope::from_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_new_normalises_corners() {
        let e = Envelope::new(c(3.0, -1.0), c(1.0, 2.0));
        assert_eq!(e.min_x(), 1.0);
        assert_eq!(e.min_y(), -1.0);
        assert_eq!(e.max_x(), 3.0);
        assert_eq!(e.max_y(), 2.0);
        assert_abs_diff_eq!(e.area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_envelope_has_zero_area() {
        let e = Envelope::from_point(c(4.0, 5.0));
        assert_eq!(e.area(), 0.0);
        assert!(e.contains(c(4.0, 5.0)));
        assert_eq!(e.center(), c(4.0, 5.0));
    }

    #[test]
    fn test_union_and_expand() {
        let mut a = Envelope::from_point(c(0.0, 0.0));
        a.expand_to_include(&Envelope::from_point(c(2.0, 3.0)));
        assert_eq!(a, Envelope::new(c(0.0, 0.0), c(2.0, 3.0)));
    }

    #[test]
    fn test_touching_envelopes_intersect() {
        let a = Envelope::new(c(0.0, 0.0), c(1.0, 1.0));
        let b = Envelope::new(c(1.0, 1.0), c(2.0, 2.0));
        assert!(a.intersects(&b));
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn test_disjoint_distance() {
        let a = Envelope::new(c(0.0, 0.0), c(1.0, 1.0));
        let b = Envelope::new(c(4.0, 5.0), c(6.0, 6.0));
        assert!(!a.intersects(&b));
        assert_eq!(a.gaps(&b), (3.0, 4.0));
        assert_abs_diff_eq!(a.distance(&b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            a.distance_with(&b, DistanceMethod::Manhattan),
            7.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_gaps_symmetric() {
        let a = Envelope::new(c(0.0, 0.0), c(1.0, 1.0));
        let b = Envelope::new(c(-5.0, 0.5), c(-3.0, 0.7));
        assert_eq!(a.gaps(&b), b.gaps(&a));
        assert_eq!(a.gaps(&b), (3.0, 0.0));
    }

    #[test]
    fn test_around() {
        let e = Envelope::around(c(1.0, 1.0), 2.0);
        assert_eq!(e, Envelope::new(c(-1.0, -1.0), c(3.0, 3.0)));
    }

    #[test]
    fn test_from_rect() {
        let r = Rect::new(c(2.0, 2.0), c(0.0, 1.0));
        let e = Envelope::from(r);
        assert_eq!(e, Envelope::new(c(0.0, 1.0), c(2.0, 2.0)));
    }

    #[test]
    fn test_is_finite() {
        assert!(Envelope::from_point(c(0.0, 0.0)).is_finite());
        assert!(!Envelope::from_point(c(f64::NAN, 0.0)).is_finite());
    }
}
