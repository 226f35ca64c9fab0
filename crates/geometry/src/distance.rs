//! Pairwise distance metrics and direction.

use geo::Coord;

/// Metric used to measure separation between two centroids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DistanceMethod {
    /// Straight-line distance `sqrt(dx² + dy²)`.
    #[default]
    Euclidean,
    /// City-block distance `|dx| + |dy|`.
    Manhattan,
}

impl DistanceMethod {
    /// Distance between two coordinates under this metric.
    #[inline]
    pub fn distance(self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        match self {
            Self::Euclidean => euclidean(a, b),
            Self::Manhattan => manhattan(a, b),
        }
    }

    /// Distance implied by per-axis gaps `dx` and `dy` (both non-negative).
    ///
    /// Applied to the gaps between two envelopes this is a lower bound on the
    /// distance between any pair of points drawn from them.
    #[inline]
    pub fn from_gaps(self, dx: f64, dy: f64) -> f64 {
        match self {
            Self::Euclidean => dx.hypot(dy),
            Self::Manhattan => dx + dy,
        }
    }

    /// Short name used in logs and persisted metadata.
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "Euclidean",
            Self::Manhattan => "Manhattan",
        }
    }
}

/// Euclidean distance between two coordinates.
#[inline]
pub fn euclidean(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Manhattan (city-block) distance between two coordinates.
#[inline]
pub fn manhattan(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Direction from `from` to `to` in degrees, counter-clockwise from the
/// positive x axis, normalised to `[0, 360)`.
///
/// Returns 0.0 when the two coordinates coincide.
pub fn angle(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let deg = dy.atan2(dx).to_degrees();
    if deg < 0.0 { deg + 360.0 } else { deg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_euclidean_345() {
        assert_abs_diff_eq!(euclidean(c(0.0, 0.0), c(3.0, 4.0)), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_manhattan() {
        assert_abs_diff_eq!(manhattan(c(1.0, 1.0), c(-2.0, 5.0)), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_method_dispatch() {
        let a = c(0.0, 0.0);
        let b = c(3.0, 4.0);
        assert_abs_diff_eq!(DistanceMethod::Euclidean.distance(a, b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(DistanceMethod::Manhattan.distance(a, b), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_gaps_matches_distance() {
        let a = c(1.0, 2.0);
        let b = c(4.0, 6.0);
        for method in [DistanceMethod::Euclidean, DistanceMethod::Manhattan] {
            assert_abs_diff_eq!(
                method.from_gaps(3.0, 4.0),
                method.distance(a, b),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_default_is_euclidean() {
        assert_eq!(DistanceMethod::default(), DistanceMethod::Euclidean);
    }

    #[test]
    fn test_angle_quadrants() {
        let o = c(0.0, 0.0);
        assert_abs_diff_eq!(angle(o, c(1.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(o, c(0.0, 1.0)), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(o, c(-1.0, 0.0)), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(o, c(0.0, -1.0)), 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(o, c(1.0, 1.0)), 45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_coincident() {
        assert_eq!(angle(c(2.0, 2.0), c(2.0, 2.0)), 0.0);
    }
}
