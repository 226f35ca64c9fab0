//! Rounding and tolerant comparison.

/// Absolute tolerance used by [`approx_eq`] callers that have no better scale.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Rounds `value` to `decimals` decimal places, half away from zero.
///
/// Non-finite values pass through unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Returns true if `a` and `b` differ by at most `tolerance`.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 0), 1.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.0001, 4), 1.0001);
    }

    #[test]
    fn test_round_non_finite() {
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(round_to(f64::INFINITY, 3), f64::INFINITY);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, DEFAULT_TOLERANCE));
        assert!(!approx_eq(1.0, 1.001, DEFAULT_TOLERANCE));
        assert!(approx_eq(f64::INFINITY, f64::INFINITY, 0.0));
        assert!(!approx_eq(f64::NAN, f64::NAN, 1.0));
    }
}
