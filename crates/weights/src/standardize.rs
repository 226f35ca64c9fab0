//! Weight standardization.

use tracing::debug;

use crate::concept::{GlobalDivisor, Standardization};
use crate::matrix::WeightMatrix;

/// Rewrites the weights of `matrix` in place.
///
/// `observed_sum` is the sum of the observed attribute over all loaded
/// points, used when `divisor` is [`GlobalDivisor::ObservedSum`]. A zero row
/// sum or zero global divisor turns the affected weights into `0.0`.
pub fn standardize(
    matrix: &mut WeightMatrix,
    mode: Standardization,
    divisor: GlobalDivisor,
    observed_sum: f64,
) {
    match mode {
        Standardization::None => {}
        Standardization::Row => {
            for row in matrix.rows_mut() {
                let sum: f64 = row.values().sum();
                for w in row.values_mut() {
                    *w = safe_div(*w, sum);
                }
            }
        }
        Standardization::Global => {
            let total = match divisor {
                GlobalDivisor::ObservedSum => observed_sum,
                GlobalDivisor::WeightSum => matrix.total_weight(),
            };
            debug!(divisor = divisor.name(), total, "global standardization");
            for row in matrix.rows_mut() {
                for w in row.values_mut() {
                    *w = safe_div(*w, total);
                }
            }
        }
    }
}

fn safe_div(w: f64, d: f64) -> f64 {
    if d == 0.0 { 0.0 } else { w / d }
}
