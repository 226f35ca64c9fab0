//! Planar distance, angle and envelope primitives.
//!
//! Everything in the spatial weights workspace measures separation between
//! centroids through this crate, so the numerical policy lives in one place:
//!
//! | Concern | Function |
//! |---------|----------|
//! | Straight-line distance | [`euclidean`] |
//! | City-block distance | [`manhattan`] |
//! | Direction between points | [`angle`] |
//! | Decimal rounding | [`round_to`] |
//! | Tolerant comparison | [`approx_eq`] |
//!
//! [`Envelope`] is the axis-aligned bounding box used by the spatial index
//! for range queries and for branch-and-bound lower bounds.

mod distance;
mod envelope;
mod numeric;

pub use distance::{DistanceMethod, angle, euclidean, manhattan};
pub use envelope::Envelope;
pub use geo::Coord;
pub use numeric::{DEFAULT_TOLERANCE, approx_eq, round_to};
