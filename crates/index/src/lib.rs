//! Static spatial index with exact k-nearest-neighbor search.
//!
//! [`SpatialIndex`] is an R-tree bulk-loaded bottom-up with the
//! Sort-Tile-Recursive algorithm. It answers two kinds of query:
//!
//! | Query | Method | Result |
//! |-------|--------|--------|
//! | Envelope range | [`SpatialIndex::range_query`] | items whose envelope intersects |
//! | k nearest | [`SpatialIndex::k_nearest`] | exact top-k under a pluggable metric |
//!
//! # Quick start
//!
//! ```
//! use sweights_geometry::{Coord, DistanceMethod, Envelope};
//! use sweights_index::{KnnQuery, PointDistance, SpatialIndex};
//!
//! let coords = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }, Coord { x: 5.0, y: 0.0 }];
//! let index = SpatialIndex::from_points(coords.iter().map(|&c| (c, c))).unwrap();
//!
//! let metric = PointDistance::new(DistanceMethod::Euclidean, |c: &Coord<f64>| *c);
//! let query = Coord { x: 4.0, y: 0.0 };
//! let result = index
//!     .k_nearest(&query, &Envelope::from_point(query), &metric, &KnnQuery::new(2))
//!     .unwrap();
//! assert_eq!(result.items().copied().collect::<Vec<_>>(), vec![coords[2], coords[1]]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! SpatialIndex::build()   (tree.rs)   STR packing, arena of nodes
//! SpatialIndex::range_query()          stack walk, envelope filter
//! SpatialIndex::k_nearest()  (knn.rs)  best-first boundable pairs
//! ```

pub mod config;
pub mod error;
pub mod knn;
pub mod result;

mod tree;

pub use config::{DEFAULT_NODE_CAPACITY, IndexConfig, KnnQuery};
pub use error::IndexError;
pub use knn::{ItemDistance, PointDistance};
pub use result::{KnnResult, Neighbor};
pub use tree::SpatialIndex;
