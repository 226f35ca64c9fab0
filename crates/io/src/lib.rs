//! # sweights-io
//!
//! Text persistence for spatial weight matrices. The format is a header line
//! followed by a body whose layout depends on the matrix kind:
//!
//! ```text
//! 0 <feature_count> <type_name> <unique_field_name>
//! <primary> <secondary>         <value>        (distance)
//! <primary> <count>                             (contiguity, two lines
//! <neighbor> <neighbor> ...                      per primary)
//! ```

mod error;
mod reader;
mod writer;

pub use error::WeightsIoError;
pub use reader::{read_weights, read_weights_from};
pub use writer::{VALUE_SEPARATOR, WriterConfig, write_weights, write_weights_to};
