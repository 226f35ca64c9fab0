//! Weights text writer configuration and orchestration.

use std::io::{BufWriter, Write};
use std::path::Path;

use sweights_weights::{FeatureId, MatrixKind, WeightMatrix};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::WeightsIoError;

/// Separator between the secondary id and the value on a distance line.
pub const VALUE_SEPARATOR: &str = "         ";

/// Largest accepted fixed precision; `f64` has at most 17 significant
/// decimal digits.
const MAX_PRECISION: usize = 17;

/// Configuration for writing a weight matrix as text.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Fixed number of decimals for distance values; `None` writes the
    /// shortest text that reads back to the same `f64`.
    precision: Option<usize>,
    /// Write neighbors in id order instead of hash order.
    unsorted: bool,
}

impl WriterConfig {
    /// Creates the default configuration: shortest round-trip values,
    /// neighbors sorted by id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixed number of decimals for distance values.
    pub fn with_precision(mut self, decimals: usize) -> Self {
        self.precision = Some(decimals);
        self
    }

    /// Whether neighbors are sorted by id within each row.
    pub fn with_sorted_neighbors(mut self, sorted: bool) -> Self {
        self.unsorted = !sorted;
        self
    }

    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    pub fn sorted_neighbors(&self) -> bool {
        !self.unsorted
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WeightsIoError::Validation`] if the precision exceeds 17.
    pub fn validate(&self) -> Result<(), WeightsIoError> {
        match self.precision {
            Some(p) if p > MAX_PRECISION => Err(WeightsIoError::Validation {
                count: 1,
                details: format!("precision must be <= {MAX_PRECISION}, got {p}"),
            }),
            _ => Ok(()),
        }
    }

    fn format_value(&self, v: f64) -> String {
        match self.precision {
            Some(p) => format!("{v:.p$}"),
            None => v.to_string(),
        }
    }
}

fn check_token(what: &'static str, value: &str) -> Result<(), WeightsIoError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(WeightsIoError::InvalidToken {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_id(id: &FeatureId) -> Result<(), WeightsIoError> {
    match id {
        FeatureId::Int(_) => Ok(()),
        FeatureId::Text(s) => check_token("feature id", s),
    }
}

/// Writes `matrix` as weights text to any writer.
///
/// The header is `0 <feature_count> <type_name> <unique_field_name>`. The
/// body depends on [`WeightMatrix::kind`]:
///
/// ```text
/// distance:    <primary> <secondary>         <value>     one line per pair
/// contiguity:  <primary> <count>                          then
///              <neighbor> <neighbor> ...                  (empty if none)
/// ```
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`WeightsIoError::InvalidToken`] if an id or header field contains
/// whitespace, or [`WeightsIoError::Io`] if writing fails.
pub fn write_weights_to<W: Write>(
    out: &mut W,
    matrix: &WeightMatrix,
    config: &WriterConfig,
    path: &Path,
) -> Result<(), WeightsIoError> {
    config.validate()?;
    check_token("type name", matrix.type_name())?;
    check_token("unique field name", matrix.unique_field_name())?;

    let io = |e| WeightsIoError::io(path, e);
    writeln!(
        out,
        "0 {} {} {}",
        matrix.feature_count(),
        matrix.type_name(),
        matrix.unique_field_name()
    )
    .map_err(io)?;

    for primary in matrix.ids() {
        check_id(primary)?;
        let neighbors = if config.sorted_neighbors() {
            matrix.sorted_neighbors(primary)
        } else {
            matrix.neighbors(primary).collect()
        };
        match matrix.kind() {
            MatrixKind::Distance => {
                for (secondary, value) in neighbors {
                    check_id(secondary)?;
                    writeln!(
                        out,
                        "{primary} {secondary}{VALUE_SEPARATOR}{}",
                        config.format_value(value)
                    )
                    .map_err(io)?;
                }
            }
            MatrixKind::Contiguity => {
                writeln!(out, "{primary} {}", neighbors.len()).map_err(io)?;
                let mut line = String::new();
                for (i, (secondary, _)) in neighbors.into_iter().enumerate() {
                    check_id(secondary)?;
                    if i > 0 {
                        line.push(' ');
                    }
                    line.push_str(&secondary.to_string());
                }
                writeln!(out, "{line}").map_err(io)?;
            }
        }
    }
    Ok(())
}

/// Writes `matrix` to `path` as weights text.
///
/// The text goes to a temporary file in the same directory, which replaces
/// `path` only once everything has been written, so a failed write never
/// leaves a truncated file behind.
///
/// # Errors
///
/// Returns [`WeightsIoError::Validation`] for an invalid configuration,
/// [`WeightsIoError::InvalidToken`] for ids that cannot be written, or
/// [`WeightsIoError::Io`] if the file system operation fails.
pub fn write_weights(
    path: &Path,
    matrix: &WeightMatrix,
    config: &WriterConfig,
) -> Result<(), WeightsIoError> {
    config.validate()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| WeightsIoError::io(dir, e))?;
    debug!(tmp = %tmp.path().display(), "writing weights to temporary file");

    {
        let mut out = BufWriter::new(tmp.as_file());
        write_weights_to(&mut out, matrix, config, path)?;
        out.flush().map_err(|e| WeightsIoError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| WeightsIoError::io(path, e.error))?;

    info!(
        path = %path.display(),
        kind = matrix.kind().name(),
        n_features = matrix.feature_count(),
        n_pairs = matrix.pair_count(),
        "weights written"
    );
    Ok(())
}
