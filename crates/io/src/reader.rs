//! Weights text reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sweights_weights::{FeatureId, MatrixKind, WeightMatrix};
use tracing::{info, warn};

use crate::error::WeightsIoError;

struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    /// Next line with its one-based number, or `None` at end of input.
    fn next(&mut self, path: &Path) -> Result<Option<(usize, String)>, WeightsIoError> {
        match self.inner.next() {
            None => Ok(None),
            Some(Err(e)) => Err(WeightsIoError::io(path, e)),
            Some(Ok(text)) => {
                self.line += 1;
                Ok(Some((self.line, text)))
            }
        }
    }
}

fn parse_header(line: usize, text: &str) -> Result<(usize, String, String), WeightsIoError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [flag, count, type_name, field] = fields.as_slice() else {
        return Err(WeightsIoError::parse(
            line,
            format!("header needs 4 fields, got {}", fields.len()),
        ));
    };
    if *flag != "0" {
        return Err(WeightsIoError::parse(
            line,
            format!("header must start with 0, got '{flag}'"),
        ));
    }
    let count = count
        .parse::<usize>()
        .map_err(|_| WeightsIoError::parse(line, format!("invalid feature count '{count}'")))?;
    Ok((count, type_name.to_string(), field.to_string()))
}

/// Parses weights text of the given kind from any buffered reader.
///
/// Integer ids read back as [`FeatureId::Int`], anything else as
/// [`FeatureId::Text`]. `path` is only used in error messages.
///
/// A distance file lists only rows with neighbors, so its matrix can have
/// fewer rows than the header count; this is logged, not an error.
///
/// # Errors
///
/// Returns [`WeightsIoError::Parse`] for malformed lines or
/// [`WeightsIoError::Io`] if reading fails.
pub fn read_weights_from<R: BufRead>(
    reader: R,
    kind: MatrixKind,
    path: &Path,
) -> Result<WeightMatrix, WeightsIoError> {
    let mut lines = Lines {
        inner: reader.lines(),
        line: 0,
    };
    let Some((line, header)) = lines.next(path)? else {
        return Err(WeightsIoError::parse(1, "missing header"));
    };
    let (count, type_name, field) = parse_header(line, &header)?;
    let mut matrix = WeightMatrix::new(kind, type_name, field);

    match kind {
        MatrixKind::Distance => {
            while let Some((line, text)) = lines.next(path)? {
                if text.trim().is_empty() {
                    continue;
                }
                let fields: Vec<&str> = text.split_whitespace().collect();
                let [primary, secondary, value] = fields.as_slice() else {
                    return Err(WeightsIoError::parse(
                        line,
                        format!("expected 3 fields, got {}", fields.len()),
                    ));
                };
                let value = value.parse::<f64>().map_err(|_| {
                    WeightsIoError::parse(line, format!("invalid weight '{value}'"))
                })?;
                matrix.visit(FeatureId::parse(primary), FeatureId::parse(secondary), value);
            }
        }
        MatrixKind::Contiguity => {
            while let Some((line, text)) = lines.next(path)? {
                if text.trim().is_empty() {
                    continue;
                }
                let fields: Vec<&str> = text.split_whitespace().collect();
                let [primary, n] = fields.as_slice() else {
                    return Err(WeightsIoError::parse(
                        line,
                        format!("expected '<id> <count>', got {} fields", fields.len()),
                    ));
                };
                let n = n.parse::<usize>().map_err(|_| {
                    WeightsIoError::parse(line, format!("invalid neighbor count '{n}'"))
                })?;
                let primary = FeatureId::parse(primary);
                matrix.add_row(primary.clone());

                let (list_line, list) = lines
                    .next(path)?
                    .ok_or_else(|| WeightsIoError::parse(line + 1, "missing neighbor list"))?;
                let neighbors: Vec<&str> = list.split_whitespace().collect();
                if neighbors.len() != n {
                    return Err(WeightsIoError::parse(
                        list_line,
                        format!("expected {n} neighbors, got {}", neighbors.len()),
                    ));
                }
                for secondary in neighbors {
                    matrix.visit(primary.clone(), FeatureId::parse(secondary), 1.0);
                }
            }
        }
    }

    if matrix.feature_count() != count {
        let partial_distance = kind == MatrixKind::Distance && matrix.feature_count() < count;
        if !partial_distance {
            return Err(WeightsIoError::parse(
                1,
                format!(
                    "header declares {count} features, body has {}",
                    matrix.feature_count()
                ),
            ));
        }
        warn!(
            declared = count,
            rows = matrix.feature_count(),
            "distance file lists fewer rows than declared"
        );
    }
    Ok(matrix)
}

/// Reads a weights file written by [`write_weights`](crate::write_weights).
///
/// # Errors
///
/// Returns [`WeightsIoError::FileNotFound`] if `path` does not exist, and
/// otherwise the errors of [`read_weights_from`].
pub fn read_weights(path: &Path, kind: MatrixKind) -> Result<WeightMatrix, WeightsIoError> {
    if !path.exists() {
        return Err(WeightsIoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| WeightsIoError::io(path, e))?;
    let matrix = read_weights_from(BufReader::new(file), kind, path)?;
    info!(
        path = %path.display(),
        kind = kind.name(),
        n_features = matrix.feature_count(),
        n_pairs = matrix.pair_count(),
        "weights read"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str, kind: MatrixKind) -> Result<WeightMatrix, WeightsIoError> {
        read_weights_from(text.as_bytes(), kind, Path::new("mem"))
    }

    fn id(v: i64) -> FeatureId {
        FeatureId::Int(v)
    }

    #[test]
    fn distance_body() {
        let m = read(
            "0 2 inverse_distance fid\n1 2         1\n2 1         0.5\n",
            MatrixKind::Distance,
        )
        .unwrap();
        assert_eq!(m.type_name(), "inverse_distance");
        assert_eq!(m.unique_field_name(), "fid");
        assert_eq!(m.get_weight(&id(1), &id(2)), 1.0);
        assert_eq!(m.get_weight(&id(2), &id(1)), 0.5);
        assert_eq!(m.kind(), MatrixKind::Distance);
    }

    #[test]
    fn distance_with_fewer_rows_than_declared() {
        let m = read("0 3 t f\n1 2         1\n", MatrixKind::Distance).unwrap();
        assert_eq!(m.feature_count(), 1);
    }

    #[test]
    fn contiguity_body_with_island() {
        let m = read("0 3 rook fid\n1 1\n2\n2 1\n1\n3 0\n\n", MatrixKind::Contiguity).unwrap();
        assert_eq!(m.feature_count(), 3);
        assert!(m.is_neighbor(&id(1), &id(2)));
        assert_eq!(m.neighbor_count(&id(3)), 0);
        let ids: Vec<&FeatureId> = m.ids().collect();
        assert_eq!(ids, vec![&id(1), &id(2), &id(3)]);
    }

    #[test]
    fn text_ids() {
        let m = read("0 1 t name\nnorth south         2\n", MatrixKind::Distance).unwrap();
        assert!(m.is_neighbor(&FeatureId::from("north"), &FeatureId::from("south")));
    }

    #[test]
    fn missing_header() {
        let err = read("", MatrixKind::Distance).unwrap_err();
        assert!(matches!(err, WeightsIoError::Parse { line: 1, .. }));
    }

    #[test]
    fn bad_header_flag() {
        let err = read("1 2 t f\n", MatrixKind::Distance).unwrap_err();
        assert!(err.to_string().contains("header must start with 0"));
    }

    #[test]
    fn bad_distance_line() {
        let err = read("0 2 t f\n1 2\n", MatrixKind::Distance).unwrap_err();
        assert!(matches!(err, WeightsIoError::Parse { line: 2, .. }));
        let err = read("0 2 t f\n1 2         x\n", MatrixKind::Distance).unwrap_err();
        assert!(err.to_string().contains("invalid weight 'x'"));
    }

    #[test]
    fn contiguity_count_mismatch() {
        let err = read("0 1 t f\n1 2\n5\n", MatrixKind::Contiguity).unwrap_err();
        assert!(matches!(err, WeightsIoError::Parse { line: 3, .. }));
    }

    #[test]
    fn contiguity_missing_list() {
        let err = read("0 1 t f\n1 0", MatrixKind::Contiguity).unwrap_err();
        assert!(err.to_string().contains("missing neighbor list"));
    }

    #[test]
    fn contiguity_feature_count_mismatch() {
        let err = read("0 2 t f\n1 0\n\n", MatrixKind::Contiguity).unwrap_err();
        assert!(err.to_string().contains("header declares 2 features, body has 1"));
    }
}
