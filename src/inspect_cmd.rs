//! Inspect command: neighbor statistics of a weights file as JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use sweights_io::read_weights;
use sweights_weights::WeightMatrix;

use crate::cli::InspectArgs;
use crate::convert;

/// JSON report of one weights file.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub kind: &'static str,
    pub type_name: String,
    pub unique_field_name: String,
    pub features: usize,
    pub pairs: usize,
    pub min_neighbors: usize,
    pub max_neighbors: usize,
    pub mean_neighbors: f64,
    pub islands: usize,
    pub asymmetric_pairs: usize,
}

impl InspectReport {
    pub fn from_matrix(matrix: &WeightMatrix) -> Self {
        let stats = matrix.neighbor_stats();
        let asymmetric_pairs = matrix
            .ids()
            .flat_map(|a| matrix.neighbors(a).map(move |(b, _)| (a, b)))
            .filter(|(a, b)| !matrix.is_neighbor(b, a))
            .count();
        Self {
            kind: matrix.kind().name(),
            type_name: matrix.type_name().to_string(),
            unique_field_name: matrix.unique_field_name().to_string(),
            features: stats.features,
            pairs: stats.pairs,
            min_neighbors: stats.min_neighbors,
            max_neighbors: stats.max_neighbors,
            mean_neighbors: stats.mean_neighbors,
            islands: stats.islands,
            asymmetric_pairs,
        }
    }
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<()> {
    let _cmd = info_span!("inspect").entered();
    let kind = convert::parse_matrix_kind(&args.kind)?;

    let matrix = read_weights(&args.input, kind)
        .with_context(|| format!("failed to read weights: {}", args.input.display()))?;
    let report = InspectReport::from_matrix(&matrix);
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
