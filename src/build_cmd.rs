//! Build command: GeoJSON features in, weights text out.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use sweights_io::write_weights;
use sweights_weights::build_weights;

use crate::cli::BuildArgs;
use crate::config::SweightsConfig;
use crate::convert;
use crate::geojson_source::read_features;

/// Run the build pipeline.
pub fn run(args: BuildArgs) -> Result<()> {
    let _cmd = info_span!("build").entered();

    // 1. Load project TOML; a missing default file means defaults
    let config: SweightsConfig = if args.config.exists() {
        let toml_str = std::fs::read_to_string(&args.config)
            .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")?
    } else {
        info!(path = %args.config.display(), "no config file, using defaults");
        SweightsConfig::default()
    };

    // 2. Resolve paths, CLI flags win
    let input = args
        .input
        .as_ref()
        .or(config.io.input.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))?;
    let output = args.output.as_ref().or(config.io.output.as_ref()).ok_or_else(|| {
        anyhow::anyhow!("no output path: set [io].output in config or use --output")
    })?;

    // 3. Build library configs
    let builder_cfg = convert::build_builder_config(&config.weights, args.concept.as_deref())?;
    let writer_cfg = convert::build_writer_config(&config.io)?;

    // 4. Read entities and build
    let entities = read_features(input, builder_cfg.unique_field_name())?;
    let build = build_weights(&entities, &builder_cfg).context("weight matrix build failed")?;

    let d = &build.diagnostics;
    if !d.skipped.is_empty() {
        warn!(n_skipped = d.skipped.len(), "some features were left out");
    }
    let stats = build.matrix.neighbor_stats();
    info!(
        concept = builder_cfg.spatial_concept().name(),
        band_width = d.band_width,
        n_features = stats.features,
        n_pairs = stats.pairs,
        islands = stats.islands,
        "weight matrix ready"
    );

    // 5. Write
    write_weights(output, &build.matrix, &writer_cfg)
        .with_context(|| format!("failed to write weights: {}", output.display()))?;
    info!(path = %output.display(), "weights written");

    Ok(())
}
