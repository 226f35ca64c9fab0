use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spatial weight matrix builder.
#[derive(Parser)]
#[command(name = "sweights", version, about = "Spatial weight matrix builder")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Build a weight matrix from a GeoJSON feature collection.
    Build(BuildArgs),
    /// Print neighbor statistics of a weights file as JSON.
    Inspect(InspectArgs),
}

/// Arguments for the `build` subcommand.
#[derive(clap::Args)]
pub struct BuildArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sweights.toml")]
    pub config: PathBuf,

    /// Override input GeoJSON path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output weights path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the spatial concept from config.
    #[arg(long)]
    pub concept: Option<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the weights file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Body format of the file: distance or contiguity.
    #[arg(short, long, default_value = "distance")]
    pub kind: String,

    /// Write the JSON here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
