mod commands;
mod file_io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roisync_core::LogicalObject;
use roisync_sync::SyncConfig;
use serde_json::Value;

/// Exchange annotation objects with an image server's ROI store
#[derive(Parser, Debug)]
#[command(name = "roisync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode local objects into add requests
    Export {
        /// JSON array of objects
        #[arg(value_name = "OBJECTS")]
        objects: PathBuf,

        /// Server id of the image the shapes belong to
        #[arg(long, value_name = "ID")]
        image: u64,

        /// Upper bound on one request body, in bytes
        #[arg(long, value_name = "BYTES")]
        max_body_size: Option<usize>,

        /// Fill areal shapes with a translucent colour
        #[arg(long)]
        fill: bool,

        /// Output file (stdout if omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Rebuild local objects from a server ROI list
    Import {
        #[arg(value_name = "ROIS")]
        rois: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Build the request deleting every shape of a ROI list
    Delete {
        #[arg(value_name = "ROIS")]
        rois: PathBuf,

        #[arg(long, value_name = "ID")]
        image: u64,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to this file
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SyncConfig::load_from(path),
        None => SyncConfig::load(),
    }
    .context("Failed to load configuration")?;

    match cli.command {
        Command::Export {
            objects,
            image,
            max_body_size,
            fill,
            out,
        } => {
            if let Some(max) = max_body_size {
                config.max_body_size_bytes = max;
            }
            if fill {
                config.fill_shapes = true;
            }
            let objects: Vec<LogicalObject> = file_io::read_json(&objects)?;
            let envelopes = commands::export(objects, image, &config)?;
            file_io::write_json(&envelopes, out.as_deref())?;
        }
        Command::Import { rois, out } => {
            let rois: Value = file_io::read_json(&rois)?;
            let forest = commands::import(&rois);
            file_io::write_json(&forest.objects(), out.as_deref())?;
        }
        Command::Delete { rois, image } => {
            let rois: Value = file_io::read_json(&rois)?;
            let envelope = commands::delete(&rois, image);
            file_io::write_json(&envelope, None)?;
        }
        Command::Config { path } => {
            if let Some(path) = path {
                config
                    .save_to(&path)
                    .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
            }
            file_io::write_json(&config, None)?;
        }
    }
    Ok(())
}

/// Log to stderr so stdout carries only JSON
fn init_tracing() {
    use tracing_subscriber::prelude::*;

    let default_directives = if cfg!(debug_assertions) {
        "info,roisync=debug"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
