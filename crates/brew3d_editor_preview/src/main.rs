// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brew3D animation preview baker.
//!
//! Reads a saved animation document and writes either the per-frame object
//! transforms or the preview export payload, as JSON or RON.

use brew3d_editor_timeline::{AnimationDocument, DocumentError};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "brew3d_preview")]
#[command(about = "Bake a saved Brew3D animation into per-frame transforms")]
struct Cli {
    /// Path to a saved animation (.json)
    document: PathBuf,

    /// Frame rate to bake at (defaults to the document's)
    #[arg(long)]
    fps: Option<f32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the preview export payload instead of baked frames
    #[arg(long)]
    export: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Ron,
}

#[derive(Debug, Error)]
enum PreviewError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn write_to<T: Serialize, W: Write>(value: &T, format: OutputFormat, mut writer: W) -> Result<(), PreviewError> {
    match format {
        OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, value)?,
        OutputFormat::Ron => ron::ser::to_writer_pretty(&mut writer, value, ron::ser::PrettyConfig::default())?,
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), PreviewError> {
    let document = AnimationDocument::load(&cli.document)?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    if cli.export {
        write_to(&document.preview_export(), cli.format, writer)?;
    } else {
        // Frames are sampled while they are written
        let frames = document.bake(cli.fps);
        tracing::info!(
            "Baking {} frames for {} objects",
            frames.len(),
            document.scene_objects.len()
        );
        write_to(&frames, cli.format, writer)?;
    }

    if let Some(path) = &cli.output {
        tracing::info!("Wrote {:?}", path);
    }

    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("brew3d_editor_preview=debug".parse().expect("valid directive"))
        .add_directive("brew3d_editor_timeline=info".parse().expect("valid directive"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting brew3d_preview v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}
