//! Command-line entry point.
//!
//! ```text
//! siteplan <parcel.geojson> [--config FILE] [--plan FILE] [--svg FILE]
//! ```
//!
//! Loads a parcel, optionally applies a solver response, prints the
//! processed parcel as JSON and optionally writes an SVG rendering.

use anyhow::Context;
use clap::Parser;
use siteplan::{
    init_logging, Config, EventBus, PlanResult, SitePlanEditor, SvgRenderer, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Project a parcel into local feet and optionally lay out a plan on it.
#[derive(Parser, Debug)]
#[command(name = "siteplan", version)]
struct Args {
    /// Parcel boundary as GeoJSON (degrees or Web-Mercator metres).
    parcel: PathBuf,

    /// Settings file (.toml or .json) instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Solver response to apply before rendering.
    #[arg(long, value_name = "FILE")]
    plan: Option<PathBuf>,

    /// Write the current frame as SVG.
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;
    info!("siteplan {} (built {})", VERSION, BUILD_DATE);

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_or_default()?,
    };

    let mut editor = SitePlanEditor::with_event_bus(config, Arc::new(EventBus::new()));

    let geojson = std::fs::read_to_string(&args.parcel)
        .with_context(|| format!("reading {}", args.parcel.display()))?;
    editor
        .load_parcel_geojson(&geojson)
        .with_context(|| format!("processing parcel {}", args.parcel.display()))?;

    if let Some(path) = &args.plan {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let plan = PlanResult::from_json(&json)?;
        editor.apply_plan(plan);
    }

    let parcel = editor.parcel().context("parcel was not loaded")?;
    println!("{}", serde_json::to_string_pretty(parcel)?);

    if let Some(path) = &args.svg {
        let mut renderer = SvgRenderer::new();
        editor.render(&mut renderer)?;
        std::fs::write(path, renderer.output())
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}
