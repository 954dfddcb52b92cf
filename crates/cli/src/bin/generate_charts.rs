//! Render the ten strategy charts to PNG files.

use anyhow::{Context, Result};
use clap::Parser;
use nexpro_charts::{ChartGenerator, CHARTS};
use nexpro_cli::{init_logging, print_json, DEFAULT_CHART_DIR};
use serde::Serialize;
use std::path::PathBuf;

/// Render the NexPro strategy charts as 200 DPI PNG files.
#[derive(Parser, Debug)]
#[command(name = "generate-charts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the PNG files are written to
    #[arg(short, long, default_value = DEFAULT_CHART_DIR)]
    output_dir: PathBuf,

    /// Print a JSON summary instead of progress lines
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    output_dir: &'a PathBuf,
    font: Option<&'a str>,
    charts: Vec<nexpro_charts::ChartArtifact>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let generator = ChartGenerator::new(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    if !args.json {
        println!("Generating charts...");
    }
    let mut charts = Vec::with_capacity(CHARTS.len());
    for spec in CHARTS.iter() {
        let artifact = generator
            .generate(spec)
            .with_context(|| format!("Failed to generate {}", spec.file_name))?;
        if !args.json {
            println!("  Saved: {}", artifact.file_name);
        }
        charts.push(artifact);
    }

    if args.json {
        print_json(&Summary {
            output_dir: &args.output_dir,
            font: generator.rasterizer().font(),
            charts,
        })?;
    } else {
        println!("All charts saved to {}/", args.output_dir.display());
    }
    Ok(())
}
