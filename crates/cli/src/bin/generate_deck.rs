//! Assemble the twenty-slide strategy deck.

use anyhow::{Context, Result};
use clap::Parser;
use nexpro_cli::{init_logging, print_json, DEFAULT_CHART_DIR, DEFAULT_DECK_PATH};
use nexpro_deck::{assemble_with, TOTAL_SLIDES};
use std::fs;
use std::path::PathBuf;

/// Build the NexPro strategy presentation from the generated charts.
#[derive(Parser, Debug)]
#[command(name = "generate-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the chart PNG files
    #[arg(short, long, default_value = DEFAULT_CHART_DIR)]
    chart_dir: PathBuf,

    /// Output .pptx file
    #[arg(short, long, default_value = DEFAULT_DECK_PATH)]
    output: PathBuf,

    /// Print a JSON summary instead of progress lines
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.json {
        println!("Generating slides...");
    }
    let asm = assemble_with(&args.chart_dir, |n, spec| {
        if !args.json {
            println!("  {}/{} {}", n, TOTAL_SLIDES, spec.label);
        }
    })
    .context("Failed to lay out slides")?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let artifact = asm
        .write(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if args.json {
        print_json(&artifact)?;
    } else {
        println!("\nPresentation saved to: {}", artifact.path.display());
        println!("Total slides: {}", artifact.package.slides);
    }
    Ok(())
}
