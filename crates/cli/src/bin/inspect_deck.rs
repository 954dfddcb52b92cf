//! Print the outline of a written presentation.

use anyhow::{Context, Result};
use clap::Parser;
use nexpro_cli::{format_outline, init_logging, print_json};
use nexpro_pptx::PptxReader;
use std::path::PathBuf;

/// List the slides of a .pptx file with their text, pictures and tables.
#[derive(Parser, Debug)]
#[command(name = "inspect-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Presentation to read
    input: PathBuf,

    /// Print the outline as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let outline = PptxReader::new()
        .read_path(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if args.json {
        print_json(&outline)?;
    } else {
        print!("{}", format_outline(&outline));
    }
    Ok(())
}
