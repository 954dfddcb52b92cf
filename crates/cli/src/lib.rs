//! Shared plumbing for the `generate-charts`, `generate-deck` and
//! `inspect-deck` binaries.

use anyhow::{Context, Result};
use nexpro_core::DeckOutline;
use serde::Serialize;
use std::fmt::Write as _;

/// Default chart directory, relative to the working directory.
pub const DEFAULT_CHART_DIR: &str = "chart_images";

/// Default presentation path, relative to the working directory.
pub const DEFAULT_DECK_PATH: &str = "nexpro_strategy_presentation.pptx";

/// Initialise `env_logger`: `debug` when verbose, `warn` otherwise.
/// `RUST_LOG` still wins when set.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise summary")?;
    println!("{}", json);
    Ok(())
}

/// Human-readable outline: a line per slide followed by its text.
pub fn format_outline(outline: &DeckOutline) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} slides", outline.filename, outline.slide_count());
    for slide in &outline.slides {
        let _ = writeln!(
            out,
            "\nSlide {} ({} {}, {} {})",
            slide.number,
            slide.pictures,
            plural(slide.pictures, "picture", "pictures"),
            slide.tables,
            plural(slide.tables, "table", "tables"),
        );
        for line in &slide.lines {
            for part in line.text.lines().filter(|l| !l.trim().is_empty()) {
                let _ = writeln!(out, "  {}", part);
            }
        }
    }
    out
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::SlideOutline;

    #[test]
    fn test_format_outline() {
        let mut outline = DeckOutline::new("deck.pptx");
        let mut slide = SlideOutline::new(1);
        slide.add_line_with_position("Title", 0.0, 0.0);
        slide.add_line_with_position("a\tb\n\nc\td", 1.0, 0.0);
        slide.pictures = 1;
        outline.add_slide(slide);

        let text = format_outline(&outline);
        assert_eq!(
            text,
            "deck.pptx: 1 slides\n\nSlide 1 (1 picture, 0 tables)\n  Title\n  a\tb\n  c\td\n"
        );
    }
}
