//! Assembly of the twenty-slide NexPro strategy deck.
//!
//! Slides are laid out in order onto a single [`DeckAssembler`], pulling
//! chart pictures from a directory written by `nexpro-charts`, and the
//! finished deck is serialised with `nexpro-pptx`.

pub mod builder;
pub mod slides;

pub use builder::{
    DeckArtifact, DeckAssembler, ImageSize, Line, SlideBuilder, DECK_TITLE, TOTAL_SLIDES,
};
pub use slides::{SlideSpec, SLIDES};

use nexpro_core::Result;
use std::path::PathBuf;

/// Build every slide, calling `progress` after each with its 1-based number.
pub fn assemble_with<F>(chart_dir: impl Into<PathBuf>, mut progress: F) -> Result<DeckAssembler>
where
    F: FnMut(usize, &SlideSpec),
{
    let mut asm = DeckAssembler::new(chart_dir);
    for (i, spec) in SLIDES.iter().enumerate() {
        (spec.build)(&mut asm)?;
        progress(i + 1, spec);
    }
    Ok(asm)
}

/// Build every slide without progress reporting.
pub fn assemble(chart_dir: impl Into<PathBuf>) -> Result<DeckAssembler> {
    assemble_with(chart_dir, |_, _| {})
}
