//! PPTX (Office Open XML) support for the NexPro strategy deck.
//!
//! A .pptx file is a ZIP archive of XML parts. The writer turns a
//! [`nexpro_core::Deck`] into one; the reader turns one back into a
//! [`nexpro_core::DeckOutline`].

mod parts;
pub mod reader;
mod slide;
mod template;
pub mod writer;
mod xml;

pub use reader::PptxReader;
pub use writer::{PackageSummary, PptxWriter};
