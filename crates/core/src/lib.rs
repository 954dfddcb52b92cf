//! Core types shared by the NexPro chart generator and deck assembler:
//! palette, DrawingML units, the slide document model and its read-back
//! outline.

pub mod color;
pub mod deck;
pub mod error;
pub mod outline;
pub mod units;

pub use color::{palette, Color};
pub use deck::{
    Align, Anchor, AutoShape, CellMargins, Deck, Font, Geometry, Outline, Paragraph, Picture, Run,
    Shape, Slide, Table, TableCell, TextBody, TextBox, DEFAULT_TYPEFACE,
};
pub use error::{Error, Result};
pub use outline::{DeckOutline, SlideOutline, SlideText};
pub use units::{inches, points, Emu, Frame};
