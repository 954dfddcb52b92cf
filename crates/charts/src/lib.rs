//! Chart rendering for the NexPro strategy deck.
//!
//! Each chart is a [`Figure`] built from literal data, described as SVG and
//! rasterised to a 200 DPI PNG.

pub mod axes;
pub mod charts;
pub mod figure;
pub mod generator;
pub mod raster;
pub mod svg;

pub use axes::{nice_ticks, Axes, Bars, BoxStyle, LegendEntry, LegendLoc, Line, Marker, Spine};
pub use charts::{ChartSpec, CHARTS};
pub use figure::{Figure, Margins};
pub use generator::{ChartArtifact, ChartGenerator};
pub use raster::{Rasterizer, DPI, FONT_CANDIDATES};
pub use svg::{Dash, HAlign, TextStyle, VAlign};
