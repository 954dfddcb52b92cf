//! Figure canvas: page size, background and the axes laid out on it.

use crate::axes::{Axes, Rect};
use nexpro_core::palette;
use nexpro_core::Color;
use std::fmt::Write as _;

/// SVG user units per inch. Font sizes in points map 1:1.
pub const UNITS_PER_INCH: f64 = 72.0;

/// Space around the axes box, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Single left y-axis with tick labels and a title.
    pub const STANDARD: Margins = Margins::new(62.0, 22.0, 48.0, 48.0);

    /// Room for a second y-axis on the right.
    pub const TWIN: Margins = Margins::new(62.0, 62.0, 44.0, 48.0);

    /// Hidden axes: only the title needs space.
    pub const BARE: Margins = Margins::new(10.0, 10.0, 34.0, 10.0);
}

impl Default for Margins {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A chart page made of one or more overlaid axes.
///
/// Every axes shares the same box; a second one is how twin y-axes are
/// expressed. Legends are drawn last so they sit above all data.
#[derive(Debug, Clone)]
pub struct Figure {
    width: f64,
    height: f64,
    background: Color,
    margins: Margins,
    axes: Vec<Axes>,
}

impl Figure {
    /// Figure of `width` by `height` inches on the chart background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: palette::BG,
            margins: Margins::STANDARD,
            axes: Vec::new(),
        }
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn add_axes(&mut self, axes: Axes) {
        self.axes.push(axes);
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Page size in SVG units.
    pub fn size(&self) -> (f64, f64) {
        (self.width * UNITS_PER_INCH, self.height * UNITS_PER_INCH)
    }

    /// Page size in pixels at `dpi`.
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        (
            (self.width * dpi).round() as u32,
            (self.height * dpi).round() as u32,
        )
    }

    fn axes_rect(&self) -> Rect {
        let (w, h) = self.size();
        let m = self.margins;
        Rect {
            x: m.left,
            y: m.top,
            w: (w - m.left - m.right).max(1.0),
            h: (h - m.top - m.bottom).max(1.0),
        }
    }

    /// Serialise the whole figure to an SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = self.size();
        let rect = self.axes_rect();
        let mut out = String::with_capacity(16 * 1024);

        let _ = writeln!(
            out,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{:.2}' height='{:.2}' viewBox='0 0 {:.2} {:.2}'>",
            w, h, w, h
        );
        let _ = writeln!(
            out,
            "<rect x='0' y='0' width='{:.2}' height='{:.2}' fill='{}'/>",
            w,
            h,
            self.background.svg()
        );
        for (i, axes) in self.axes.iter().enumerate() {
            axes.render(&mut out, rect, &format!("clip{}", i));
        }
        for axes in &self.axes {
            axes.render_legend(&mut out, rect);
        }
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::{Bars, LegendLoc};
    use nexpro_core::palette::NAVY;

    #[test]
    fn test_pixel_size_at_200_dpi() {
        let fig = Figure::new(10.0, 5.5);
        assert_eq!(fig.pixel_size(200.0), (2000, 1100));
        assert_eq!(fig.size(), (720.0, 396.0));
    }

    #[test]
    fn test_svg_has_background_and_clip_per_axes() {
        let mut fig = Figure::new(4.0, 3.0);
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0], &[1.0], 0.5).color(NAVY));
        let twin = ax.twin();
        fig.add_axes(ax);
        fig.add_axes(twin);

        let svg = fig.to_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("fill='#FAFAFA'"));
        assert!(svg.contains("id='clip0'"));
        assert!(svg.contains("id='clip1'"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_legend_drawn_after_data() {
        let mut fig = Figure::new(4.0, 3.0);
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0], &[1.0], 0.5).color(NAVY).label("売上"));
        ax.legend(LegendLoc::UpperLeft, 9.0);
        fig.add_axes(ax);

        let svg = fig.to_svg();
        let bar = svg.find("fill='#1B2A4A'").unwrap_or(usize::MAX);
        let label = svg.find(">売上<").unwrap_or(0);
        assert!(bar < label);
    }
}
