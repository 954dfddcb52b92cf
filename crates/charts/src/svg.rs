//! Low-level SVG emission: text layout, dash patterns, escaping.
//!
//! Coordinates are SVG user units at 72 per inch, so a font size in points
//! is used as-is.

use nexpro_core::Color;
use std::fmt::Write as _;

/// Line height as a multiple of the font size.
pub(crate) const LINE_SPACING: f64 = 1.2;

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    fn text_anchor(self) -> &'static str {
        match self {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        }
    }
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    #[default]
    Baseline,
}

/// Stroke pattern for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl Dash {
    /// `stroke-dasharray` value scaled by the line width, or `None` for solid.
    pub(crate) fn pattern(self, width: f64) -> Option<String> {
        let w = width.max(1.0);
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some(format!("{:.2} {:.2}", 3.7 * w, 1.6 * w)),
            Dash::Dotted => Some(format!("{:.2} {:.2}", 1.0 * w, 1.65 * w)),
        }
    }
}

/// Font and placement of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub alpha: f64,
    pub ha: HAlign,
    pub va: VAlign,
    /// Counter-clockwise rotation in degrees around the anchor.
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color,
            alpha: 1.0,
            ha: HAlign::Left,
            va: VAlign::Baseline,
            rotation: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn align(mut self, ha: HAlign, va: VAlign) -> Self {
        self.ha = ha;
        self.va = va;
        self
    }

    pub fn centered(self) -> Self {
        self.align(HAlign::Center, VAlign::Center)
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Approximate advance of one character. CJK and full-width forms take a
/// full em, everything else a bit over half.
fn char_advance(c: char, size: f64, bold: bool) -> f64 {
    let wide = matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6);
    if wide {
        size
    } else if bold {
        size * 0.62
    } else {
        size * 0.58
    }
}

/// Estimated width of the widest line of `text`.
pub(crate) fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    text.lines()
        .map(|line| line.chars().map(|c| char_advance(c, size, bold)).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Estimated height of `text` including inter-line spacing.
pub(crate) fn text_height(text: &str, size: f64) -> f64 {
    let lines = text.lines().count().max(1) as f64;
    size + (lines - 1.0) * size * LINE_SPACING
}

/// Bounding box `(x0, y0, x1, y1)` of unrotated text placed at `(x, y)`.
pub(crate) fn text_bounds(x: f64, y: f64, text: &str, style: &TextStyle) -> (f64, f64, f64, f64) {
    let w = text_width(text, style.size, style.bold);
    let h = text_height(text, style.size);
    let x0 = match style.ha {
        HAlign::Left => x,
        HAlign::Center => x - w / 2.0,
        HAlign::Right => x - w,
    };
    let top = match style.va {
        VAlign::Top => y,
        VAlign::Center => y - h / 2.0,
        VAlign::Bottom => y - h,
        VAlign::Baseline => y - h + style.size * 0.2,
    };
    (x0, top, x0 + w, top + h)
}

pub(crate) fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Write possibly multi-line text, one `<text>` element per line.
pub(crate) fn write_text(out: &mut String, x: f64, y: f64, text: &str, style: &TextStyle) {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return;
    }
    let line_height = style.size * LINE_SPACING;
    let n = lines.len() as f64;
    let first_baseline = match style.va {
        VAlign::Top => y + style.size * 0.8,
        VAlign::Center => y - (n - 1.0) * line_height / 2.0 + style.size * 0.35,
        VAlign::Bottom => y - (n - 1.0) * line_height - style.size * 0.2,
        VAlign::Baseline => y - (n - 1.0) * line_height,
    };

    let mut attrs = format!(
        "font-family='sans-serif' font-size='{:.2}' fill='{}' text-anchor='{}'",
        style.size,
        style.color.svg(),
        style.ha.text_anchor()
    );
    if style.bold {
        attrs.push_str(" font-weight='bold'");
    }
    if style.italic {
        attrs.push_str(" font-style='italic'");
    }
    if style.alpha < 1.0 {
        let _ = write!(attrs, " opacity='{:.3}'", style.alpha);
    }

    if style.rotation != 0.0 {
        let _ = writeln!(
            out,
            "<g transform='rotate({:.2} {:.2} {:.2})'>",
            -style.rotation, x, y
        );
    }
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "<text x='{:.2}' y='{:.2}' {}>{}</text>",
            x,
            first_baseline + i as f64 * line_height,
            attrs,
            escape(line)
        );
    }
    if style.rotation != 0.0 {
        let _ = writeln!(out, "</g>");
    }
}

/// Stroke attributes for a line of the given colour, width, pattern and opacity.
pub(crate) fn stroke_attrs(color: Color, width: f64, dash: Dash, alpha: f64) -> String {
    let mut attrs = format!(
        "stroke='{}' stroke-width='{:.2}' fill='none'",
        color.svg(),
        width
    );
    if let Some(pattern) = dash.pattern(width) {
        let _ = write!(attrs, " stroke-dasharray='{}'", pattern);
    }
    if alpha < 1.0 {
        let _ = write!(attrs, " stroke-opacity='{:.3}'", alpha);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::palette::NAVY;

    #[test]
    fn test_wide_characters_take_full_em() {
        assert_eq!(text_width("売上", 10.0, false), 20.0);
        assert!(text_width("FY22", 10.0, false) < 40.0);
    }

    #[test]
    fn test_width_uses_widest_line() {
        let single = text_width("ネクプロ", 10.0, false);
        assert_eq!(text_width("ネクプロ\n(現在)", 10.0, false), single);
    }

    #[test]
    fn test_multiline_text_emits_one_element_per_line() {
        let mut out = String::new();
        write_text(&mut out, 10.0, 20.0, "a\nb\nc", &TextStyle::new(10.0, NAVY));
        assert_eq!(out.matches("<text ").count(), 3);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut out = String::new();
        write_text(&mut out, 0.0, 0.0, "R&D <1>", &TextStyle::new(10.0, NAVY));
        assert!(out.contains("R&amp;D &lt;1&gt;"));
    }

    #[test]
    fn test_dash_pattern_scales_with_width() {
        assert_eq!(Dash::Solid.pattern(2.0), None);
        assert_eq!(Dash::Dashed.pattern(2.0).as_deref(), Some("7.40 3.20"));
    }

    #[test]
    fn test_center_bounds_are_symmetric() {
        let style = TextStyle::new(10.0, NAVY).centered();
        let (x0, y0, x1, y1) = text_bounds(100.0, 50.0, "ab", &style);
        assert!((100.0 - x0 - (x1 - 100.0)).abs() < 1e-9);
        assert!((50.0 - y0 - (y1 - 50.0)).abs() < 1e-9);
    }
}
