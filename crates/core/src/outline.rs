//! Read-back summary of a written deck.

use serde::{Deserialize, Serialize};

/// What a written presentation contains, slide by slide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckOutline {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<SlideOutline>,
}

impl DeckOutline {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    pub fn add_slide(&mut self, slide: SlideOutline) {
        self.slides.push(slide);
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// The top-most text line of every slide, empty if a slide has none.
    pub fn titles(&self) -> Vec<&str> {
        self.slides
            .iter()
            .map(|s| s.lines.first().map(|l| l.text.as_str()).unwrap_or(""))
            .collect()
    }
}

/// A single slide as read back from the package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideOutline {
    /// 1-based slide number.
    pub number: usize,

    /// Text found on this slide, in reading order.
    pub lines: Vec<SlideText>,

    pub pictures: usize,

    pub tables: usize,
}

impl SlideOutline {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn add_line_with_position(&mut self, text: impl Into<String>, y: f64, x: f64) {
        self.lines.push(SlideText::with_position(text, y, x));
    }

    /// Sort lines by position (top-to-bottom, then left-to-right).
    pub fn sort_by_position(&mut self) {
        self.lines.sort_by(|a, b| {
            let y_cmp = a
                .y_position
                .partial_cmp(&b.y_position)
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x_position
                    .partial_cmp(&b.x_position)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

/// Text content from a shape, picture or table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideText {
    pub text: String,

    /// Y offset in EMU. None if unknown.
    pub y_position: Option<f64>,

    /// X offset in EMU. None if unknown.
    pub x_position: Option<f64>,
}

impl SlideText {
    pub fn with_position(text: impl Into<String>, y: f64, x: f64) -> Self {
        Self {
            text: text.into(),
            y_position: Some(y),
            x_position: Some(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_position() {
        let mut slide = SlideOutline::new(1);
        slide.add_line_with_position("footer", 6_400_000.0, 0.0);
        slide.add_line_with_position("right", 300_000.0, 9_000_000.0);
        slide.add_line_with_position("title", 300_000.0, 700_000.0);
        slide.sort_by_position();
        let texts: Vec<_> = slide.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["title", "right", "footer"]);
    }

    #[test]
    fn test_titles_uses_first_line() {
        let mut outline = DeckOutline::new("deck.pptx");
        let mut first = SlideOutline::new(1);
        first.add_line_with_position("Hello", 0.0, 0.0);
        outline.add_slide(first);
        outline.add_slide(SlideOutline::new(2));
        assert_eq!(outline.titles(), vec!["Hello", ""]);
        assert_eq!(outline.slide_count(), 2);
    }
}
