//! In-memory slide document model.
//!
//! A [`Deck`] is built up slide by slide and handed to the PPTX writer in
//! one piece. Shapes carry absolute positions in EMU; nothing here knows
//! about XML.

use crate::color::Color;
use crate::units::{inches, Emu, Frame};

/// Default typeface for every run in the deck.
pub const DEFAULT_TYPEFACE: &str = "游ゴシック";

/// A complete presentation under construction.
#[derive(Debug, Clone)]
pub struct Deck {
    /// Document title, written to the core properties.
    pub title: String,

    /// Slide width.
    pub width: Emu,

    /// Slide height.
    pub height: Emu,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty 16:9 deck (13.333 in × 7.5 in).
    pub fn widescreen(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: inches(13.333),
            height: inches(7.5),
            slides: Vec::new(),
        }
    }

    /// Append a slide and return its 1-based number.
    pub fn add_slide(&mut self, slide: Slide) -> usize {
        self.slides.push(slide);
        self.slides.len()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// A single slide: a background colour and shapes in z-order.
#[derive(Debug, Clone)]
pub struct Slide {
    pub background: Color,
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a blank slide with a solid background.
    pub fn blank(background: Color) -> Self {
        Self {
            background,
            shapes: Vec::new(),
        }
    }

    /// Add a shape on top of the existing ones and return its index.
    pub fn push(&mut self, shape: impl Into<Shape>) -> usize {
        self.shapes.push(shape.into());
        self.shapes.len() - 1
    }

    /// Text of every shape that carries any, in z-order.
    pub fn text_lines(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(Shape::text)
            .filter(|t| !t.trim().is_empty())
            .collect()
    }

    pub fn picture_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Picture(_)))
            .count()
    }

    pub fn table_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Table(_)))
            .count()
    }
}

/// Anything that can be placed on a slide.
#[derive(Debug, Clone)]
pub enum Shape {
    TextBox(TextBox),
    AutoShape(AutoShape),
    Picture(Picture),
    Table(Table),
}

impl Shape {
    pub fn frame(&self) -> Frame {
        match self {
            Shape::TextBox(s) => s.frame,
            Shape::AutoShape(s) => s.frame,
            Shape::Picture(s) => s.frame,
            Shape::Table(s) => s.frame,
        }
    }

    /// Plain text of the shape, or `None` if it has no text frame.
    pub fn text(&self) -> Option<String> {
        match self {
            Shape::TextBox(s) => Some(s.body.plain_text()),
            Shape::AutoShape(s) => s.text.as_ref().map(TextBody::plain_text),
            Shape::Picture(_) => None,
            Shape::Table(t) => Some(
                t.rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|c| c.body.plain_text())
                            .collect::<Vec<_>>()
                            .join("\t")
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

impl From<TextBox> for Shape {
    fn from(s: TextBox) -> Self {
        Shape::TextBox(s)
    }
}

impl From<AutoShape> for Shape {
    fn from(s: AutoShape) -> Self {
        Shape::AutoShape(s)
    }
}

impl From<Picture> for Shape {
    fn from(s: Picture) -> Self {
        Shape::Picture(s)
    }
}

impl From<Table> for Shape {
    fn from(s: Table) -> Self {
        Shape::Table(s)
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchoring of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

/// Character formatting for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Size in points.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub typeface: String,
}

impl Font {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color,
            typeface: DEFAULT_TYPEFACE.to_string(),
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

/// A run of uniformly formatted text. `\n` marks a line break.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: Font,
}

impl Run {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

/// A paragraph of runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub align: Align,
    /// Space after the paragraph, in points.
    pub space_after: Option<f64>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new(align: Align) -> Self {
        Self {
            align,
            space_after: None,
            runs: Vec::new(),
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn space_after(mut self, pt: f64) -> Self {
        self.space_after = Some(pt);
        self
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// The text frame of a text box, auto-shape or table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
    pub word_wrap: bool,
    pub anchor: Option<Anchor>,
}

impl TextBody {
    pub fn new(word_wrap: bool) -> Self {
        Self {
            paragraphs: Vec::new(),
            word_wrap,
            anchor: None,
        }
    }

    /// A wrapping body holding a single one-run paragraph.
    pub fn single(text: impl Into<String>, font: Font, align: Align) -> Self {
        let mut body = Self::new(true);
        body.paragraphs
            .push(Paragraph::new(align).with_run(Run::new(text, font)));
        body
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Paragraph texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A free-standing text box.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub frame: Frame,
    pub body: TextBody,
}

/// Preset shape geometries used by the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rect,
    RoundRect,
    Ellipse,
    RightArrow,
}

impl Geometry {
    /// DrawingML `prstGeom` name.
    pub fn preset(self) -> &'static str {
        match self {
            Geometry::Rect => "rect",
            Geometry::RoundRect => "roundRect",
            Geometry::Ellipse => "ellipse",
            Geometry::RightArrow => "rightArrow",
        }
    }

    /// Shape name prefix PowerPoint shows in the selection pane.
    pub fn display_name(self) -> &'static str {
        match self {
            Geometry::Rect => "Rectangle",
            Geometry::RoundRect => "Rounded Rectangle",
            Geometry::Ellipse => "Oval",
            Geometry::RightArrow => "Right Arrow",
        }
    }
}

/// Shape outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    /// Inherit from the theme.
    Theme,
    /// No outline.
    Hidden,
    /// Solid line, with an explicit width if given.
    Solid { color: Color, width: Option<Emu> },
}

/// A preset auto-shape with optional text.
#[derive(Debug, Clone)]
pub struct AutoShape {
    pub frame: Frame,
    pub geometry: Geometry,
    pub fill: Option<Color>,
    pub outline: Outline,
    pub text: Option<TextBody>,
}

impl AutoShape {
    pub fn new(geometry: Geometry, frame: Frame) -> Self {
        Self {
            frame,
            geometry,
            fill: None,
            outline: Outline::Theme,
            text: None,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    pub fn text(mut self, body: TextBody) -> Self {
        self.text = Some(body);
        self
    }
}

/// An embedded PNG picture.
#[derive(Debug, Clone)]
pub struct Picture {
    pub frame: Frame,
    /// Original file name, kept as the picture description.
    pub name: String,
    /// Encoded PNG bytes.
    pub data: Vec<u8>,
}

/// Inner margins of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMargins {
    pub left: Emu,
    pub right: Emu,
    pub top: Emu,
    pub bottom: Emu,
}

impl Default for CellMargins {
    /// PowerPoint's defaults: 0.1 in left/right, 0.05 in top/bottom.
    fn default() -> Self {
        Self {
            left: Emu(91_440),
            right: Emu(91_440),
            top: Emu(45_720),
            bottom: Emu(45_720),
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone)]
pub struct TableCell {
    pub body: TextBody,
    pub fill: Option<Color>,
    pub anchor: Option<Anchor>,
    pub margins: CellMargins,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            body: TextBody::new(true),
            fill: None,
            anchor: None,
            margins: CellMargins::default(),
        }
    }
}

/// A table graphic frame.
#[derive(Debug, Clone)]
pub struct Table {
    pub frame: Frame,
    pub column_widths: Vec<Emu>,
    pub row_heights: Vec<Emu>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// Create an empty `rows` × `cols` table with the frame split evenly.
    pub fn new(frame: Frame, rows: usize, cols: usize) -> Self {
        let col_width = Emu(frame.width.get() / cols.max(1) as i64);
        let row_height = Emu(frame.height.get() / rows.max(1) as i64);
        Self {
            frame,
            column_widths: vec![col_width; cols],
            row_heights: vec![row_height; rows],
            rows: (0..rows)
                .map(|_| (0..cols).map(|_| TableCell::default()).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Override column widths. Extra widths are ignored.
    pub fn set_column_widths(&mut self, widths: &[Emu]) {
        for (slot, w) in self.column_widths.iter_mut().zip(widths) {
            *slot = *w;
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::{NAVY, WHITE};

    #[test]
    fn test_widescreen_dimensions() {
        let deck = Deck::widescreen("t");
        assert_eq!(deck.width, inches(13.333));
        assert_eq!(deck.height, Emu(6_858_000));
        assert_eq!(deck.slide_count(), 0);
    }

    #[test]
    fn test_add_slide_returns_number() {
        let mut deck = Deck::widescreen("t");
        assert_eq!(deck.add_slide(Slide::blank(WHITE)), 1);
        assert_eq!(deck.add_slide(Slide::blank(WHITE)), 2);
    }

    #[test]
    fn test_table_even_split() {
        let table = Table::new(Frame::inches(0.0, 0.0, 4.0, 2.0), 4, 2);
        assert_eq!(table.column_widths, vec![inches(2.0); 2]);
        assert_eq!(table.row_heights, vec![inches(0.5); 4]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_table_column_override() {
        let mut table = Table::new(Frame::inches(0.0, 0.0, 4.0, 2.0), 1, 2);
        table.set_column_widths(&[inches(1.0), inches(3.0), inches(9.0)]);
        assert_eq!(table.column_widths, vec![inches(1.0), inches(3.0)]);
    }

    #[test]
    fn test_text_lines_skip_empty_and_pictures() {
        let mut slide = Slide::blank(WHITE);
        slide.push(TextBox {
            frame: Frame::default(),
            body: TextBody::single("Title", Font::new(24.0, NAVY), Align::Left),
        });
        slide.push(TextBox {
            frame: Frame::default(),
            body: TextBody::single("   ", Font::new(10.0, NAVY), Align::Left),
        });
        slide.push(Picture {
            frame: Frame::default(),
            name: "a.png".into(),
            data: Vec::new(),
        });
        assert_eq!(slide.text_lines(), vec!["Title".to_string()]);
        assert_eq!(slide.picture_count(), 1);
        assert_eq!(slide.table_count(), 0);
    }
}
