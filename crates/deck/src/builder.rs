//! Slide layout helpers.
//!
//! [`DeckAssembler`] owns the deck under construction. Each call to
//! [`DeckAssembler::add_slide`] appends a blank white slide and hands back a
//! [`SlideBuilder`] with the house formatting templates: header chrome,
//! key-message box, text boxes, chart pictures and styled tables.

use log::{debug, warn};
use nexpro_core::palette::{
    ACCENT, BLUE, DARK_GREY, GREY, MESSAGE_BG, NAVY, TABLE_HEADER_BG, TABLE_ROW_ALT, WHITE,
};
use nexpro_core::{
    inches, points, Align, Anchor, AutoShape, CellMargins, Color, Deck, Emu, Error, Font, Frame,
    Geometry, Outline, Paragraph, Picture, Result, Run, Slide, Table, TextBody, TextBox,
};
use nexpro_pptx::{PackageSummary, PptxWriter};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Number printed after the slash in every slide badge.
pub const TOTAL_SLIDES: usize = 20;

/// Document title stored in the package properties.
pub const DECK_TITLE: &str = "ネクプロ 全社戦略提案";

const FOOTER_TEXT: &str = "CONFIDENTIAL  |  NexPro Inc.  |  2026";

/// Pixels per inch assumed when a PNG carries no physical size.
const DEFAULT_DPI: f64 = 72.0;

/// One line of a multi-line text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line<'a> {
    /// Text in the box's default size and colour.
    Plain(&'a str),
    Styled {
        text: &'a str,
        size: f64,
        bold: bool,
        color: Color,
    },
}

impl<'a> From<&'a str> for Line<'a> {
    fn from(text: &'a str) -> Self {
        Line::Plain(text)
    }
}

impl<'a> From<(&'a str, f64, bool, Color)> for Line<'a> {
    fn from((text, size, bold, color): (&'a str, f64, bool, Color)) -> Self {
        Line::Styled {
            text,
            size,
            bold,
            color,
        }
    }
}

/// How a picture is sized on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Native size from the PNG's pixel density.
    Native,
    /// Given width, height follows the aspect ratio.
    Width(Emu),
    /// Given height, width follows the aspect ratio.
    Height(Emu),
    Exact(Emu, Emu),
}

/// Pixel size and density read from a PNG header.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PngHeader {
    width: u32,
    height: u32,
    dpi: f64,
}

fn read_png_header(data: &[u8], name: &str) -> Result<PngHeader> {
    let reader = png::Decoder::new(data)
        .read_info()
        .map_err(|e| Error::ImageError(format!("{} is not a valid PNG: {}", name, e)))?;
    let info = reader.info();
    let dpi = match info.pixel_dims {
        Some(dims) if matches!(dims.unit, png::Unit::Meter) && dims.xppu > 0 => {
            (dims.xppu as f64 * 0.0254).round()
        }
        _ => DEFAULT_DPI,
    };
    if info.width == 0 || info.height == 0 {
        return Err(Error::ImageError(format!("{} has zero size", name)));
    }
    Ok(PngHeader {
        width: info.width,
        height: info.height,
        dpi,
    })
}

fn scaled_size(header: PngHeader, size: ImageSize) -> (Emu, Emu) {
    let ratio = header.height as f64 / header.width as f64;
    match size {
        ImageSize::Native => (
            inches(header.width as f64 / header.dpi),
            inches(header.height as f64 / header.dpi),
        ),
        ImageSize::Width(w) => (w, w * ratio),
        ImageSize::Height(h) => (h * (1.0 / ratio), h),
        ImageSize::Exact(w, h) => (w, h),
    }
}

/// Result of writing the assembled deck.
#[derive(Debug, Clone, Serialize)]
pub struct DeckArtifact {
    pub path: PathBuf,
    pub bytes: u64,
    #[serde(flatten)]
    pub package: PackageSummary,
    /// Chart images that were not found and left out.
    pub missing_images: Vec<String>,
}

/// Owns the deck while slides are laid out.
pub struct DeckAssembler {
    chart_dir: PathBuf,
    deck: Deck,
    missing: Vec<String>,
}

impl DeckAssembler {
    /// Start an empty widescreen deck whose pictures come from `chart_dir`.
    pub fn new(chart_dir: impl Into<PathBuf>) -> Self {
        Self {
            chart_dir: chart_dir.into(),
            deck: Deck::widescreen(DECK_TITLE),
            missing: Vec::new(),
        }
    }

    pub fn chart_dir(&self) -> &Path {
        &self.chart_dir
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn missing_images(&self) -> &[String] {
        &self.missing
    }

    /// Append a blank slide with a white background.
    pub fn add_slide(&mut self) -> SlideBuilder<'_> {
        let number = self.deck.add_slide(Slide::blank(WHITE));
        debug!("Laying out slide {}", number);
        SlideBuilder {
            slide: &mut self.deck.slides[number - 1],
            chart_dir: &self.chart_dir,
            missing: &mut self.missing,
        }
    }

    /// Serialise the deck to `path`.
    pub fn write(&self, path: &Path) -> Result<DeckArtifact> {
        let package = PptxWriter::new().write_to_path(&self.deck, path)?;
        let bytes = fs::metadata(path)?.len();
        Ok(DeckArtifact {
            path: path.to_path_buf(),
            bytes,
            package,
            missing_images: self.missing.clone(),
        })
    }
}

/// Formatting templates for the slide most recently added.
pub struct SlideBuilder<'a> {
    slide: &'a mut Slide,
    chart_dir: &'a Path,
    missing: &'a mut Vec<String>,
}

impl SlideBuilder<'_> {
    pub fn slide(&self) -> &Slide {
        &*self.slide
    }

    /// Left-aligned single-run text box with word wrap.
    pub fn text(&mut self, frame: Frame, text: &str, font: Font) {
        self.text_aligned(frame, text, font, Align::Left);
    }

    pub fn text_aligned(&mut self, frame: Frame, text: &str, font: Font, align: Align) {
        self.slide.push(TextBox {
            frame,
            body: TextBody::single(text, font, align),
        });
    }

    /// One paragraph per line, 2 pt apart. Plain lines use 11 pt navy.
    pub fn multiline<'l, I, L>(&mut self, frame: Frame, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Line<'l>>,
    {
        let mut body = TextBody::new(true);
        for line in lines {
            let (text, font) = match line.into() {
                Line::Plain(text) => (text, Font::new(11.0, NAVY)),
                Line::Styled {
                    text,
                    size,
                    bold,
                    color,
                } => (text, Font::new(size, color).bold(bold)),
            };
            body.push(
                Paragraph::new(Align::Left)
                    .space_after(2.0)
                    .with_run(Run::new(text, font)),
            );
        }
        self.slide.push(TextBox { frame, body });
    }

    /// Solid shape without an outline.
    pub fn filled(&mut self, geometry: Geometry, frame: Frame, color: Color) {
        self.slide.push(
            AutoShape::new(geometry, frame)
                .fill(color)
                .outline(Outline::Hidden),
        );
    }

    /// Filled shape with a solid border of `width` points.
    pub fn panel(&mut self, geometry: Geometry, frame: Frame, fill: Color, line: Color, width: f64) {
        self.slide.push(AutoShape::new(geometry, frame).fill(fill).outline(
            Outline::Solid {
                color: line,
                width: Some(points(width)),
            },
        ));
    }

    /// Thin vertical accent rectangle.
    pub fn accent_bar(&mut self, frame: Frame) {
        self.filled(Geometry::Rect, frame, ACCENT);
    }

    /// Full-width navy footer carrying the confidentiality line.
    pub fn bottom_bar(&mut self) {
        let mut body = TextBody::new(false);
        body.push(
            Paragraph::new(Align::Right).with_run(Run::new(FOOTER_TEXT, Font::new(8.0, WHITE))),
        );
        self.slide.push(
            AutoShape::new(Geometry::Rect, Frame::inches(0.0, 7.0, 13.333, 0.5))
                .fill(NAVY)
                .outline(Outline::Hidden)
                .text(body),
        );
    }

    /// `{number}/20` badge in the footer.
    pub fn slide_number(&mut self, number: usize) {
        self.text_aligned(
            Frame::inches(12.5, 7.05, 0.7, 0.35),
            &format!("{}/{}", number, TOTAL_SLIDES),
            Font::new(8.0, WHITE),
            Align::Right,
        );
    }

    /// Standard chrome: accent bar, title, optional subtitle, footer and badge.
    pub fn header(&mut self, title: &str, subtitle: Option<&str>, number: Option<usize>) {
        self.accent_bar(Frame::inches(0.6, 0.4, 0.07, 0.55));
        self.text(
            Frame::inches(0.8, 0.35, 10.0, 0.6),
            title,
            Font::new(24.0, NAVY).bold(true),
        );
        if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
            self.text(
                Frame::inches(0.85, 0.95, 10.0, 0.4),
                subtitle,
                Font::new(13.0, GREY).italic(true),
            );
        }
        self.bottom_bar();
        if let Some(number) = number {
            self.slide_number(number);
        }
    }

    /// Blue-bordered message box below the header.
    pub fn key_message(&mut self, text: &str) {
        self.key_message_at(Frame::inches(0.8, 1.4, 11.5, 0.65), text);
    }

    pub fn key_message_at(&mut self, frame: Frame, text: &str) {
        let body = TextBody::single(
            format!("  Key Message:  {}", text),
            Font::new(12.0, NAVY).bold(true),
            Align::Left,
        );
        self.slide.push(
            AutoShape::new(Geometry::RoundRect, frame)
                .fill(MESSAGE_BG)
                .outline(Outline::Solid {
                    color: BLUE,
                    width: Some(points(1.5)),
                })
                .text(body),
        );
    }

    /// Embed `chart_dir/name`. A missing file is logged and skipped.
    ///
    /// Returns whether a picture was added.
    pub fn image(&mut self, name: &str, left: Emu, top: Emu, size: ImageSize) -> Result<bool> {
        let path = self.chart_dir.join(name);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Chart image not found, skipping: {}", path.display());
                self.missing.push(name.to_string());
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let header = read_png_header(&data, name)?;
        let (width, height) = scaled_size(header, size);
        debug!(
            "Placing {} ({}x{} px) at {:.2}x{:.2} in",
            name,
            header.width,
            header.height,
            width.as_inches(),
            height.as_inches()
        );
        self.slide.push(Picture {
            frame: Frame::new(left, top, width, height),
            name: name.to_string(),
            data,
        });
        Ok(true)
    }

    /// Styled `rows` × `cols` table. Row 0 is the header; cells missing
    /// from `data` are left empty.
    pub fn table(
        &mut self,
        frame: Frame,
        (rows, cols): (usize, usize),
        data: &[&[&str]],
        column_widths: &[f64],
        font_size: f64,
    ) {
        let mut table = Table::new(frame, rows, cols);
        let widths: Vec<Emu> = column_widths.iter().map(|w| inches(*w)).collect();
        table.set_column_widths(&widths);

        let margins = CellMargins {
            left: points(4.0),
            right: points(4.0),
            top: points(2.0),
            bottom: points(2.0),
        };

        for (r, row) in table.rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let text = data.get(r).and_then(|d| d.get(c)).copied().unwrap_or("");
                let align = if c > 0 { Align::Center } else { Align::Left };
                let (fill, font) = if r == 0 {
                    (TABLE_HEADER_BG, Font::new(font_size, WHITE).bold(true))
                } else if r % 2 == 0 {
                    (TABLE_ROW_ALT, Font::new(font_size, DARK_GREY))
                } else {
                    (WHITE, Font::new(font_size, DARK_GREY))
                };
                cell.body = TextBody::single(text, font, align);
                cell.fill = Some(fill);
                cell.anchor = Some(Anchor::Middle);
                cell.margins = margins;
            }
        }
        self.slide.push(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::Shape;

    fn tiny_png(width: u32, height: u32, ppm: Option<u32>) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            if let Some(ppm) = ppm {
                encoder.set_pixel_dims(Some(png::PixelDimensions {
                    xppu: ppm,
                    yppu: ppm,
                    unit: png::Unit::Meter,
                }));
            }
            let mut writer = encoder.write_header().unwrap();
            writer
                .write_image_data(&vec![0u8; (width * height) as usize])
                .unwrap();
        }
        out
    }

    #[test]
    fn test_header_with_subtitle_and_badge() {
        let mut asm = DeckAssembler::new("unused");
        let mut s = asm.add_slide();
        s.header("Title", Some("Sub"), Some(3));

        let slide = s.slide();
        assert_eq!(slide.shapes.len(), 5);
        assert_eq!(
            slide.text_lines(),
            vec!["Title", "Sub", FOOTER_TEXT, "3/20"]
        );
        match &slide.shapes[0] {
            Shape::AutoShape(bar) => {
                assert_eq!(bar.fill, Some(ACCENT));
                assert_eq!(bar.outline, Outline::Hidden);
            }
            other => panic!("expected accent bar, got {:?}", other),
        }
    }

    #[test]
    fn test_header_without_badge() {
        let mut asm = DeckAssembler::new("unused");
        let mut s = asm.add_slide();
        s.header("Title", None, None);
        assert_eq!(s.slide().text_lines(), vec!["Title", FOOTER_TEXT]);
    }

    #[test]
    fn test_key_message_text_and_outline() {
        let mut asm = DeckAssembler::new("unused");
        asm.add_slide().key_message("Act now");
        match &asm.deck().slides[0].shapes[0] {
            Shape::AutoShape(shape) => {
                assert_eq!(shape.geometry, Geometry::RoundRect);
                assert_eq!(shape.fill, Some(MESSAGE_BG));
                assert_eq!(
                    shape.outline,
                    Outline::Solid {
                        color: BLUE,
                        width: Some(Emu(19_050))
                    }
                );
                let body = shape.text.as_ref().unwrap();
                assert_eq!(body.plain_text(), "  Key Message:  Act now");
                assert!(body.paragraphs[0].runs[0].font.bold);
            }
            other => panic!("expected key message box, got {:?}", other),
        }
    }

    #[test]
    fn test_multiline_mixes_plain_and_styled() {
        let mut asm = DeckAssembler::new("unused");
        let mut s = asm.add_slide();
        s.multiline(Frame::inches(0.0, 0.0, 5.0, 1.0), ["first", "second"]);
        s.multiline(
            Frame::inches(0.0, 1.0, 5.0, 1.0),
            [("head", 14.0, true, ACCENT), ("", 4.0, false, NAVY)],
        );

        let slide = s.slide();
        let Shape::TextBox(plain) = &slide.shapes[0] else {
            panic!("expected text box");
        };
        assert_eq!(plain.body.paragraphs.len(), 2);
        assert_eq!(plain.body.paragraphs[1].space_after, Some(2.0));
        assert_eq!(plain.body.paragraphs[1].runs[0].font.size, 11.0);

        let Shape::TextBox(styled) = &slide.shapes[1] else {
            panic!("expected text box");
        };
        let font = &styled.body.paragraphs[0].runs[0].font;
        assert_eq!(font.size, 14.0);
        assert!(font.bold);
        assert_eq!(font.color, ACCENT);
    }

    #[test]
    fn test_table_styling() {
        let mut asm = DeckAssembler::new("unused");
        let data: &[&[&str]] = &[&["KPI", "FY24"], &["ARPA", "¥148K"], &["Churn"]];
        asm.add_slide()
            .table(Frame::inches(0.5, 2.0, 4.0, 2.0), (4, 2), data, &[1.5, 2.5], 9.0);

        let Shape::Table(table) = &asm.deck().slides[0].shapes[0] else {
            panic!("expected table");
        };
        assert_eq!(table.column_widths, vec![inches(1.5), inches(2.5)]);

        let header = &table.rows[0][1];
        assert_eq!(header.fill, Some(TABLE_HEADER_BG));
        assert!(header.body.paragraphs[0].runs[0].font.bold);
        assert_eq!(header.body.paragraphs[0].align, Align::Center);

        assert_eq!(table.rows[1][0].fill, Some(WHITE));
        assert_eq!(table.rows[1][0].body.paragraphs[0].align, Align::Left);
        assert_eq!(table.rows[2][0].fill, Some(TABLE_ROW_ALT));
        assert_eq!(table.rows[2][1].body.plain_text(), "");
        assert_eq!(table.rows[2][1].anchor, Some(Anchor::Middle));
        assert_eq!(table.rows[2][1].margins.left, Emu(50_800));
        assert_eq!(table.rows[2][1].margins.top, Emu(25_400));
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows[3][0].fill, Some(WHITE));
        assert_eq!(table.rows[3][0].body.plain_text(), "");
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut asm = DeckAssembler::new(dir.path());
        let added = asm
            .add_slide()
            .image("nope.png", inches(0.5), inches(2.0), ImageSize::Width(inches(6.0)))
            .unwrap();
        assert!(!added);
        assert_eq!(asm.deck().slides[0].picture_count(), 0);
        assert_eq!(asm.missing_images(), ["nope.png".to_string()]);
    }

    #[test]
    fn test_image_width_keeps_aspect() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.png"), tiny_png(40, 20, None)).unwrap();
        let mut asm = DeckAssembler::new(dir.path());
        asm.add_slide()
            .image("c.png", inches(1.0), inches(1.5), ImageSize::Width(inches(6.0)))
            .unwrap();

        let Shape::Picture(pic) = &asm.deck().slides[0].shapes[0] else {
            panic!("expected picture");
        };
        assert_eq!(pic.frame, Frame::inches(1.0, 1.5, 6.0, 3.0));
        assert_eq!(pic.name, "c.png");
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        let mut asm = DeckAssembler::new(dir.path());
        let result = asm
            .add_slide()
            .image("bad.png", inches(0.0), inches(0.0), ImageSize::Native);
        assert!(matches!(result, Err(Error::ImageError(_))));
    }

    #[test]
    fn test_native_size_uses_density() {
        // 7874 px/m is 200 DPI.
        let header = read_png_header(&tiny_png(400, 200, Some(7874)), "a.png").unwrap();
        assert_eq!(header.dpi, 200.0);
        assert_eq!(
            scaled_size(header, ImageSize::Native),
            (inches(2.0), inches(1.0))
        );

        let header = read_png_header(&tiny_png(144, 72, None), "b.png").unwrap();
        assert_eq!(
            scaled_size(header, ImageSize::Native),
            (inches(2.0), inches(1.0))
        );
        assert_eq!(
            scaled_size(header, ImageSize::Height(inches(2.0))),
            (inches(4.0), inches(2.0))
        );
    }
}
