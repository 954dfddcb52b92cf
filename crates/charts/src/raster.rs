//! SVG to PNG rasterisation with a Japanese-capable font.

use crate::figure::{Figure, UNITS_PER_INCH};
use log::{debug, warn};
use nexpro_core::{Error, Result};
use png::{BitDepth, ColorType, Encoder, PixelDimensions, Unit};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::fontdb::Database;
use resvg::usvg::{Options, Tree};

/// Output resolution of every chart.
pub const DPI: f64 = 200.0;

/// Families tried in order; the first installed one becomes `sans-serif`.
pub const FONT_CANDIDATES: [&str; 4] = [
    "WenQuanYi Zen Hei",
    "Noto Sans CJK JP",
    "IPAGothic",
    "unifont_jp",
];

/// Preferred family when no candidate is installed.
const FALLBACK_FAMILY: &str = "DejaVu Sans";

/// Renders figures to PNG bytes. Loading the system fonts is the slow part,
/// so one rasterizer is built per run and reused for every chart.
pub struct Rasterizer {
    options: Options<'static>,
    font: Option<String>,
    dpi: f64,
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut options = Options::default();
        let db = options.fontdb_mut();
        db.load_system_fonts();

        let font = FONT_CANDIDATES
            .iter()
            .find(|candidate| has_family(db, candidate))
            .map(|name| name.to_string());

        let family = match font.clone() {
            Some(name) => {
                debug!("Using font family {}", name);
                Some(name)
            }
            None => {
                let fallback = fallback_family(db);
                match &fallback {
                    Some(name) => debug!(
                        "None of {:?} is installed, using {} for sans-serif",
                        FONT_CANDIDATES, name
                    ),
                    None => warn!("No fonts are installed; chart text will not render"),
                }
                fallback
            }
        };
        if let Some(name) = &family {
            db.set_sans_serif_family(name.as_str());
        }

        Self {
            options,
            font,
            dpi: DPI,
        }
    }

    /// The Japanese family in use, if one was found.
    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    /// Parse options carrying the loaded font database.
    pub fn options(&self) -> &Options<'static> {
        &self.options
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Rasterise a figure and encode it as PNG.
    pub fn render(&self, figure: &Figure) -> Result<Vec<u8>> {
        let svg = figure.to_svg();
        let (width, height) = figure.pixel_size(self.dpi);
        self.svg_to_png(&svg, width, height)
    }

    fn svg_to_png(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        let tree = Tree::from_data(svg.as_bytes(), &self.options)
            .map_err(|e| Error::RenderError(format!("SVG parse failed: {}", e)))?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::RenderError(format!("Pixmap allocation failed ({}x{})", width, height)))?;
        let scale = (self.dpi / UNITS_PER_INCH) as f32;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let mut out = Vec::new();
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let ppm = (self.dpi / 0.0254).round() as u32;
        encoder.set_pixel_dims(Some(PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: Unit::Meter,
        }));
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::ImageError(e.to_string()))?;
        writer
            .write_image_data(pixmap.data())
            .map_err(|e| Error::ImageError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| Error::ImageError(e.to_string()))?;

        Ok(out)
    }
}

fn has_family(db: &Database, family: &str) -> bool {
    db.faces()
        .any(|face| face.families.iter().any(|(name, _)| name.as_str() == family))
}

/// Pick a Latin sans family so text still renders without a CJK font.
/// `DejaVu Sans` wins, then the first "Sans" family by name, then any family.
fn fallback_family(db: &Database) -> Option<String> {
    let mut families: Vec<&str> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
        .collect();
    families.sort_unstable();
    families.dedup();
    pick_fallback(&families)
}

fn pick_fallback(sorted: &[&str]) -> Option<String> {
    if sorted.contains(&FALLBACK_FAMILY) {
        return Some(FALLBACK_FAMILY.to_string());
    }
    sorted
        .iter()
        .find(|name| name.contains("Sans"))
        .or_else(|| sorted.first())
        .map(|name| name.to_string())
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::usvg::Node;

    fn text_nodes(group: &resvg::usvg::Group, out: &mut Vec<String>, glyphs: &mut usize) {
        for node in group.children() {
            match node {
                Node::Group(g) => text_nodes(g, out, glyphs),
                Node::Text(t) => {
                    out.extend(t.chunks().iter().map(|c| c.text().to_string()));
                    *glyphs += t.flattened().children().len();
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_pick_fallback() {
        assert_eq!(
            pick_fallback(&["DejaVu Sans", "DejaVu Serif", "Liberation Sans"]),
            Some("DejaVu Sans".to_string())
        );
        assert_eq!(
            pick_fallback(&["FreeSerif", "Liberation Sans", "Ubuntu Sans"]),
            Some("Liberation Sans".to_string())
        );
        assert_eq!(pick_fallback(&["FreeSerif"]), Some("FreeSerif".to_string()));
        assert_eq!(pick_fallback(&[]), None);
    }

    #[test]
    fn test_sans_serif_text_renders() {
        let rasterizer = Rasterizer::new();
        if rasterizer.options().fontdb.faces().next().is_none() {
            return;
        }
        let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='200' height='40'>\
                   <text x='10' y='30' font-family='sans-serif' font-size='20'>¥1,383M</text></svg>";
        let tree = Tree::from_data(svg.as_bytes(), rasterizer.options()).unwrap();

        let mut texts = Vec::new();
        let mut glyphs = 0;
        text_nodes(tree.root(), &mut texts, &mut glyphs);
        assert_eq!(texts, vec!["¥1,383M".to_string()]);
        assert!(glyphs > 0);
        assert!(tree.root().abs_bounding_box().width() > 0.0);
    }

    #[test]
    fn test_chart_labels_become_glyphs() {
        let rasterizer = Rasterizer::new();
        if rasterizer.options().fontdb.faces().next().is_none() {
            return;
        }
        let figure = (crate::CHARTS[0].build)();
        let tree = Tree::from_data(figure.to_svg().as_bytes(), rasterizer.options()).unwrap();

        let mut texts = Vec::new();
        let mut glyphs = 0;
        text_nodes(tree.root(), &mut texts, &mut glyphs);
        assert!(texts.iter().any(|t| t == "¥1,383M"));
        assert!(glyphs > 0);
    }
}
