//! PPTX package writer.

use crate::parts::{self, Relationship};
use crate::slide::SlideWriter;
use crate::template;
use log::debug;
use nexpro_core::{Deck, Error, Result, Shape};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// What ended up in a written package.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageSummary {
    pub slides: usize,
    pub pictures: usize,
    pub tables: usize,
    /// Distinct images stored under `ppt/media`.
    pub media: usize,
}

/// Images stored once per distinct byte content.
#[derive(Debug, Default)]
struct MediaStore {
    items: Vec<Vec<u8>>,
}

impl MediaStore {
    /// 1-based media number for `data`, adding it if new.
    fn intern(&mut self, data: &[u8]) -> usize {
        match self.items.iter().position(|d| d.as_slice() == data) {
            Some(i) => i + 1,
            None => {
                self.items.push(data.to_vec());
                self.items.len()
            }
        }
    }

    fn part_name(number: usize) -> String {
        format!("image{}.png", number)
    }
}

/// A slide serialised together with its relationships.
struct SlidePart {
    xml: String,
    rels: String,
}

/// Writes [`Deck`]s as Office Open XML presentations.
pub struct PptxWriter;

impl PptxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `deck` to `path`, replacing any existing file.
    pub fn write_to_path(&self, deck: &Deck, path: &Path) -> Result<PackageSummary> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        let summary = self.write(deck, &mut out)?;
        out.flush()?;
        Ok(summary)
    }

    /// Write `deck` into any seekable sink.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, sink: W) -> Result<PackageSummary> {
        let mut media = MediaStore::default();
        let mut summary = PackageSummary {
            slides: deck.slide_count(),
            ..PackageSummary::default()
        };

        let mut slides = Vec::with_capacity(deck.slides.len());
        for (i, slide) in deck.slides.iter().enumerate() {
            // rId1 is always the layout; images follow in shape order.
            let mut rels = vec![Relationship::new(
                1,
                "slideLayout",
                "../slideLayouts/slideLayout1.xml",
            )];
            let mut image_rels = Vec::new();
            for shape in &slide.shapes {
                match shape {
                    Shape::Picture(pic) => {
                        let number = media.intern(&pic.data);
                        let target = format!("../media/{}", MediaStore::part_name(number));
                        let id = match rels.iter().find(|r| r.target == target) {
                            Some(existing) => existing.id.clone(),
                            None => {
                                let rel = Relationship::new(rels.len() + 1, "image", target);
                                let id = rel.id.clone();
                                rels.push(rel);
                                id
                            }
                        };
                        image_rels.push(id);
                        summary.pictures += 1;
                    }
                    Shape::Table(_) => summary.tables += 1,
                    _ => {}
                }
            }
            let xml = SlideWriter::new(slide, &image_rels).to_xml()?;
            debug!(
                "Slide {}: {} shapes, {} pictures",
                i + 1,
                slide.shapes.len(),
                image_rels.len()
            );
            slides.push(SlidePart {
                xml,
                rels: parts::relationships(&rels)?,
            });
        }
        summary.media = media.items.len();

        let pres_rels = parts::presentation_relationships(slides.len());
        let mut package = Package::new(sink);
        package.add(
            "[Content_Types].xml",
            parts::content_types(slides.len(), !media.items.is_empty())?.as_bytes(),
        )?;
        package.add("_rels/.rels", parts::root_relationships()?.as_bytes())?;
        package.add("docProps/core.xml", parts::core_properties(&deck.title)?.as_bytes())?;
        package.add("docProps/app.xml", parts::app_properties(slides.len())?.as_bytes())?;
        package.add(
            "ppt/presentation.xml",
            parts::presentation(deck, &pres_rels)?.as_bytes(),
        )?;
        package.add(
            "ppt/_rels/presentation.xml.rels",
            parts::relationships(&pres_rels)?.as_bytes(),
        )?;
        package.add("ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER.as_bytes())?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::master_relationships()?.as_bytes(),
        )?;
        package.add("ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT.as_bytes())?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::layout_relationships()?.as_bytes(),
        )?;
        package.add("ppt/theme/theme1.xml", template::THEME.as_bytes())?;
        package.add("ppt/presProps.xml", template::PRES_PROPS.as_bytes())?;
        package.add("ppt/viewProps.xml", template::VIEW_PROPS.as_bytes())?;
        package.add("ppt/tableStyles.xml", template::TABLE_STYLES.as_bytes())?;

        for (i, part) in slides.iter().enumerate() {
            let n = i + 1;
            package.add(&format!("ppt/slides/slide{}.xml", n), part.xml.as_bytes())?;
            package.add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                part.rels.as_bytes(),
            )?;
        }
        for (i, data) in media.items.iter().enumerate() {
            let name = format!("ppt/media/{}", MediaStore::part_name(i + 1));
            package.add_stored(&name, data)?;
        }
        package.finish()?;

        Ok(summary)
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// ZIP container with fixed entry timestamps.
struct Package<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> Package<W> {
    fn new(sink: W) -> Self {
        Self {
            zip: ZipWriter::new(sink),
        }
    }

    fn options(method: CompressionMethod) -> FileOptions {
        FileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
    }

    fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.put(name, data, CompressionMethod::Deflated)
    }

    /// PNG data is already compressed.
    fn add_stored(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.put(name, data, CompressionMethod::Stored)
    }

    fn put(&mut self, name: &str, data: &[u8], method: CompressionMethod) -> Result<()> {
        self.zip
            .start_file(name, Self::options(method))
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(mut self) -> Result<W> {
        self.zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_store_dedupes_by_content() {
        let mut store = MediaStore::default();
        assert_eq!(store.intern(b"a"), 1);
        assert_eq!(store.intern(b"b"), 2);
        assert_eq!(store.intern(b"a"), 1);
        assert_eq!(store.items.len(), 2);
    }
}
