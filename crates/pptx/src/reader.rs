//! PPTX reader: recovers the slide outline of a written deck.

use log::warn;
use nexpro_core::{DeckOutline, Error, Result, SlideOutline};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Reader for PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the outline of the deck at `path`.
    pub fn read_path(&self, path: &Path) -> Result<DeckOutline> {
        let file = File::open(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.read(BufReader::new(file), &filename)
    }

    /// Read a deck from any seekable source.
    pub fn read<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<DeckOutline> {
        let mut archive = ZipArchive::new(reader).map_err(|e| match e {
            ZipError::Io(io) => Error::IoError(io),
            other => Error::CorruptedFile(format!("{} is not a ZIP package: {}", filename, other)),
        })?;

        let mut outline = DeckOutline::new(filename);
        let slide_order = self.slide_order(&mut archive)?;

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.read_slide(&mut archive, slide_path, idx + 1)?;
            outline.add_slide(slide);
        }

        Ok(outline)
    }

    /// Slide part paths in presentation order.
    ///
    /// `p:sldIdLst` in `presentation.xml` is authoritative. When it is absent
    /// the slide relationships are ordered by their trailing number.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_part(archive, "ppt/_rels/presentation.xml.rels")?;
        let slide_rels = parse_slide_relationships(&rels_content)?;

        let listed = match read_part(archive, "ppt/presentation.xml") {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                warn!("presentation.xml unreadable, ordering slides by name: {}", e);
                Vec::new()
            }
        };

        if !listed.is_empty() {
            let by_id: HashMap<&str, &str> = slide_rels
                .iter()
                .map(|r| (r.id.as_str(), r.path.as_str()))
                .collect();
            return listed
                .iter()
                .map(|rid| {
                    by_id.get(rid.as_str()).map(|p| p.to_string()).ok_or_else(|| {
                        Error::PptxParseError(format!("Slide id list references unknown {}", rid))
                    })
                })
                .collect();
        }

        let mut slides: Vec<(Option<usize>, String)> = slide_rels
            .into_iter()
            .map(|r| (slide_number(&r.path), r.path))
            .collect();
        // Numbered parts first, in number order; anything else by name.
        slides.sort_by(|a, b| (a.0.is_none(), a.0, &a.1).cmp(&(b.0.is_none(), b.0, &b.1)));
        Ok(slides.into_iter().map(|(_, path)| path).collect())
    }

    fn read_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<SlideOutline> {
        let content = read_part(archive, slide_path)?;
        let mut slide = SlideOutline::new(slide_number);

        let scan = scan_slide(&content);
        for shape in scan.shapes {
            if !shape.text.trim().is_empty() {
                slide.add_line_with_position(shape.text, shape.y, shape.x);
            }
        }
        slide.pictures = scan.pictures;
        slide.tables = scan.tables;

        // Sort by position (top-to-bottom, left-to-right)
        slide.sort_by_position();

        Ok(slide)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A slide relationship from `presentation.xml.rels`.
#[derive(Debug)]
struct SlideRel {
    id: String,
    /// Part path inside the archive.
    path: String,
}

fn parse_slide_relationships(xml: &str) -> Result<Vec<SlideRel>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let rel_type = attr(e, b"Type").unwrap_or_default();
                let target = attr(e, b"Target").unwrap_or_default();
                let id = attr(e, b"Id").unwrap_or_default();

                if rel_type.ends_with("/slide") {
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    rels.push(SlideRel { id, path });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship ids listed in `p:sldIdLst`, in order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                if let Some(rid) = attr(e, b"r:id") {
                    ids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Text and position of one shape.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Default)]
struct SlideScan {
    shapes: Vec<ShapeInfo>,
    pictures: usize,
    tables: usize,
}

/// Walk a slide's shape tree. Malformed XML ends the scan early with what
/// was collected so far.
fn scan_slide(xml: &str) -> SlideScan {
    let mut scan = SlideScan::default();
    let mut reader = Reader::from_str(xml);

    let mut current: Option<ShapeInfo> = None;
    let mut text = String::new();
    let mut in_run_text = false;
    let mut in_paragraph = false;
    // Set at each new table cell so its first paragraph adds no line break.
    let mut cell_start = false;
    let mut cell_index = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sp" | b"pic" | b"graphicFrame" => {
                    current = Some(ShapeInfo::default());
                    text.clear();
                    if e.local_name().as_ref() == b"pic" {
                        scan.pictures += 1;
                    }
                }
                b"tbl" => scan.tables += 1,
                b"tr" => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    cell_index = 0;
                }
                b"tc" => {
                    if cell_index > 0 {
                        text.push('\t');
                    }
                    cell_index += 1;
                    cell_start = true;
                }
                b"p" => {
                    if !text.is_empty() && !cell_start {
                        text.push('\n');
                    }
                    cell_start = false;
                    in_paragraph = true;
                }
                b"t" if in_paragraph => in_run_text = true,
                b"br" if in_paragraph => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"off" => {
                    if let Some(shape) = current.as_mut() {
                        if let Some(x) = attr(e, b"x").and_then(|v| v.parse().ok()) {
                            shape.x = x;
                        }
                        if let Some(y) = attr(e, b"y").and_then(|v| v.parse().ok()) {
                            shape.y = y;
                        }
                    }
                }
                b"br" if in_paragraph => text.push('\n'),
                b"p" => {
                    if !text.is_empty() && !cell_start {
                        text.push('\n');
                    }
                    cell_start = false;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    match e.unescape() {
                        Ok(t) => text.push_str(&t),
                        Err(err) => warn!("Bad text escape (skipped): {}", err),
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"sp" | b"pic" | b"graphicFrame" => {
                    if let Some(mut shape) = current.take() {
                        shape.text = text.trim_matches('\n').to_string();
                        if !shape.text.trim().is_empty() {
                            scan.shapes.push(shape);
                        }
                    }
                    text.clear();
                    in_paragraph = false;
                    in_run_text = false;
                }
                b"p" => in_paragraph = false,
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("XML parsing error, rest of slide skipped: {}", e);
                break;
            }
            _ => {}
        }
    }

    scan
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => {
            return Err(Error::PptxParseError(format!("Package has no {} part", name)))
        }
        Err(e) => return Err(Error::ZipError(format!("{}: {}", name, e))),
    };
    let mut xml = String::with_capacity(part.size() as usize);
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// `N` from a slide part named `.../slideN.xml`.
fn slide_number(part: &str) -> Option<usize> {
    let file = part.rsplit('/').next()?;
    file.strip_prefix("slide")?.strip_suffix(".xml")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_number_from_part_name() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide20.xml"), Some(20));
        assert_eq!(slide_number("slide123.xml"), Some(123));
        assert_eq!(slide_number("ppt/slides/title.xml"), None);
        assert_eq!(slide_number("ppt/slides/slide2.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn test_slide_id_list_order() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst>
            <p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/>
            </p:sldIdLst></p:presentation>"#;
        assert_eq!(parse_slide_id_list(xml).unwrap(), vec!["rId3", "rId2"]);
    }

    #[test]
    fn test_slide_relationships_skip_layouts() {
        let xml = r#"<Relationships>
            <Relationship Id="rId1" Type="http://x/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
            <Relationship Id="rId2" Type="http://x/relationships/slide" Target="slides/slide1.xml"/>
            <Relationship Id="rId3" Type="http://x/relationships/slideLayout" Target="slideLayouts/slideLayout1.xml"/>
            </Relationships>"#;
        let rels = parse_slide_relationships(xml).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].id, "rId2");
        assert_eq!(rels[0].path, "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_scan_slide_text_positions_and_counts() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:spPr><a:xfrm><a:off x="100" y="900"/></a:xfrm></p:spPr>
              <p:txBody><a:p><a:r><a:t>Footer</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:spPr><a:xfrm><a:off x="50" y="10"/></a:xfrm></p:spPr>
              <p:txBody><a:p><a:r><a:t>Line 1</a:t></a:r><a:br><a:rPr/></a:br><a:r><a:t>Line 2</a:t></a:r></a:p></p:txBody></p:sp>
            <p:pic><p:spPr><a:xfrm><a:off x="0" y="0"/></a:xfrm></p:spPr></p:pic>
            <p:graphicFrame><p:xfrm><a:off x="0" y="500"/></p:xfrm><a:graphic><a:graphicData><a:tbl>
              <a:tr><a:tc><a:txBody><a:p><a:r><a:t>A</a:t></a:r></a:p></a:txBody></a:tc><a:tc><a:txBody><a:p><a:r><a:t>B</a:t></a:r></a:p></a:txBody></a:tc></a:tr>
              <a:tr><a:tc><a:txBody><a:p><a:r><a:t>1</a:t></a:r></a:p></a:txBody></a:tc><a:tc><a:txBody><a:p/></a:txBody></a:tc></a:tr>
            </a:tbl></a:graphicData></a:graphic></p:graphicFrame>
            </p:spTree></p:cSld></p:sld>"#;
        let scan = scan_slide(xml);
        assert_eq!(scan.pictures, 1);
        assert_eq!(scan.tables, 1);
        let texts: Vec<_> = scan.shapes.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Footer", "Line 1\nLine 2", "A\tB\n1\t"]);
        assert_eq!(scan.shapes[1].y, 10.0);
    }

    #[test]
    fn test_scan_stops_on_malformed_xml() {
        let xml = r#"<p:sld><p:sp><p:txBody><a:p><a:r><a:t>ok</a:t></a:r></a:p></p:txBody></p:sp><p:sp></p:wrong></p:sld>"#;
        let scan = scan_slide(xml);
        assert_eq!(scan.shapes.len(), 1);
        assert_eq!(scan.shapes[0].text, "ok");
    }

    fn package(parts: &[(&str, &str)]) -> std::io::Cursor<Vec<u8>> {
        use std::io::Write;
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, body) in parts {
            zip.start_file(*name, zip::write::FileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn slide_xml(text: &str) -> String {
        format!(
            r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree><p:sp><p:spPr><a:xfrm><a:off x="0" y="0"/></a:xfrm></p:spPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            text
        )
    }

    #[test]
    fn test_order_by_number_without_presentation_part() {
        let rels = r#"<Relationships>
            <Relationship Id="rId1" Type="http://x/relationships/slide" Target="slides/slide10.xml"/>
            <Relationship Id="rId2" Type="http://x/relationships/slide" Target="slides/slide2.xml"/>
            </Relationships>"#;
        let ten = slide_xml("Ten");
        let two = slide_xml("Two");
        let cursor = package(&[
            ("ppt/_rels/presentation.xml.rels", rels),
            ("ppt/slides/slide10.xml", ten.as_str()),
            ("ppt/slides/slide2.xml", two.as_str()),
        ]);

        let outline = PptxReader::new().read(cursor, "bare.pptx").unwrap();
        assert_eq!(outline.titles(), vec!["Two", "Ten"]);
    }

    #[test]
    fn test_missing_relationships_part() {
        let cursor = package(&[("ppt/presentation.xml", "<p:presentation xmlns:p=\"p\"/>")]);
        let err = PptxReader::new().read(cursor, "norels.pptx").unwrap_err();
        assert!(matches!(err, Error::PptxParseError(_)), "{:?}", err);
    }
}
