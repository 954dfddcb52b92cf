//! Package-level parts: content types, relationships, presentation and
//! document properties.

use crate::template::{FIRST_SLIDE_ID, SLIDE_MASTER_ID};
use crate::xml::{rel_type, XmlWriter, NS_A, NS_P, NS_R, NS_RELS};
use nexpro_core::{Deck, Result};

const CT_PREFIX: &str = "application/vnd.openxmlformats-officedocument";

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: String,
    pub target: String,
}

impl Relationship {
    pub(crate) fn new(index: usize, kind: &str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{}", index),
            kind: rel_type(kind),
            target: target.into(),
        }
    }
}

pub(crate) fn relationships(rels: &[Relationship]) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("Relationships", &[("xmlns", NS_RELS)])?;
    for rel in rels {
        w.empty(
            "Relationship",
            &[
                ("Id", rel.id.as_str()),
                ("Type", rel.kind.as_str()),
                ("Target", rel.target.as_str()),
            ],
        )?;
    }
    w.end("Relationships")?;
    w.finish()
}

pub(crate) fn content_types(slide_count: usize, has_png: bool) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )?;
    w.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    if has_png {
        w.empty("Default", &[("Extension", "png"), ("ContentType", "image/png")])?;
    }

    let pml = |part: &str| format!("{}.presentationml.{}+xml", CT_PREFIX, part);
    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), pml("presentation.main")),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), pml("slideMaster")),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), pml("slideLayout")),
        ("/ppt/theme/theme1.xml".to_string(), format!("{}.theme+xml", CT_PREFIX)),
        ("/ppt/presProps.xml".to_string(), pml("presProps")),
        ("/ppt/viewProps.xml".to_string(), pml("viewProps")),
        ("/ppt/tableStyles.xml".to_string(), pml("tableStyles")),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml".to_string(),
            format!("{}.extended-properties+xml", CT_PREFIX),
        ),
    ];
    for n in 1..=slide_count {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), pml("slide")));
    }
    for (part, content_type) in &overrides {
        w.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", content_type.as_str())],
        )?;
    }
    w.end("Types")?;
    w.finish()
}

pub(crate) fn root_relationships() -> Result<String> {
    relationships(&[
        Relationship::new(1, "officeDocument", "ppt/presentation.xml"),
        Relationship {
            id: "rId2".to_string(),
            kind: "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                .to_string(),
            target: "docProps/core.xml".to_string(),
        },
        Relationship::new(3, "extended-properties", "docProps/app.xml"),
    ])
}

/// Relationships of `presentation.xml`: the master first, then one per slide
/// in deck order, then the shared property parts.
pub(crate) fn presentation_relationships(slide_count: usize) -> Vec<Relationship> {
    let mut rels = vec![Relationship::new(
        1,
        "slideMaster",
        "slideMasters/slideMaster1.xml",
    )];
    for n in 1..=slide_count {
        rels.push(Relationship::new(n + 1, "slide", format!("slides/slide{}.xml", n)));
    }
    let next = slide_count + 2;
    rels.push(Relationship::new(next, "presProps", "presProps.xml"));
    rels.push(Relationship::new(next + 1, "viewProps", "viewProps.xml"));
    rels.push(Relationship::new(next + 2, "theme", "theme/theme1.xml"));
    rels.push(Relationship::new(next + 3, "tableStyles", "tableStyles.xml"));
    rels
}

pub(crate) fn presentation(deck: &Deck, rels: &[Relationship]) -> Result<String> {
    let slide_rels: Vec<&Relationship> = rels
        .iter()
        .filter(|r| r.kind == rel_type("slide"))
        .collect();

    let mut w = XmlWriter::new()?;
    w.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    w.start("p:sldMasterIdLst", &[])?;
    let master_id = SLIDE_MASTER_ID.to_string();
    w.empty("p:sldMasterId", &[("id", master_id.as_str()), ("r:id", "rId1")])?;
    w.end("p:sldMasterIdLst")?;

    if !slide_rels.is_empty() {
        w.start("p:sldIdLst", &[])?;
        for (i, rel) in slide_rels.iter().enumerate() {
            let id = (FIRST_SLIDE_ID + i as u32).to_string();
            w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.id.as_str())])?;
        }
        w.end("p:sldIdLst")?;
    }

    let cx = deck.width.get().to_string();
    let cy = deck.height.get().to_string();
    w.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    w.end("p:presentation")?;
    w.finish()
}

pub(crate) fn core_properties(title: &str) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.element("dc:title", &[], title)?;
    w.element("dc:creator", &[], "NexPro Inc.")?;
    w.element("cp:lastModifiedBy", &[], "NexPro Inc.")?;
    w.element("cp:revision", &[], "1")?;
    w.end("cp:coreProperties")?;
    w.finish()
}

pub(crate) fn app_properties(slide_count: usize) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    w.element("Application", &[], "nexpro-pptx")?;
    w.element("PresentationFormat", &[], "Custom")?;
    w.element("Slides", &[], &slide_count.to_string())?;
    w.end("Properties")?;
    w.finish()
}

/// Relationships of the slide layout and master parts.
pub(crate) fn layout_relationships() -> Result<String> {
    relationships(&[Relationship::new(
        1,
        "slideMaster",
        "../slideMasters/slideMaster1.xml",
    )])
}

pub(crate) fn master_relationships() -> Result<String> {
    relationships(&[
        Relationship::new(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
        Relationship::new(2, "theme", "../theme/theme1.xml"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_rels_order() {
        let rels = presentation_relationships(3);
        let ids: Vec<_> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["rId1", "rId2", "rId3", "rId4", "rId5", "rId6", "rId7", "rId8"]);
        assert_eq!(rels[1].target, "slides/slide1.xml");
        assert_eq!(rels[3].target, "slides/slide3.xml");
    }

    #[test]
    fn test_presentation_lists_slides_from_256() {
        let mut deck = Deck::widescreen("t");
        for _ in 0..2 {
            deck.add_slide(nexpro_core::Slide::blank(nexpro_core::palette::WHITE));
        }
        let xml = presentation(&deck, &presentation_relationships(2)).unwrap();
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId2\"/>"));
        assert!(xml.contains("<p:sldId id=\"257\" r:id=\"rId3\"/>"));
        assert!(xml.contains("<p:sldSz cx=\"12191695\" cy=\"6858000\"/>"));
    }

    #[test]
    fn test_content_types_png_only_when_needed() {
        let without = content_types(1, false).unwrap();
        assert!(!without.contains("image/png"));
        let with = content_types(2, true).unwrap();
        assert!(with.contains("image/png"));
        assert!(with.contains("/ppt/slides/slide2.xml"));
    }
}
