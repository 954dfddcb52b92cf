use nexpro_core::palette::{NAVY, WHITE};
use nexpro_core::{
    Align, AutoShape, Deck, Error, Font, Frame, Geometry, Outline, Picture, Slide, Table,
    TextBody, TextBox,
};
use nexpro_pptx::{PptxReader, PptxWriter};
use std::fs;
use std::io::{Cursor, Read};

fn title_box(text: &str) -> TextBox {
    TextBox {
        frame: Frame::inches(0.7, 0.25, 11.0, 0.6),
        body: TextBody::single(text, Font::new(24.0, NAVY).bold(true), Align::Left),
    }
}

fn sample_deck() -> Deck {
    let mut deck = Deck::widescreen("Sample");
    let png = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

    for n in 1..=3 {
        let mut slide = Slide::blank(WHITE);
        slide.push(title_box(&format!("Slide {}", n)));
        slide.push(
            AutoShape::new(Geometry::Rect, Frame::inches(0.0, 7.0, 13.333, 0.5))
                .fill(NAVY)
                .outline(Outline::Hidden)
                .text(TextBody::single("footer", Font::new(8.0, WHITE), Align::Right)),
        );
        if n != 2 {
            slide.push(Picture {
                frame: Frame::inches(1.0, 1.5, 6.0, 3.0),
                name: "chart.png".into(),
                data: png.clone(),
            });
        }
        if n == 3 {
            slide.push(Table::new(Frame::inches(1.0, 5.0, 6.0, 1.0), 2, 2));
        }
        deck.add_slide(slide);
    }
    deck
}

#[test]
fn written_deck_reads_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");

    let summary = PptxWriter::new().write_to_path(&sample_deck(), &path).unwrap();
    assert_eq!(summary.slides, 3);
    assert_eq!(summary.pictures, 2);
    assert_eq!(summary.media, 1);
    assert_eq!(summary.tables, 1);

    let outline = PptxReader::new().read_path(&path).unwrap();
    assert_eq!(outline.filename, "deck.pptx");
    assert_eq!(outline.slide_count(), 3);
    assert_eq!(outline.titles(), vec!["Slide 1", "Slide 2", "Slide 3"]);
    assert_eq!(outline.slides[0].pictures, 1);
    assert_eq!(outline.slides[1].pictures, 0);
    assert_eq!(outline.slides[2].tables, 1);
    assert!(outline.slides[0].contains("footer"));
}

#[test]
fn package_contains_required_parts() {
    let mut buf = Cursor::new(Vec::new());
    PptxWriter::new().write(&sample_deck(), &mut buf).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide3.xml",
        "ppt/slides/_rels/slide1.xml.rels",
        "ppt/media/image1.png",
    ] {
        assert!(archive.by_name(part).is_ok(), "missing {}", part);
    }
    assert!(archive.by_name("ppt/media/image2.png").is_err());

    let mut rels = String::new();
    archive
        .by_name("ppt/slides/_rels/slide1.xml.rels")
        .unwrap()
        .read_to_string(&mut rels)
        .unwrap();
    assert!(rels.contains("Target=\"../media/image1.png\""));
}

#[test]
fn rewriting_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.pptx");
    let b = dir.path().join("b.pptx");
    let deck = sample_deck();

    PptxWriter::new().write_to_path(&deck, &a).unwrap();
    PptxWriter::new().write_to_path(&deck, &b).unwrap();

    assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PptxReader::new().read_path(&dir.path().join("nope.pptx")).is_err());
}

#[test]
fn non_zip_file_is_corrupted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.pptx");
    fs::write(&path, b"definitely not a zip archive").unwrap();

    let err = PptxReader::new().read_path(&path).unwrap_err();
    assert!(matches!(err, Error::CorruptedFile(_)), "{:?}", err);
}
