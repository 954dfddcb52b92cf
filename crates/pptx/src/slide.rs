//! Slide part serialisation: the shape tree of one slide.

use crate::template::TABLE_STYLE_ID;
use crate::xml::{XmlWriter, NS_A, NS_P, NS_R};
use nexpro_core::{
    Align, Anchor, AutoShape, Emu, Frame, Outline, Paragraph, Picture, Run, Shape, Slide, Table,
    TextBody, TextBox,
};
use nexpro_core::Result;

/// Serialises one slide. `image_rel` maps the n-th picture on the slide to
/// its relationship id.
pub(crate) struct SlideWriter<'a> {
    slide: &'a Slide,
    image_rels: &'a [String],
}

fn emu(value: Emu) -> String {
    value.get().to_string()
}

fn align_attr(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    }
}

fn anchor_attr(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
        Anchor::Bottom => "b",
    }
}

impl<'a> SlideWriter<'a> {
    pub(crate) fn new(slide: &'a Slide, image_rels: &'a [String]) -> Self {
        Self { slide, image_rels }
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut w = XmlWriter::new()?;
        w.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
        w.start("p:cSld", &[])?;

        w.start("p:bg", &[])?;
        w.start("p:bgPr", &[])?;
        w.solid_fill(&self.slide.background.hex())?;
        w.empty("a:effectLst", &[])?;
        w.end("p:bgPr")?;
        w.end("p:bg")?;

        w.start("p:spTree", &[])?;
        w.start("p:nvGrpSpPr", &[])?;
        w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
        w.empty("p:cNvGrpSpPr", &[])?;
        w.empty("p:nvPr", &[])?;
        w.end("p:nvGrpSpPr")?;
        w.start("p:grpSpPr", &[])?;
        w.start("a:xfrm", &[])?;
        w.empty("a:off", &[("x", "0"), ("y", "0")])?;
        w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
        w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
        w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
        w.end("a:xfrm")?;
        w.end("p:grpSpPr")?;

        let mut picture_index = 0;
        for (i, shape) in self.slide.shapes.iter().enumerate() {
            // Id 1 is the group itself.
            let id = i + 2;
            match shape {
                Shape::TextBox(tb) => write_text_box(&mut w, id, tb)?,
                Shape::AutoShape(s) => write_auto_shape(&mut w, id, s)?,
                Shape::Picture(p) => {
                    let rel = self.image_rels.get(picture_index).ok_or_else(|| {
                        nexpro_core::Error::XmlError(format!(
                            "No relationship for picture {} on slide",
                            picture_index + 1
                        ))
                    })?;
                    write_picture(&mut w, id, p, rel)?;
                    picture_index += 1;
                }
                Shape::Table(t) => write_table(&mut w, id, t)?,
            }
        }

        w.end("p:spTree")?;
        w.end("p:cSld")?;
        w.start("p:clrMapOvr", &[])?;
        w.empty("a:masterClrMapping", &[])?;
        w.end("p:clrMapOvr")?;
        w.end("p:sld")?;
        w.finish()
    }
}

fn write_xfrm(w: &mut XmlWriter, tag: &str, frame: &Frame) -> Result<()> {
    let (x, y) = (emu(frame.left), emu(frame.top));
    let cx = frame.width.get().max(0).to_string();
    let cy = frame.height.get().max(0).to_string();
    w.start(tag, &[])?;
    w.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.end(tag)
}

fn write_preset(w: &mut XmlWriter, preset: &str) -> Result<()> {
    w.start("a:prstGeom", &[("prst", preset)])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")
}

fn write_text_box(w: &mut XmlWriter, id: usize, tb: &TextBox) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("TextBox {}", id - 1);
    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id_str.as_str()), ("name", name.as_str())])?;
    w.empty("p:cNvSpPr", &[("txBox", "1")])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    write_xfrm(w, "a:xfrm", &tb.frame)?;
    write_preset(w, "rect")?;
    w.empty("a:noFill", &[])?;
    w.end("p:spPr")?;

    write_text_body(w, "p:txBody", &tb.body, None)?;
    w.end("p:sp")
}

fn write_auto_shape(w: &mut XmlWriter, id: usize, shape: &AutoShape) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("{} {}", shape.geometry.display_name(), id - 1);
    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id_str.as_str()), ("name", name.as_str())])?;
    w.empty("p:cNvSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    write_xfrm(w, "a:xfrm", &shape.frame)?;
    write_preset(w, shape.geometry.preset())?;
    if let Some(fill) = shape.fill {
        w.solid_fill(&fill.hex())?;
    }
    match shape.outline {
        Outline::Theme => {}
        Outline::Hidden => {
            w.start("a:ln", &[])?;
            w.empty("a:noFill", &[])?;
            w.end("a:ln")?;
        }
        Outline::Solid { color, width } => {
            let width = width.map(emu);
            match &width {
                Some(wd) => w.start("a:ln", &[("w", wd.as_str())])?,
                None => w.start("a:ln", &[])?,
            }
            w.solid_fill(&color.hex())?;
            w.end("a:ln")?;
        }
    }
    w.end("p:spPr")?;

    // Theme references so unset properties resolve like PowerPoint's own shapes.
    w.start("p:style", &[])?;
    for (tag, idx) in [("a:lnRef", "1"), ("a:fillRef", "3"), ("a:effectRef", "2")] {
        w.start(tag, &[("idx", idx)])?;
        w.empty("a:schemeClr", &[("val", "accent1")])?;
        w.end(tag)?;
    }
    w.start("a:fontRef", &[("idx", "minor")])?;
    w.empty("a:schemeClr", &[("val", "lt1")])?;
    w.end("a:fontRef")?;
    w.end("p:style")?;

    match &shape.text {
        Some(body) => write_text_body(w, "p:txBody", body, Some(Anchor::Middle))?,
        None => {
            w.start("p:txBody", &[])?;
            w.empty("a:bodyPr", &[("rtlCol", "0"), ("anchor", "ctr")])?;
            w.empty("a:lstStyle", &[])?;
            w.empty("a:p", &[])?;
            w.end("p:txBody")?;
        }
    }
    w.end("p:sp")
}

fn write_text_body(
    w: &mut XmlWriter,
    tag: &str,
    body: &TextBody,
    default_anchor: Option<Anchor>,
) -> Result<()> {
    w.start(tag, &[])?;
    let wrap = if body.word_wrap { "square" } else { "none" };
    let mut attrs = vec![("wrap", wrap), ("rtlCol", "0")];
    if let Some(anchor) = body.anchor.or(default_anchor) {
        attrs.push(("anchor", anchor_attr(anchor)));
    }
    w.empty("a:bodyPr", &attrs)?;
    w.empty("a:lstStyle", &[])?;
    write_paragraphs(w, &body.paragraphs)?;
    w.end(tag)
}

fn write_paragraphs(w: &mut XmlWriter, paragraphs: &[Paragraph]) -> Result<()> {
    if paragraphs.is_empty() {
        return w.empty("a:p", &[]);
    }
    for para in paragraphs {
        w.start("a:p", &[])?;
        match para.space_after {
            Some(pt) => {
                w.start("a:pPr", &[("algn", align_attr(para.align))])?;
                w.start("a:spcAft", &[])?;
                let val = ((pt * 100.0).round() as i64).to_string();
                w.empty("a:spcPts", &[("val", val.as_str())])?;
                w.end("a:spcAft")?;
                w.end("a:pPr")?;
            }
            None => w.empty("a:pPr", &[("algn", align_attr(para.align))])?,
        }
        for run in &para.runs {
            write_run(w, run)?;
        }
        w.end("a:p")?;
    }
    Ok(())
}

/// A run whose text holds `\n` is split into runs joined by `<a:br/>`.
fn write_run(w: &mut XmlWriter, run: &Run) -> Result<()> {
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            w.start("a:br", &[])?;
            write_run_properties(w, "a:rPr", run)?;
            w.end("a:br")?;
        }
        w.start("a:r", &[])?;
        write_run_properties(w, "a:rPr", run)?;
        w.element("a:t", &[], line)?;
        w.end("a:r")?;
    }
    Ok(())
}

fn write_run_properties(w: &mut XmlWriter, tag: &str, run: &Run) -> Result<()> {
    let font = &run.font;
    let size = ((font.size * 100.0).round() as i64).to_string();
    let bold = if font.bold { "1" } else { "0" };
    let italic = if font.italic { "1" } else { "0" };
    w.start(
        tag,
        &[
            ("lang", "ja-JP"),
            ("altLang", "en-US"),
            ("sz", size.as_str()),
            ("b", bold),
            ("i", italic),
            ("dirty", "0"),
        ],
    )?;
    w.solid_fill(&font.color.hex())?;
    w.empty("a:latin", &[("typeface", font.typeface.as_str())])?;
    w.empty("a:ea", &[("typeface", font.typeface.as_str())])?;
    w.end(tag)
}

fn write_picture(w: &mut XmlWriter, id: usize, pic: &Picture, rel: &str) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("Picture {}", id - 1);
    w.start("p:pic", &[])?;
    w.start("p:nvPicPr", &[])?;
    w.empty(
        "p:cNvPr",
        &[("id", id_str.as_str()), ("name", name.as_str()), ("descr", pic.name.as_str())],
    )?;
    w.start("p:cNvPicPr", &[])?;
    w.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    w.end("p:cNvPicPr")?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvPicPr")?;

    w.start("p:blipFill", &[])?;
    w.empty("a:blip", &[("r:embed", rel)])?;
    w.start("a:stretch", &[])?;
    w.empty("a:fillRect", &[])?;
    w.end("a:stretch")?;
    w.end("p:blipFill")?;

    w.start("p:spPr", &[])?;
    write_xfrm(w, "a:xfrm", &pic.frame)?;
    write_preset(w, "rect")?;
    w.end("p:spPr")?;
    w.end("p:pic")
}

fn write_table(w: &mut XmlWriter, id: usize, table: &Table) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("Table {}", id - 1);
    w.start("p:graphicFrame", &[])?;
    w.start("p:nvGraphicFramePr", &[])?;
    w.empty("p:cNvPr", &[("id", id_str.as_str()), ("name", name.as_str())])?;
    w.start("p:cNvGraphicFramePr", &[])?;
    w.empty("a:graphicFrameLocks", &[("noGrp", "1")])?;
    w.end("p:cNvGraphicFramePr")?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGraphicFramePr")?;
    write_xfrm(w, "p:xfrm", &table.frame)?;

    w.start("a:graphic", &[])?;
    w.start(
        "a:graphicData",
        &[("uri", "http://schemas.openxmlformats.org/drawingml/2006/table")],
    )?;
    w.start("a:tbl", &[])?;
    w.start("a:tblPr", &[("firstRow", "1"), ("bandRow", "1")])?;
    w.element("a:tableStyleId", &[], TABLE_STYLE_ID)?;
    w.end("a:tblPr")?;

    w.start("a:tblGrid", &[])?;
    for width in &table.column_widths {
        let wd = emu(*width);
        w.empty("a:gridCol", &[("w", wd.as_str())])?;
    }
    w.end("a:tblGrid")?;

    for (r, row) in table.rows.iter().enumerate() {
        let h = table.row_heights.get(r).copied().unwrap_or(Emu::ZERO);
        let h = emu(h);
        w.start("a:tr", &[("h", h.as_str())])?;
        for cell in row {
            w.start("a:tc", &[])?;
            write_text_body(w, "a:txBody", &cell.body, None)?;

            let (l, rt, t, b) = (
                emu(cell.margins.left),
                emu(cell.margins.right),
                emu(cell.margins.top),
                emu(cell.margins.bottom),
            );
            let mut attrs = vec![
                ("marL", l.as_str()),
                ("marR", rt.as_str()),
                ("marT", t.as_str()),
                ("marB", b.as_str()),
            ];
            if let Some(anchor) = cell.anchor {
                attrs.push(("anchor", anchor_attr(anchor)));
            }
            match cell.fill {
                Some(fill) => {
                    w.start("a:tcPr", &attrs)?;
                    w.solid_fill(&fill.hex())?;
                    w.end("a:tcPr")?;
                }
                None => w.empty("a:tcPr", &attrs)?,
            }
            w.end("a:tc")?;
        }
        w.end("a:tr")?;
    }

    w.end("a:tbl")?;
    w.end("a:graphicData")?;
    w.end("a:graphic")?;
    w.end("p:graphicFrame")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::palette::{NAVY, WHITE};
    use nexpro_core::{Font, Geometry, TableCell};

    fn render(slide: &Slide, rels: &[String]) -> String {
        SlideWriter::new(slide, rels).to_xml().unwrap()
    }

    #[test]
    fn test_text_box_runs_and_line_breaks() {
        let mut slide = Slide::blank(WHITE);
        slide.push(TextBox {
            frame: Frame::inches(0.7, 0.3, 11.0, 0.6),
            body: TextBody::single("ネクプロ\n戦略", Font::new(24.0, NAVY).bold(true), Align::Center),
        });
        let xml = render(&slide, &[]);
        assert!(xml.contains("<p:cNvSpPr txBox=\"1\"/>"));
        assert!(xml.contains("sz=\"2400\" b=\"1\" i=\"0\""));
        assert!(xml.contains("<a:t>ネクプロ</a:t>"));
        assert!(xml.contains("<a:br>"));
        assert!(xml.contains("<a:t>戦略</a:t>"));
        assert!(xml.contains("<a:ea typeface=\"游ゴシック\"/>"));
        assert!(xml.contains("<a:pPr algn=\"ctr\"/>"));
    }

    #[test]
    fn test_hidden_outline_and_fill() {
        let mut slide = Slide::blank(WHITE);
        slide.push(
            AutoShape::new(Geometry::Rect, Frame::inches(0.5, 0.3, 0.08, 0.6))
                .fill(NAVY)
                .outline(Outline::Hidden),
        );
        let xml = render(&slide, &[]);
        assert!(xml.contains("<a:prstGeom prst=\"rect\">"));
        assert!(xml.contains("<a:srgbClr val=\"1B2A4A\"/>"));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
        assert!(xml.contains("name=\"Rectangle 1\""));
    }

    #[test]
    fn test_picture_uses_relationship() {
        let mut slide = Slide::blank(WHITE);
        slide.push(Picture {
            frame: Frame::inches(1.0, 1.0, 4.0, 2.0),
            name: "roadmap.png".into(),
            data: vec![1, 2, 3],
        });
        let xml = render(&slide, &["rId2".to_string()]);
        assert!(xml.contains("<a:blip r:embed=\"rId2\"/>"));
        assert!(xml.contains("descr=\"roadmap.png\""));
    }

    #[test]
    fn test_picture_without_relationship_fails() {
        let mut slide = Slide::blank(WHITE);
        slide.push(Picture {
            frame: Frame::inches(1.0, 1.0, 4.0, 2.0),
            name: "x.png".into(),
            data: vec![],
        });
        assert!(SlideWriter::new(&slide, &[]).to_xml().is_err());
    }

    #[test]
    fn test_table_grid_and_cell_properties() {
        let mut table = Table::new(Frame::inches(0.5, 1.0, 6.0, 1.0), 2, 3);
        if let Some(cell) = table.cell_mut(0, 0) {
            *cell = TableCell {
                body: TextBody::single("項目", Font::new(10.0, WHITE).bold(true), Align::Left),
                fill: Some(NAVY),
                anchor: Some(Anchor::Middle),
                ..TableCell::default()
            };
        }
        let mut slide = Slide::blank(WHITE);
        slide.push(table);
        let xml = render(&slide, &[]);
        assert_eq!(xml.matches("<a:gridCol ").count(), 3);
        assert_eq!(xml.matches("<a:tr ").count(), 2);
        assert_eq!(xml.matches("<a:tc>").count(), 6);
        assert!(xml.contains("anchor=\"ctr\""));
        assert!(xml.contains("<a:tableStyleId>{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}</a:tableStyleId>"));
        assert!(xml.contains("<a:t>項目</a:t>"));
    }

    #[test]
    fn test_background_fill() {
        let slide = Slide::blank(NAVY);
        let xml = render(&slide, &[]);
        assert!(xml.contains("<p:bgPr><a:solidFill><a:srgbClr val=\"1B2A4A\"/></a:solidFill>"));
    }
}
