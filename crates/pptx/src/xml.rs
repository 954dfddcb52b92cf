//! Thin wrapper over the quick-xml writer used for every generated part.

use nexpro_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URI under the officeDocument namespace.
pub(crate) fn rel_type(kind: &str) -> String {
    format!("{}/{}", NS_R, kind)
}

/// Streaming XML writer producing a standalone UTF-8 document.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

impl XmlWriter {
    pub(crate) fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::with_capacity(4096));
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { inner })
    }

    fn open<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        elem
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Start(Self::open(name, attrs)))
            .map_err(xml_err)
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Empty(Self::open(name, attrs)))
            .map_err(xml_err)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    /// Escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)
    }

    /// `<name attrs>text</name>`
    pub(crate) fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// `<a:solidFill><a:srgbClr val="RRGGBB"/></a:solidFill>`
    pub(crate) fn solid_fill(&mut self, hex: &str) -> Result<()> {
        self.start("a:solidFill", &[])?;
        self.empty("a:srgbClr", &[("val", hex)])?;
        self.end("a:solidFill")
    }

    pub(crate) fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| Error::XmlError(format!("Generated XML is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_escapes_text_and_attributes() {
        let mut w = XmlWriter::new().unwrap();
        w.element("a:t", &[("lang", "ja-JP")], "R&D <改善>").unwrap();
        w.empty("x", &[("v", "\"q\"")]).unwrap();
        let xml = w.finish().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("<a:t lang=\"ja-JP\">R&amp;D &lt;改善&gt;</a:t>"));
        assert!(xml.contains("<x v=\"&quot;q&quot;\"/>"));
    }

    #[test]
    fn test_rel_type() {
        assert_eq!(
            rel_type("slide"),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide"
        );
    }
}
