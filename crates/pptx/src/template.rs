//! Fixed package parts shared by every generated deck.
//!
//! The deck uses a single blank layout; all visible content lives on the
//! slides themselves.

pub(crate) const SLIDE_MASTER: &str = include_str!("../resources/slideMaster1.xml");
pub(crate) const SLIDE_LAYOUT: &str = include_str!("../resources/slideLayout1.xml");
pub(crate) const THEME: &str = include_str!("../resources/theme1.xml");
pub(crate) const PRES_PROPS: &str = include_str!("../resources/presProps.xml");
pub(crate) const VIEW_PROPS: &str = include_str!("../resources/viewProps.xml");
pub(crate) const TABLE_STYLES: &str = include_str!("../resources/tableStyles.xml");

/// Built-in "Medium Style 2 - Accent 1" table style.
pub(crate) const TABLE_STYLE_ID: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

/// Id of the only slide master, as referenced from `presentation.xml`.
pub(crate) const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// First id handed out in `p:sldIdLst`.
pub(crate) const FIRST_SLIDE_ID: u32 = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_xml_documents() {
        for part in [SLIDE_MASTER, SLIDE_LAYOUT, THEME, PRES_PROPS, VIEW_PROPS, TABLE_STYLES] {
            assert!(part.starts_with("<?xml"));
        }
        assert!(TABLE_STYLES.contains(TABLE_STYLE_ID));
        assert!(SLIDE_LAYOUT.contains("type=\"blank\""));
    }
}
