//! RGB colours and the corporate palette shared by charts and slides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without a leading `#`, as DrawingML `srgbClr` expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS/SVG form, e.g. `#1B2A4A`.
    pub fn svg(&self) -> String {
        format!("#{}", self.hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Clean corporate palette: navy, blue, grey and an orange accent.
pub mod palette {
    use super::Color;

    pub const NAVY: Color = Color::rgb(0x1B, 0x2A, 0x4A);
    pub const BLUE: Color = Color::rgb(0x2E, 0x6D, 0xA4);
    pub const LIGHT_BLUE: Color = Color::rgb(0x5B, 0xA4, 0xCF);
    pub const ACCENT: Color = Color::rgb(0xE8, 0x91, 0x3A);
    pub const ACCENT_RED: Color = Color::rgb(0xD6, 0x40, 0x45);
    pub const GREY: Color = Color::rgb(0x8C, 0x8C, 0x8C);
    pub const DARK_GREY: Color = Color::rgb(0x4A, 0x4A, 0x4A);
    pub const LIGHT_GREY: Color = Color::rgb(0xD9, 0xD9, 0xD9);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);

    /// Off-white figure background used by every chart.
    pub const BG: Color = Color::rgb(0xFA, 0xFA, 0xFA);

    pub const TABLE_HEADER_BG: Color = NAVY;
    pub const TABLE_ROW_ALT: Color = Color::rgb(0xF0, 0xF4, 0xF8);

    /// Pale blue used behind key messages and chart callouts.
    pub const MESSAGE_BG: Color = Color::rgb(0xE8, 0xF4, 0xFD);
    /// Pale orange behind the chart callout boxes.
    pub const CALLOUT_BG: Color = Color::rgb(0xFF, 0xF3, 0xE0);
    /// Card fill for the decision boxes on the title slide.
    pub const CARD_BG: Color = Color::rgb(0xF5, 0xF7, 0xFA);
    /// Card fill for quadrant and option panels.
    pub const PANEL_BG: Color = Color::rgb(0xF8, 0xF9, 0xFB);
}

#[cfg(test)]
mod tests {
    use super::palette::*;

    #[test]
    fn test_hex_is_upper_case_without_hash() {
        assert_eq!(NAVY.hex(), "1B2A4A");
        assert_eq!(ACCENT.hex(), "E8913A");
    }

    #[test]
    fn test_svg_form() {
        assert_eq!(LIGHT_BLUE.svg(), "#5BA4CF");
        assert_eq!(WHITE.to_string(), "#FFFFFF");
    }
}
