//! DrawingML length units.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMUs per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Emu(pub i64);

impl Emu {
    pub const ZERO: Emu = Emu(0);

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn as_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

/// Convert inches to EMU, rounded to the nearest unit.
pub fn inches(value: f64) -> Emu {
    Emu((value * EMU_PER_INCH as f64).round() as i64)
}

/// Convert points to EMU, rounded to the nearest unit.
pub fn points(value: f64) -> Emu {
    Emu((value * EMU_PER_POINT as f64).round() as i64)
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl Sub for Emu {
    type Output = Emu;

    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

impl Mul<f64> for Emu {
    type Output = Emu;

    fn mul(self, rhs: f64) -> Emu {
        Emu((self.0 as f64 * rhs).round() as i64)
    }
}

/// Position and size of a shape on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Frame {
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Shorthand for a frame given entirely in inches.
    pub fn inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(inches(left), inches(top), inches(width), inches(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_round() {
        assert_eq!(inches(1.0), Emu(914_400));
        // 13.333 * 914400 = 12191695.2
        assert_eq!(inches(13.333), Emu(12_191_695));
    }

    #[test]
    fn test_points() {
        assert_eq!(points(1.5), Emu(19_050));
        assert_eq!(points(4.0), Emu(50_800));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(inches(0.8) + inches(0.2), inches(1.0));
        assert_eq!(inches(2.0) - inches(0.5), inches(1.5));
        assert_eq!(inches(3.0) * 0.5, inches(1.5));
    }
}
