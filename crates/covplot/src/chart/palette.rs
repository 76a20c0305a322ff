//! Chart colours

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create color from hex value
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    #[must_use]
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Opaque RGBA pixel
    #[must_use]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Named colours used by the chart
pub mod colors {
    use super::Rgb;

    /// Default bar fill
    pub const SKY_BLUE: Rgb = Rgb::from_hex(0x87CEEB);
    /// Canvas background
    pub const WHITE: Rgb = Rgb::from_hex(0xFFFFFF);
    /// Axes and text
    pub const INK: Rgb = Rgb::from_hex(0x222222);
    /// Gridlines
    pub const GRID: Rgb = Rgb::from_hex(0xE0E0E0);
}

/// Coverage band colours, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Color below 50%
    pub low: Rgb,
    /// Color from 50% to below 75%
    pub medium: Rgb,
    /// Color from 75% to below 90%
    pub high: Rgb,
    /// Color from 90%
    pub full: Rgb,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::traffic_light()
    }
}

impl ColorPalette {
    /// Red-Orange-Yellow-Green palette (traffic light)
    #[must_use]
    pub const fn traffic_light() -> Self {
        Self {
            low: Rgb::from_hex(0xE45756),    // Red
            medium: Rgb::from_hex(0xF28E2B), // Orange
            high: Rgb::from_hex(0xEDC948),   // Yellow
            full: Rgb::from_hex(0x59A14F),   // Green
        }
    }

    /// Get color for a coverage percentage (0-100)
    #[must_use]
    pub fn color_for_coverage(&self, percentage: f64) -> Rgb {
        match percentage {
            p if p < 50.0 => self.low,
            p if p < 75.0 => self.medium,
            p if p < 90.0 => self.high,
            _ => self.full,
        }
    }
}

/// How bars are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarPalette {
    /// Every bar uses the style's bar color
    #[default]
    Solid,
    /// Bars take the traffic-light band of their coverage
    Threshold,
}
