//! Export settings
//!
//! Page setup, header/footer options and branding colours for preview and
//! PDF export. Every field has a default so clients may send partial JSON.

use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").expect("hex colour pattern is valid")
});

/// Paper size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageFormat {
    /// Portrait (width, height) in millimetres
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::Legal => (215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            bottom: 30.0,
            left: 20.0,
            right: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderOptions {
    pub enabled: bool,
    pub include_date: bool,
    pub include_page_number: bool,
    pub custom_text: String,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            include_date: true,
            include_page_number: true,
            custom_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterOptions {
    pub enabled: bool,
    pub company_name: String,
    pub include_confidential: bool,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            company_name: "Your Company Name".to_string(),
            include_confidential: true,
        }
    }
}

/// An sRGB colour written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Components scaled to 0.0..=1.0
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl FromStr for HexColor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !HEX_COLOR.is_match(s) {
            return Err(AppError::Validation(format!(
                "Invalid colour '{}', expected #rrggbb",
                s
            )));
        }
        let digits = &s[1..];
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|e| AppError::Validation(format!("Invalid colour '{}': {}", s, e)))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub primary_color: HexColor,
    pub accent_color: HexColor,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: HexColor::rgb(0x25, 0x63, 0xeb),
            accent_color: HexColor::rgb(0x1e, 0x40, 0xaf),
        }
    }
}

/// All options of the export dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfExportSettings {
    pub format: PageFormat,
    pub orientation: Orientation,
    pub margins: Margins,
    pub header: HeaderOptions,
    pub footer: FooterOptions,
    pub branding: Branding,
    /// `None` defers to the server configuration
    pub compress: Option<bool>,
}

impl Default for PdfExportSettings {
    fn default() -> Self {
        Self {
            format: PageFormat::default(),
            orientation: Orientation::default(),
            margins: Margins::default(),
            header: HeaderOptions::default(),
            footer: FooterOptions::default(),
            branding: Branding::default(),
            compress: None,
        }
    }
}

impl PdfExportSettings {
    /// Page (width, height) in millimetres after orientation
    pub fn page_size_mm(&self) -> (f32, f32) {
        let (w, h) = self.format.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Width available to body text
    pub fn content_width_mm(&self) -> f32 {
        let (w, _) = self.page_size_mm();
        w - self.margins.left - self.margins.right
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let m = &self.margins;
        if [m.top, m.bottom, m.left, m.right]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(AppError::Validation(
                "Margins must be non-negative numbers".to_string(),
            ));
        }

        let (w, h) = self.page_size_mm();
        if m.left + m.right >= w {
            return Err(AppError::Validation(format!(
                "Left and right margins leave no printable width on a {:.1}mm wide page",
                w
            )));
        }
        if m.top + m.bottom >= h {
            return Err(AppError::Validation(format!(
                "Top and bottom margins leave no printable height on a {:.1}mm tall page",
                h
            )));
        }
        if self.header.custom_text.chars().count() > 200 {
            return Err(AppError::Validation(
                "Custom header text must be at most 200 characters".to_string(),
            ));
        }
        Ok(())
    }
}
