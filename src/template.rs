//! Template description – the intermediate representation between the
//! template builder and the renderer. It encodes exactly which field goes
//! where on the single page of one layout format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::LayoutFormat;

/// Millimetres to PDF points (1 pt = 1/72 inch).
pub const MM_TO_PT: f32 = 2.83465;

/// Names of the fields a template can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Title,
    Datetime,
    Location,
    Speaker,
    #[serde(rename = "desc")]
    Description,
    Qr,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Datetime => "datetime",
            FieldName::Location => "location",
            FieldName::Speaker => "speaker",
            FieldName::Description => "desc",
            FieldName::Qr => "qr",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete single-page template ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescription {
    pub format: LayoutFormat,
    /// Page width in millimetres.
    pub page_width_mm: f32,
    /// Page height in millimetres.
    pub page_height_mm: f32,
    /// Placements in drawing order.
    pub fields: Vec<FieldPlacement>,
}

/// One field positioned on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub name: FieldName,
    pub rect: Rect,
    pub kind: FieldKind,
}

/// Rectangle relative to the page's top-left corner, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text(TextStyle),
    #[serde(rename = "qrcode")]
    QrCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f32,
    /// `#rrggbb` colour literal.
    pub color: String,
    pub alignment: Alignment,
    #[serde(default)]
    pub bold: bool,
    /// Line height as a multiple of the font size.
    #[serde(default = "TextStyle::default_line_height")]
    pub line_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextStyle {
    pub fn new(font_size: f32, color: &str) -> Self {
        Self {
            font_size,
            color: color.to_string(),
            alignment: Alignment::Left,
            bold: false,
            line_height: Self::default_line_height(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn default_line_height() -> f32 {
        1.2
    }
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the rectangle lies entirely within `[0, width] × [0, height]`.
    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

impl TemplateDescription {
    pub fn field(&self, name: FieldName) -> Option<&FieldPlacement> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn page_width_pt(&self) -> f32 {
        self.page_width_mm * MM_TO_PT
    }

    pub fn page_height_pt(&self) -> f32 {
        self.page_height_mm * MM_TO_PT
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}
