//! Layout registry – the closed set of physical flyer formats and their
//! immutable page parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlyerError;

/// One of the fixed physical page variants a flyer is rendered as.
///
/// Variant order is the canonical iteration order used for batch
/// generation and archive entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutFormat {
    A5Portrait,
    A5Landscape,
    A6LongPortrait,
    A6LongLandscape,
}

/// Page parameters and output metadata for one [`LayoutFormat`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub format: LayoutFormat,
    /// Human label shown to users.
    pub name: &'static str,
    /// Page width in millimetres.
    pub width_mm: f32,
    /// Page height in millimetres.
    pub height_mm: f32,
    /// Entry name inside the archive.
    pub file_name: &'static str,
}

const A5_PORTRAIT: LayoutConfig = LayoutConfig {
    format: LayoutFormat::A5Portrait,
    name: "A5 hoch",
    width_mm: 148.0,
    height_mm: 210.0,
    file_name: "einladung-a5-hoch.pdf",
};

const A5_LANDSCAPE: LayoutConfig = LayoutConfig {
    format: LayoutFormat::A5Landscape,
    name: "A5 quer",
    width_mm: 210.0,
    height_mm: 148.0,
    file_name: "einladung-a5-quer.pdf",
};

const A6_LONG_PORTRAIT: LayoutConfig = LayoutConfig {
    format: LayoutFormat::A6LongPortrait,
    name: "A6 lang hoch",
    width_mm: 105.0,
    height_mm: 210.0,
    file_name: "einladung-a6lang-hoch.pdf",
};

const A6_LONG_LANDSCAPE: LayoutConfig = LayoutConfig {
    format: LayoutFormat::A6LongLandscape,
    name: "A6 lang quer",
    width_mm: 210.0,
    height_mm: 105.0,
    file_name: "einladung-a6lang-quer.pdf",
};

const ALL_FORMATS: [LayoutFormat; 4] = [
    LayoutFormat::A5Portrait,
    LayoutFormat::A5Landscape,
    LayoutFormat::A6LongPortrait,
    LayoutFormat::A6LongLandscape,
];

/// Look up the page parameters for a format.
pub fn get(format: LayoutFormat) -> &'static LayoutConfig {
    match format {
        LayoutFormat::A5Portrait => &A5_PORTRAIT,
        LayoutFormat::A5Landscape => &A5_LANDSCAPE,
        LayoutFormat::A6LongPortrait => &A6_LONG_PORTRAIT,
        LayoutFormat::A6LongLandscape => &A6_LONG_LANDSCAPE,
    }
}

/// All registered formats in canonical order.
pub fn all() -> &'static [LayoutFormat] {
    &ALL_FORMATS
}

/// Resolve a format identifier such as `"a5-portrait"`.
pub fn parse(id: &str) -> Result<LayoutFormat, FlyerError> {
    id.parse()
}

/// Archive entry name for a format.
pub fn file_name(format: LayoutFormat) -> &'static str {
    get(format).file_name
}

impl LayoutFormat {
    /// Stable identifier, e.g. `"a6-long-landscape"`.
    pub fn id(self) -> &'static str {
        match self {
            LayoutFormat::A5Portrait => "a5-portrait",
            LayoutFormat::A5Landscape => "a5-landscape",
            LayoutFormat::A6LongPortrait => "a6-long-portrait",
            LayoutFormat::A6LongLandscape => "a6-long-landscape",
        }
    }

    pub fn config(self) -> &'static LayoutConfig {
        get(self)
    }
}

impl fmt::Display for LayoutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LayoutFormat {
    type Err = FlyerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_FORMATS
            .iter()
            .copied()
            .find(|format| format.id() == s)
            .ok_or_else(|| FlyerError::UnknownFormat(s.to_string()))
    }
}

impl LayoutConfig {
    /// Length of the shorter page edge in millimetres.
    pub fn short_edge_mm(&self) -> f32 {
        self.width_mm.min(self.height_mm)
    }

    pub fn is_landscape(&self) -> bool {
        self.width_mm > self.height_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_order_is_stable() {
        let ids: Vec<&str> = all().iter().map(|f| f.id()).collect();
        assert_eq!(
            ids,
            ["a5-portrait", "a5-landscape", "a6-long-portrait", "a6-long-landscape"]
        );
    }

    #[test]
    fn file_names_are_unique() {
        let names: HashSet<&str> = all().iter().map(|f| file_name(*f)).collect();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn parse_rejects_unknown_identifier() {
        assert_eq!(parse("a6-long-landscape").unwrap(), LayoutFormat::A6LongLandscape);
        match parse("a4-portrait") {
            Err(FlyerError::UnknownFormat(id)) => assert_eq!(id, "a4-portrait"),
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
    }

    #[test]
    fn orientation_matches_dimensions() {
        assert!(!get(LayoutFormat::A5Portrait).is_landscape());
        assert!(get(LayoutFormat::A6LongLandscape).is_landscape());
        assert_eq!(get(LayoutFormat::A6LongPortrait).short_edge_mm(), 105.0);
    }

    #[test]
    fn serde_uses_identifiers() {
        let json = serde_json::to_string(&LayoutFormat::A5Landscape).unwrap();
        assert_eq!(json, "\"a5-landscape\"");
    }
}
