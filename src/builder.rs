//! Template builder – turns a [`LayoutFormat`] into a [`TemplateDescription`].
//!
//! The placement for each format is hand-tuned, but the tuning lives in a
//! [`FormatGeometry`] table rather than in code: a single [`layout`]
//! function reads the table and the page size from the registry and emits
//! the placements. Templates are rebuilt on every call.

use crate::registry::{self, LayoutConfig, LayoutFormat};
use crate::template::{FieldKind, FieldName, FieldPlacement, Rect, TemplateDescription, TextStyle};

const TITLE_COLOR: &str = "#1e40af";
const BODY_COLOR: &str = "#374151";
const MUTED_COLOR: &str = "#6b7280";

/// Per-format placement parameters, all in millimetres (font sizes in points).
#[derive(Debug, Clone, Copy)]
pub struct FormatGeometry {
    /// Distance from every page edge to the content.
    pub padding: f32,
    /// Baseline from which the detail rows are offset.
    pub header_height: f32,
    pub title: Slot,
    pub datetime: Slot,
    pub location: Slot,
    pub speaker: Slot,
    pub description: Slot,
    /// Horizontal space kept free beside the description for the QR column.
    pub description_reserve: f32,
    /// Edge length of the QR square.
    pub qr_size: f32,
}

/// Vertical placement of one text field with optional horizontal overrides.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    /// Offset below the header line (the title's is from the page top).
    pub offset: f32,
    pub height: f32,
    pub font_size: f32,
    /// Left edge; defaults to the padding.
    pub x: Option<f32>,
    /// Width; defaults to the content width.
    pub width: Option<f32>,
}

impl Slot {
    const fn full(offset: f32, height: f32, font_size: f32) -> Self {
        Self {
            offset,
            height,
            font_size,
            x: None,
            width: None,
        }
    }

    const fn narrow(offset: f32, height: f32, font_size: f32, width: f32) -> Self {
        Self {
            offset,
            height,
            font_size,
            x: None,
            width: Some(width),
        }
    }

    const fn at(x: f32, offset: f32, height: f32, font_size: f32, width: f32) -> Self {
        Self {
            offset,
            height,
            font_size,
            x: Some(x),
            width: Some(width),
        }
    }
}

const A5_PORTRAIT: FormatGeometry = FormatGeometry {
    padding: 10.0,
    header_height: 40.0,
    title: Slot::full(15.0, 20.0, 18.0),
    datetime: Slot::full(10.0, 10.0, 10.0),
    location: Slot::full(25.0, 10.0, 10.0),
    speaker: Slot::full(40.0, 10.0, 9.0),
    description: Slot::full(60.0, 80.0, 9.0),
    description_reserve: 45.0,
    qr_size: 35.0,
};

const A5_LANDSCAPE: FormatGeometry = FormatGeometry {
    padding: 10.0,
    header_height: 35.0,
    title: Slot::full(12.0, 18.0, 16.0),
    datetime: Slot::narrow(8.0, 8.0, 9.0, 90.0),
    location: Slot::narrow(20.0, 8.0, 9.0, 90.0),
    speaker: Slot::narrow(32.0, 8.0, 8.0, 90.0),
    description: Slot::full(50.0, 60.0, 8.0),
    description_reserve: 45.0,
    qr_size: 30.0,
};

// The description runs full width; the QR sits below it.
const A6_LONG_PORTRAIT: FormatGeometry = FormatGeometry {
    padding: 6.0,
    header_height: 25.0,
    title: Slot::full(10.0, 12.0, 10.0),
    datetime: Slot::full(6.0, 6.0, 6.0),
    location: Slot::full(15.0, 6.0, 6.0),
    speaker: Slot::full(24.0, 6.0, 5.0),
    description: Slot::full(38.0, 100.0, 5.0),
    description_reserve: 0.0,
    qr_size: 20.0,
};

// Date and location share the first row.
const A6_LONG_LANDSCAPE: FormatGeometry = FormatGeometry {
    padding: 8.0,
    header_height: 25.0,
    title: Slot::full(10.0, 12.0, 12.0),
    datetime: Slot::narrow(6.0, 6.0, 7.0, 80.0),
    location: Slot::at(100.0, 6.0, 6.0, 7.0, 80.0),
    speaker: Slot::narrow(18.0, 6.0, 6.0, 80.0),
    description: Slot::full(32.0, 45.0, 6.0),
    description_reserve: 35.0,
    qr_size: 25.0,
};

/// Placement table for a format.
pub fn geometry(format: LayoutFormat) -> &'static FormatGeometry {
    match format {
        LayoutFormat::A5Portrait => &A5_PORTRAIT,
        LayoutFormat::A5Landscape => &A5_LANDSCAPE,
        LayoutFormat::A6LongPortrait => &A6_LONG_PORTRAIT,
        LayoutFormat::A6LongLandscape => &A6_LONG_LANDSCAPE,
    }
}

/// Build the template for a registered format.
pub fn build(format: LayoutFormat) -> TemplateDescription {
    layout(registry::get(format), geometry(format))
}

/// Build the template for a format identifier, failing with
/// `UnknownFormat` for identifiers outside the registry.
pub fn build_by_id(id: &str) -> crate::error::Result<TemplateDescription> {
    Ok(build(registry::parse(id)?))
}

/// Place every field for one page size and geometry table.
///
/// The title runs along the top margin, the detail rows follow below the
/// header line, the description takes the remaining width beside the QR
/// column, and the QR square is anchored to the lower-right corner.
pub fn layout(page: &LayoutConfig, geo: &FormatGeometry) -> TemplateDescription {
    let content_width = page.width_mm - geo.padding * 2.0;

    let text_field = |name: FieldName, top: f32, slot: &Slot, default_width: f32, style: TextStyle| {
        FieldPlacement {
            name,
            rect: Rect::new(
                slot.x.unwrap_or(geo.padding),
                top,
                slot.width.unwrap_or(default_width),
                slot.height,
            ),
            kind: FieldKind::Text(style),
        }
    };
    let row = |name: FieldName, slot: &Slot, color: &str| {
        text_field(
            name,
            geo.header_height + slot.offset,
            slot,
            content_width,
            TextStyle::new(slot.font_size, color),
        )
    };

    let title = text_field(
        FieldName::Title,
        geo.title.offset,
        &geo.title,
        content_width,
        TextStyle::new(geo.title.font_size, TITLE_COLOR).bold(),
    );
    let description = text_field(
        FieldName::Description,
        geo.header_height + geo.description.offset,
        &geo.description,
        content_width - geo.description_reserve,
        TextStyle::new(geo.description.font_size, BODY_COLOR),
    );
    let qr = FieldPlacement {
        name: FieldName::Qr,
        rect: Rect::new(
            page.width_mm - geo.padding - geo.qr_size,
            page.height_mm - geo.padding - geo.qr_size,
            geo.qr_size,
            geo.qr_size,
        ),
        kind: FieldKind::QrCode,
    };

    TemplateDescription {
        format: page.format,
        page_width_mm: page.width_mm,
        page_height_mm: page.height_mm,
        fields: vec![
            title,
            row(FieldName::Datetime, &geo.datetime, BODY_COLOR),
            row(FieldName::Location, &geo.location, BODY_COLOR),
            row(FieldName::Speaker, &geo.speaker, MUTED_COLOR),
            description,
            qr,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlyerError;

    fn font_size(placement: &FieldPlacement) -> Option<f32> {
        match &placement.kind {
            FieldKind::Text(style) => Some(style.font_size),
            FieldKind::QrCode => None,
        }
    }

    #[test]
    fn every_field_fits_on_its_page() {
        for &format in registry::all() {
            let template = build(format);
            for field in &template.fields {
                assert!(
                    field.rect.fits_within(template.page_width_mm, template.page_height_mm),
                    "{format}: {} at {:?} leaves the {}×{} page",
                    field.name,
                    field.rect,
                    template.page_width_mm,
                    template.page_height_mm
                );
            }
        }
    }

    #[test]
    fn every_template_places_all_six_fields() {
        for &format in registry::all() {
            let template = build(format);
            assert_eq!(template.fields.len(), 6, "{format}");
            for name in [
                FieldName::Title,
                FieldName::Datetime,
                FieldName::Location,
                FieldName::Speaker,
                FieldName::Description,
                FieldName::Qr,
            ] {
                assert!(template.field(name).is_some(), "{format} lacks {name}");
            }
        }
    }

    #[test]
    fn qr_is_square_in_lower_right_quadrant() {
        for &format in registry::all() {
            let template = build(format);
            let qr = template.field(FieldName::Qr).unwrap();
            assert_eq!(qr.rect.width, qr.rect.height);
            assert!(qr.rect.x >= template.page_width_mm / 2.0, "{format}");
            assert!(qr.rect.y >= template.page_height_mm / 2.0, "{format}");
            let short = registry::get(format).short_edge_mm();
            assert!(qr.rect.width < short / 3.0, "{format}: QR too large");
        }
    }

    #[test]
    fn title_has_largest_font() {
        for &format in registry::all() {
            let template = build(format);
            let title = font_size(template.field(FieldName::Title).unwrap()).unwrap();
            for field in template.fields.iter().filter(|f| f.name != FieldName::Title) {
                if let Some(size) = font_size(field) {
                    assert!(size < title, "{format}: {} ({size}) >= title ({title})", field.name);
                }
            }
        }
    }

    #[test]
    fn description_leaves_room_for_qr_column() {
        for &format in registry::all() {
            let template = build(format);
            let desc = template.field(FieldName::Description).unwrap().rect;
            let qr = template.field(FieldName::Qr).unwrap().rect;
            let beside = desc.right() <= qr.x;
            let above = desc.bottom() <= qr.y;
            assert!(beside || above, "{format}: description overlaps QR");
        }
    }

    #[test]
    fn a6_long_landscape_shares_first_row() {
        let template = build(LayoutFormat::A6LongLandscape);
        let date = template.field(FieldName::Datetime).unwrap().rect;
        let location = template.field(FieldName::Location).unwrap().rect;
        assert_eq!(date.y, location.y);
        assert_eq!(location.x, 100.0);
        assert!(date.right() <= location.x);
    }

    #[test]
    fn a5_portrait_matches_reference_geometry() {
        let template = build(LayoutFormat::A5Portrait);
        let desc = template.field(FieldName::Description).unwrap().rect;
        assert_eq!(desc, Rect::new(10.0, 100.0, 83.0, 80.0));
        let qr = template.field(FieldName::Qr).unwrap().rect;
        assert_eq!(qr, Rect::new(103.0, 165.0, 35.0, 35.0));
    }

    #[test]
    fn build_is_deterministic() {
        for &format in registry::all() {
            assert_eq!(build(format), build(format));
        }
    }

    #[test]
    fn build_by_id_delegates_unknown_formats() {
        assert!(build_by_id("a5-landscape").is_ok());
        assert!(matches!(build_by_id("letter"), Err(FlyerError::UnknownFormat(_))));
    }

    #[test]
    fn template_json_roundtrip() {
        let template = build(LayoutFormat::A5Landscape);
        let parsed = TemplateDescription::from_json(&template.to_json()).unwrap();
        assert_eq!(parsed, template);
    }
}
