//! Document renderer – takes a [`TemplateDescription`] plus bound field
//! values and produces a one-page PDF using `printpdf` (v0.8 ops-based API).

use printpdf::*;
use qrcode::{EcLevel, QrCode};

use crate::binder::BoundFields;
use crate::error::RenderError;
use crate::fonts::{lines_that_fit, measure_text_width, wrap_text, ASCENDER_RATIO};
use crate::registry;
use crate::template::{Alignment, FieldKind, FieldName, TemplateDescription, TextStyle, MM_TO_PT};

/// Produces one binary document from a template and its field values.
///
/// Implementations must be stateless across calls: each call receives a
/// freshly built template and freshly bound fields.
pub trait DocumentRenderer {
    fn render(
        &self,
        template: &TemplateDescription,
        fields: &BoundFields,
    ) -> Result<Vec<u8>, RenderError>;
}

/// The shipped engine: builtin Helvetica text and vector QR codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(
        &self,
        template: &TemplateDescription,
        fields: &BoundFields,
    ) -> Result<Vec<u8>, RenderError> {
        render_pdf(template, fields)
    }
}

/// A field rectangle converted to points, origin still top-left.
struct PtRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Render a template into PDF bytes.
pub fn render_pdf(template: &TemplateDescription, fields: &BoundFields) -> Result<Vec<u8>, RenderError> {
    let page_height = template.page_height_pt();

    let title = fields
        .get(FieldName::Title)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(registry::get(template.format).name);
    let mut doc = PdfDocument::new(title);

    let mut ops = Vec::new();
    for placement in &template.fields {
        let value = fields
            .get(placement.name)
            .ok_or_else(|| RenderError::UnboundField(placement.name.to_string()))?;
        let rect = PtRect {
            x: placement.rect.x * MM_TO_PT,
            y: placement.rect.y * MM_TO_PT,
            width: placement.rect.width * MM_TO_PT,
            height: placement.rect.height * MM_TO_PT,
        };

        match &placement.kind {
            FieldKind::Text(style) => {
                render_text(&mut ops, placement.name, value, &rect, style, page_height)?
            }
            FieldKind::QrCode => render_qr(&mut ops, value, &rect, page_height)?,
        }
    }

    let page = PdfPage::new(Mm(template.page_width_mm), Mm(template.page_height_mm), ops);
    doc.with_pages(vec![page]);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());

    log::debug!("rendered {} ({} bytes)", template.format, bytes.len());
    Ok(bytes)
}

fn render_text(
    ops: &mut Vec<Op>,
    name: FieldName,
    value: &str,
    rect: &PtRect,
    style: &TextStyle,
    page_height: f32,
) -> Result<(), RenderError> {
    let [r, g, b] = parse_hex_color(&style.color)?;
    let font = if style.bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    };
    let line_height = style.font_size * style.line_height;

    let mut lines = wrap_text(value, style.font_size, style.bold, rect.width);
    let capacity = lines_that_fit(rect.height, line_height);
    if lines.len() > capacity {
        log::warn!(
            "field `{name}` clipped to {capacity} of {} lines",
            lines.len()
        );
        lines.truncate(capacity);
    }

    // PDF coordinate system: origin at bottom-left.
    let pdf_top = page_height - rect.y;

    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_width = measure_text_width(line, style.font_size, style.bold);
        let x_offset = match style.alignment {
            Alignment::Left => 0.0,
            Alignment::Center => ((rect.width - line_width) / 2.0).max(0.0),
            Alignment::Right => (rect.width - line_width).max(0.0),
        };
        let text_x = rect.x + x_offset;
        // Baseline ≈ top of line + ascender
        let text_y = pdf_top - index as f32 * line_height - style.font_size * ASCENDER_RATIO;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(text_x),
                y: Pt(text_y),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(style.font_size),
            font,
        });
        ops.push(Op::SetLineHeight {
            lh: Pt(line_height),
        });
        ops.push(Op::SetFillColor {
            col: Color::Rgb(Rgb {
                r,
                g,
                b,
                icc_profile: None,
            }),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_winlatin(line))],
            font,
        });
        ops.push(Op::EndTextSection);
    }
    Ok(())
}

/// Draw the QR matrix as filled rectangles, merging horizontal runs of dark
/// modules into one rectangle each.
fn render_qr(ops: &mut Vec<Op>, payload: &str, rect: &PtRect, page_height: f32) -> Result<(), RenderError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| RenderError::QrEncoding(e.to_string()))?;
    let modules = code.width();
    if modules == 0 {
        return Err(RenderError::Engine("QR encoder returned an empty matrix".to_string()));
    }
    let colors = code.to_colors();
    let module = rect.width.min(rect.height) / modules as f32;
    let is_dark = |row: usize, col: usize| colors[row * modules + col] == qrcode::Color::Dark;

    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            icc_profile: None,
        }),
    });

    for row in 0..modules {
        let top = page_height - rect.y - row as f32 * module;
        let mut col = 0;
        while col < modules {
            if !is_dark(row, col) {
                col += 1;
                continue;
            }
            let start = col;
            while col < modules && is_dark(row, col) {
                col += 1;
            }
            ops.push(filled_rect(
                rect.x + start as f32 * module,
                top - module,
                rect.x + col as f32 * module,
                top,
            ));
        }
    }
    Ok(())
}

/// Filled axis-aligned rectangle in PDF coordinates.
fn filled_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Op {
    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![corner(x1, y1), corner(x2, y1), corner(x2, y2), corner(x1, y2)],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    }
}

/// Parse `#rrggbb` or `#rgb` into unit RGB components.
fn parse_hex_color(literal: &str) -> Result<[f32; 3], RenderError> {
    let invalid = || RenderError::InvalidColor(literal.to_string());
    let hex = literal.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let expanded: String = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid()),
    };

    let mut rgb = [0.0f32; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes = winlatin_bytes(s);
    // SAFETY: intentionally non-UTF-8 for bytes >= 0x80; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

/// Windows-1252 code for each char; `?` where the encoding has no glyph.
fn winlatin_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind;
    use crate::builder::build;
    use crate::record::ContentRecord;
    use crate::registry::LayoutFormat;

    fn assert_valid_pdf(bytes: &[u8]) {
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn render_title_only_record() {
        let template = build(LayoutFormat::A5Portrait);
        let bytes = render_pdf(&template, &bind(&ContentRecord::new("Gottesdienst"))).unwrap();
        assert_valid_pdf(&bytes);
    }

    #[test]
    fn render_long_description_is_clipped_not_rejected() {
        let record = ContentRecord::new("Gemeindefest")
            .with_description("Kuchen und Kaffee für alle. ".repeat(200));
        let template = build(LayoutFormat::A6LongLandscape);
        let bytes = PdfRenderer.render(&template, &bind(&record)).unwrap();
        assert_valid_pdf(&bytes);
    }

    #[test]
    fn oversized_qr_payload_is_a_render_error() {
        let record = ContentRecord::new("Konzert").with_qr_payload("x".repeat(4000));
        let template = build(LayoutFormat::A5Portrait);
        let err = render_pdf(&template, &bind(&record)).unwrap_err();
        assert!(matches!(err, RenderError::QrEncoding(_)), "{err:?}");
    }

    #[test]
    fn unbound_field_is_reported() {
        let template = build(LayoutFormat::A5Portrait);
        let mut fields = BoundFields::default();
        fields.insert(FieldName::Title, "Nur Titel");
        let err = render_pdf(&template, &fields).unwrap_err();
        assert_eq!(err, RenderError::UnboundField("datetime".to_string()));
    }

    #[test]
    fn invalid_colour_is_reported() {
        let mut template = build(LayoutFormat::A5Portrait);
        if let FieldKind::Text(style) = &mut template.fields[0].kind {
            style.color = "blue".to_string();
        }
        let err = render_pdf(&template, &bind(&ContentRecord::new("Titel"))).unwrap_err();
        assert_eq!(err, RenderError::InvalidColor("blue".to_string()));
    }

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#ffffff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color("#000").unwrap(), [0.0, 0.0, 0.0]);
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("#ääää").is_err());
    }

    #[test]
    fn winansi_punctuation_is_encoded() {
        assert_eq!(
            winlatin_bytes("Marke™ ‚x"),
            [b'M', b'a', b'r', b'k', b'e', 0x99, b' ', 0x82, b'x']
        );
        assert_eq!(winlatin_bytes("„Grüße“ – 5 €"), [
            0x84, b'G', b'r', 0xFC, 0xDF, b'e', 0x93, b' ', 0x96, b' ', b'5', b' ', 0x80
        ]);
        assert_eq!(winlatin_bytes("\u{00A0}✓"), [b' ', b'?']);
    }
}
