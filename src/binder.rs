//! Field binder – maps a [`ContentRecord`] onto the named template fields.

use std::collections::BTreeMap;

use crate::record::ContentRecord;
use crate::template::FieldName;

/// QR payload used when the record carries none.
pub const PLACEHOLDER_QR_PAYLOAD: &str = "https://example.com";

/// Field values keyed by template field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundFields {
    values: BTreeMap<FieldName, String>,
}

impl BoundFields {
    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    pub fn insert(&mut self, name: FieldName, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind every template field. Never fails: absent or empty attributes bind
/// to `""`, except the QR payload which falls back to
/// [`PLACEHOLDER_QR_PAYLOAD`].
pub fn bind(record: &ContentRecord) -> BoundFields {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let qr = match record.qr_payload.as_deref() {
        Some(payload) if !payload.is_empty() => payload.to_string(),
        _ => PLACEHOLDER_QR_PAYLOAD.to_string(),
    };

    let mut fields = BoundFields::default();
    fields.insert(FieldName::Title, record.title.clone());
    fields.insert(FieldName::Datetime, text(&record.datetime));
    fields.insert(FieldName::Location, text(&record.location));
    fields.insert(FieldName::Speaker, text(&record.speaker));
    fields.insert(FieldName::Description, text(&record.description));
    fields.insert(FieldName::Qr, qr);
    fields
}
