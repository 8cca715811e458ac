//! Batch orchestrator – renders one content record in every registered
//! layout format, strictly one format at a time.

use crate::binder::bind;
use crate::builder::build;
use crate::error::{FlyerError, Result};
use crate::record::ContentRecord;
use crate::registry::{self, LayoutFormat};
use crate::render::DocumentRenderer;

/// One produced document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub format: LayoutFormat,
    pub document: Vec<u8>,
}

/// Documents keyed by format, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResults {
    entries: Vec<RenderResult>,
}

impl RenderResults {
    /// Insert or replace the document for `format`. A replaced entry keeps
    /// its original position.
    pub fn insert(&mut self, format: LayoutFormat, document: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.format == format) {
            Some(entry) => entry.document = document,
            None => self.entries.push(RenderResult { format, document }),
        }
    }

    pub fn get(&self, format: LayoutFormat) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.format == format)
            .map(|e| e.document.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderResult> {
        self.entries.iter()
    }

    pub fn formats(&self) -> Vec<LayoutFormat> {
        self.entries.iter().map(|e| e.format).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RenderResults {
    type Item = &'a RenderResult;
    type IntoIter = std::slice::Iter<'a, RenderResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Render every registered format without progress reporting.
pub fn generate_all<R>(record: &ContentRecord, renderer: &R) -> Result<RenderResults>
where
    R: DocumentRenderer + ?Sized,
{
    generate_all_with_progress(record, renderer, |_, _, _| {})
}

/// Render every registered format in canonical registry order.
///
/// `on_progress(format, index, total)` runs before each render with a
/// 0-based `index`, so observers always see the format about to be
/// processed. The first failure aborts the batch and any documents already
/// produced are dropped.
pub fn generate_all_with_progress<R, F>(
    record: &ContentRecord,
    renderer: &R,
    mut on_progress: F,
) -> Result<RenderResults>
where
    R: DocumentRenderer + ?Sized,
    F: FnMut(LayoutFormat, usize, usize),
{
    record.validate()?;

    let formats = registry::all();
    let total = formats.len();
    let mut results = RenderResults::default();

    for (index, &format) in formats.iter().enumerate() {
        on_progress(format, index, total);

        let fields = bind(record);
        let template = build(format);
        let document = renderer
            .render(&template, &fields)
            .map_err(|source| FlyerError::Render { format, source })?;

        log::debug!("{format}: {} bytes ({}/{total})", document.len(), index + 1);
        results.insert(format, document);
    }

    Ok(results)
}
