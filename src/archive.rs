//! Archiver – packs rendered documents into a single ZIP container.

use std::io::{Cursor, Write};

use zip::result::ZipResult;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::batch::RenderResults;
use crate::error::Result;
use crate::registry;

/// A finished archive held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    bytes: Vec<u8>,
    entries: Vec<String>,
}

impl Archive {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Pack every result, in its existing order, as one deflated entry named
/// after the format's registered file name.
pub fn pack(results: &RenderResults) -> Result<Archive> {
    let (bytes, entries) = write_entries(results)?;
    log::debug!("packed {} entries ({} bytes)", entries.len(), bytes.len());
    Ok(Archive { bytes, entries })
}

fn write_entries(results: &RenderResults) -> ZipResult<(Vec<u8>, Vec<String>)> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(results.len());

    for result in results {
        let name = registry::file_name(result.format);
        zip.start_file(name, options)?;
        zip.write_all(&result.document)?;
        entries.push(name.to_string());
    }

    let cursor = zip.finish()?;
    Ok((cursor.into_inner(), entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LayoutFormat;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn entries_follow_result_order() {
        let mut results = RenderResults::default();
        results.insert(LayoutFormat::A6LongLandscape, b"%PDF-b".to_vec());
        results.insert(LayoutFormat::A5Portrait, b"%PDF-a".to_vec());

        let archive = pack(&results).unwrap();
        assert_eq!(
            archive.entry_names(),
            ["einladung-a6lang-quer.pdf", "einladung-a5-hoch.pdf"]
        );

        let mut zip = ZipArchive::new(Cursor::new(archive.into_bytes())).unwrap();
        assert_eq!(zip.len(), 2);
        let mut body = Vec::new();
        zip.by_name("einladung-a5-hoch.pdf")
            .unwrap()
            .read_to_end(&mut body)
            .unwrap();
        assert_eq!(body, b"%PDF-a");
    }

    #[test]
    fn empty_results_give_empty_archive() {
        let archive = pack(&RenderResults::default()).unwrap();
        assert!(archive.entry_names().is_empty());
        let zip = ZipArchive::new(Cursor::new(archive.bytes().to_vec())).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
