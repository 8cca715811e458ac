//! Delivery – names the archive and saves it to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::archive::Archive;
use crate::error::Result;

/// Maximum number of UTF-16 code units of the title kept in the archive name.
pub const MAX_TITLE_UNITS: usize = 30;

const ALLOWED_ACCENTED: &[char] = &['ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß'];

/// Replace every character outside ASCII alphanumerics and the German
/// umlauts with `-`, keeping at most [`MAX_TITLE_UNITS`] UTF-16 units.
///
/// Lengths are counted in UTF-16 units so names agree with the web client:
/// a character outside the BMP becomes `--` and takes two slots.
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::new();
    let mut units = 0;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || ALLOWED_ACCENTED.contains(&c) {
            if units == MAX_TITLE_UNITS {
                break;
            }
            sanitized.push(c);
            units += 1;
        } else {
            for _ in 0..c.len_utf16() {
                if units == MAX_TITLE_UNITS {
                    break;
                }
                sanitized.push('-');
                units += 1;
            }
        }
    }
    sanitized
}

/// `flyer-<sanitized title>-<YYYY-MM-DD>.zip`
pub fn archive_file_name(title: &str, date: Date) -> Result<String> {
    let format = format_description!("[year]-[month]-[day]");
    let date = date.format(&format)?;
    Ok(format!("flyer-{}-{date}.zip", sanitize_title(title)))
}

/// Today's date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Write the archive into `dir` under `file_name`, creating the directory
/// if necessary. Returns the written path.
///
/// The bytes go to a temporary file in `dir` that is renamed into place, so
/// a failed write never leaves a partial archive under the final name.
pub fn deliver(archive: &Archive, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let staging_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    fs::create_dir_all(staging_dir)?;
    let path = dir.join(file_name);

    let mut staged = NamedTempFile::new_in(staging_dir)?;
    staged.write_all(archive.bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(&path).map_err(|e| e.error)?;

    log::info!("wrote {} ({} bytes)", path.display(), archive.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::pack;
    use crate::batch::RenderResults;
    use crate::error::FlyerError;
    use time::macros::date;

    #[test]
    fn sanitize_keeps_umlauts() {
        assert_eq!(sanitize_title("Grüße aus Köln!"), "Grüße-aus-Köln-");
        assert_eq!(sanitize_title("Café"), "Caf-");
    }

    #[test]
    fn sanitize_truncates_by_utf16_units() {
        let long = "ä".repeat(40);
        assert_eq!(sanitize_title(&long).chars().count(), MAX_TITLE_UNITS);
    }

    #[test]
    fn sanitize_counts_astral_characters_twice() {
        assert_eq!(sanitize_title("Fest 🎉 heute"), "Fest----heute");
        let title = format!("{}🎉", "a".repeat(29));
        assert_eq!(sanitize_title(&title), format!("{}-", "a".repeat(29)));
        assert_eq!(sanitize_title(&format!("🎉{}", "b".repeat(40))).len(), 30);
    }

    #[test]
    fn deliver_writes_archive_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let archive = pack(&RenderResults::default()).unwrap();
        let path = deliver(&archive, &dir.path().join("out"), "flyer-x-2026-10-16.zip").unwrap();
        assert_eq!(fs::read(&path).unwrap(), archive.bytes());
        assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 1);
    }

    #[test]
    fn failed_delivery_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let name = "flyer-x-2026-10-16.zip";
        // A directory squatting on the target name makes the final rename fail.
        fs::create_dir(dir.path().join(name)).unwrap();
        let archive = pack(&RenderResults::default()).unwrap();

        let err = deliver(&archive, dir.path(), name).unwrap_err();
        assert!(matches!(err, FlyerError::Delivery(_)), "{err:?}");

        let left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, [std::ffi::OsString::from(name)]);
        assert!(dir.path().join(name).is_dir());
    }

    #[test]
    fn archive_name_convention() {
        let name = archive_file_name("Gottesdienst am Sonntag", date!(2026 - 03 - 08)).unwrap();
        assert_eq!(name, "flyer-Gottesdienst-am-Sonntag-2026-03-08.zip");
    }
}
