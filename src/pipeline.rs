//! Pipeline – ties together validation, batch generation, packaging, and
//! delivery into a single function call.

use std::path::PathBuf;

use serde::Serialize;
use time::Date;

use crate::archive::{pack, Archive};
use crate::batch::generate_all_with_progress;
use crate::delivery::{archive_file_name, deliver, today};
use crate::error::Result;
use crate::record::ContentRecord;
use crate::registry::{self, LayoutFormat};
use crate::render::DocumentRenderer;

/// Pipeline stage reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Generating,
    Zipping,
    Downloading,
}

/// One progress event. `current` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<LayoutFormat>,
    pub current: usize,
    pub total: usize,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory the archive is written to (default: current directory).
    pub output_dir: PathBuf,
    /// Date embedded in the archive name; `None` means today (UTC).
    pub date: Option<Date>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            date: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Render every format and pack the results, without saving.
pub fn build_archive<R, F>(record: &ContentRecord, renderer: &R, on_progress: &mut F) -> Result<Archive>
where
    R: DocumentRenderer + ?Sized,
    F: FnMut(Progress),
{
    record.validate()?;

    log::info!("generating {} formats for `{}`", registry::all().len(), record.title);
    let results = generate_all_with_progress(record, renderer, |format, index, total| {
        on_progress(Progress {
            stage: Stage::Generating,
            format: Some(format),
            current: index + 1,
            total,
        })
    })?;

    on_progress(Progress {
        stage: Stage::Zipping,
        format: None,
        current: 1,
        total: 1,
    });
    log::info!("zipping {} documents", results.len());
    pack(&results)
}

/// Full pipeline: content record → archive on disk.
///
/// Fails without writing anything if any stage fails. Returns the path of
/// the written archive.
pub fn generate_and_deliver<R, F>(
    record: &ContentRecord,
    config: &PipelineConfig,
    renderer: &R,
    mut on_progress: F,
) -> Result<PathBuf>
where
    R: DocumentRenderer + ?Sized,
    F: FnMut(Progress),
{
    let archive = build_archive(record, renderer, &mut on_progress)?;
    let file_name = archive_file_name(&record.title, config.date.unwrap_or_else(today))?;

    on_progress(Progress {
        stage: Stage::Downloading,
        format: None,
        current: 1,
        total: 1,
    });
    log::info!("downloading {file_name} to {}", config.output_dir.display());
    deliver(&archive, &config.output_dir, &file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PdfRenderer;
    use std::sync::{Mutex, Once};
    use time::macros::date;

    /// Process-wide logger that keeps every record for inspection.
    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());
    static INSTALL: Once = Once::new();

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            CAPTURED
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        INSTALL.call_once(|| {
            log::set_logger(&CaptureLogger).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    fn logged(level: log::Level, needle: &str) -> bool {
        CAPTURED
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }

    #[test]
    fn pipeline_basic() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().to_path_buf(),
            date: Some(date!(2026 - 10 - 16)),
        };
        let mut stages = Vec::new();
        let path = generate_and_deliver(
            &ContentRecord::new("Gottesdienst"),
            &config,
            &PdfRenderer,
            |p| stages.push(p.stage),
        )
        .unwrap();

        assert_eq!(path, dir.path().join("flyer-Gottesdienst-2026-10-16.zip"));
        assert!(path.exists());
        assert_eq!(
            stages,
            [
                Stage::Generating,
                Stage::Generating,
                Stage::Generating,
                Stage::Generating,
                Stage::Zipping,
                Stage::Downloading
            ]
        );
    }

    #[test]
    fn progress_serialises_like_the_event_contract() {
        let event = Progress {
            stage: Stage::Generating,
            format: Some(LayoutFormat::A5Portrait),
            current: 1,
            total: 4,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["stage"], "generating");
        assert_eq!(json["format"], "a5-portrait");
    }

    #[test]
    fn stages_log_at_info_and_clipping_warns() {
        capture_logs();
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().to_path_buf(),
            date: Some(date!(2026 - 10 - 16)),
        };
        let record = ContentRecord::new("Protokollprüfung")
            .with_description("Sehr langer Text über viele Zeilen. ".repeat(80));

        generate_and_deliver(&record, &config, &PdfRenderer, |_| {}).unwrap();

        assert!(logged(log::Level::Info, "generating 4 formats for `Protokollprüfung`"));
        assert!(logged(log::Level::Info, "zipping 4 documents"));
        assert!(logged(
            log::Level::Info,
            "downloading flyer-Protokollprüfung-2026-10-16.zip"
        ));
        assert!(logged(log::Level::Warn, "field `desc` clipped"));
    }
}
