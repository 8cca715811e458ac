//! Error types for the flyer pipeline.

use thiserror::Error;

use crate::registry::LayoutFormat;

/// Errors that abort a pipeline run.
///
/// Every variant is fatal to the current run: nothing is retried and no
/// partial archive is produced.
#[derive(Error, Debug)]
pub enum FlyerError {
    /// The content record was rejected before generation started.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A layout identifier outside the registry.
    #[error("Unknown layout format: {0}")]
    UnknownFormat(String),

    /// The rendering engine could not produce a document for one format.
    #[error("Rendering {format} failed: {source}")]
    Render {
        format: LayoutFormat,
        #[source]
        source: RenderError,
    },

    /// Archive assembly failed.
    #[error("Archive error: {0}")]
    Pack(#[from] zip::result::ZipError),

    /// Writing the archive to its destination failed.
    #[error("Delivery error: {0}")]
    Delivery(#[from] std::io::Error),

    /// The archive date could not be formatted.
    #[error("Date formatting error: {0}")]
    DateFormat(#[from] time::error::Format),
}

/// Engine-level failures raised by a [`DocumentRenderer`](crate::render::DocumentRenderer).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The QR payload does not fit any QR code version.
    #[error("QR payload cannot be encoded: {0}")]
    QrEncoding(String),

    /// A colour literal that is not `#rrggbb` or `#rgb`.
    #[error("Invalid colour literal {0:?}")]
    InvalidColor(String),

    /// The template places a field the binder did not supply.
    #[error("No value bound for field `{0}`")]
    UnboundField(String),

    /// Any other engine failure.
    #[error("{0}")]
    Engine(String),
}

impl FlyerError {
    /// Short title for user-facing notifications.
    pub fn headline(&self) -> &'static str {
        match self {
            FlyerError::Validation(_) => "Invalid input",
            FlyerError::UnknownFormat(_) => "Unknown format",
            FlyerError::Render { .. } => "PDF generation failed",
            FlyerError::Pack(_) => "Archive creation failed",
            FlyerError::Delivery(_) | FlyerError::DateFormat(_) => "Download failed",
        }
    }
}

/// Result type for flyer operations.
pub type Result<T> = std::result::Result<T, FlyerError>;
