//! # flyer-forge – one flyer record, every print format, one archive
//!
//! This crate renders a single [`ContentRecord`] into a fixed set of
//! physical page formats and bundles the resulting PDFs into one ZIP
//! archive. The pipeline stages are:
//!
//! 1. **Bind** – map the record onto named template fields ([`binder`])
//! 2. **Build** – place the fields for one page format ([`builder`], [`registry`])
//! 3. **Render** – emit PDF bytes via printpdf ([`render`])
//! 4. **Batch** – repeat for every registered format, in order ([`batch`])
//! 5. **Pack** – bundle the documents as a ZIP ([`archive`])
//! 6. **Deliver** – name the archive and save it ([`delivery`])
//!
//! [`pipeline`] drives all six with progress reporting. [`notify`],
//! [`search`] and [`calendar`] are the session-side helpers around it.

pub mod archive;
pub mod batch;
pub mod binder;
pub mod builder;
pub mod calendar;
pub mod delivery;
pub mod error;
pub mod fonts;
pub mod notify;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod render;
pub mod search;
pub mod template;

// Re-exports for convenience
pub use error::{FlyerError, RenderError, Result};
pub use pipeline::{generate_and_deliver, PipelineConfig, Progress, Stage};
pub use record::ContentRecord;
pub use registry::LayoutFormat;
pub use render::{DocumentRenderer, PdfRenderer};
