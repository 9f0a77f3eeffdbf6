//! # pdfstack
//!
//! Rasterise every page of a PDF to a high-resolution PNG, then stack the
//! pages in fixed-size groups into tall composite images, ready for viewing
//! or printing as strips rather than one image per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate the path and the %PDF magic bytes
//!  ├─ 2. Render     rasterise each page via pdfium (default 600 DPI)
//!  ├─ 3. Write      images_pages/page_001.png, page_002.png, …
//!  ├─ 4. Group      consecutive runs of group_size pages (default 3)
//!  └─ 5. Composite  images_concatenees/concat_01.png, … (max width × sum height)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstack::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .input("document.pdf")
//!         .build()?;
//!     let output = convert(&config)?;
//!     for c in &output.composites {
//!         println!("{} ← pages {:?}", c.path.display(), c.pages);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfstack` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## pdfium
//!
//! Rendering needs the pdfium shared library at runtime; see [`engine`] for
//! how it is located.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PngCompression};
pub use convert::{convert, inspect};
pub use error::PdfStackError;
pub use output::{CompositeResult, ConversionOutput, ConversionStats, DocumentMetadata};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
