//! Result types returned by [`crate::convert()`] and [`crate::inspect()`].
//!
//! Everything here is `Serialize` so the CLI can emit it with `--json`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Page files in page order (`page_001.png`, `page_002.png`, …).
    pub pages: Vec<PathBuf>,
    /// One entry per written composite, in group order.
    pub composites: Vec<CompositeResult>,
    pub stats: ConversionStats,
}

/// A composite written for one group of pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// 1-indexed group number; also the number in `concat_NN.png`.
    pub group_num: usize,
    pub path: PathBuf,
    /// Widest member's width.
    pub width: u32,
    /// Sum of member heights.
    pub height: u32,
    /// 1-indexed page numbers stacked into this composite, top to bottom.
    pub pages: Vec<usize>,
}

/// Timing and count summary for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_pages: usize,
    pub total_groups: usize,
    /// Rasterising and writing page PNGs.
    pub render_duration_ms: u64,
    /// Decoding, stacking and writing composites.
    pub composite_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// PDF document information, extracted without rendering any page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}
