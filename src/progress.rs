//! Progress-callback trait for per-page and per-group pipeline events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline writes each page and each composite.
//!
//! # Example
//!
//! ```rust
//! use pdfstack::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_written(&self, page_num: usize, total_pages: usize, path: &Path) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} → {}", page_num, total_pages, path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { pages: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it writes pages and composites.
///
/// The pipeline is sequential, so events arrive in page order and then in
/// group order. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the PDF is opened, before any page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page PNG has been written.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: pages in the document
    /// * `path`: file that was written
    fn on_page_written(&self, page_num: usize, total_pages: usize, path: &Path) {
        let _ = (page_num, total_pages, path);
    }

    /// Called after a composite PNG has been written.
    ///
    /// # Arguments
    /// * `group_num`: 1-indexed group number
    /// * `total_groups`: number of groups in this run
    /// * `path`: file that was written
    fn on_composite_written(&self, group_num: usize, total_groups: usize, path: &Path) {
        let _ = (group_num, total_groups, path);
    }

    /// Called once after the last composite is written.
    fn on_conversion_complete(&self, total_pages: usize, total_groups: usize) {
        let _ = (total_pages, total_groups);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        pages: Mutex<Vec<PathBuf>>,
        groups: AtomicUsize,
        completed_groups: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_written(&self, _page_num: usize, _total_pages: usize, path: &Path) {
            self.pages.lock().unwrap().push(path.to_path_buf());
        }

        fn on_composite_written(&self, _group_num: usize, _total_groups: usize, _path: &Path) {
            self.groups.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_pages: usize, total_groups: usize) {
            self.completed_groups.store(total_groups, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_written(1, 5, Path::new("page_001.png"));
        cb.on_composite_written(1, 2, Path::new("concat_01.png"));
        cb.on_conversion_complete(5, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(4);
        for n in 1..=4 {
            tracker.on_page_written(n, 4, Path::new(&format!("page_{n:03}.png")));
        }
        tracker.on_composite_written(1, 2, Path::new("concat_01.png"));
        tracker.on_composite_written(2, 2, Path::new("concat_02.png"));
        tracker.on_conversion_complete(4, 2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 4);
        assert_eq!(tracker.pages.lock().unwrap().len(), 4);
        assert_eq!(tracker.groups.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completed_groups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_written(1, 10, Path::new("page_001.png"));
    }
}
