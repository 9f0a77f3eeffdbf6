//! Pipeline driver: rasterise → write pages → stack composites.
//!
//! The run is strictly sequential. Pages are rendered and written one at a
//! time, so at most one full-resolution page image is in memory during the
//! render stage; each group's decoded images are dropped as soon as its
//! composite is written. Any error aborts the run and leaves already
//! written files on disk.

use crate::config::ConversionConfig;
use crate::engine;
use crate::error::PdfStackError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::composite;
use crate::pipeline::group::group_count;
use crate::pipeline::input;
use crate::pipeline::render::{self, Rasterizer};
use crate::pipeline::write::PageWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Rasterise `config.input` and stack its pages into composites.
///
/// # Errors
/// Returns the first failure of any stage:
/// - file not found / permission denied / not a PDF
/// - pdfium library could not be bound
/// - password required or wrong, corrupt PDF, page render failure
/// - output directory or PNG write failure, page decode failure
pub fn convert(config: &ConversionConfig) -> Result<ConversionOutput, PdfStackError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", config.input.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let pdf_path = input::resolve_local(&config.input)?;

    // ── Step 2: Bind pdfium and open the document ────────────────────────
    let pdfium = engine::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let rasterizer = Rasterizer::open(&pdfium, &pdf_path, config)?;
    let total_pages = rasterizer.page_count();

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 3: Rasterise and write each page ────────────────────────────
    let render_start = Instant::now();
    let mut writer = PageWriter::create(&config.pages_dir, config.page_compression)?;
    for page in rasterizer.pages() {
        let page = page?;
        let path = writer.write(&page)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_written(page.page_num, total_pages, &path);
        }
    }
    let page_paths = writer.into_paths();
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Wrote {} pages to {} in {}ms",
        page_paths.len(),
        config.pages_dir.display(),
        render_duration_ms
    );

    // Release the document before the compositing stage allocates canvases.
    drop(rasterizer);
    drop(pdfium);

    // ── Step 4: Stack groups into composites ─────────────────────────────
    let composite_start = Instant::now();
    let composites = composite::write_composites(&page_paths, config)?;
    let composite_duration_ms = composite_start.elapsed().as_millis() as u64;
    debug!(
        "Expected {} groups, wrote {}",
        group_count(page_paths.len(), config.group_size),
        composites.len()
    );

    let stats = ConversionStats {
        total_pages,
        total_groups: composites.len(),
        render_duration_ms,
        composite_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Processing complete: {} pages, {} composites, {}ms total",
        stats.total_pages, stats.total_groups, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages, composites.len());
    }

    Ok(ConversionOutput {
        pages: page_paths,
        composites,
        stats,
    })
}

/// Extract PDF metadata without rendering anything.
pub fn inspect(
    pdf: impl AsRef<Path>,
    password: Option<&str>,
    pdfium_lib_path: Option<&Path>,
) -> Result<DocumentMetadata, PdfStackError> {
    let pdf_path = input::resolve_local(pdf.as_ref())?;
    let pdfium = engine::bind_pdfium(pdfium_lib_path)?;
    render::extract_metadata(&pdfium, &pdf_path, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_fails_before_binding_pdfium() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConversionConfig::builder()
            .input(dir.path().join("absent.pdf"))
            .pages_dir(dir.path().join("pages"))
            .composites_dir(dir.path().join("strips"))
            .pdfium_lib_path("/definitely/not/libpdfium.so")
            .build()
            .unwrap();

        let err = convert(&config).unwrap_err();
        assert!(matches!(err, PdfStackError::FileNotFound { .. }), "got: {err:?}");
        assert!(!dir.path().join("pages").exists());
    }

    #[test]
    fn inspect_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"GIF89a").unwrap();

        let err = inspect(&path, None, None).unwrap_err();
        assert!(matches!(err, PdfStackError::NotAPdf { .. }), "got: {err:?}");
    }
}
