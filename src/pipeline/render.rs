//! PDF rasterisation: render each page to a `DynamicImage` via pdfium.
//!
//! [`Rasterizer::pages`] renders lazily, one page per `next()`, so only a
//! single full-resolution page is alive at a time. At 600 DPI an A4 page is
//! about 140 MB of RGBA; rendering the whole document up front would hold
//! all of them at once.

use crate::config::ConversionConfig;
use crate::error::PdfStackError;
use crate::output::DocumentMetadata;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// One rendered page, numbered from 1 in document order.
pub struct PageImage {
    pub page_num: usize,
    pub image: DynamicImage,
}

/// An opened PDF document ready to be rendered page by page.
pub struct Rasterizer<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
    dpi: u32,
    max_pixels: Option<u32>,
}

impl<'a> Rasterizer<'a> {
    /// Load the document, mapping pdfium load failures to password or
    /// corruption errors.
    pub fn open(
        pdfium: &'a Pdfium,
        pdf_path: &Path,
        config: &'a ConversionConfig,
    ) -> Result<Self, PdfStackError> {
        let document = load_document(pdfium, pdf_path, config.password.as_deref())?;
        let rasterizer = Self {
            path: pdf_path.to_path_buf(),
            document,
            dpi: config.dpi,
            max_pixels: config.max_rendered_pixels,
        };
        info!(
            "PDF loaded: {} pages ({})",
            rasterizer.page_count(),
            rasterizer.path.display()
        );
        Ok(rasterizer)
    }

    pub fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    /// Render pages in document order. A zero-page document yields nothing.
    pub fn pages(
        &self,
    ) -> impl Iterator<Item = Result<PageImage, PdfStackError>> + use<'_, 'a> {
        (0..self.page_count()).map(move |idx| self.render_page(idx))
    }

    fn render_page(&self, idx: usize) -> Result<PageImage, PdfStackError> {
        let page_num = idx + 1;
        let page = self
            .document
            .pages()
            .get(idx as u16)
            .map_err(|e| PdfStackError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })?;

        let (width, height) = target_size(
            page.width().value,
            page.height().value,
            self.dpi,
            self.max_pixels,
        );

        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfStackError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );

        Ok(PageImage { page_num, image })
    }
}

/// Pixel size of a page of `width_pt × height_pt` points at `dpi`, with the
/// longest edge optionally capped at `max_pixels`.
pub(crate) fn target_size(
    width_pt: f32,
    height_pt: f32,
    dpi: u32,
    max_pixels: Option<u32>,
) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let mut width = (width_pt * scale).round().max(1.0);
    let mut height = (height_pt * scale).round().max(1.0);

    if let Some(cap) = max_pixels {
        let longest = width.max(height);
        if longest > cap as f32 {
            let k = cap as f32 / longest;
            width = (width * k).round().max(1.0);
            height = (height * k).round().max(1.0);
        }
    }

    (width as u32, height as u32)
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfStackError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfStackError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfStackError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfStackError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Extract document metadata from a PDF without rendering pages.
pub fn extract_metadata<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<DocumentMetadata, PdfStackError> {
    let document = load_document(pdfium, pdf_path, password)?;
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(tag)
            .map(|t| t.value().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_at_600_dpi() {
        // A4 is 595 × 842 pt.
        assert_eq!(target_size(595.0, 842.0, 600, None), (4958, 7017));
    }

    #[test]
    fn letter_at_72_dpi_is_one_pixel_per_point() {
        assert_eq!(target_size(612.0, 792.0, 72, None), (612, 792));
    }

    #[test]
    fn cap_scales_longest_edge_and_keeps_aspect() {
        let (w, h) = target_size(612.0, 792.0, 600, Some(2000));
        assert_eq!(h, 2000);
        assert_eq!(w, 1545);
    }

    #[test]
    fn cap_larger_than_render_is_ignored() {
        assert_eq!(target_size(100.0, 50.0, 72, Some(4000)), (100, 50));
    }

    #[test]
    fn degenerate_page_is_at_least_one_pixel() {
        assert_eq!(target_size(0.0, 0.0, 600, None), (1, 1));
    }
}
