//! Configuration types for PDF rasterisation and page stacking.
//!
//! All pipeline behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the fixed
//! behaviour of the tool: read `ton_fichier.pdf`, render at 600 DPI into
//! `images_pages/`, stack pages three at a time into `images_concatenees/`.

use crate::error::PdfStackError;
use crate::progress::ProgressCallback;
use image::codecs::png::CompressionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default input PDF, relative to the working directory.
pub const DEFAULT_INPUT: &str = "ton_fichier.pdf";
/// Default directory for individual page PNGs.
pub const DEFAULT_PAGES_DIR: &str = "images_pages";
/// Default directory for stacked composite PNGs.
pub const DEFAULT_COMPOSITES_DIR: &str = "images_concatenees";
/// Default rasterisation resolution.
pub const DEFAULT_DPI: u32 = 600;
/// Default number of pages per composite.
pub const DEFAULT_GROUP_SIZE: usize = 3;

/// Accepted DPI range.
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 1200;

/// Configuration for one rasterise-and-stack run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfstack::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .input("report.pdf")
///     .dpi(300)
///     .group_size(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.group_size, 2);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Path of the PDF to rasterise. Default: `ton_fichier.pdf`.
    pub input: PathBuf,

    /// Directory receiving `page_NNN.png` files. Created if absent.
    pub pages_dir: PathBuf,

    /// Directory receiving `concat_NN.png` files. Created if absent.
    pub composites_dir: PathBuf,

    /// Rendering DPI. Range: 72–1200. Default: 600.
    ///
    /// A page of `w × h` points renders to `w·dpi/72 × h·dpi/72` pixels.
    /// A4 at 600 DPI is about 4961 × 7016 px, roughly 140 MB of RGBA.
    pub dpi: u32,

    /// Number of consecutive pages stacked into one composite. Default: 3.
    pub group_size: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional cap on the longest rendered edge in pixels.
    ///
    /// `None` renders at the full DPI. When set, pages that would exceed the
    /// cap are scaled down proportionally.
    pub max_rendered_pixels: Option<u32>,

    /// PNG compression used for page files. Default: [`PngCompression::Default`].
    pub page_compression: PngCompression,

    /// PNG compression used for composites. Default: [`PngCompression::Best`].
    pub composite_compression: PngCompression,

    /// Explicit pdfium library location (file or directory).
    pub pdfium_lib_path: Option<PathBuf>,

    /// Optional per-page / per-group progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            pages_dir: PathBuf::from(DEFAULT_PAGES_DIR),
            composites_dir: PathBuf::from(DEFAULT_COMPOSITES_DIR),
            dpi: DEFAULT_DPI,
            group_size: DEFAULT_GROUP_SIZE,
            password: None,
            max_rendered_pixels: None,
            page_compression: PngCompression::Default,
            composite_compression: PngCompression::Best,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("input", &self.input)
            .field("pages_dir", &self.pages_dir)
            .field("composites_dir", &self.composites_dir)
            .field("dpi", &self.dpi)
            .field("group_size", &self.group_size)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("page_compression", &self.page_compression)
            .field("composite_compression", &self.composite_compression)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.config.input = path.as_ref().to_path_buf();
        self
    }

    pub fn pages_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.pages_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn composites_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.composites_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the DPI. Out-of-range values are rejected by [`Self::build`].
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// Set pages per composite. Zero is rejected by [`Self::build`].
    pub fn group_size(mut self, n: usize) -> Self {
        self.config.group_size = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn page_compression(mut self, c: PngCompression) -> Self {
        self.config.page_compression = c;
        self
    }

    pub fn composite_compression(mut self, c: PngCompression) -> Self {
        self.config.composite_compression = c;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.pdfium_lib_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, PdfStackError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(PdfStackError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.group_size == 0 {
            return Err(PdfStackError::InvalidConfig(
                "Group size must be ≥ 1".into(),
            ));
        }
        if c.pages_dir.as_os_str().is_empty() || c.composites_dir.as_os_str().is_empty() {
            return Err(PdfStackError::InvalidConfig(
                "Output directories must not be empty paths".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// PNG compression level. Every level is lossless; higher levels trade
/// encoding time for smaller files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    /// Fastest encoding, largest files.
    Fast,
    /// Balanced. (default for page files)
    #[default]
    Default,
    /// Smallest files, slowest encoding.
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(c: PngCompression) -> Self {
        match c {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_layout() {
        let c = ConversionConfig::default();
        assert_eq!(c.input, PathBuf::from("ton_fichier.pdf"));
        assert_eq!(c.pages_dir, PathBuf::from("images_pages"));
        assert_eq!(c.composites_dir, PathBuf::from("images_concatenees"));
        assert_eq!(c.dpi, 600);
        assert_eq!(c.group_size, 3);
        assert_eq!(c.composite_compression, PngCompression::Best);
        assert!(c.max_rendered_pixels.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .input("a.pdf")
            .pages_dir("out/pages")
            .composites_dir("out/strips")
            .dpi(300)
            .group_size(4)
            .password("secret")
            .build()
            .unwrap();
        assert_eq!(c.input, PathBuf::from("a.pdf"));
        assert_eq!(c.pages_dir, PathBuf::from("out/pages"));
        assert_eq!(c.composites_dir, PathBuf::from("out/strips"));
        assert_eq!(c.dpi, 300);
        assert_eq!(c.group_size, 4);
        assert_eq!(c.password.as_deref(), Some("secret"));
    }

    #[test]
    fn zero_group_size_rejected() {
        let err = ConversionConfig::builder().group_size(0).build().unwrap_err();
        assert!(matches!(err, PdfStackError::InvalidConfig(_)));
    }

    #[test]
    fn dpi_out_of_range_rejected() {
        assert!(ConversionConfig::builder().dpi(50).build().is_err());
        assert!(ConversionConfig::builder().dpi(2400).build().is_err());
        assert!(ConversionConfig::builder().dpi(72).build().is_ok());
        assert!(ConversionConfig::builder().dpi(1200).build().is_ok());
    }

    #[test]
    fn max_pixels_has_floor() {
        let c = ConversionConfig::builder().max_rendered_pixels(10).build().unwrap();
        assert_eq!(c.max_rendered_pixels, Some(100));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn compression_maps_to_png_levels() {
        assert!(matches!(
            CompressionType::from(PngCompression::Best),
            CompressionType::Best
        ));
        assert!(matches!(
            CompressionType::from(PngCompression::Fast),
            CompressionType::Fast
        ));
    }
}
