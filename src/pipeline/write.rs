//! Page Writer: persist each rendered page as `page_NNN.png`.

use crate::config::PngCompression;
use crate::error::PdfStackError;
use crate::pipeline::encode;
use crate::pipeline::render::PageImage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name for a 1-indexed page: `page_001.png`, …, `page_1000.png`.
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{page_num:03}.png")
}

/// Create `dir` and any missing parents.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), PdfStackError> {
    std::fs::create_dir_all(dir).map_err(|e| PdfStackError::OutputDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Writes pages into one directory and remembers the paths in write order.
#[derive(Debug)]
pub struct PageWriter {
    dir: PathBuf,
    compression: PngCompression,
    paths: Vec<PathBuf>,
}

impl PageWriter {
    /// Prepare the output directory, creating it if absent.
    pub fn create(dir: impl AsRef<Path>, compression: PngCompression) -> Result<Self, PdfStackError> {
        let dir = dir.as_ref().to_path_buf();
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            compression,
            paths: Vec::new(),
        })
    }

    /// Write one page, silently replacing a file of the same name.
    pub fn write(&mut self, page: &PageImage) -> Result<PathBuf, PdfStackError> {
        let path = self.dir.join(page_file_name(page.page_num));
        encode::write_dynamic_png(&path, &page.image, self.compression)?;
        debug!("Saved page {} → {}", page.page_num, path.display());

        self.paths.push(path.clone());
        Ok(path)
    }

    /// Number of pages written so far.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The written paths, in page order.
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn page(page_num: usize, w: u32, h: u32) -> PageImage {
        PageImage {
            page_num,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255]))),
        }
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(page_file_name(1), "page_001.png");
        assert_eq!(page_file_name(42), "page_042.png");
        assert_eq!(page_file_name(999), "page_999.png");
        assert_eq!(page_file_name(1000), "page_1000.png");
    }

    #[test]
    fn creates_nested_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("images_pages");
        let writer = PageWriter::create(&dir, PngCompression::Fast).unwrap();
        assert!(dir.is_dir());
        assert!(writer.is_empty());
    }

    #[test]
    fn writes_pages_in_order() {
        let root = tempfile::tempdir().unwrap();
        let mut writer = PageWriter::create(root.path(), PngCompression::Fast).unwrap();

        for n in 1..=3 {
            let written = writer.write(&page(n, 4, 5)).unwrap();
            assert_eq!(written, root.path().join(page_file_name(n)));
        }
        assert_eq!(writer.len(), 3);

        let paths = writer.into_paths();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["page_001.png", "page_002.png", "page_003.png"]);
        assert!(paths.iter().all(|p| p.is_file()));
    }

    #[test]
    fn directory_blocked_by_file_is_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("images_pages");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let err = PageWriter::create(&blocker, PngCompression::Fast).unwrap_err();
        assert!(matches!(err, PdfStackError::OutputDirFailed { .. }));
    }
}
