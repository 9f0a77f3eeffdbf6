//! PNG encoding to disk.
//!
//! Both page files and composites go through [`write_png`]. PNG is lossless
//! at every compression level, so the level only trades encode time against
//! file size; decoded pixels always round-trip exactly.

use crate::config::PngCompression;
use crate::error::PdfStackError;
use image::codecs::png::{FilterType, PngEncoder};
use image::{ImageEncoder, ImageError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Encode `pixels` (`width × height`, layout given by `color`) as a PNG file
/// at `path`, replacing any existing file.
pub fn write_png(
    path: &Path,
    pixels: &[u8],
    width: u32,
    height: u32,
    color: image::ExtendedColorType,
    compression: PngCompression,
) -> Result<(), PdfStackError> {
    let file = File::create(path).map_err(|e| PdfStackError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    PngEncoder::new_with_quality(&mut writer, compression.into(), FilterType::Adaptive)
        .write_image(pixels, width, height, color)
        .map_err(|e| PdfStackError::ImageWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    writer.flush().map_err(|e| PdfStackError::ImageWriteFailed {
        path: path.to_path_buf(),
        source: ImageError::IoError(e),
    })?;

    debug!("Wrote {}x{} PNG → {}", width, height, path.display());
    Ok(())
}

/// Encode a `DynamicImage` with its own pixel layout.
pub fn write_dynamic_png(
    path: &Path,
    image: &image::DynamicImage,
    compression: PngCompression,
) -> Result<(), PdfStackError> {
    write_png(
        path,
        image.as_bytes(),
        image.width(),
        image.height(),
        image.color().into(),
        compression,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn written_png_decodes_to_same_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        let mut img = RgbaImage::from_pixel(10, 6, Rgba([255, 0, 0, 255]));
        img.put_pixel(3, 4, Rgba([1, 2, 3, 4]));
        let img = DynamicImage::ImageRgba8(img);

        write_dynamic_png(&path, &img, PngCompression::Best).expect("write should succeed");

        let back = image::open(&path).expect("decode should succeed");
        assert_eq!(back.width(), 10);
        assert_eq!(back.height(), 6);
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_001.png");
        std::fs::write(&path, b"stale").unwrap();

        let img = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        write_dynamic_png(&path, &img, PngCompression::Fast).unwrap();

        assert_eq!(image::open(&path).unwrap().width(), 2);
    }

    #[test]
    fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.png");
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));

        let err = write_dynamic_png(&path, &img, PngCompression::Default).unwrap_err();
        assert!(matches!(err, PdfStackError::OutputWriteFailed { .. }));
    }
}
