//! Batch Compositor: stack each group of page PNGs into one tall image.
//!
//! The canvas for a group is `max(width) × sum(height)`, filled with opaque
//! white. Members are pasted at x = 0 and y = the running sum of the heights
//! above them, so nothing is cropped or scaled and a narrower page leaves a
//! white margin on its right. Pixels are copied as RGB; an alpha channel is
//! dropped, not blended.

use crate::config::ConversionConfig;
use crate::error::PdfStackError;
use crate::output::CompositeResult;
use crate::pipeline::write::ensure_dir;
use crate::pipeline::{encode, group};
use image::{imageops, DynamicImage, ExtendedColorType, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Canvas background.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// File name for a 1-indexed group: `concat_01.png`, …, `concat_100.png`.
pub fn composite_file_name(group_num: usize) -> String {
    format!("concat_{group_num:02}.png")
}

/// Size of the canvas that holds a group stacked vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Canvas for `images`; `None` when the group is empty.
    pub fn of(group_num: usize, images: &[DynamicImage]) -> Result<Option<Self>, PdfStackError> {
        Self::from_dimensions(group_num, images.iter().map(|i| (i.width(), i.height())))
    }

    /// Canvas for members of the given `(width, height)`s.
    ///
    /// Heights are summed in `u64`; a total that does not fit the `u32` image
    /// dimension is [`PdfStackError::CanvasTooLarge`].
    pub fn from_dimensions(
        group_num: usize,
        dims: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Option<Self>, PdfStackError> {
        let mut max_width: Option<u32> = None;
        let mut total_height: u64 = 0;
        for (w, h) in dims {
            max_width = Some(max_width.map_or(w, |m| m.max(w)));
            total_height += u64::from(h);
        }

        let Some(width) = max_width else {
            return Ok(None);
        };
        let height = u32::try_from(total_height).map_err(|_| PdfStackError::CanvasTooLarge {
            group: group_num,
            width,
            height_overflow: total_height,
        })?;

        Ok(Some(Self { width, height }))
    }
}

/// Paste `images` top to bottom onto a fresh white canvas.
///
/// Returns `None` for an empty group: there is no width to take a maximum
/// of, so nothing is drawn.
pub fn stack_vertically(
    group_num: usize,
    images: &[DynamicImage],
) -> Result<Option<RgbImage>, PdfStackError> {
    let Some(size) = CanvasSize::of(group_num, images)? else {
        return Ok(None);
    };

    let mut canvas = RgbImage::from_pixel(size.width, size.height, BACKGROUND);
    let mut y_offset: i64 = 0;
    for img in images {
        imageops::replace(&mut canvas, &img.to_rgb8(), 0, y_offset);
        y_offset += i64::from(img.height());
    }

    debug!(
        "Stacked group {} ({} images) → {}x{} px",
        group_num,
        images.len(),
        size.width,
        size.height
    );
    Ok(Some(canvas))
}

/// Decode the group's page files from disk and stack them.
pub fn composite_group(
    group_num: usize,
    paths: &[PathBuf],
) -> Result<Option<RgbImage>, PdfStackError> {
    let images = paths
        .iter()
        .map(|p| load_image(p))
        .collect::<Result<Vec<_>, _>>()?;
    stack_vertically(group_num, &images)
}

fn load_image(path: &Path) -> Result<DynamicImage, PdfStackError> {
    image::open(path).map_err(|e| PdfStackError::ImageDecodeFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Group `page_paths` by `config.group_size` and write one composite per
/// group into `config.composites_dir`.
///
/// The directory is created even when there are no pages. Empty input
/// writes nothing and returns an empty list.
pub fn write_composites(
    page_paths: &[PathBuf],
    config: &ConversionConfig,
) -> Result<Vec<CompositeResult>, PdfStackError> {
    ensure_dir(&config.composites_dir)?;

    let groups = group::partition(page_paths, config.group_size);
    let total_groups = groups.len();
    if total_groups == 0 {
        info!("No pages to stack; no composites written");
        return Ok(Vec::new());
    }
    info!(
        "Stacking {} pages into {} composites of up to {}",
        page_paths.len(),
        total_groups,
        config.group_size
    );

    let mut results = Vec::with_capacity(total_groups);
    for (index, members) in groups.into_iter().enumerate() {
        let group_num = index + 1;
        let Some(canvas) = composite_group(group_num, members)? else {
            continue;
        };

        let path = config.composites_dir.join(composite_file_name(group_num));
        encode::write_png(
            &path,
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
            config.composite_compression,
        )?;
        debug!("Composite saved: {}", path.display());

        if let Some(ref cb) = config.progress_callback {
            cb.on_composite_written(group_num, total_groups, &path);
        }

        results.push(CompositeResult {
            group_num,
            path,
            width: canvas.width(),
            height: canvas.height(),
            pages: group::pages_in_group(index, members.len(), config.group_size),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            w,
            h,
            Rgba([rgb[0], rgb[1], rgb[2], 255]),
        ))
    }

    #[test]
    fn names_are_two_digit_padded() {
        assert_eq!(composite_file_name(1), "concat_01.png");
        assert_eq!(composite_file_name(12), "concat_12.png");
        assert_eq!(composite_file_name(100), "concat_100.png");
    }

    #[test]
    fn canvas_is_max_width_by_sum_height() {
        let size = CanvasSize::from_dimensions(1, [(800, 100), (1200, 50), (600, 25)])
            .unwrap()
            .unwrap();
        assert_eq!(size, CanvasSize { width: 1200, height: 175 });
    }

    #[test]
    fn empty_group_has_no_canvas() {
        assert_eq!(CanvasSize::from_dimensions(1, []).unwrap(), None);
        assert!(stack_vertically(1, &[]).unwrap().is_none());
    }

    #[test]
    fn height_overflow_is_reported() {
        let err = CanvasSize::from_dimensions(4, [(10, u32::MAX), (20, 1)]).unwrap_err();
        match err {
            PdfStackError::CanvasTooLarge {
                group,
                width,
                height_overflow,
            } => {
                assert_eq!(group, 4);
                assert_eq!(width, 20);
                assert_eq!(height_overflow, u64::from(u32::MAX) + 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn images_are_pasted_top_to_bottom() {
        let images = [solid(4, 2, [255, 0, 0]), solid(4, 3, [0, 255, 0])];
        let canvas = stack_vertically(1, &images).unwrap().unwrap();

        assert_eq!(canvas.dimensions(), (4, 5));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(3, 1), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(0, 2), Rgb([0, 255, 0]));
        assert_eq!(*canvas.get_pixel(3, 4), Rgb([0, 255, 0]));
    }

    #[test]
    fn narrow_image_leaves_white_margin() {
        let images = [solid(800, 10, [0, 0, 0]), solid(1200, 10, [0, 0, 255])];
        let canvas = stack_vertically(1, &images).unwrap().unwrap();

        assert_eq!(canvas.dimensions(), (1200, 20));
        for y in 0..10 {
            assert_eq!(*canvas.get_pixel(799, y), Rgb([0, 0, 0]));
            for x in 800..1200 {
                assert_eq!(*canvas.get_pixel(x, y), BACKGROUND);
            }
        }
        assert_eq!(*canvas.get_pixel(1199, 15), Rgb([0, 0, 255]));
    }

    #[test]
    fn alpha_is_dropped_not_blended() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0])));
        let canvas = stack_vertically(1, &[img]).unwrap().unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([10, 20, 30]));
    }
}
