// SPDX-License-Identifier: GPL-3.0-only

//! Image-fitting geometry
//!
//! Two strategies convert an arbitrary-aspect-ratio camera frame into
//! deterministic output dimensions:
//!
//! - [`fit_within`]: the largest rectangle sharing the source's aspect
//!   ratio that fits inside the target bounds, never upscaling.
//! - [`fill_exact`]: exactly the target dimensions, filled by scaling and
//!   center-cropping the source so no letterboxing occurs.
//!
//! The plan functions are pure; [`resize_to_fit`] and [`crop_to_fill`]
//! apply a plan to a raster with Lanczos3 resampling.

use crate::errors::GeometryError;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Target rectangle for a resize operation
///
/// Both dimensions must be strictly positive; the plan functions reject
/// zero dimensions with [`GeometryError::InvalidBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output dimensions chosen by [`fit_within`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitResult {
    pub width: u32,
    pub height: u32,
}

/// Half-open source-space rectangle `[x0, x1) x [y0, y1)`
///
/// Always non-empty and fully contained in the source raster:
/// `0 <= x0 < x1 <= src_w` and `0 <= y0 < y1 <= src_h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Output dimensions plus source crop region chosen by [`fill_exact`]
///
/// `width` and `height` always equal the requested bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub width: u32,
    pub height: u32,
    pub source_box: CropBox,
}

fn check_inputs(src_w: u32, src_h: u32, bounds: Bounds) -> Result<(), GeometryError> {
    if bounds.width == 0 || bounds.height == 0 {
        return Err(GeometryError::InvalidBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }
    if src_w == 0 || src_h == 0 {
        return Err(GeometryError::DegenerateSource {
            width: src_w,
            height: src_h,
        });
    }
    Ok(())
}

/// True when the source aspect ratio is wider than the target's.
///
/// Integer cross-multiplication, so the comparison is exact and both
/// branches agree when the ratios are equal.
fn wider_than(src_w: u32, src_h: u32, bounds: Bounds) -> bool {
    u64::from(src_w) * u64::from(bounds.height) > u64::from(bounds.width) * u64::from(src_h)
}

/// Compute the largest rectangle with the source's aspect ratio that fits
/// inside `bounds`, capped at the source's native resolution.
///
/// A wider-than-target source is bounded by the target width, otherwise by
/// the target height. The scale is clamped to 1.0: fitting never enlarges,
/// so a source smaller than the bounds keeps its native dimensions.
/// Output dimensions truncate toward zero but are floored to 1 pixel so
/// extreme aspect ratios still yield a valid raster.
pub fn fit_within(src_w: u32, src_h: u32, bounds: Bounds) -> Result<FitResult, GeometryError> {
    check_inputs(src_w, src_h, bounds)?;

    let scale = if wider_than(src_w, src_h, bounds) {
        f64::from(bounds.width) / f64::from(src_w)
    } else {
        f64::from(bounds.height) / f64::from(src_h)
    };
    let scale = scale.min(1.0);

    Ok(FitResult {
        width: ((f64::from(src_w) * scale) as u32).max(1),
        height: ((f64::from(src_h) * scale) as u32).max(1),
    })
}

/// Compute a plan producing exactly `bounds` by scaling and center-cropping.
///
/// The scale is taken from the constrained axis (the one that would not
/// overflow), then the source-space box that maps onto the full target is
/// centered and truncated to integer coordinates. Truncation is clamped so
/// the box never leaves the source and never collapses to zero area.
pub fn fill_exact(src_w: u32, src_h: u32, bounds: Bounds) -> Result<CropPlan, GeometryError> {
    check_inputs(src_w, src_h, bounds)?;

    let scale = if wider_than(src_w, src_h, bounds) {
        // Horizontal overflow: the vertical axis constrains the scale.
        f64::from(bounds.height) / f64::from(src_h)
    } else {
        f64::from(bounds.width) / f64::from(src_w)
    };

    let box_w = f64::from(bounds.width) / scale;
    let box_h = f64::from(bounds.height) / scale;
    let box_x = (f64::from(src_w) - box_w) / 2.0;
    let box_y = (f64::from(src_h) - box_h) / 2.0;

    let (x0, x1) = clamp_span(box_x, box_w, src_w);
    let (y0, y1) = clamp_span(box_y, box_h, src_h);

    Ok(CropPlan {
        width: bounds.width,
        height: bounds.height,
        source_box: CropBox { x0, y0, x1, y1 },
    })
}

/// Truncate a source-space span to integers, clamped into `[0, limit]`
/// with at least one pixel of extent.
fn clamp_span(start: f64, len: f64, limit: u32) -> (u32, u32) {
    let lo = (start.max(0.0) as u32).min(limit - 1);
    let hi = (((start + len).max(0.0)) as u32).min(limit);
    if hi <= lo { (lo, lo + 1) } else { (lo, hi) }
}

/// Resize a raster per [`fit_within`]. The identity fit returns a plain copy.
pub fn resize_to_fit(image: &RgbImage, bounds: Bounds) -> Result<RgbImage, GeometryError> {
    let fit = fit_within(image.width(), image.height(), bounds)?;
    if fit.width == image.width() && fit.height == image.height() {
        return Ok(image.clone());
    }
    Ok(imageops::resize(
        image,
        fit.width,
        fit.height,
        FilterType::Lanczos3,
    ))
}

/// Crop and resize a raster per [`fill_exact`]; output is exactly `bounds`.
pub fn crop_to_fill(image: &RgbImage, bounds: Bounds) -> Result<RgbImage, GeometryError> {
    let plan = fill_exact(image.width(), image.height(), bounds)?;
    let source_box = plan.source_box;
    let cropped = imageops::crop_imm(
        image,
        source_box.x0,
        source_box.y0,
        source_box.width(),
        source_box.height(),
    )
    .to_image();
    Ok(imageops::resize(
        &cropped,
        plan.width,
        plan.height,
        FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape_into_square() {
        // 1920/1080 is wider than 1024/1024, so width bounds the scale.
        let fit = fit_within(1920, 1080, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((fit.width, fit.height), (1024, 576));
    }

    #[test]
    fn test_fit_portrait_into_square() {
        let fit = fit_within(1080, 1920, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((fit.width, fit.height), (576, 1024));
    }

    #[test]
    fn test_fit_never_upscales() {
        let fit = fit_within(640, 480, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((fit.width, fit.height), (640, 480));
    }

    #[test]
    fn test_fit_exact_aspect_match() {
        // Source aspect equals target aspect: both branches give the same scale.
        let fit = fit_within(2048, 2048, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((fit.width, fit.height), (1024, 1024));
    }

    #[test]
    fn test_fit_extreme_aspect_keeps_positive_height() {
        let fit = fit_within(10000, 1, Bounds::new(1024, 1024)).unwrap();
        assert_eq!(fit.width, 1024);
        assert_eq!(fit.height, 1);
    }

    #[test]
    fn test_fit_is_pure() {
        let a = fit_within(1234, 567, Bounds::new(1024, 1024)).unwrap();
        let b = fit_within(1234, 567, Bounds::new(1024, 1024)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_landscape_into_square() {
        // 640/480 wider than 1: vertical axis constrains, scale = 240/480.
        let plan = fill_exact(640, 480, Bounds::new(240, 240)).unwrap();
        assert_eq!((plan.width, plan.height), (240, 240));
        assert_eq!(
            plan.source_box,
            CropBox {
                x0: 80,
                y0: 0,
                x1: 560,
                y1: 480
            }
        );
    }

    #[test]
    fn test_fill_portrait_into_square() {
        let plan = fill_exact(480, 640, Bounds::new(240, 240)).unwrap();
        assert_eq!((plan.width, plan.height), (240, 240));
        assert_eq!(
            plan.source_box,
            CropBox {
                x0: 0,
                y0: 80,
                x1: 480,
                y1: 560
            }
        );
    }

    #[test]
    fn test_fill_box_contained_for_small_source() {
        // Smaller than the target on both axes: box covers the whole source.
        let plan = fill_exact(120, 90, Bounds::new(240, 240)).unwrap();
        let b = plan.source_box;
        assert!(b.x0 < b.x1 && b.x1 <= 120);
        assert!(b.y0 < b.y1 && b.y1 <= 90);
        assert_eq!((plan.width, plan.height), (240, 240));
    }

    #[test]
    fn test_fill_degenerate_target_keeps_box_non_empty() {
        let plan = fill_exact(3, 3000, Bounds::new(240, 1)).unwrap();
        let b = plan.source_box;
        assert!(b.x0 < b.x1 && b.x1 <= 3);
        assert!(b.y0 < b.y1 && b.y1 <= 3000);
    }

    #[test]
    fn test_zero_bounds_rejected() {
        assert_eq!(
            fit_within(640, 480, Bounds::new(0, 240)),
            Err(GeometryError::InvalidBounds {
                width: 0,
                height: 240
            })
        );
        assert!(fill_exact(640, 480, Bounds::new(240, 0)).is_err());
    }

    #[test]
    fn test_zero_source_rejected() {
        assert_eq!(
            fit_within(0, 480, Bounds::new(240, 240)),
            Err(GeometryError::DegenerateSource {
                width: 0,
                height: 480
            })
        );
        assert!(fill_exact(640, 0, Bounds::new(240, 240)).is_err());
    }

    #[test]
    fn test_resize_to_fit_dimensions() {
        let image = RgbImage::new(1920, 1080);
        let out = resize_to_fit(&image, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((out.width(), out.height()), (1024, 576));
    }

    #[test]
    fn test_resize_to_fit_identity_copy() {
        let image = RgbImage::new(320, 200);
        let out = resize_to_fit(&image, Bounds::new(1024, 1024)).unwrap();
        assert_eq!((out.width(), out.height()), (320, 200));
    }

    #[test]
    fn test_crop_to_fill_dimensions() {
        for (w, h) in [(1920, 1080), (480, 640), (240, 240), (100, 900)] {
            let image = RgbImage::new(w, h);
            let out = crop_to_fill(&image, Bounds::new(240, 240)).unwrap();
            assert_eq!((out.width(), out.height()), (240, 240));
        }
    }

    #[test]
    fn test_crop_picks_center_content() {
        // Left third black, middle third white, right third black; the
        // centered crop of a 3:1 source into a square must keep the middle.
        let mut image = RgbImage::new(720, 240);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            if (240..480).contains(&x) {
                *pixel = image::Rgb([255, 255, 255]);
            }
        }
        let out = crop_to_fill(&image, Bounds::new(240, 240)).unwrap();
        let center = out.get_pixel(120, 120);
        assert!(center.0[0] > 200, "expected white center, got {:?}", center);
    }
}
