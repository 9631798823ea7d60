use image::{RgbaImage, imageops, imageops::FilterType};

use crate::{
    core::{CanvasSpec, Rgba8},
    error::{PromoreelError, PromoreelResult},
};

/// Aspect-ratio difference under which an image counts as matching the
/// canvas and gets stretched directly.
pub const ASPECT_MATCH_EPSILON: f64 = 0.01;

/// How a source image is fitted into the output canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlacementPolicy {
    /// Direct high-quality resize; only sound when aspects already match.
    FitExact,
    /// Cover the canvas, center-cropping the overflow axis.
    CropFill,
    /// Contain the image, filling the leftover border with a solid color.
    PadFit,
}

/// Configured fallback when aspects differ enough to rule out
/// [`PlacementPolicy::FitExact`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillMode {
    #[default]
    CropFill,
    PadFit,
}

/// Pick the placement policy for one image on one canvas.
pub fn select_policy(image_aspect: f64, canvas_aspect: f64, fill: FillMode) -> PlacementPolicy {
    if (image_aspect - canvas_aspect).abs() < ASPECT_MATCH_EPSILON {
        PlacementPolicy::FitExact
    } else {
        match fill {
            FillMode::CropFill => PlacementPolicy::CropFill,
            FillMode::PadFit => PlacementPolicy::PadFit,
        }
    }
}

/// Resize/crop/pad `image` into a bitmap of exactly `canvas` dimensions.
///
/// All scaling uses Lanczos resampling; nearest-neighbor would alias badly
/// once the frames are encoded.
pub fn place_on_canvas(
    image: &RgbaImage,
    canvas: CanvasSpec,
    policy: PlacementPolicy,
    padding: Rgba8,
) -> PromoreelResult<RgbaImage> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PromoreelError::validation(
            "canvas dimensions must be non-zero",
        ));
    }
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(PromoreelError::validation("source image must be non-empty"));
    }

    let out = match policy {
        PlacementPolicy::FitExact => {
            imageops::resize(image, canvas.width, canvas.height, FilterType::Lanczos3)
        }
        PlacementPolicy::CropFill => crop_fill(image, canvas),
        PlacementPolicy::PadFit => pad_fit(image, canvas, padding),
    };

    // Guards against off-by-one rounding in the scale/crop math above.
    if out.dimensions() != (canvas.width, canvas.height) {
        return Ok(imageops::resize(
            &out,
            canvas.width,
            canvas.height,
            FilterType::Lanczos3,
        ));
    }
    Ok(out)
}

/// Scale so the image covers the canvas, then center-crop the overflow.
///
/// Wider-than-canvas images scale to canvas height and lose left/right
/// columns; taller images scale to canvas width and lose top/bottom rows.
fn crop_fill(image: &RgbaImage, canvas: CanvasSpec) -> RgbaImage {
    let (w, h) = image.dimensions();
    let scale = (f64::from(canvas.width) / f64::from(w)).max(f64::from(canvas.height) / f64::from(h));
    let scaled_w = ((f64::from(w) * scale).round() as u32).max(canvas.width);
    let scaled_h = ((f64::from(h) * scale).round() as u32).max(canvas.height);

    let resized = imageops::resize(image, scaled_w, scaled_h, FilterType::Lanczos3);
    let x = (scaled_w - canvas.width) / 2;
    let y = (scaled_h - canvas.height) / 2;
    imageops::crop_imm(&resized, x, y, canvas.width, canvas.height).to_image()
}

/// Scale so the whole image fits, center it, and fill the border.
fn pad_fit(image: &RgbaImage, canvas: CanvasSpec, padding: Rgba8) -> RgbaImage {
    let (w, h) = image.dimensions();
    let scale = (f64::from(canvas.width) / f64::from(w)).min(f64::from(canvas.height) / f64::from(h));
    let scaled_w = ((f64::from(w) * scale).round() as u32)
        .clamp(1, canvas.width);
    let scaled_h = ((f64::from(h) * scale).round() as u32)
        .clamp(1, canvas.height);

    let resized = imageops::resize(image, scaled_w, scaled_h, FilterType::Lanczos3);
    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, padding.to_pixel());
    let x = i64::from((canvas.width - scaled_w) / 2);
    let y = i64::from((canvas.height - scaled_h) / 2);
    imageops::overlay(&mut out, &resized, x, y);
    out
}
