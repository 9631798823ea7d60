use crate::{assets::ImageAsset, core::CanvasSpec};

/// Mean aspect below which the slideshow renders portrait.
pub const PORTRAIT_BOUND: f64 = 0.8;
/// Mean aspect above which the slideshow renders landscape.
pub const LANDSCAPE_BOUND: f64 = 1.2;

/// Pick the output canvas for a batch of images.
///
/// The arithmetic mean of the width/height ratios decides between the three
/// fixed output resolutions; input resolution never leaks into the output.
/// Batches without any valid dimensions default to landscape.
pub fn choose_canvas(assets: &[ImageAsset]) -> CanvasSpec {
    let mut sum = 0.0;
    let mut count = 0usize;
    for asset in assets {
        if asset.width > 0 && asset.height > 0 {
            sum += asset.aspect();
            count += 1;
        }
    }

    if count == 0 {
        return CanvasSpec::LANDSCAPE;
    }

    let mean = sum / count as f64;
    if mean < PORTRAIT_BOUND {
        CanvasSpec::PORTRAIT
    } else if mean > LANDSCAPE_BOUND {
        CanvasSpec::LANDSCAPE
    } else {
        CanvasSpec::SQUARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContentHash, PerceptualHash};

    fn asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset {
            source_url: "test".to_string(),
            width,
            height,
            content_hash: ContentHash([0; 32]),
            perceptual_hash: PerceptualHash(0),
            pixels: image::RgbaImage::new(1, 1),
        }
    }

    #[test]
    fn empty_batch_defaults_to_landscape() {
        assert_eq!(choose_canvas(&[]), CanvasSpec::LANDSCAPE);
        assert_eq!(choose_canvas(&[asset(0, 0)]), CanvasSpec::LANDSCAPE);
    }

    #[test]
    fn wide_mean_picks_landscape() {
        let batch = vec![asset(1600, 900), asset(1920, 1080)];
        assert_eq!(choose_canvas(&batch), CanvasSpec::LANDSCAPE);
    }

    #[test]
    fn tall_mean_picks_portrait() {
        let batch = vec![asset(600, 1000), asset(720, 1280)];
        assert_eq!(choose_canvas(&batch), CanvasSpec::PORTRAIT);
    }

    #[test]
    fn near_square_mean_picks_square() {
        // Mean aspect (1.1 + 1.0 + 0.9) / 3 = 1.0, strictly inside the band.
        let batch = vec![asset(1100, 1000), asset(1000, 1000), asset(900, 1000)];
        assert_eq!(choose_canvas(&batch), CanvasSpec::SQUARE);
    }

    #[test]
    fn mixed_orientations_follow_the_mean() {
        // 3 landscape at 16:9 plus 2 portrait at 0.6 gives a mean of ~1.31.
        let batch = vec![
            asset(800, 450),
            asset(800, 450),
            asset(800, 450),
            asset(480, 800),
            asset(480, 800),
        ];
        assert_eq!(choose_canvas(&batch), CanvasSpec::LANDSCAPE);
    }

    #[test]
    fn zero_dimension_images_are_ignored_in_the_mean() {
        let batch = vec![asset(0, 100), asset(600, 1000)];
        assert_eq!(choose_canvas(&batch), CanvasSpec::PORTRAIT);
    }
}
