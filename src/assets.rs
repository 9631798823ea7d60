use anyhow::Context;
use image::RgbaImage;
use img_hash::{HashAlg, HasherConfig};
use sha2::Digest as _;

use crate::{
    core::{ContentHash, PerceptualHash},
    error::{PromoreelError, PromoreelResult},
};

/// Raw downloaded bytes plus where they came from.
///
/// Downloading itself is the caller's concern; the pipeline only ever sees
/// byte blobs in scrape order.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub source_url: String,
    pub bytes: Vec<u8>,
}

/// A decoded image ready for dedup, sizing, and compositing.
///
/// Owned exclusively by one pipeline run; discarded after its canvas bitmap
/// has been produced.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
    pub content_hash: ContentHash,
    pub perceptual_hash: PerceptualHash,
    /// Straight-alpha RGBA8 pixels.
    pub pixels: RgbaImage,
}

impl ImageAsset {
    /// Width/height ratio; `0.0` for degenerate dimensions.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Decode and fingerprint one downloaded image.
///
/// Corrupt bytes surface as an error; the caller decides whether that drops
/// the image or aborts the run.
pub fn prepare_asset(source: &SourceImage) -> PromoreelResult<ImageAsset> {
    let content_hash = ContentHash(sha2::Sha256::digest(&source.bytes).into());

    let dyn_img = image::load_from_memory(&source.bytes)
        .with_context(|| format!("decode image from {}", source.source_url))?;
    let pixels = dyn_img.to_rgba8();
    let (width, height) = pixels.dimensions();

    let perceptual_hash = perceptual_hash(&source.bytes, &source.source_url)?;

    Ok(ImageAsset {
        source_url: source.source_url.clone(),
        width,
        height,
        content_hash,
        perceptual_hash,
        pixels,
    })
}

/// 64-bit gradient hash (8x8) over the decoded grayscale image.
fn perceptual_hash(bytes: &[u8], source_url: &str) -> PromoreelResult<PerceptualHash> {
    let img = img_hash::image::load_from_memory(bytes)
        .with_context(|| format!("decode image for perceptual hash from {source_url}"))?;

    let hasher = HasherConfig::new()
        .hash_alg(HashAlg::Gradient)
        .hash_size(8, 8)
        .to_hasher();
    let hash = hasher.hash_image(&img);

    let raw: [u8; 8] = hash
        .as_bytes()
        .try_into()
        .map_err(|_| PromoreelError::validation("perceptual hash must be exactly 64 bits"))?;
    Ok(PerceptualHash(u64::from_be_bytes(raw)))
}
