pub use kurbo::{Point, Rect};

/// Output canvas dimensions in pixels.
///
/// Canvases come from a fixed set so downstream encode settings stay
/// consistent regardless of what the source images looked like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSpec {
    /// 16:9 landscape output.
    pub const LANDSCAPE: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// 9:16 portrait output.
    pub const PORTRAIT: Self = Self {
        width: 1080,
        height: 1920,
    };

    /// 1:1 square output.
    pub const SQUARE: Self = Self {
        width: 1440,
        height: 1440,
    };

    /// Width/height ratio; `0.0` for a degenerate zero-height canvas.
    pub fn aspect(self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// SHA-256 digest of raw image bytes. Identical bytes, identical hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Lowercase hex rendering of the full digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({}..)", &self.to_hex()[..16])
    }
}

/// 64-bit perceptual fingerprint of an image's visual structure.
///
/// Visually similar images produce hashes with a small Hamming distance;
/// the hashes are only ever compared within a single pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PerceptualHash(pub u64);

impl PerceptualHash {
    /// Hamming distance: number of differing bits, `0..=64`.
    pub fn distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// Straight-alpha RGBA8 color, used for padding fills and caption boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default padding color.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}
