use image::RgbaImage;
use kurbo::Rect;

use crate::{
    captions::CaptionSegment,
    core::CanvasSpec,
    error::{PromoreelError, PromoreelResult},
};

/// Timing for one slideshow slot, before a bitmap is attached.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSlot {
    pub start_secs: f64,
    pub duration_secs: f64,
    /// Crossfade-in overlapping the previous frame's tail. Presentational
    /// only; it does not alter the duration contract.
    pub fade_in_secs: f64,
}

/// One composited image occupying a slot on the timeline, in original
/// scrape order.
#[derive(Clone, Debug)]
pub struct PlacedFrame {
    pub source_url: String,
    /// Canvas-sized straight-alpha RGBA8 bitmap.
    pub bitmap: RgbaImage,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub fade_in_secs: f64,
}

/// A caption segment with its resolved screen rectangle. Captions are a
/// timed layer of their own, independent of the frame underneath.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionOverlay {
    pub segment: CaptionSegment,
    pub rect: Rect,
    pub corner_radius: f64,
}

/// The assembled slideshow: frames, captions, canvas, total running time.
/// This is the hand-off boundary to an external encoder.
#[derive(Clone, Debug)]
pub struct SlideshowTimeline {
    pub canvas: CanvasSpec,
    pub frames: Vec<PlacedFrame>,
    pub captions: Vec<CaptionOverlay>,
    pub total_secs: f64,
}

impl SlideshowTimeline {
    /// Bitmap-free timing summary, serializable for the encoder side.
    pub fn manifest(&self) -> TimelineManifest {
        TimelineManifest {
            canvas: self.canvas,
            total_secs: self.total_secs,
            frames: self
                .frames
                .iter()
                .map(|f| FrameTiming {
                    source_url: f.source_url.clone(),
                    start_secs: f.start_secs,
                    duration_secs: f.duration_secs,
                    fade_in_secs: f.fade_in_secs,
                })
                .collect(),
            captions: self.captions.clone(),
        }
    }
}

/// Frame timing without pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameTiming {
    pub source_url: String,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub fade_in_secs: f64,
}

/// JSON-friendly description of the whole timeline, minus bitmaps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineManifest {
    pub canvas: CanvasSpec,
    pub total_secs: f64,
    pub frames: Vec<FrameTiming>,
    pub captions: Vec<CaptionOverlay>,
}

/// Divide the slideshow duration into per-frame slots.
///
/// With an external `total` (a voiceover track length), frames share it
/// evenly and the last slot absorbs floating-point drift so the final end
/// time lands exactly on `total`. Without one, every frame gets
/// `default_frame_secs`. Frames after the first carry a fade-in capped at
/// their own duration.
pub fn assemble_slots(
    frame_count: usize,
    total: Option<f64>,
    default_frame_secs: f64,
    crossfade_secs: f64,
) -> PromoreelResult<Vec<FrameSlot>> {
    if frame_count == 0 {
        return Err(PromoreelError::validation(
            "cannot assemble a slideshow from zero frames",
        ));
    }
    if !default_frame_secs.is_finite() || default_frame_secs <= 0.0 {
        return Err(PromoreelError::validation(
            "default_frame_secs must be positive and finite",
        ));
    }
    if !crossfade_secs.is_finite() || crossfade_secs < 0.0 {
        return Err(PromoreelError::validation(
            "crossfade_secs must be >= 0 and finite",
        ));
    }

    let total = match total {
        Some(t) if t.is_finite() && t > 0.0 => t,
        Some(_) => {
            return Err(PromoreelError::validation(
                "total duration must be positive and finite",
            ));
        }
        None => default_frame_secs * frame_count as f64,
    };

    let per = total / frame_count as f64;
    let mut slots = Vec::with_capacity(frame_count);
    for i in 0..frame_count {
        let start = per * i as f64;
        let duration = if i + 1 == frame_count {
            total - start
        } else {
            per
        };
        let fade_in = if i == 0 {
            0.0
        } else {
            crossfade_secs.min(duration)
        };
        slots.push(FrameSlot {
            start_secs: start,
            duration_secs: duration,
            fade_in_secs: fade_in,
        });
    }
    Ok(slots)
}
