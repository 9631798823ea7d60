//! Promoreel is the slideshow assembly core of a promo-video generator.
//!
//! Given downloaded product images and optional word-level speech timings,
//! it deduplicates the images (content hash + perceptual hash), picks an
//! output canvas, composites each survivor onto it, groups the words into
//! timed caption boxes, and assembles a frame/caption timeline for an
//! external video encoder.
//!
//! - [`SlideshowPipeline`] runs the whole thing with a [`PipelineConfig`]
//! - Each stage is also exposed on its own: [`dedup::evaluate`],
//!   [`choose_canvas`], [`place_on_canvas`], [`segment_words`],
//!   [`assemble_slots`]
//!
//! Downloading, scraping, speech-to-text, and video encoding are external
//! collaborators; this crate only ever sees bytes, timings, and durations.
#![forbid(unsafe_code)]

pub mod assets;
pub mod captions;
pub mod composite;
pub mod core;
pub mod dedup;
pub mod error;
pub mod framing;
pub mod pipeline;
pub mod timeline;

pub use crate::assets::{ImageAsset, SourceImage, prepare_asset};
pub use crate::captions::{
    CaptionSegment, CaptionStyle, HeuristicTextMeasure, MeasureText, WordTiming, caption_rect,
    segment_words,
};
pub use crate::composite::{FillMode, PlacementPolicy, place_on_canvas, select_policy};
pub use crate::core::{CanvasSpec, ContentHash, PerceptualHash, Rgba8};
pub use crate::dedup::{DedupConfig, DedupDecision};
pub use crate::error::{PromoreelError, PromoreelResult};
pub use crate::framing::choose_canvas;
pub use crate::pipeline::{PipelineConfig, SlideshowPipeline};
pub use crate::timeline::{
    CaptionOverlay, FrameSlot, FrameTiming, PlacedFrame, SlideshowTimeline, TimelineManifest,
    assemble_slots,
};
