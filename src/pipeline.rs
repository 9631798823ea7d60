use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    assets::{SourceImage, prepare_asset},
    captions::{CaptionStyle, HeuristicTextMeasure, MeasureText, WordTiming, caption_rect,
        segment_words},
    composite::{FillMode, place_on_canvas, select_policy},
    core::Rgba8,
    dedup::{self, DedupConfig, DedupDecision},
    error::{PromoreelError, PromoreelResult},
    framing::choose_canvas,
    timeline::{CaptionOverlay, PlacedFrame, SlideshowTimeline, assemble_slots},
};

/// Every tunable for one slideshow run. Passed in explicitly so concurrent
/// runs stay isolated; there is no module-level state anywhere in the crate.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    pub dedup: DedupConfig,
    /// Fallback placement when an image's aspect does not match the canvas.
    pub fill: FillMode,
    /// Border color for [`FillMode::PadFit`].
    pub padding_color: Rgba8,
    pub max_words_per_caption: usize,
    pub max_caption_secs: f64,
    /// Per-image duration when no external total is supplied.
    pub default_frame_secs: f64,
    pub crossfade_secs: f64,
    pub caption_style: CaptionStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dedup: DedupConfig::default(),
            fill: FillMode::default(),
            padding_color: Rgba8::BLACK,
            max_words_per_caption: 4,
            max_caption_secs: 2.5,
            default_frame_secs: 3.0,
            crossfade_secs: 0.4,
            caption_style: CaptionStyle::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> PromoreelResult<()> {
        self.dedup.validate()?;
        self.caption_style.validate()?;
        if self.max_words_per_caption == 0 {
            return Err(PromoreelError::validation(
                "max_words_per_caption must be >= 1",
            ));
        }
        if !self.max_caption_secs.is_finite() || self.max_caption_secs <= 0.0 {
            return Err(PromoreelError::validation(
                "max_caption_secs must be positive and finite",
            ));
        }
        if !self.default_frame_secs.is_finite() || self.default_frame_secs <= 0.0 {
            return Err(PromoreelError::validation(
                "default_frame_secs must be positive and finite",
            ));
        }
        if !self.crossfade_secs.is_finite() || self.crossfade_secs < 0.0 {
            return Err(PromoreelError::validation(
                "crossfade_secs must be >= 0 and finite",
            ));
        }
        Ok(())
    }
}

/// Synchronous batch pipeline: decode, dedup, size, composite, caption,
/// assemble. One instance per run (or per caller); all state is local to
/// [`SlideshowPipeline::run`].
pub struct SlideshowPipeline {
    config: PipelineConfig,
    measurer: Box<dyn MeasureText>,
}

impl SlideshowPipeline {
    pub fn new(config: PipelineConfig) -> PromoreelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            measurer: Box::new(HeuristicTextMeasure),
        })
    }

    /// Substitute a real text shaper for caption box measurement.
    pub fn with_measurer(mut self, measurer: Box<dyn MeasureText>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline over downloaded images and (optionally) word
    /// timings from a transcription service.
    ///
    /// Undecodable images are dropped; duplicate and undersized images are
    /// rejected per [`dedup::evaluate`]. An empty `words` slice simply skips
    /// the caption layer. `total_duration`, when present, is the voiceover
    /// length the frames must sum to.
    #[tracing::instrument(skip_all, fields(sources = sources.len(), words = words.len()))]
    pub fn run(
        &self,
        sources: &[SourceImage],
        words: &[WordTiming],
        total_duration: Option<f64>,
    ) -> PromoreelResult<SlideshowTimeline> {
        // Tracking collections live and die with this run.
        let mut seen_content = HashSet::new();
        let mut seen_perceptual = Vec::new();
        let mut accepted = Vec::new();

        for source in sources {
            let asset = match prepare_asset(source) {
                Ok(asset) => asset,
                Err(err) => {
                    warn!(url = %source.source_url, error = %err, "dropping undecodable image");
                    continue;
                }
            };

            match dedup::evaluate(&asset, &seen_content, &seen_perceptual, &self.config.dedup) {
                DedupDecision::Accept => {
                    seen_content.insert(asset.content_hash);
                    seen_perceptual.push(asset.perceptual_hash);
                    accepted.push(asset);
                }
                decision => {
                    debug!(url = %asset.source_url, ?decision, "rejected image");
                }
            }
        }

        if accepted.is_empty() {
            return Err(PromoreelError::NoUsableImages);
        }

        let canvas = choose_canvas(&accepted);
        let slots = assemble_slots(
            accepted.len(),
            total_duration,
            self.config.default_frame_secs,
            self.config.crossfade_secs,
        )?;
        let total_secs = match slots.last() {
            Some(last) => last.start_secs + last.duration_secs,
            None => 0.0,
        };

        let canvas_aspect = canvas.aspect();
        let mut frames = Vec::with_capacity(accepted.len());
        for (asset, slot) in accepted.iter().zip(&slots) {
            let policy = select_policy(asset.aspect(), canvas_aspect, self.config.fill);
            let bitmap =
                place_on_canvas(&asset.pixels, canvas, policy, self.config.padding_color)?;
            frames.push(PlacedFrame {
                source_url: asset.source_url.clone(),
                bitmap,
                start_secs: slot.start_secs,
                duration_secs: slot.duration_secs,
                fade_in_secs: slot.fade_in_secs,
            });
        }

        let captions = if words.is_empty() {
            Vec::new()
        } else {
            segment_words(
                words,
                self.config.max_words_per_caption,
                self.config.max_caption_secs,
            )?
            .into_iter()
            .map(|segment| {
                let rect =
                    caption_rect(&segment.text, canvas, &self.config.caption_style,
                        self.measurer.as_ref());
                CaptionOverlay {
                    segment,
                    rect,
                    corner_radius: self.config.caption_style.corner_radius,
                }
            })
            .collect()
        };

        debug!(
            frames = frames.len(),
            captions = captions.len(),
            total_secs,
            "assembled slideshow"
        );

        Ok(SlideshowTimeline {
            canvas,
            frames,
            captions,
            total_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn constructor_rejects_bad_config() {
        let mut config = PipelineConfig::default();
        config.max_words_per_caption = 0;
        assert!(SlideshowPipeline::new(config).is_err());

        let mut config = PipelineConfig::default();
        config.crossfade_secs = f64::INFINITY;
        assert!(SlideshowPipeline::new(config).is_err());
    }

    #[test]
    fn no_sources_is_no_usable_images() {
        let pipeline = SlideshowPipeline::new(PipelineConfig::default()).unwrap();
        let err = pipeline.run(&[], &[], None).unwrap_err();
        assert!(matches!(err, PromoreelError::NoUsableImages));
    }
}
