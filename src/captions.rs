use kurbo::Rect;
use tracing::debug;

use crate::{
    core::CanvasSpec,
    error::{PromoreelError, PromoreelResult},
};

/// Per-word timestamp from an external speech-to-text service. Read-only
/// input, expected in spoken order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordTiming {
    pub text: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// A caption chunk: a few words shown together, spanning
/// `[start_secs, end_secs]`. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSegment {
    /// The words joined by single spaces, in original order.
    pub text: String,
    pub start_secs: f64,
    pub end_secs: f64,
    pub words: Vec<WordTiming>,
}

/// Greedily group word timings into bounded caption segments.
///
/// A segment takes the next ungrouped word and keeps appending while the
/// word count stays within `max_words` and the candidate word's end stays
/// under `max_secs` from the segment start. A single word longer than
/// `max_secs` still forms its own segment; words are never split.
///
/// Output segments are time-ordered and non-overlapping as long as the
/// input is in spoken order. Malformed words (empty text, non-finite or
/// non-positive spans) are dropped before grouping.
pub fn segment_words(
    words: &[WordTiming],
    max_words: usize,
    max_secs: f64,
) -> PromoreelResult<Vec<CaptionSegment>> {
    if max_words == 0 {
        return Err(PromoreelError::validation("max_words must be >= 1"));
    }
    if !max_secs.is_finite() || max_secs <= 0.0 {
        return Err(PromoreelError::validation(
            "max_secs must be positive and finite",
        ));
    }

    let mut segments = Vec::new();
    let mut current: Vec<WordTiming> = Vec::new();

    for word in words {
        if word.text.trim().is_empty()
            || !word.start_secs.is_finite()
            || !word.end_secs.is_finite()
            || word.end_secs <= word.start_secs
        {
            debug!(?word, "dropping malformed word timing");
            continue;
        }

        if current.is_empty() {
            current.push(word.clone());
            continue;
        }

        let seg_start = current[0].start_secs;
        let fits_count = current.len() + 1 <= max_words;
        let fits_span = word.end_secs - seg_start < max_secs;
        if fits_count && fits_span {
            current.push(word.clone());
        } else {
            segments.push(close_segment(std::mem::take(&mut current)));
            current.push(word.clone());
        }
    }

    if !current.is_empty() {
        segments.push(close_segment(current));
    }

    Ok(segments)
}

fn close_segment(words: Vec<WordTiming>) -> CaptionSegment {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    CaptionSegment {
        text,
        start_secs: words[0].start_secs,
        end_secs: words[words.len() - 1].end_secs,
        words,
    }
}

/// Measured pixel extents of rendered text.
///
/// Seam for a real shaper: the core only needs extents to place caption
/// boxes, so renderers substitute their own measurement here.
pub trait MeasureText {
    /// Returns `(width, height)` in pixels for a single line of `text` at
    /// `font_size` pixels.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Deterministic average-advance approximation. Good enough to place boxes;
/// not a substitute for shaping at render time.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasure;

impl MeasureText for HeuristicTextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let advance = font_size * 0.55;
        (text.chars().count() as f64 * advance, font_size * 1.2)
    }
}

/// Visual parameters for caption boxes.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct CaptionStyle {
    /// Text size in pixels.
    pub font_size: f64,
    /// Horizontal padding between text and box edge.
    pub pad_x: f64,
    /// Vertical padding between text and box edge.
    pub pad_y: f64,
    /// Distance from the box bottom to the canvas bottom.
    pub bottom_margin: f64,
    /// Rounded-rectangle corner radius.
    pub corner_radius: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            pad_x: 24.0,
            pad_y: 12.0,
            bottom_margin: 80.0,
            corner_radius: 16.0,
        }
    }
}

impl CaptionStyle {
    pub fn validate(&self) -> PromoreelResult<()> {
        let fields = [
            ("font_size", self.font_size),
            ("pad_x", self.pad_x),
            ("pad_y", self.pad_y),
            ("bottom_margin", self.bottom_margin),
            ("corner_radius", self.corner_radius),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(PromoreelError::validation(format!(
                    "caption style {name} must be finite and >= 0"
                )));
            }
        }
        if self.font_size == 0.0 {
            return Err(PromoreelError::validation("caption font_size must be > 0"));
        }
        Ok(())
    }
}

/// Screen rectangle for one caption segment: text extents plus padding,
/// anchored bottom-center with a fixed margin, clamped to the canvas width.
///
/// Captions are an independent timed layer; the rectangle never depends on
/// which frame happens to be underneath.
pub fn caption_rect(
    text: &str,
    canvas: CanvasSpec,
    style: &CaptionStyle,
    measurer: &dyn MeasureText,
) -> Rect {
    let (text_w, text_h) = measurer.measure(text, style.font_size);
    let box_w = (text_w + 2.0 * style.pad_x).min(f64::from(canvas.width));
    let box_h = text_h + 2.0 * style.pad_y;

    let x0 = (f64::from(canvas.width) - box_w) / 2.0;
    let y1 = f64::from(canvas.height) - style.bottom_margin;
    Rect::new(x0, y1 - box_h, x0 + box_w, y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> WordTiming {
        WordTiming {
            text: text.to_string(),
            start_secs: start,
            end_secs: end,
        }
    }

    #[test]
    fn duration_bound_closes_the_segment() {
        // The 4th word fits by count but its end exceeds the duration bound,
        // so the segment closes after 3 words.
        let words = vec![
            word("Hello", 0.0, 0.4),
            word("world", 0.4, 0.9),
            word("this", 0.9, 1.3),
            word("rocks", 1.3, 3.0),
        ];
        let segs = segment_words(&words, 4, 2.5).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "Hello world this");
        assert_eq!((segs[0].start_secs, segs[0].end_secs), (0.0, 1.3));
        assert_eq!(segs[1].text, "rocks");
        assert_eq!((segs[1].start_secs, segs[1].end_secs), (1.3, 3.0));
    }

    #[test]
    fn word_count_bound_closes_the_segment() {
        let words: Vec<_> = (0..6)
            .map(|i| word("w", i as f64 * 0.1, i as f64 * 0.1 + 0.1))
            .collect();
        let segs = segment_words(&words, 2, 100.0).unwrap();
        assert_eq!(segs.len(), 3);
        assert!(segs.iter().all(|s| s.words.len() == 2));
    }

    #[test]
    fn single_overlong_word_keeps_its_own_segment() {
        let words = vec![word("loooong", 0.0, 10.0), word("next", 10.0, 10.5)];
        let segs = segment_words(&words, 4, 2.5).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "loooong");
        assert_eq!(segs[0].end_secs, 10.0);
    }

    #[test]
    fn segments_are_ordered_nonoverlapping_positive() {
        let words: Vec<_> = (0..20)
            .map(|i| word("w", i as f64 * 0.3, i as f64 * 0.3 + 0.3))
            .collect();
        let segs = segment_words(&words, 4, 2.5).unwrap();
        for s in &segs {
            assert!(s.end_secs > s.start_secs);
        }
        for pair in segs.windows(2) {
            assert!(pair[0].end_secs <= pair[1].start_secs);
        }
    }

    #[test]
    fn segmentation_is_deterministic() {
        let words: Vec<_> = (0..17)
            .map(|i| word("w", i as f64 * 0.21, i as f64 * 0.21 + 0.2))
            .collect();
        let a = segment_words(&words, 4, 2.5).unwrap();
        let b = segment_words(&words, 4, 2.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_words_are_dropped() {
        let words = vec![
            word("", 0.0, 0.4),
            word("ok", 0.4, 0.9),
            word("bad", 1.0, 1.0),
            word("nan", f64::NAN, 2.0),
        ];
        let segs = segment_words(&words, 4, 2.5).unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "ok");
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(segment_words(&[], 4, 2.5).unwrap().is_empty());
    }

    #[test]
    fn bad_parameters_are_rejected() {
        assert!(segment_words(&[], 0, 2.5).is_err());
        assert!(segment_words(&[], 4, 0.0).is_err());
        assert!(segment_words(&[], 4, f64::NAN).is_err());
    }

    #[test]
    fn caption_rect_is_bottom_centered_inside_the_canvas() {
        let canvas = CanvasSpec::LANDSCAPE;
        let style = CaptionStyle::default();
        let rect = caption_rect("Hello world", canvas, &style, &HeuristicTextMeasure);

        let center = (rect.x0 + rect.x1) / 2.0;
        assert!((center - f64::from(canvas.width) / 2.0).abs() < 1e-9);
        assert_eq!(rect.y1, f64::from(canvas.height) - style.bottom_margin);
        assert!(rect.x0 >= 0.0 && rect.x1 <= f64::from(canvas.width));
        assert!(rect.y0 > 0.0);
    }

    #[test]
    fn caption_rect_clamps_to_canvas_width() {
        let canvas = CanvasSpec::SQUARE;
        let style = CaptionStyle::default();
        let long = "x".repeat(500);
        let rect = caption_rect(&long, canvas, &style, &HeuristicTextMeasure);
        assert!(rect.width() <= f64::from(canvas.width));
        assert!(rect.x0 >= 0.0);
    }

    #[test]
    fn style_validation_catches_nonsense() {
        let mut style = CaptionStyle::default();
        assert!(style.validate().is_ok());
        style.pad_x = f64::NAN;
        assert!(style.validate().is_err());
        let zero_font = CaptionStyle {
            font_size: 0.0,
            ..CaptionStyle::default()
        };
        assert!(zero_font.validate().is_err());
    }
}
