//! Fitting a badge suffix onto the last line of a text.
//!
//! The suffix is the ellipsis marker followed by a placeholder standing in for
//! the icon. [`fit`] finds the smallest number of trailing characters to drop
//! from a line so that the line plus the suffix fits the available width, and
//! [`decorate`] builds the final string with the icon position recorded.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::measure::TextMeasure;

/// Strings appended after the text when a badge is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeSuffix {
    /// Marker shown when characters were cut, e.g. `"…"`.
    pub ellipsis: String,
    /// Stand-in measured in place of the icon. Should be about as wide as the
    /// icon; the icon glyph is attached over it.
    pub placeholder: String,
    /// Extra room measured before the ellipsis but never displayed.
    pub gap: String,
}

impl Default for BadgeSuffix {
    fn default() -> Self {
        Self {
            ellipsis: "\u{2026}".to_string(),
            placeholder: "\u{25A0}".to_string(),
            gap: " ".to_string(),
        }
    }
}

impl BadgeSuffix {
    /// The string measured after every candidate prefix.
    pub fn measured_tail(&self) -> String {
        let mut tail =
            String::with_capacity(self.gap.len() + self.ellipsis.len() + self.placeholder.len());
        tail.push_str(&self.gap);
        tail.push_str(&self.ellipsis);
        tail.push_str(&self.placeholder);
        tail
    }
}

/// Outcome of fitting one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FitResult {
    /// The line with `cut_count` trailing characters removed.
    pub truncated_text: String,
    /// Number of grapheme clusters removed from the end of the line.
    pub cut_count: usize,
    /// Whether the ellipsis marker has to be displayed.
    pub suffix_applied: bool,
}

/// Why a line could not be fitted.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Even with the whole line removed the suffix is wider than the line.
    #[error("badge suffix needs {suffix_width}px but only {available_width}px are available")]
    SuffixTooWide {
        suffix_width: f32,
        available_width: f32,
    },
    /// The available width is NaN, infinite or negative.
    #[error("available width must be finite and non-negative, got {0}")]
    InvalidWidth(f32),
}

/// Finds the minimal cut so that `line` plus the suffix fits `available_width`.
///
/// Characters are removed one grapheme cluster at a time from the end and the
/// candidate is re-measured at every step: shaped widths are not guaranteed to
/// shrink monotonically, so no step is skipped. The scan stops after the empty
/// prefix, which bounds the work by the number of graphemes in `line`.
///
/// The candidate always includes the ellipsis, even when nothing is cut, so a
/// line "already fits" only if it fits together with the ellipsis. A line
/// that fits next to the icon alone is still shortened.
pub fn fit<M>(
    line: &str,
    suffix: &BadgeSuffix,
    available_width: f32,
    measure: &M,
) -> Result<FitResult, FitError>
where
    M: TextMeasure + ?Sized,
{
    if !available_width.is_finite() || available_width < 0.0 {
        return Err(FitError::InvalidWidth(available_width));
    }

    let tail = suffix.measured_tail();
    let grapheme_starts: Vec<usize> = line.grapheme_indices(true).map(|(i, _)| i).collect();
    let ends = std::iter::once(line.len()).chain(grapheme_starts.into_iter().rev());

    let mut candidate = String::with_capacity(line.len() + tail.len());
    for (cut_count, end) in ends.enumerate() {
        candidate.clear();
        candidate.push_str(&line[..end]);
        candidate.push_str(&tail);

        if measure.measure_width(&candidate) <= available_width {
            log::debug!(
                "Badge fits after cutting {} of {:?} ({}px available).",
                cut_count,
                line,
                available_width
            );
            return Ok(FitResult {
                truncated_text: line[..end].to_string(),
                cut_count,
                suffix_applied: cut_count > 0,
            });
        }
    }

    Err(FitError::SuffixTooWide {
        suffix_width: measure.measure_width(&tail),
        available_width,
    })
}

/// Text with the badge placeholder in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratedText {
    /// Text to display, placeholder included.
    pub text: String,
    /// Byte range of the placeholder the icon glyph is attached to.
    pub glyph_range: Range<usize>,
}

/// Joins `head` (the lines before the fitted one) with the fitted line, the
/// ellipsis and the icon placeholder.
///
/// The ellipsis is shown when characters were cut or when `elided` says the
/// layout had already hidden a tail of the text.
pub fn decorate(
    head: &str,
    fitted: &FitResult,
    suffix: &BadgeSuffix,
    elided: bool,
) -> DecoratedText {
    let mut text = String::with_capacity(
        head.len()
            + fitted.truncated_text.len()
            + suffix.ellipsis.len()
            + suffix.placeholder.len(),
    );
    text.push_str(head);
    text.push_str(&fitted.truncated_text);
    if fitted.suffix_applied || elided {
        text.push_str(&suffix.ellipsis);
    }

    let glyph_start = text.len();
    text.push_str(&suffix.placeholder);

    DecoratedText {
        glyph_range: glyph_start..text.len(),
        text,
    }
}
