use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    line_metrics::{LineMetrics, LineSpan},
    measure::TextMeasure,
};

/// Configuration knobs used by the line breaker.
///
/// Everything is honored during a single [`break_lines`] call so a surface
/// can lay its text out inside any width and line budget.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBreakConfig {
    pub max_width: Option<f32>,
    /// Lines beyond this count are folded into the last one and elided.
    pub max_lines: Option<usize>,
    pub wrap_style: WrapStyle,
    pub wrap_hard_break: bool,
    pub word_separators: HashSet<char, fxhash::FxBuildHasher>,
    pub linebreak_char: HashSet<char, fxhash::FxBuildHasher>,
    /// Marker the layout itself draws where it elides text.
    pub ellipsis: String,
}

impl Default for LineBreakConfig {
    fn default() -> Self {
        let mut word_separators = HashSet::default();
        word_separators.insert(' ');
        word_separators.insert('\t');

        let mut linebreak_char = HashSet::default();
        linebreak_char.insert('\n');

        Self {
            max_width: None,
            max_lines: None,
            wrap_style: WrapStyle::WordWrap,
            wrap_hard_break: true,
            word_separators,
            linebreak_char,
            ellipsis: "\u{2026}".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Wrapping rules that define where line breaks may occur.
pub enum WrapStyle {
    NoWrap,
    WordWrap,
    CharWrap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitKind {
    Glyphs,
    Separator,
    LineBreak,
}

/// Smallest piece of text the breaker places at once.
#[derive(Clone, Copy, Debug)]
struct Unit {
    kind: UnitKind,
    start: usize,
    end: usize,
}

/// Splits `text` into placement units.
///
/// Separators and line breaks are always their own unit. Other graphemes are
/// grouped into words, except under [`WrapStyle::CharWrap`] where every
/// grapheme stands alone.
fn units(text: &str, config: &LineBreakConfig) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut word_start: Option<usize> = None;

    for (start, grapheme) in text.grapheme_indices(true) {
        let end = start + grapheme.len();

        let kind = if grapheme.chars().any(|ch| config.linebreak_char.contains(&ch)) {
            UnitKind::LineBreak
        } else if grapheme.chars().all(|ch| config.word_separators.contains(&ch)) {
            UnitKind::Separator
        } else {
            UnitKind::Glyphs
        };

        if kind == UnitKind::Glyphs && config.wrap_style != WrapStyle::CharWrap {
            word_start.get_or_insert(start);
            continue;
        }

        if let Some(word) = word_start.take() {
            units.push(Unit {
                kind: UnitKind::Glyphs,
                start: word,
                end: start,
            });
        }
        units.push(Unit { kind, start, end });
    }

    if let Some(word) = word_start {
        units.push(Unit {
            kind: UnitKind::Glyphs,
            start: word,
            end: text.len(),
        });
    }

    units
}

/// Greedy line filling state.
struct Breaker<'a, M: ?Sized> {
    text: &'a str,
    measure: &'a M,
    limit: Option<f32>,
    hard_break: bool,
    lines: Vec<LineSpan>,
    line_start: usize,
    has_glyphs: bool,
}

impl<M: TextMeasure + ?Sized> Breaker<'_, M> {
    fn fits(&self, start: usize, end: usize) -> bool {
        self.limit
            .is_none_or(|limit| self.measure.measure_width(&self.text[start..end]) <= limit)
    }

    /// Closes the current line; the next one starts at `next_start`.
    fn finish_line(&mut self, next_start: usize) {
        self.lines.push(LineSpan::new(self.line_start, next_start));
        self.line_start = next_start;
        self.has_glyphs = false;
    }

    fn push_glyphs(&mut self, start: usize, end: usize) {
        if self.fits(self.line_start, end) {
            self.has_glyphs = true;
            return;
        }

        if self.has_glyphs {
            self.finish_line(start);
            if self.fits(start, end) {
                self.has_glyphs = true;
                return;
            }
        }

        if !self.hard_break {
            // Too wide for any line; keep it whole so nothing is lost.
            self.has_glyphs = true;
            return;
        }

        // Split the word into the largest chunks that still fit. A single
        // grapheme wider than the limit is emitted on a line of its own.
        let text = self.text;
        for (offset, grapheme) in text[start..end].grapheme_indices(true) {
            let g_start = start + offset;
            let g_end = g_start + grapheme.len();
            if self.has_glyphs && !self.fits(self.line_start, g_end) {
                self.finish_line(g_start);
            }
            self.has_glyphs = true;
        }
    }
}

/// Breaks `text` into lines and applies `max_lines` elision.
///
/// Line spans are contiguous and cover the whole text: whitespace never
/// starts a wrapped line but hangs at the end of the previous one, and a
/// line break character belongs to the line it ends. When the text does not
/// fit in `max_lines`, the last kept line is extended to the end of the text
/// and the tail that does not fit next to the ellipsis is reported in
/// [`LineMetrics::elided_len`].
pub fn break_lines<M>(text: &str, config: &LineBreakConfig, measure: &M) -> LineMetrics
where
    M: TextMeasure + ?Sized,
{
    let limit = if matches!(config.wrap_style, WrapStyle::NoWrap) {
        None
    } else {
        config.max_width
    };

    let mut breaker = Breaker {
        text,
        measure,
        limit,
        hard_break: config.wrap_hard_break,
        lines: Vec::new(),
        line_start: 0,
        has_glyphs: false,
    };

    for unit in units(text, config) {
        match unit.kind {
            UnitKind::Glyphs => breaker.push_glyphs(unit.start, unit.end),
            UnitKind::Separator => {}
            UnitKind::LineBreak => breaker.finish_line(unit.end),
        }
    }
    // The last line always exists, even when empty.
    let line_start = breaker.line_start;
    breaker.lines.push(LineSpan::new(line_start, text.len()));

    let mut metrics = LineMetrics {
        lines: breaker.lines,
        elided_len: 0,
    };
    apply_max_lines(&mut metrics, text, config, measure);
    metrics
}

fn apply_max_lines<M>(metrics: &mut LineMetrics, text: &str, config: &LineBreakConfig, measure: &M)
where
    M: TextMeasure + ?Sized,
{
    let Some(max_lines) = config.max_lines.filter(|&n| n > 0) else {
        return;
    };

    let overflow = metrics.lines.len() > max_lines;
    let last_idx = metrics.lines.len().min(max_lines) - 1;
    let last = metrics.lines[last_idx];

    let content = text[last.start..last.end]
        .trim_end_matches(|ch: char| config.linebreak_char.contains(&ch));
    let content_end = last.start + content.len();

    // Without wrapping a single long line runs past the width.
    let too_wide = matches!(config.wrap_style, WrapStyle::NoWrap)
        && config
            .max_width
            .is_some_and(|width| measure.measure_width(content) > width);

    if !overflow && !too_wide {
        return;
    }

    let mut visible_end = content_end;
    if let Some(width) = config.max_width {
        let ends = std::iter::once(content_end).chain(
            content
                .grapheme_indices(true)
                .map(|(offset, _)| last.start + offset)
                .rev(),
        );

        visible_end = last.start;
        let mut candidate = String::with_capacity(content.len() + config.ellipsis.len());
        for end in ends {
            candidate.clear();
            candidate.push_str(&text[last.start..end]);
            candidate.push_str(&config.ellipsis);
            if measure.measure_width(&candidate) <= width {
                visible_end = end;
                break;
            }
        }
    }

    metrics.lines.truncate(last_idx + 1);
    metrics.lines[last_idx].end = text.len();
    metrics.elided_len = text.len() - visible_end;

    log::debug!(
        "Layout elided {} bytes after line {}.",
        metrics.elided_len,
        last_idx
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvance;

    fn spans(metrics: &LineMetrics) -> Vec<(usize, usize)> {
        metrics.lines.iter().map(|l| (l.start, l.end)).collect()
    }

    fn config(max_width: f32, wrap_style: WrapStyle) -> LineBreakConfig {
        LineBreakConfig {
            max_width: Some(max_width),
            wrap_style,
            ..Default::default()
        }
    }

    #[test]
    fn single_line_when_it_fits() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("Hello World", &config(200.0, WrapStyle::WordWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 11)]);
        assert!(!metrics.is_elided());
    }

    #[test]
    fn word_wrap_hangs_separator() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("Hello World", &config(80.0, WrapStyle::WordWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 6), (6, 11)]);
    }

    #[test]
    fn char_wrap() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("abcdef", &config(30.0, WrapStyle::CharWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 3), (3, 6)]);
    }

    #[test]
    fn hard_break_splits_long_words() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("abcdefgh", &config(30.0, WrapStyle::WordWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 3), (3, 6), (6, 8)]);

        let soft = LineBreakConfig {
            wrap_hard_break: false,
            ..config(30.0, WrapStyle::WordWrap)
        };
        let metrics = break_lines("abcdefgh", &soft, &measure);
        assert_eq!(spans(&metrics), vec![(0, 8)]);
    }

    #[test]
    fn hard_break_after_existing_word() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("ab cdefgh", &config(40.0, WrapStyle::WordWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 3), (3, 7), (7, 9)]);
    }

    #[test]
    fn line_break_chars_end_lines() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("ab\ncd", &LineBreakConfig::default(), &measure);
        assert_eq!(spans(&metrics), vec![(0, 3), (3, 5)]);

        let metrics = break_lines("ab\n", &LineBreakConfig::default(), &measure);
        assert_eq!(spans(&metrics), vec![(0, 3), (3, 3)]);
    }

    #[test]
    fn empty_text_has_one_empty_line() {
        let measure = FixedAdvance::new(10.0);
        let metrics = break_lines("", &config(50.0, WrapStyle::WordWrap), &measure);
        assert_eq!(spans(&metrics), vec![(0, 0)]);
    }

    #[test]
    fn max_lines_elides_overflow() {
        let measure = FixedAdvance::new(10.0);
        let cfg = LineBreakConfig {
            max_lines: Some(1),
            ..config(80.0, WrapStyle::WordWrap)
        };

        let metrics = break_lines("Hello World", &cfg, &measure);
        // "Hello " + "…" fits in 80, "World" is hidden
        assert_eq!(spans(&metrics), vec![(0, 11)]);
        assert_eq!(metrics.elided_len, 5);
    }

    #[test]
    fn max_lines_shrinks_last_line_for_ellipsis() {
        let measure = FixedAdvance::new(10.0);
        let cfg = LineBreakConfig {
            max_lines: Some(2),
            ..config(50.0, WrapStyle::CharWrap)
        };

        // lines: "abcde" "fghij" "kl"; second line needs room for "…"
        let metrics = break_lines("abcdefghijkl", &cfg, &measure);
        assert_eq!(spans(&metrics), vec![(0, 5), (5, 12)]);
        assert_eq!(metrics.elided_len, 3);
    }

    #[test]
    fn max_lines_not_reached() {
        let measure = FixedAdvance::new(10.0);
        let cfg = LineBreakConfig {
            max_lines: Some(3),
            ..config(80.0, WrapStyle::WordWrap)
        };
        let metrics = break_lines("Hello World", &cfg, &measure);
        assert_eq!(spans(&metrics), vec![(0, 6), (6, 11)]);
        assert_eq!(metrics.elided_len, 0);
    }

    #[test]
    fn no_wrap_single_line_is_elided_when_too_wide() {
        let measure = FixedAdvance::new(10.0);
        let cfg = LineBreakConfig {
            max_lines: Some(1),
            ..config(60.0, WrapStyle::NoWrap)
        };
        let metrics = break_lines("Hello World", &cfg, &measure);
        assert_eq!(spans(&metrics), vec![(0, 11)]);
        assert_eq!(metrics.elided_len, 6);
    }
}
