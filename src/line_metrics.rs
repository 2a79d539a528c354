/// Byte range of one laid-out line, `start..end` on char boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    /// Creates a span from byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Checks if the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line boundaries of a text at the current surface width.
///
/// When the layout hides a tail of the text behind its own ellipsis,
/// `elided_len` is the number of hidden bytes and the last line span runs to
/// the end of the text, hidden part included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineMetrics {
    /// Laid-out lines in order, covering the whole text.
    pub lines: Vec<LineSpan>,
    /// Bytes at the end of the text hidden by the layout's ellipsis.
    pub elided_len: usize,
}

impl LineMetrics {
    /// Number of laid-out lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The last visible line, if any.
    pub fn last_line(&self) -> Option<LineSpan> {
        self.lines.last().copied()
    }

    /// Returns true when the layout already elided part of the text.
    pub fn is_elided(&self) -> bool {
        self.elided_len > 0
    }

    /// Byte offset where the last visible line begins, `0` for a single line.
    pub fn last_line_start(&self) -> usize {
        self.last_line().map(|line| line.start).unwrap_or(0)
    }
}

/// Returns `text` without the tail the layout hid behind its ellipsis.
///
/// Metrics computed for a different text are clamped rather than trusted, so
/// the result is always a prefix of `text` ending on a char boundary.
pub fn strip_elided<'a>(text: &'a str, metrics: &LineMetrics) -> &'a str {
    if !metrics.is_elided() {
        return text;
    }
    let end = floor_char_boundary(text, text.len().saturating_sub(metrics.elided_len));
    &text[..end]
}

/// Splits visible text into the lines before the last one and the last line.
pub fn split_last_line<'a>(visible: &'a str, metrics: &LineMetrics) -> (&'a str, &'a str) {
    let start = floor_char_boundary(visible, metrics.last_line_start());
    visible.split_at(start)
}

/// Largest char boundary of `text` that is `<= index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(lines: &[(usize, usize)], elided_len: usize) -> LineMetrics {
        LineMetrics {
            lines: lines.iter().map(|&(s, e)| LineSpan::new(s, e)).collect(),
            elided_len,
        }
    }

    #[test]
    fn strip_without_elision_is_identity() {
        let m = metrics(&[(0, 11)], 0);
        assert_eq!(strip_elided("Hello World", &m), "Hello World");
    }

    #[test]
    fn strip_removes_elided_tail() {
        let m = metrics(&[(0, 6), (6, 17)], 6);
        assert_eq!(strip_elided("Hello World again", &m), "Hello World");
    }

    #[test]
    fn strip_clamps_to_char_boundary() {
        // "가나다" is 9 bytes; eliding 4 bytes lands inside "나".
        let m = metrics(&[(0, 9)], 4);
        assert_eq!(strip_elided("가나다", &m), "가");
    }

    #[test]
    fn strip_with_stale_metrics() {
        let m = metrics(&[(0, 40)], 30);
        assert_eq!(strip_elided("short", &m), "");
    }

    #[test]
    fn split_single_line() {
        let m = metrics(&[(0, 5)], 0);
        assert_eq!(split_last_line("Hello", &m), ("", "Hello"));
    }

    #[test]
    fn split_multi_line() {
        let m = metrics(&[(0, 6), (6, 11)], 0);
        assert_eq!(split_last_line("Hello World", &m), ("Hello ", "World"));
        assert_eq!(m.line_count(), 2);
        assert_eq!(m.last_line(), Some(LineSpan::new(6, 11)));
    }

    #[test]
    fn split_without_lines_keeps_everything_in_last_line() {
        let m = LineMetrics::default();
        assert_eq!(split_last_line("abc", &m), ("", "abc"));
        assert!(!m.is_elided());
    }
}
