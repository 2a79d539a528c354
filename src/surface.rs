//! The text element a badge is drawn into.

use std::ops::Range;

use crate::{
    config::IconAlign,
    line_metrics::LineMetrics,
    measure::{FontMeasure, TextMeasure},
    text::{LineBreakConfig, break_lines},
};

/// Icon glyph attached over a range of the displayed text.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineGlyph {
    /// Byte range of the placeholder the glyph replaces.
    pub range: Range<usize>,
    pub resource: String,
    /// Square size in pixels.
    pub size: f32,
    pub align: IconAlign,
}

/// A text element that can be decorated with an inline glyph.
///
/// Line metrics only exist after the host has laid the current text out;
/// [`BadgeText`](crate::BadgeText) waits for them before fitting.
pub trait TextSurface {
    /// Text currently displayed.
    fn text(&self) -> &str;

    /// Replaces the displayed text. Previous line metrics become stale.
    fn set_raw_text(&mut self, text: &str);

    /// Line boundaries of the current text, `None` until laid out.
    fn line_metrics(&self) -> Option<&LineMetrics>;

    fn measure_width(&self, text: &str) -> f32;

    /// Width a single line may occupy.
    fn available_width(&self) -> f32;

    /// Size of the text in pixels, used as the default icon size.
    fn text_size(&self) -> f32;

    fn attach_inline_glyph(&mut self, glyph: InlineGlyph);

    fn clear_inline_glyph(&mut self);

    fn is_visible(&self) -> bool {
        true
    }
}

/// Surface that lays its text out with [`break_lines`].
///
/// Layout is explicit: mutations invalidate the metrics and the owner calls
/// [`LayoutSurface::layout`] the way a toolkit runs its layout pass.
pub struct LayoutSurface<M> {
    measure: M,
    config: LineBreakConfig,
    text_size: f32,
    text: String,
    glyph: Option<InlineGlyph>,
    metrics: Option<LineMetrics>,
    visible: bool,
}

/// Surface measuring with a real font face.
pub type FontSurface = LayoutSurface<FontMeasure>;

impl<M: TextMeasure> LayoutSurface<M> {
    pub fn new(measure: M, config: LineBreakConfig, text_size: f32) -> Self {
        Self {
            measure,
            config,
            text_size,
            text: String::new(),
            glyph: None,
            metrics: None,
            visible: true,
        }
    }

    /// Runs the layout pass for the current text and width.
    pub fn layout(&mut self) -> &LineMetrics {
        let metrics = break_lines(&self.text, &self.config, &self.measure);
        self.metrics.insert(metrics)
    }

    /// Checks if the metrics are stale.
    pub fn needs_layout(&self) -> bool {
        self.metrics.is_none()
    }

    /// Sets the line width, `None` for unbounded. Invalidates the metrics.
    pub fn set_width(&mut self, width: Option<f32>) {
        self.config.max_width = width;
        self.metrics = None;
    }

    /// Sets the line budget. Invalidates the metrics.
    pub fn set_max_lines(&mut self, max_lines: Option<usize>) {
        self.config.max_lines = max_lines;
        self.metrics = None;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The attached icon glyph, if any.
    pub fn inline_glyph(&self) -> Option<&InlineGlyph> {
        self.glyph.as_ref()
    }

    pub fn config(&self) -> &LineBreakConfig {
        &self.config
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }
}

impl FontSurface {
    /// Creates a surface whose text size follows the font size of `measure`.
    pub fn with_font(measure: FontMeasure, config: LineBreakConfig) -> Self {
        let text_size = measure.font_size();
        Self::new(measure, config, text_size)
    }
}

impl<M: TextMeasure> TextSurface for LayoutSurface<M> {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_raw_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.metrics = None;
        }
    }

    fn line_metrics(&self) -> Option<&LineMetrics> {
        self.metrics.as_ref()
    }

    fn measure_width(&self, text: &str) -> f32 {
        self.measure.measure_width(text)
    }

    fn available_width(&self) -> f32 {
        // An unbounded surface fits any badge without cutting.
        self.config.max_width.unwrap_or(f32::MAX)
    }

    fn text_size(&self) -> f32 {
        self.text_size
    }

    fn attach_inline_glyph(&mut self, glyph: InlineGlyph) {
        if glyph.range.end > self.text.len() {
            log::warn!(
                "Inline glyph range {:?} is outside of the text ({} bytes).",
                glyph.range,
                self.text.len()
            );
            return;
        }
        self.glyph = Some(glyph);
    }

    fn clear_inline_glyph(&mut self) {
        self.glyph = None;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvance;

    fn surface(width: f32) -> LayoutSurface<FixedAdvance> {
        let config = LineBreakConfig {
            max_width: Some(width),
            ..Default::default()
        };
        LayoutSurface::new(FixedAdvance::new(10.0), config, 14.0)
    }

    #[test]
    fn metrics_are_invalidated_by_changes() {
        let mut surface = surface(80.0);
        assert!(surface.needs_layout());

        surface.set_raw_text("Hello World");
        assert_eq!(surface.layout().line_count(), 2);
        assert!(surface.line_metrics().is_some());

        surface.set_raw_text("Hello World");
        assert!(!surface.needs_layout());

        surface.set_width(Some(200.0));
        assert!(surface.needs_layout());
        assert_eq!(surface.layout().line_count(), 1);

        surface.set_raw_text("Hi");
        assert!(surface.needs_layout());
    }

    #[test]
    fn glyph_outside_text_is_rejected() {
        let mut surface = surface(80.0);
        surface.set_raw_text("ab");

        let glyph = InlineGlyph {
            range: 2..5,
            resource: "@drawable/dot".to_string(),
            size: 14.0,
            align: IconAlign::Center,
        };
        surface.attach_inline_glyph(glyph.clone());
        assert!(surface.inline_glyph().is_none());

        surface.set_raw_text("ab■");
        surface.attach_inline_glyph(glyph.clone());
        assert_eq!(surface.inline_glyph(), Some(&glyph));

        surface.clear_inline_glyph();
        assert!(surface.inline_glyph().is_none());
    }

    #[test]
    fn unbounded_surface_width() {
        let mut surface = surface(80.0);
        surface.set_width(None);
        assert_eq!(surface.available_width(), f32::MAX);
    }

    #[test]
    fn font_surface_lays_out_and_takes_a_badge() {
        use std::sync::Arc;

        use crate::{BadgeConfig, BadgeIcon, BadgeText, BadgeUpdate, FontSystem};

        let fonts = Arc::new(FontSystem::new());
        fonts.load_system_fonts();
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let Some(measure) = FontMeasure::from_query(fonts, &query, 16.0) else {
            return;
        };

        let full = measure.measure_width("Hello World");
        let config = LineBreakConfig {
            max_width: Some(full - 1.0),
            max_lines: Some(1),
            ..Default::default()
        };
        let mut surface = FontSurface::with_font(measure, config);
        assert_eq!(surface.text_size(), 16.0);

        surface.set_raw_text("Hello World");
        let metrics = surface.layout();
        assert_eq!(metrics.line_count(), 1);
        assert_eq!(metrics.last_line().unwrap().end, "Hello World".len());

        let config = BadgeConfig {
            badge_icon: Some(BadgeIcon::new("@drawable/ic_new")),
            show_badge: true,
            ..Default::default()
        };
        let mut badge = BadgeText::new(surface, config);
        let Ok(BadgeUpdate::Applied(decorated)) = badge.on_layout() else {
            panic!("badge was not applied");
        };

        assert!(decorated.text.starts_with('H'));
        assert!(decorated.text.ends_with("\u{2026}\u{25A0}"));
        assert_eq!(badge.surface().text(), decorated.text);
        assert_eq!(
            badge.surface().inline_glyph().map(|glyph| glyph.size),
            Some(16.0)
        );
    }
}
