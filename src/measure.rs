//! Pixel width measurement of strings.
//!
//! Every width decision in the crate goes through [`TextMeasure`], so the
//! fitting and line breaking code never talks to a font directly.

use std::{cell::RefCell, collections::HashMap, sync::Arc};

use crate::font_system::FontSystem;

/// Measures the rendered width of a string set on a single line.
pub trait TextMeasure {
    fn measure_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn measure_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Gives every character the same advance, except for explicit overrides.
///
/// Useful for monospace hosts and for tests that need widths they can
/// compute by hand.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedAdvance {
    pub advance: f32,
    pub overrides: HashMap<char, f32, fxhash::FxBuildHasher>,
}

impl FixedAdvance {
    /// Gives every character `advance` pixels.
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            overrides: HashMap::default(),
        }
    }

    /// Gives `ch` its own advance.
    pub fn with_override(mut self, ch: char, advance: f32) -> Self {
        self.overrides.insert(ch, advance);
        self
    }
}

impl TextMeasure for FixedAdvance {
    fn measure_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.overrides.get(&ch).copied().unwrap_or(self.advance))
            .sum()
    }
}

/// Upper bound on memoized widths before the cache is dropped wholesale.
const WIDTH_CACHE_CAPACITY: usize = 512;

/// Measures with a real face from a shared [`FontSystem`].
///
/// Fitting re-measures strings that differ only in their tail, and the host
/// layout pass measures the same lines again, so results are memoized per
/// string. The cache is reset when it grows past a fixed size.
pub struct FontMeasure {
    fonts: Arc<FontSystem>,
    font_id: fontdb::ID,
    font_size: f32,
    cache: RefCell<HashMap<String, f32, fxhash::FxBuildHasher>>,
}

impl FontMeasure {
    /// Measures with face `font_id` at `font_size` pixels.
    pub fn new(fonts: Arc<FontSystem>, font_id: fontdb::ID, font_size: f32) -> Self {
        Self {
            fonts,
            font_id,
            font_size,
            cache: RefCell::new(HashMap::default()),
        }
    }

    /// Picks the first face matching `query`, or `None` if nothing matches.
    pub fn from_query(fonts: Arc<FontSystem>, query: &fontdb::Query, font_size: f32) -> Option<Self> {
        let (font_id, _) = fonts.query(query)?;
        Some(Self::new(fonts, font_id, font_size))
    }

    pub fn font_id(&self) -> fontdb::ID {
        self.font_id
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Changes the size and forgets every memoized width.
    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
        self.cache.get_mut().clear();
    }
}

impl TextMeasure for FontMeasure {
    fn measure_width(&self, text: &str) -> f32 {
        if let Some(width) = self.cache.borrow().get(text) {
            return *width;
        }

        // An unmeasurable string never fits anywhere.
        let width = match self.fonts.text_width(self.font_id, self.font_size, text) {
            Some(width) => width,
            None => {
                log::warn!("Measuring with unavailable font (id: {:?}).", self.font_id);
                f32::INFINITY
            }
        };

        let mut cache = self.cache.borrow_mut();
        if cache.len() >= WIDTH_CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(text.to_owned(), width);
        width
    }
}
