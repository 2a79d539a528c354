use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Font database plus the faces that have already been parsed.
///
/// `fontdb` only indexes the available faces; the `fontdue` font for a face is
/// parsed on first use and kept around so repeated width measurements of the
/// same face do not pay for parsing again.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Parsed faces. Not every face in `font_db` is necessarily loaded here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a storage with no faces.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading faces into fontdb.
impl FontStorage {
    /// Indexes every face of the font file at `path`.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads the fonts installed on the system.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Checks if no face is indexed.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Number of indexed faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `Font`
impl FontStorage {
    /// Queries for a face matching the description and returns it parsed.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Retrieves a parsed font by ID, parsing it on first access.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

/// Measuring
impl FontStorage {
    /// Returns the horizontal extent of `text` set in a single line.
    ///
    /// Glyph origins advance by the glyph advance plus the pair kerning, and
    /// the result is the right edge of the rightmost inked pixel. A trailing
    /// whitespace run therefore does not widen the result. `None` means the
    /// face could not be loaded.
    pub fn text_width(&mut self, id: fontdb::ID, font_size: f32, text: &str) -> Option<f32> {
        let font = self.font(id)?;

        let mut origin_x = 0.0f32;
        let mut extent = 0.0f32;
        let mut prev: Option<(u16, f32)> = None;

        for ch in text.chars() {
            let glyph_idx = font.lookup_glyph_index(ch);
            let metrics = font.metrics_indexed(glyph_idx, font_size);

            if let Some((prev_glyph, prev_advance)) = prev {
                let kerning = font
                    .horizontal_kern_indexed(prev_glyph, glyph_idx, font_size)
                    .unwrap_or(0.0);
                origin_x += prev_advance + kerning;
            }

            if metrics.width > 0 {
                extent = extent.max(origin_x + metrics.xmin as f32 + metrics.width as f32);
            }
            prev = Some((glyph_idx, metrics.advance_width));
        }

        Some(extent.max(0.0))
    }
}
