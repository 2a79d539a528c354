use std::{path::PathBuf, sync::Arc};

use parking_lot::Mutex;

use crate::font_storage::FontStorage;

/// Shared entry point to the fonts used for measuring badge text.
///
/// Many surfaces usually measure with the same set of faces, so the storage
/// sits behind a `Mutex` and the system itself is meant to be wrapped in an
/// `Arc` and handed to every [`FontMeasure`](crate::measure::FontMeasure).
///
/// The storage field is public so callers can lock it once for a batch of
/// operations.
pub struct FontSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a font system with empty storage.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
        }
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Indexes every face of the font file at `path`.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Checks if no face is indexed.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }
}

/// font querying
impl FontSystem {
    /// Queries for a font matching the description.
    pub fn query(&self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        self.font_storage.lock().query(query)
    }
}

/// text measurement
impl FontSystem {
    /// Measures `text` on a single line with the given face and size.
    ///
    /// Returns `None` when the face is unknown or fails to parse.
    pub fn text_width(&self, id: fontdb::ID, font_size: f32, text: &str) -> Option<f32> {
        self.font_storage.lock().text_width(id, font_size, text)
    }
}
