//! Typefaces used to draw the timer.
//!
//! Font parsing and glyph rasterization are delegated to `rusttype`; this
//! module only owns the parsed font and its display name.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rusttype::Font;

use crate::error::ModelError;

const DEFAULT_BOLD_TTF: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");
const DEFAULT_BOLD_NAME: &str = "DejaVu Sans Bold";

/// A parsed font plus the name shown to the user.
///
/// Cloning is cheap: the font data is reference counted.
#[derive(Clone)]
pub struct Typeface {
    name: Arc<str>,
    font: Font<'static>,
    custom: bool,
}

impl Typeface {
    /// The bundled bold sans-serif face used until the user picks another.
    pub fn default_bold() -> Self {
        static DEFAULT: OnceLock<Typeface> = OnceLock::new();
        DEFAULT
            .get_or_init(|| Typeface {
                name: Arc::from(DEFAULT_BOLD_NAME),
                font: Font::try_from_bytes(DEFAULT_BOLD_TTF)
                    .expect("bundled typeface is a valid TrueType font"),
                custom: false,
            })
            .clone()
    }

    /// Parse a TrueType/OpenType font from memory.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, ModelError> {
        let name = name.into();
        let font = Font::try_from_vec(data).ok_or_else(|| ModelError::Font {
            name: name.clone(),
            message: "not a TrueType/OpenType font".to_string(),
        })?;
        if font.glyph_count() == 0 {
            return Err(ModelError::Font {
                name,
                message: "font has no glyphs".to_string(),
            });
        }
        Ok(Self {
            name: Arc::from(name),
            font,
            custom: true,
        })
    }

    /// Load a font file; the file name becomes the display name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    /// Whether this face was loaded by the user rather than bundled.
    pub fn is_custom(&self) -> bool {
        self.custom
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::default_bold()
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("name", &self.name)
            .field("custom", &self.custom)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl PartialEq for Typeface {
    fn eq(&self, other: &Self) -> bool {
        self.custom == other.custom && self.name == other.name
    }
}
