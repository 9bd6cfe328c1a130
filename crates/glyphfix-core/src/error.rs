//! Error types for glyphfix

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphfixError>;

/// Main error type for glyphfix
#[derive(Debug, Error)]
pub enum GlyphfixError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Glyph data error: {0}")]
    Glyf(#[from] GlyfError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Missing U+{codepoint:04X} ({label})")]
    MissingGlyph { codepoint: u32, label: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl GlyphfixError {
    /// A required glyph is absent from the cmap
    pub fn missing_glyph(codepoint: u32, label: impl Into<String>) -> Self {
        Self::MissingGlyph {
            codepoint,
            label: label.into(),
        }
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("Missing required table '{0}'")]
    MissingTable(String),

    #[error("Font not supported: {0}")]
    NotSupported(String),
}

/// Errors reading or rewriting `glyf`/`loca` data
#[derive(Debug, Error)]
pub enum GlyfError {
    #[error("glyph {glyph_id}: data truncated")]
    Truncated { glyph_id: u32 },

    #[error("glyph {glyph_id}: coordinate overflow when shifting by {dx}")]
    CoordinateOverflow { glyph_id: u32, dx: i32 },

    #[error("glyph {glyph_id}: a shift of {dx} is not a whole number of scaled component offset units")]
    ScaledOffset { glyph_id: u32, dx: i32 },

    #[error("glyph {glyph_id} is outside the font (num_glyphs = {num_glyphs})")]
    OutOfRange { glyph_id: u32, num_glyphs: u32 },

    #[error("advance width {0} does not fit in 16 bits")]
    AdvanceOverflow(u32),

    #[error("glyph {glyph_id}: {reason}")]
    Compile { glyph_id: u32, reason: String },
}

/// Errors reading or compiling metadata tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("'{tag}' table: {reason}")]
    Malformed { tag: String, reason: String },

    #[error("cannot compile '{tag}': {reason}")]
    Compile { tag: String, reason: String },
}

impl TableError {
    pub fn malformed(tag: impl ToString, reason: impl ToString) -> Self {
        Self::Malformed {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }
    }
}
