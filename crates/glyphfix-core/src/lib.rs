//! Core font types for glyphfix
//!
//! This crate loads TrueType fonts through `read-fonts`, measures glyphs
//! with `skrifa` and writes edits back with `write-fonts`:
//!
//! - [`FontFile`]: owned font bytes with `read-fonts`/`skrifa` views
//! - [`FontMetrics`]: advance, ink box, code point and name per glyph
//! - [`FontEditor`]: glyph translation, advance edits and table swaps
//! - [`unicode`]: code point ranges and script classes

pub mod editor;
pub mod error;
pub mod font;
pub mod metrics;
pub mod unicode;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use editor::FontEditor;
pub use error::{FontLoadError, GlyfError, GlyphfixError, Result, TableError};
pub use font::FontFile;
pub use metrics::{Bbox, FontMetrics, GlyphMetrics};
pub use unicode::{GlyphScript, UnicodeRange};

/// Re-exported so downstream crates name tags with the same type
pub use read_fonts::types::{NameId, Tag};
