//! Side bearing tools for CJK glyphs
//!
//! - [`center`]: move glyph ink to the middle of a full-width cell
//! - [`width`]: list glyphs whose advance sits between two widths
//! - [`verify`]: bearing reports for one font or a pair of fonts

pub mod center;
pub mod error;
pub mod verify;
pub mod width;

pub use center::{center_file, find_fonts, BatchSummary, CenterOptions, CenterReport, GlyphFix};
pub use error::CenterError;
pub use verify::{BearingReport, BearingSample, Comparison, ConversionReport, FontBearings};
pub use width::{scan_widths, WidthScan};
