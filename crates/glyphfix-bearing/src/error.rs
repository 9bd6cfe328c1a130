//! Per-file failures of the bearing tools

use glyphfix_core::GlyphfixError;
use thiserror::Error;

/// Why a font was not centred; each variant is one line of the batch report
#[derive(Debug, Error)]
pub enum CenterError {
    #[error("Failed to open: {0}")]
    Open(#[source] GlyphfixError),

    #[error(transparent)]
    MissingReference(GlyphfixError),

    #[error("Processing error: {0}")]
    Processing(#[source] GlyphfixError),
}
