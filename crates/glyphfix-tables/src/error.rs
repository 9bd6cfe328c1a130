//! Failures of the table tools

use std::path::PathBuf;

use glyphfix_core::{GlyphfixError, TableError};
use thiserror::Error;

use crate::config::SettingsError;

#[derive(Debug, Error)]
pub enum FixError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to open: {0}")]
    Open(#[source] GlyphfixError),

    #[error("Missing '{0}' table")]
    MissingTable(&'static str),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("{} is not a merged build file", .0.display())]
    UnrecognisedName(PathBuf),

    #[error("Processing error: {0}")]
    Processing(#[from] GlyphfixError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
