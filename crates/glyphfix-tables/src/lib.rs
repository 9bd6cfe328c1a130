//! Metadata table tools for glyphfix builds
//!
//! - [`config`]: the build settings file
//! - [`naming`]: variant/style parsing and release names
//! - [`patch`]: OS/2, post and name field patches
//! - [`fix`]: batch patching of merged build outputs
//! - [`dump`]: JSON view of the edited tables
//! - [`strip`]: table removal

pub mod config;
pub mod dump;
pub mod error;
pub mod fix;
pub mod naming;
pub mod patch;
pub mod strip;

pub use config::{BuildSettings, SettingsError};
pub use dump::TableDump;
pub use error::FixError;
pub use fix::{clean_intermediates, find_merged, fix_font_tables, TableFix};
pub use naming::{FontNames, FontVariant};
pub use strip::{strip_tables, DEFAULT_STRIP};
