//! Subcommand implementations
//!
//! Each `run` returns `Ok(false)` when the command ran to the end but found
//! failures; `main` turns that into exit code 1.

pub mod check_width;
pub mod compare_bearing;
pub mod fix_bearing;
pub mod fix_tables;
pub mod strip_tables;
pub mod verify_bearing;
pub mod verify_complete;

use std::path::Path;

use anyhow::{Context, Result};
use glyphfix_core::unicode::{display_char, format_codepoint};
use glyphfix_core::{FontFile, FontMetrics};

use crate::cli::{Cli, Commands};

pub fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::FixBearing(args) => fix_bearing::run(args, cli.verbose),
        Commands::CheckWidth(args) => check_width::run(args),
        Commands::VerifyBearing(args) => verify_bearing::run(args),
        Commands::CompareBearing(args) => compare_bearing::run(args),
        Commands::VerifyComplete(args) => verify_complete::run(args),
        Commands::FixTables(args) => fix_tables::run(args),
        Commands::DumpTables(args) => fix_tables::dump(args),
        Commands::StripTables(args) => strip_tables::run(args),
    }
}

pub(crate) fn rule() {
    println!("{}", "=".repeat(70));
}

pub(crate) fn heading(title: &str) {
    rule();
    println!("{title}");
    rule();
}

pub(crate) fn load_metrics(path: &Path) -> Result<FontMetrics> {
    let font = FontFile::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    FontMetrics::load(&font).with_context(|| format!("Failed to read metrics of {}", path.display()))
}

/// `가 U+AC00`
pub(crate) fn label(codepoint: u32) -> String {
    format!("{} {}", display_char(Some(codepoint)), format_codepoint(codepoint))
}

pub(crate) fn check(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
