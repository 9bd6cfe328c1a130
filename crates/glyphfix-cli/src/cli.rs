//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use glyphfix_bearing::center::DEFAULT_TOLERANCE;
use glyphfix_bearing::width::{DEFAULT_KOREAN_SAMPLES, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH};
use glyphfix_core::unicode::parse_codepoint;
use glyphfix_core::{Tag, UnicodeRange};

/// glyphfix - post-processing and verification for GLG Mono font builds
#[derive(Parser, Debug)]
#[command(name = "glyphfix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print per-glyph details and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-centre Korean glyphs of Nerd Fonts patched fonts in place
    #[command(alias = "fb")]
    FixBearing(FixBearingArgs),

    /// List glyphs whose advance lies between two widths
    #[command(alias = "cw")]
    CheckWidth(CheckWidthArgs),

    /// Print side bearings of sample glyphs in one font
    #[command(alias = "vb")]
    VerifyBearing(VerifyBearingArgs),

    /// Compare side bearings of a font before and after a build step
    #[command(alias = "cb")]
    CompareBearing(CompareBearingArgs),

    /// Check that a built font centres the source font's Korean glyphs
    #[command(alias = "vc")]
    VerifyComplete(VerifyCompleteArgs),

    /// Rewrite OS/2, post and name tables of merged build outputs
    #[command(alias = "ft")]
    FixTables(FixTablesArgs),

    /// Print the OS/2, post and name fields as JSON
    DumpTables(DumpTablesArgs),

    /// Remove tables from fonts in place
    StripTables(StripTablesArgs),
}

#[derive(Args, Debug)]
pub struct FixBearingArgs {
    /// Directory holding the patched *.ttf files
    #[arg(long, default_value = "build/nerd")]
    pub dir: PathBuf,

    /// Code point range to re-centre (repeatable); defaults to Hangul
    #[arg(long = "range", value_name = "START-END")]
    pub ranges: Vec<UnicodeRange>,

    /// Bearing and width difference still counted as centred
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: i32,
}

#[derive(Args, Debug)]
pub struct CheckWidthArgs {
    /// Fonts to scan
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,

    /// Exclusive lower bound
    #[arg(long, default_value_t = DEFAULT_MIN_WIDTH)]
    pub min: u16,

    /// Exclusive upper bound
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    pub max: u16,

    /// Korean glyphs listed per font
    #[arg(long, default_value_t = DEFAULT_KOREAN_SAMPLES)]
    pub samples: usize,
}

#[derive(Args, Debug)]
pub struct VerifyBearingArgs {
    pub font: PathBuf,

    /// Code points to check (U+AC00, AC00 or 가); repeatable
    #[arg(short = 'c', long = "codepoint", value_parser = parse_codepoint)]
    pub codepoints: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct CompareBearingArgs {
    /// Font before the step
    pub before: PathBuf,

    /// Font after the step
    pub after: PathBuf,

    #[arg(short = 'c', long = "codepoint", value_parser = parse_codepoint)]
    pub codepoints: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct VerifyCompleteArgs {
    /// Source font the Korean glyphs came from
    pub original: PathBuf,

    /// Built font
    pub built: PathBuf,

    /// Full-width cell; defaults to twice the built font's digit zero
    #[arg(long)]
    pub target: Option<u32>,

    #[arg(short = 'c', long = "codepoint", value_parser = parse_codepoint)]
    pub codepoints: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct FixTablesArgs {
    /// Only fonts whose variant starts with this (e.g. 35, Console)
    pub variant: Option<String>,

    /// Settings file; defaults to $GLYPHFIX_SETTINGS, then build.ini
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Remove intermediate build files after a successful run
    #[arg(long)]
    pub clean: bool,
}

#[derive(Args, Debug)]
pub struct DumpTablesArgs {
    pub font: PathBuf,

    /// Write JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StripTablesArgs {
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,

    /// Table tag to remove (repeatable); defaults to vhea and vmtx
    #[arg(short, long = "table", value_parser = parse_tag)]
    pub tables: Vec<Tag>,
}

/// One to four ASCII characters, padded with spaces
fn parse_tag(s: &str) -> Result<Tag, String> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > 4 || !s.is_ascii() {
        return Err(format!("'{s}' is not a table tag"));
    }
    let mut tag = [b' '; 4];
    tag[..bytes.len()].copy_from_slice(bytes);
    Ok(Tag::new(&tag))
}
