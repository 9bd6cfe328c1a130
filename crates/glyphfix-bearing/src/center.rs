//! Re-centre full-width glyphs between their side bearings
//!
//! After a Nerd Fonts merge the Hangul glyphs keep the ink position they had
//! in the source font while the advance is normalised, so the ink drifts
//! left. Each glyph in range is moved so that its left and right bearings
//! match on a cell twice as wide as the digit zero.

use std::path::{Path, PathBuf};

use glyphfix_core::{FontEditor, FontFile, FontMetrics, GlyphMetrics, GlyphfixError, UnicodeRange};
use walkdir::WalkDir;

use crate::error::CenterError;

/// Code point whose advance defines the half-width cell
pub const REFERENCE_CODEPOINT: u32 = 0x30;
pub const DEFAULT_TOLERANCE: i32 = 2;

#[derive(Debug, Clone)]
pub struct CenterOptions {
    pub ranges: Vec<UnicodeRange>,
    /// Glyphs within this many units of centred and of the target width are left alone
    pub tolerance: i32,
}

impl Default for CenterOptions {
    fn default() -> Self {
        Self {
            ranges: UnicodeRange::korean(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// One glyph that is moved and re-advanced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphFix {
    pub glyph_id: u32,
    pub codepoint: u32,
    pub name: String,
    pub dx: i32,
    pub old_advance: u16,
    pub old_lsb: i32,
    pub old_rsb: i32,
    pub new_lsb: i32,
    pub new_rsb: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CenterReport {
    pub half_width: u16,
    pub target_width: u32,
    pub fixed: Vec<GlyphFix>,
    pub skipped: usize,
}

/// Works out which glyphs need to move, without touching the font
pub fn plan_centering(
    metrics: &FontMetrics,
    half_width: u16,
    options: &CenterOptions,
) -> CenterReport {
    let target_width = 2 * half_width as u32;
    let mut report = CenterReport {
        half_width,
        target_width,
        ..CenterReport::default()
    };

    let in_range = |cp: u32| options.ranges.iter().any(|range| range.contains(cp));
    for (codepoint, glyph) in metrics.glyphs_in(in_range) {
        if glyph.advance <= half_width {
            continue;
        }
        match plan_glyph(codepoint, glyph, target_width, options.tolerance) {
            Some(fix) => report.fixed.push(fix),
            None => report.skipped += 1,
        }
    }
    report
}

fn plan_glyph(
    codepoint: u32,
    glyph: &GlyphMetrics,
    target_width: u32,
    tolerance: i32,
) -> Option<GlyphFix> {
    let target = target_width as i32;
    let (lsb, rsb) = (glyph.lsb(), glyph.rsb());
    if (lsb - rsb).abs() <= tolerance && (glyph.advance as i32 - target).abs() <= tolerance {
        return None;
    }

    let offset = (target - glyph.ink_width()) as f64 / 2.0 - lsb as f64;
    // empty glyphs have nothing to move, only their advance changes
    let dx = if glyph.is_empty() { 0 } else { offset.round() as i32 };
    let new_lsb = lsb + dx;
    Some(GlyphFix {
        glyph_id: glyph.glyph_id,
        codepoint,
        name: glyph.display_name(),
        dx,
        old_advance: glyph.advance,
        old_lsb: lsb,
        old_rsb: rsb,
        new_lsb,
        new_rsb: target - glyph.ink_width() - new_lsb,
    })
}

/// Applies planned fixes to an editor
pub fn apply_centering(editor: &mut FontEditor<'_>, report: &CenterReport) -> glyphfix_core::Result<()> {
    for fix in &report.fixed {
        editor.translate(fix.glyph_id, fix.dx)?;
        editor.set_advance(fix.glyph_id, report.target_width)?;
        log::debug!(
            "{} (U+{:04X}): dx {:+}, LSB {}->{}, RSB {}->{}",
            fix.name,
            fix.codepoint,
            fix.dx,
            fix.old_lsb,
            fix.new_lsb,
            fix.old_rsb,
            fix.new_rsb
        );
    }
    Ok(())
}

/// Centres one font file in place
pub fn center_file(path: &Path, options: &CenterOptions) -> Result<CenterReport, CenterError> {
    let font = FontFile::open(path).map_err(CenterError::Open)?;
    let metrics = FontMetrics::load(&font).map_err(CenterError::Processing)?;
    let half_width = metrics.advance_of(REFERENCE_CODEPOINT).ok_or_else(|| {
        CenterError::MissingReference(GlyphfixError::missing_glyph(REFERENCE_CODEPOINT, "digit 0"))
    })?;

    let report = plan_centering(&metrics, half_width, options);
    if report.fixed.is_empty() {
        log::info!("{}: nothing to fix", path.display());
        return Ok(report);
    }

    let mut editor = FontEditor::new(&font).map_err(CenterError::Processing)?;
    apply_centering(&mut editor, &report).map_err(CenterError::Processing)?;
    editor.save(path).map_err(CenterError::Processing)?;
    log::info!("{}: fixed {}, skipped {}", path.display(), report.fixed.len(), report.skipped);
    Ok(report)
}

/// `*.ttf` files directly inside `dir`, sorted by path
pub fn find_fonts(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut fonts = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "ttf") {
            fonts.push(path.to_path_buf());
        }
    }
    fonts.sort();
    Ok(fonts)
}

/// Totals over a batch of files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub fixed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &Result<CenterReport, CenterError>) {
        match outcome {
            Ok(report) => {
                self.succeeded += 1;
                self.fixed += report.fixed.len();
                self.skipped += report.skipped;
            },
            Err(_) => self.failed += 1,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
