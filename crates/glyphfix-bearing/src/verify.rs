//! Bearing reports: single font, before/after pair, source/build pair

use std::collections::BTreeMap;
use std::fmt;

use glyphfix_core::{FontMetrics, GlyphMetrics, GlyphfixError};

/// 가 각 갇 힣 ㄱ ㄴ ㄷ
pub const VERIFY_CODEPOINTS: [u32; 7] = [0xAC00, 0xAC01, 0xAC07, 0xD7A3, 0x3131, 0x3134, 0x3137];
/// 가 각 나 다 라 하 힣
pub const COMPARE_CODEPOINTS: [u32; 7] = [0xAC00, 0xAC01, 0xB098, 0xB2E4, 0xB77C, 0xD558, 0xD7A3];
/// 가 각 간 갇 갈 힣 ㄱ ㄴ ㄷ
pub const CONVERSION_CODEPOINTS: [u32; 9] = [
    0xAC00, 0xAC01, 0xAC04, 0xAC07, 0xAC08, 0xD7A3, 0x3131, 0x3134, 0x3137,
];

/// Hiragana あ, the full-width reference of a before/after comparison
pub const FULL_WIDTH_REFERENCE: u32 = 0x3042;

pub const GOOD_BEARING_DIFF: i32 = 3;
pub const COMPARE_TOLERANCE: i32 = 2;
pub const CONVERSION_TOLERANCE: f64 = 5.0;
pub const GOOD_OFFSET_DIFF: f64 = 3.0;

/// Bearings of one mapped glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearingSample {
    pub codepoint: u32,
    pub advance: u16,
    pub lsb: i32,
    pub rsb: i32,
    pub ink_width: i32,
}

impl BearingSample {
    pub fn new(codepoint: u32, glyph: &GlyphMetrics) -> Self {
        Self {
            codepoint,
            advance: glyph.advance,
            lsb: glyph.lsb(),
            rsb: glyph.rsb(),
            ink_width: glyph.ink_width(),
        }
    }

    pub fn diff(&self) -> i32 {
        (self.lsb - self.rsb).abs()
    }
}

/// Samples for a list of code points; absent ones are listed in `missing`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BearingReport {
    pub samples: Vec<BearingSample>,
    pub missing: Vec<u32>,
}

impl BearingReport {
    pub fn collect(metrics: &FontMetrics, codepoints: &[u32]) -> Self {
        let mut report = Self::default();
        for &codepoint in codepoints {
            match metrics.for_codepoint(codepoint) {
                Some(glyph) => report.samples.push(BearingSample::new(codepoint, glyph)),
                None => report.missing.push(codepoint),
            }
        }
        report
    }

    /// Samples with `|LSB - RSB| < 3`
    pub fn good(&self) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.diff() < GOOD_BEARING_DIFF)
            .count()
    }

    pub fn perfect(&self) -> usize {
        self.samples.iter().filter(|sample| sample.diff() == 0).count()
    }

    pub fn all_good(&self) -> bool {
        self.good() == self.samples.len()
    }
}

/// One side of a before/after comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontBearings {
    pub reference_width: u16,
    pub report: BearingReport,
}

impl FontBearings {
    pub fn collect(metrics: &FontMetrics, codepoints: &[u32]) -> Result<Self, GlyphfixError> {
        let reference_width = metrics
            .advance_of(FULL_WIDTH_REFERENCE)
            .ok_or_else(|| GlyphfixError::missing_glyph(FULL_WIDTH_REFERENCE, "hiragana a"))?;
        Ok(Self {
            reference_width,
            report: BearingReport::collect(metrics, codepoints),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearingDelta {
    pub codepoint: u32,
    pub lsb: i32,
    pub rsb: i32,
}

impl BearingDelta {
    pub fn max(&self) -> i32 {
        self.lsb.max(self.rsb)
    }

    pub fn matches(&self) -> bool {
        self.max() <= COMPARE_TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comparison {
    pub deltas: Vec<BearingDelta>,
    /// Code points sampled in only one of the fonts
    pub unmatched: Vec<u32>,
}

impl Comparison {
    pub fn all_match(&self) -> bool {
        self.unmatched.is_empty() && self.deltas.iter().all(BearingDelta::matches)
    }
}

/// Pairs samples by code point and measures how far each bearing moved
pub fn compare_bearings(before: &BearingReport, after: &BearingReport) -> Comparison {
    let after_by_cp: BTreeMap<u32, &BearingSample> =
        after.samples.iter().map(|s| (s.codepoint, s)).collect();
    let mut comparison = Comparison::default();
    for sample in &before.samples {
        match after_by_cp.get(&sample.codepoint) {
            Some(other) => comparison.deltas.push(BearingDelta {
                codepoint: sample.codepoint,
                lsb: (sample.lsb - other.lsb).abs(),
                rsb: (sample.rsb - other.rsb).abs(),
            }),
            None => comparison.unmatched.push(sample.codepoint),
        }
    }
    let before_cps: Vec<u32> = before.samples.iter().map(|s| s.codepoint).collect();
    comparison.unmatched.extend(
        after
            .samples
            .iter()
            .map(|s| s.codepoint)
            .filter(|cp| !before_cps.contains(cp)),
    );
    comparison
}

/// One glyph of a source/build comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRow {
    pub codepoint: u32,
    pub original: BearingSample,
    pub built: BearingSample,
    pub expected_offset: f64,
    pub actual_offset: i32,
}

impl ConversionRow {
    pub fn bearing_diff(&self) -> i32 {
        self.built.diff()
    }

    pub fn offset_diff(&self) -> f64 {
        (self.expected_offset - self.actual_offset as f64).abs()
    }

    pub fn offset_ok(&self) -> bool {
        self.offset_diff() < GOOD_OFFSET_DIFF
    }

    pub fn problems(&self, target_width: u32) -> Vec<Problem> {
        let mut problems = Vec::new();
        if self.built.advance as u32 != target_width {
            problems.push(Problem::Width {
                actual: self.built.advance,
                expected: target_width,
            });
        }
        if self.bearing_diff() as f64 > CONVERSION_TOLERANCE {
            problems.push(Problem::Asymmetric(self.bearing_diff()));
        }
        if self.offset_diff() > CONVERSION_TOLERANCE {
            problems.push(Problem::OffsetMismatch(self.offset_diff()));
        }
        problems
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Problem {
    Width { actual: u16, expected: u32 },
    Asymmetric(i32),
    OffsetMismatch(f64),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width { actual, expected } => write!(f, "width={actual} (expected {expected})"),
            Self::Asymmetric(diff) => write!(f, "bearing asymmetry {diff}"),
            Self::OffsetMismatch(diff) => write!(f, "offset mismatch {diff:.1}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionReport {
    pub target_width: u32,
    pub rows: Vec<ConversionRow>,
}

impl ConversionReport {
    pub fn issues(&self) -> Vec<(u32, Vec<Problem>)> {
        self.rows
            .iter()
            .map(|row| (row.codepoint, row.problems(self.target_width)))
            .filter(|(_, problems)| !problems.is_empty())
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&ConversionRow) -> bool) -> usize {
        self.rows.iter().filter(|row| predicate(row)).count()
    }

    pub fn width_ok(&self) -> usize {
        self.count(|row| row.built.advance as u32 == self.target_width)
    }
}

/// Checks each glyph of `built` moved where centring its source ink on a
/// `target_width` cell would put it. Glyphs without ink in either font are
/// skipped.
pub fn verify_conversion(
    original: &FontMetrics,
    built: &FontMetrics,
    target_width: u32,
    codepoints: &[u32],
) -> ConversionReport {
    let mut report = ConversionReport {
        target_width,
        rows: Vec::new(),
    };
    for &codepoint in codepoints {
        let (Some(orig), Some(new)) = (original.for_codepoint(codepoint), built.for_codepoint(codepoint))
        else {
            continue;
        };
        if orig.ink_width() == 0 || new.ink_width() == 0 {
            continue;
        }
        let expected_offset = (target_width as f64 - orig.ink_width() as f64) / 2.0 - orig.lsb() as f64;
        report.rows.push(ConversionRow {
            codepoint,
            original: BearingSample::new(codepoint, orig),
            built: BearingSample::new(codepoint, new),
            expected_offset,
            actual_offset: new.lsb() - orig.lsb(),
        });
    }
    report
}
