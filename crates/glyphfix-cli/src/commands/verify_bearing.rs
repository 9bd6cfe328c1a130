//! verify-bearing: side bearings of sample glyphs

use anyhow::Result;
use glyphfix_bearing::verify::{GOOD_BEARING_DIFF, VERIFY_CODEPOINTS};
use glyphfix_bearing::BearingReport;

use super::{file_name, heading, label, load_metrics};
use crate::cli::VerifyBearingArgs;

pub fn run(args: &VerifyBearingArgs) -> Result<bool> {
    let metrics = load_metrics(&args.font)?;
    let codepoints = if args.codepoints.is_empty() { &VERIFY_CODEPOINTS[..] } else { &args.codepoints[..] };
    let report = BearingReport::collect(&metrics, codepoints);

    heading(&format!("Bearing check: {}", file_name(&args.font)));
    println!("{:<10} {:>6} {:>6} {:>6} {:>7}", "Glyph", "Width", "LSB", "RSB", "|Diff|");
    for sample in &report.samples {
        let mark = if sample.diff() < GOOD_BEARING_DIFF { " ✓" } else { "" };
        println!(
            "{:<10} {:>6} {:>6} {:>6} {:>7}{mark}",
            label(sample.codepoint),
            sample.advance,
            sample.lsb,
            sample.rsb,
            sample.diff()
        );
    }
    for &codepoint in &report.missing {
        println!("{:<10} missing", label(codepoint));
    }

    println!();
    let total = report.samples.len();
    println!("Good (< {GOOD_BEARING_DIFF}): {}/{total}", report.good());
    println!("Perfect (= 0): {}/{total}", report.perfect());
    Ok(report.all_good())
}
