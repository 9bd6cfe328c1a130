//! compare-bearing: bearings before and after a build step

use std::path::Path;

use anyhow::{Context, Result};
use glyphfix_bearing::verify::{compare_bearings, COMPARE_CODEPOINTS, COMPARE_TOLERANCE};
use glyphfix_bearing::FontBearings;

use super::{check, file_name, heading, label, load_metrics};
use crate::cli::CompareBearingArgs;

pub fn run(args: &CompareBearingArgs) -> Result<bool> {
    let codepoints = if args.codepoints.is_empty() { &COMPARE_CODEPOINTS[..] } else { &args.codepoints[..] };
    let before = collect(&args.before, codepoints)?;
    let after = collect(&args.after, codepoints)?;

    let comparison = compare_bearings(&before.report, &after.report);
    println!();
    heading("Comparison");
    println!("{:<10} {:>6} {:>6}", "Glyph", "ΔLSB", "ΔRSB");
    for delta in &comparison.deltas {
        println!(
            "{:<10} {:>6} {:>6}  {}",
            label(delta.codepoint),
            delta.lsb,
            delta.rsb,
            check(delta.matches())
        );
    }
    for &codepoint in &comparison.unmatched {
        println!("{:<10} present in only one font", label(codepoint));
    }

    println!();
    let matched = comparison.deltas.iter().filter(|delta| delta.matches()).count();
    let total = comparison.deltas.len() + comparison.unmatched.len();
    println!("Matching (≤ {COMPARE_TOLERANCE}): {matched}/{total}");
    if comparison.all_match() {
        println!("✓ Bearings preserved");
    } else {
        println!("✗ Bearings changed");
    }
    Ok(comparison.all_match())
}

fn collect(path: &Path, codepoints: &[u32]) -> Result<FontBearings> {
    let metrics = load_metrics(path)?;
    let bearings = FontBearings::collect(&metrics, codepoints)
        .with_context(|| format!("No full-width reference in {}", path.display()))?;

    heading(&file_name(path));
    println!("Full-width reference (U+3042): {}", bearings.reference_width);
    println!("{:<10} {:>6} {:>6} {:>6} {:>6}", "Glyph", "Width", "LSB", "RSB", "Ink");
    for sample in &bearings.report.samples {
        println!(
            "{:<10} {:>6} {:>6} {:>6} {:>6}  {}",
            label(sample.codepoint),
            sample.advance,
            sample.lsb,
            sample.rsb,
            sample.ink_width,
            if sample.diff() <= COMPARE_TOLERANCE { "OK" } else { "" }
        );
    }
    for &codepoint in &bearings.report.missing {
        println!("{:<10} missing", label(codepoint));
    }
    println!();
    Ok(bearings)
}
