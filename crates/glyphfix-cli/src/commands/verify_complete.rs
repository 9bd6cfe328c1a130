//! verify-complete: source font vs built font after centring

use anyhow::{Context, Result};
use glyphfix_bearing::center::REFERENCE_CODEPOINT;
use glyphfix_bearing::verify::{verify_conversion, CONVERSION_CODEPOINTS, CONVERSION_TOLERANCE};
use glyphfix_core::GlyphfixError;

use super::{check, heading, label, load_metrics};
use crate::cli::VerifyCompleteArgs;

pub fn run(args: &VerifyCompleteArgs) -> Result<bool> {
    let original = load_metrics(&args.original)?;
    let built = load_metrics(&args.built)?;
    let target_width = match args.target {
        Some(target) => target,
        None => built
            .advance_of(REFERENCE_CODEPOINT)
            .map(|half| u32::from(half) * 2)
            .ok_or_else(|| GlyphfixError::missing_glyph(REFERENCE_CODEPOINT, "digit 0"))
            .with_context(|| format!("Cannot derive the target width of {}", args.built.display()))?,
    };
    let codepoints =
        if args.codepoints.is_empty() { &CONVERSION_CODEPOINTS[..] } else { &args.codepoints[..] };
    let report = verify_conversion(&original, &built, target_width, codepoints);

    heading("Conversion check");
    println!("Original: {}", args.original.display());
    println!("Built:    {}", args.built.display());
    println!("Target width: {target_width}");
    println!();

    println!(
        "{:<10} | {:>5} {:>5} {:>5} {:>5} | {:>5} {:>5} {:>5} {:>5}",
        "Glyph", "W", "LSB", "RSB", "Ink", "W", "LSB", "RSB", "Ink"
    );
    for row in &report.rows {
        let (o, b) = (&row.original, &row.built);
        println!(
            "{:<10} | {:>5} {:>5} {:>5} {:>5} | {:>5} {:>5} {:>5} {:>5}",
            label(row.codepoint),
            o.advance,
            o.lsb,
            o.rsb,
            o.ink_width,
            b.advance,
            b.lsb,
            b.rsb,
            b.ink_width
        );
    }

    println!();
    println!("{:<10} {:>9} {:>7} {:>6}", "Glyph", "Expected", "Actual", "Diff");
    for row in &report.rows {
        println!(
            "{:<10} {:>9.1} {:>7} {:>6.1}  {}",
            label(row.codepoint),
            row.expected_offset,
            row.actual_offset,
            row.offset_diff(),
            check(row.offset_ok())
        );
    }

    let issues = report.issues();
    println!();
    if issues.is_empty() {
        println!("No problems found");
    } else {
        println!("Problems:");
        for (codepoint, problems) in &issues {
            let problems: Vec<String> = problems.iter().map(ToString::to_string).collect();
            println!("  {}: {}", label(*codepoint), problems.join(", "));
        }
    }

    let total = report.rows.len();
    println!();
    println!("Glyphs checked: {total}");
    println!("Width = {target_width}: {}/{total}", report.width_ok());
    println!(
        "Centred (|LSB-RSB| ≤ {CONVERSION_TOLERANCE}): {}/{total}",
        report.count(|row| f64::from(row.bearing_diff()) <= CONVERSION_TOLERANCE)
    );
    println!("Offset as expected: {}/{total}", report.count(|row| row.offset_ok()));

    if total == 0 {
        println!("✗ No glyph present in both fonts");
        return Ok(false);
    }
    Ok(issues.is_empty())
}
