//! fix-bearing: batch re-centring of Nerd Fonts patched fonts

use anyhow::{Context, Result};
use glyphfix_bearing::{center_file, find_fonts, BatchSummary, CenterOptions};
use glyphfix_core::UnicodeRange;

use super::{file_name, heading, rule};
use crate::cli::FixBearingArgs;

pub fn run(args: &FixBearingArgs, verbose: bool) -> Result<bool> {
    if !args.dir.is_dir() {
        println!("✗ Error: directory {} does not exist", args.dir.display());
        println!("  Run the Nerd Fonts patch step first");
        return Ok(false);
    }
    let fonts = find_fonts(&args.dir).with_context(|| format!("Failed to scan {}", args.dir.display()))?;
    if fonts.is_empty() {
        println!("✗ Error: no *.ttf files in {}", args.dir.display());
        return Ok(false);
    }

    let options = CenterOptions {
        ranges: if args.ranges.is_empty() { UnicodeRange::korean() } else { args.ranges.clone() },
        tolerance: args.tolerance,
    };

    heading("Korean bearing re-centering");
    println!("Directory: {}", args.dir.display());
    println!("Fonts: {}", fonts.len());
    for range in &options.ranges {
        println!("Range: {range}");
    }
    println!();

    let mut summary = BatchSummary::default();
    for path in &fonts {
        println!("Processing: {}", file_name(path));
        let outcome = center_file(path, &options);
        match &outcome {
            Ok(report) => {
                if verbose {
                    println!("    Half-width: {}, Target full-width: {}", report.half_width, report.target_width);
                    for fix in &report.fixed {
                        println!(
                            "      U+{:04X}: LSB {}->{}, RSB {}->{}",
                            fix.codepoint, fix.old_lsb, fix.new_lsb, fix.old_rsb, fix.new_rsb
                        );
                    }
                }
                println!("  ✓ Done: {} fixed, {} skipped", report.fixed.len(), report.skipped);
            },
            Err(err) => println!("  ✗ {err}"),
        }
        summary.record(&outcome);
    }

    println!();
    heading("Summary");
    println!("Succeeded: {}/{} fonts", summary.succeeded, fonts.len());
    println!("Failed: {}/{} fonts", summary.failed, fonts.len());
    println!("Glyphs fixed: {}", summary.fixed);
    println!("Glyphs skipped: {} (already centred)", summary.skipped);
    println!();

    if !summary.all_succeeded() {
        println!("⚠ Some fonts failed");
    } else if summary.fixed == 0 {
        println!("No glyphs needed fixing");
    } else {
        println!("✓ Bearings re-centred");
    }
    rule();
    Ok(summary.all_succeeded())
}
