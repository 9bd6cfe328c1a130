//! fix-tables and dump-tables

use std::fs;

use anyhow::{Context, Result};
use glyphfix_core::FontFile;
use glyphfix_tables::{clean_intermediates, find_merged, fix_font_tables, BuildSettings, TableDump};

use super::{file_name, heading};
use crate::cli::{DumpTablesArgs, FixTablesArgs};

pub fn run(args: &FixTablesArgs) -> Result<bool> {
    let path = BuildSettings::locate(args.settings.as_deref());
    let settings = BuildSettings::load(&path)?;
    let filter = args.variant.as_deref().unwrap_or_default();

    let inputs = find_merged(&settings, filter)
        .with_context(|| format!("Failed to scan {}", settings.build_fonts_dir.display()))?;
    heading("Table fixes");
    println!("Settings: {}", path.display());
    println!("Directory: {}", settings.build_fonts_dir.display());
    if inputs.is_empty() {
        println!(
            "✗ No files matching {}{}{}*_merged.ttf",
            settings.fonttools_prefix, settings.font_name, filter
        );
        return Ok(false);
    }
    println!();

    let mut failed = 0;
    for input in &inputs {
        match fix_font_tables(input, &settings) {
            Ok(fix) => println!("  ✓ {} -> {}", file_name(&fix.input), file_name(&fix.output)),
            Err(err) => {
                failed += 1;
                println!("  ✗ {}: {err}", file_name(input));
            },
        }
    }

    println!();
    println!("Fixed: {}/{}", inputs.len() - failed, inputs.len());
    if args.clean {
        if failed == 0 {
            let removed = clean_intermediates(&settings, filter).context("Failed to remove intermediates")?;
            println!("Removed {} intermediate files", removed.len());
        } else {
            println!("Keeping intermediate files after failures");
        }
    }
    Ok(failed == 0)
}

pub fn dump(args: &DumpTablesArgs) -> Result<bool> {
    let font = FontFile::open(&args.font).with_context(|| format!("Failed to open {}", args.font.display()))?;
    let json = TableDump::collect(&font)
        .with_context(|| format!("Failed to read tables of {}", args.font.display()))?
        .to_json()?;
    match &args.output {
        Some(output) => {
            fs::write(output, json + "\n").with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!("Wrote {}", output.display());
        },
        None => println!("{json}"),
    }
    Ok(true)
}
