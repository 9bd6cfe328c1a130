//! check-width: glyphs with an advance between two widths

use anyhow::Result;
use glyphfix_bearing::width::WidthHit;
use glyphfix_bearing::scan_widths;
use glyphfix_core::unicode::{display_char, format_codepoint};
use glyphfix_core::GlyphScript;

use super::{file_name, heading, load_metrics};
use crate::cli::CheckWidthArgs;

pub fn run(args: &CheckWidthArgs) -> Result<bool> {
    let mut all_ok = true;
    for (index, path) in args.fonts.iter().enumerate() {
        if index > 0 {
            println!();
        }
        heading(&file_name(path));
        let metrics = match load_metrics(path) {
            Ok(metrics) => metrics,
            Err(err) => {
                println!("✗ {err:#}");
                all_ok = false;
                continue;
            },
        };

        let scan = scan_widths(&metrics, args.min, args.max);
        println!();
        println!("Glyphs with {} < width < {}: {}", args.min, args.max, scan.total());
        println!("- Korean: {}", scan.count(GlyphScript::Korean));
        println!("- Japanese: {}", scan.count(GlyphScript::Japanese));
        println!("- Other: {}", scan.count(GlyphScript::Other));

        if scan.count(GlyphScript::Korean) > 0 && args.samples > 0 {
            println!();
            println!("[Korean samples]");
            for hit in scan.of(GlyphScript::Korean).take(args.samples) {
                print_hit(hit);
            }
        }
        if scan.count(GlyphScript::Other) > 0 {
            println!();
            println!("[Other glyphs]");
            for hit in scan.of(GlyphScript::Other) {
                print_hit(hit);
            }
        }
    }
    Ok(all_ok)
}

fn print_hit(hit: &WidthHit) {
    let codepoint = hit.codepoint.map(format_codepoint).unwrap_or_else(|| "N/A".to_string());
    println!(
        "  {:2} {:8} {:30} width={}",
        display_char(hit.codepoint),
        codepoint,
        hit.name,
        hit.advance
    );
}
