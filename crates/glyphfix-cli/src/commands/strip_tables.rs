//! strip-tables: remove tables in place

use anyhow::Result;
use glyphfix_tables::{strip_tables, DEFAULT_STRIP};

use crate::cli::StripTablesArgs;

pub fn run(args: &StripTablesArgs) -> Result<bool> {
    let tags = if args.tables.is_empty() { &DEFAULT_STRIP[..] } else { &args.tables[..] };
    let mut all_ok = true;
    for font in &args.fonts {
        match strip_tables(font, tags) {
            Ok(removed) if removed.is_empty() => println!("{}: nothing to remove", font.display()),
            Ok(removed) => {
                let removed: Vec<String> = removed.iter().map(ToString::to_string).collect();
                println!("{}: removed {}", font.display(), removed.join(", "));
            },
            Err(err) => {
                all_ok = false;
                println!("✗ {}: {err}", font.display());
            },
        }
    }
    Ok(all_ok)
}
