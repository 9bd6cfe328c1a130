//! Patching merged build outputs on disk

use std::path::Path;

use glyphfix_core::fixture::FixtureFont;
use glyphfix_core::font::GLYF;
use glyphfix_core::{FontFile, NameId};
use glyphfix_tables::{find_merged, fix_font_tables, BuildSettings, FixError, TableDump};

fn settings(dir: &Path) -> BuildSettings {
    let text = format!(
        "\
[DEFAULT]
FONT_NAME = GLG Mono
NEW_FONT_NAME = GLG-Mono
FONTFORGE_PREFIX = fontforge_
FONTTOOLS_PREFIX = fonttools_
BUILD_FONTS_DIR = {dir}
HALF_WIDTH_12 = 528
FULL_WIDTH_35 = 600
WIDTH_35_STR = 35
CONSOLE_STR = Console
",
        dir = dir.display()
    );
    BuildSettings::from_ini_str(&text).expect("settings")
}

fn merged(style: &str) -> FixtureFont {
    FixtureFont::new("GLG Mono")
        .style(style)
        .mac_name_record(NameId::COPYRIGHT_NOTICE, "Copyright 2016 IBM Corp.")
        .rect_glyph("zero", Some(0x30), 528, 50, 478)
        .rect_glyph("uniAC00", Some(0xAC00), 1056, 82, 974)
}

fn names(dump: &TableDump, name_id: u16) -> Vec<&str> {
    dump.name
        .iter()
        .filter(|record| record.name_id == name_id)
        .map(|record| record.text.as_str())
        .collect()
}

#[test]
fn test_fix_tables_when_35_bold_italic_then_proportional_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("fonttools_GLG Mono35Console-BoldItalic_merged.ttf");
    merged("Bold Italic").write(&input).expect("write fixture");
    let settings = settings(dir.path());

    let fix = fix_font_tables(&input, &settings).expect("fix");
    assert_eq!(fix.output, dir.path().join("GLG-Mono35-BoldItalic.ttf"));
    assert_eq!(fix.names.removed_copyrights, 1);

    let font = FontFile::open(&fix.output).expect("open output");
    let dump = TableDump::collect(&font).expect("dump");
    let os2 = dump.os2.as_ref().expect("OS/2");
    assert_eq!(os2.x_avg_char_width, 600);
    assert_eq!(os2.fs_selection, 0x0121);
    assert_eq!(os2.panose, vec![2, 11, 8, 3, 5, 2, 3, 0, 2, 3]);
    assert_eq!(dump.post.as_ref().map(|post| post.is_fixed_pitch), Some(0));

    assert_eq!(names(&dump, 0), vec!["Copyright 2024 The GLG Mono Authors"]);
    assert_eq!(names(&dump, 1), vec!["GLG-Mono 35"]);
    assert_eq!(names(&dump, 2), vec!["Bold Italic"]);
    assert_eq!(names(&dump, 4), vec!["GLG-Mono 35 Bold Italic"]);
    assert_eq!(names(&dump, 6), vec!["GLG-Mono35-BoldItalic"]);
    assert!(names(&dump, 16).is_empty());

    let original = FontFile::open(&input).expect("open input");
    assert_eq!(font.table(GLYF), original.table(GLYF));
}

#[test]
fn test_fix_tables_when_console_light_then_typographic_names_and_fixed_pitch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("fonttools_GLG MonoConsole-LightItalic_merged.ttf");
    merged("Light Italic").write(&input).expect("write fixture");

    let fix = fix_font_tables(&input, &settings(dir.path())).expect("fix");
    assert_eq!(fix.output, dir.path().join("GLG-Mono-LightItalic.ttf"));

    let dump = TableDump::collect(&FontFile::open(&fix.output).expect("open")).expect("dump");
    let os2 = dump.os2.as_ref().expect("OS/2");
    assert_eq!(os2.x_avg_char_width, 528);
    // fixture default, outside RIBBI
    assert_eq!(os2.fs_selection, 0x0040);
    assert_eq!(os2.panose[3], 9);
    assert_eq!(dump.post.as_ref().map(|post| post.is_fixed_pitch), Some(1));
    assert_eq!(names(&dump, 1), vec!["GLG-Mono"]);
    assert_eq!(names(&dump, 16), vec!["GLG-Mono"]);
    assert_eq!(names(&dump, 17), vec!["Light Italic"]);
}

#[test]
fn test_fix_tables_when_batch_has_broken_file_then_others_still_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    merged("Regular")
        .write(&dir.path().join("fonttools_GLG Mono-Regular_merged.ttf"))
        .expect("write fixture");
    std::fs::write(dir.path().join("fonttools_GLG Mono-Bold_merged.ttf"), b"garbage").expect("write");
    let settings = settings(dir.path());

    let inputs = find_merged(&settings, "").expect("scan");
    assert_eq!(inputs.len(), 2);
    let outcomes: Vec<_> = inputs.iter().map(|input| fix_font_tables(input, &settings)).collect();

    assert!(matches!(outcomes[0], Err(FixError::Open(_))));
    assert!(outcomes[1].is_ok());
    assert!(dir.path().join("GLG-Mono-Regular.ttf").exists());
}
