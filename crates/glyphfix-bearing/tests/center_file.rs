//! End-to-end centring of font files on disk

use glyphfix_bearing::{center_file, CenterError, CenterOptions};
use glyphfix_core::fixture::{offset_component, FixtureFont};
use glyphfix_core::{FontFile, FontMetrics};

fn merged_font() -> FixtureFont {
    FixtureFont::new("GLG Mono")
        .rect_glyph("zero", Some(0x30), 528, 50, 478)
        // drifted left after the merge
        .rect_glyph("uniAC00", Some(0xAC00), 1000, 40, 932)
        .rect_glyph("uniAC01", Some(0xAC01), 1000, 17, 950)
        // already centred
        .rect_glyph("uniD7A3", Some(0xD7A3), 1056, 82, 974)
        .rect_glyph("uni3131", Some(0x3131), 1000, 100, 700)
        .rect_glyph("base", None, 0, 0, 600)
        .composite_glyph("uni3134", Some(0x3134), 1000, vec![offset_component(6, 30, 0)])
}

#[test]
fn test_center_file_when_glyphs_drifted_then_bearings_balance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("GLGMonoNF-Regular.ttf");
    merged_font().write(&path).expect("write fixture");

    let original = FontFile::open(&path).expect("open");
    let untouched = original.glyph_data(4).expect("D7A3").to_vec();

    let report = center_file(&path, &CenterOptions::default()).expect("center");
    assert_eq!(report.half_width, 528);
    assert_eq!(report.target_width, 1056);
    assert_eq!(report.fixed.len(), 4);
    assert_eq!(report.skipped, 1);

    let font = FontFile::open(&path).expect("reopen");
    let metrics = FontMetrics::load(&font).expect("metrics");
    for codepoint in [0xAC00, 0xAC01, 0xD7A3, 0x3131, 0x3134] {
        let glyph = metrics.for_codepoint(codepoint).expect("glyph");
        assert_eq!(glyph.advance, 1056, "U+{codepoint:04X}");
        assert!(glyph.bearing_diff() <= 1, "U+{codepoint:04X}: {}", glyph.bearing_diff());
    }

    let after = font.glyph_data(4).expect("D7A3").to_vec();
    assert_eq!(untouched, after);
    // the component base is not mapped and keeps its place
    assert_eq!(metrics.glyph(6).and_then(|g| g.bbox).map(|b| b.x_min), Some(0));
}

#[test]
fn test_center_file_when_run_twice_then_second_run_skips_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("font.ttf");
    merged_font().write(&path).expect("write fixture");

    center_file(&path, &CenterOptions::default()).expect("first run");
    let bytes = std::fs::read(&path).expect("read");
    let second = center_file(&path, &CenterOptions::default()).expect("second run");

    assert!(second.fixed.is_empty());
    assert_eq!(second.skipped, 5);
    assert_eq!(std::fs::read(&path).expect("read"), bytes);
}

#[test]
fn test_center_file_when_zero_missing_then_reference_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("font.ttf");
    FixtureFont::new("GLG Mono")
        .rect_glyph("uniAC00", Some(0xAC00), 1000, 40, 932)
        .write(&path)
        .expect("write fixture");

    let err = center_file(&path, &CenterOptions::default()).expect_err("no zero");
    assert!(matches!(err, CenterError::MissingReference(_)));
    assert_eq!(err.to_string(), "Missing U+0030 (digit 0)");
}

#[test]
fn test_center_file_when_not_a_font_then_open_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.ttf");
    std::fs::write(&path, b"not a font").expect("write");

    let err = center_file(&path, &CenterOptions::default()).expect_err("broken");
    assert!(matches!(err, CenterError::Open(_)));
    assert!(err.to_string().starts_with("Failed to open"));
}
