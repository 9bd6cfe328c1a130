//! Drop whole tables from a font in place

use std::path::Path;

use glyphfix_core::{FontEditor, FontFile, Result, Tag};

/// Vertical metrics removed before the Nerd Fonts merge
pub const DEFAULT_STRIP: [Tag; 2] = [Tag::new(b"vhea"), Tag::new(b"vmtx")];

/// Removes `tags` from the font at `path`; returns the tags that were
/// present. The file is only rewritten when something was removed.
pub fn strip_tables(path: &Path, tags: &[Tag]) -> Result<Vec<Tag>> {
    let font = FontFile::open(path)?;
    let mut editor = FontEditor::new(&font)?;
    let removed: Vec<Tag> = tags.iter().copied().filter(|tag| editor.remove_table(*tag)).collect();
    if removed.is_empty() {
        log::debug!("{}: nothing to strip", path.display());
        return Ok(removed);
    }
    editor.save(path)?;
    log::info!("{}: removed {} tables", path.display(), removed.len());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfix_core::fixture::FixtureFont;

    #[test]
    fn test_strip_when_vertical_tables_present_then_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("font.ttf");
        FixtureFont::new("GLG Mono")
            .table(b"vhea", vec![0; 36])
            .table(b"vmtx", vec![0; 4])
            .write(&path)
            .expect("write");

        let removed = strip_tables(&path, &DEFAULT_STRIP).expect("strip");
        assert_eq!(removed, DEFAULT_STRIP.to_vec());

        let font = FontFile::open(&path).expect("reopen");
        assert!(font.table(Tag::new(b"vhea")).is_none());
        assert!(font.table(Tag::new(b"vmtx")).is_none());
        assert!(font.table(Tag::new(b"glyf")).is_some());
    }

    #[test]
    fn test_strip_when_nothing_to_remove_then_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("font.ttf");
        FixtureFont::new("GLG Mono").write(&path).expect("write");
        let before = std::fs::read(&path).expect("read");

        assert!(strip_tables(&path, &DEFAULT_STRIP).expect("strip").is_empty());
        assert_eq!(std::fs::read(&path).expect("read"), before);
    }
}
