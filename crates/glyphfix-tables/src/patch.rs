//! Field-level patches for `OS/2`, `post` and `name`

use glyphfix_core::NameId;
use read_fonts::tables::name::{Encoding, MacRomanMapping};
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::{Os2, SelectionFlags};
use write_fonts::tables::post::Post;

use crate::config::BuildSettings;
use crate::naming::{FontNames, FontVariant};

/// Windows, Unicode BMP, US English
const WINDOWS_ENGLISH: (u16, u16, u16) = (3, 1, 0x409);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Patch {
    pub x_avg_char_width: i16,
    /// Left untouched for styles outside RIBBI
    pub fs_selection: Option<u16>,
    pub panose: [u8; 10],
}

impl Os2Patch {
    pub fn for_variant(variant: &FontVariant, settings: &BuildSettings) -> Self {
        let is_35 = variant.is_35(settings);
        let fs_selection = match variant.style.as_str() {
            "Regular" => Some(0x0140),
            "Italic" => Some(0x0101),
            "Bold" => Some(0x0120),
            "BoldItalic" => Some(0x0121),
            _ => None,
        };
        let weight = if matches!(variant.style.as_str(), "Regular" | "Italic") { 5 } else { 8 };
        let proportion = if is_35 { 3 } else { 9 };
        Self {
            x_avg_char_width: if is_35 { settings.full_width_35 } else { settings.half_width_12 },
            fs_selection,
            panose: [2, 11, weight, proportion, 5, 2, 3, 0, 2, 3],
        }
    }

    pub fn apply(&self, os2: &mut Os2) {
        os2.x_avg_char_width = self.x_avg_char_width;
        os2.panose_10 = self.panose;
        if let Some(fs_selection) = self.fs_selection {
            os2.fs_selection = SelectionFlags::from_bits_truncate(fs_selection);
        }
    }
}

/// Proportional `35` variants are not fixed pitch
pub fn set_fixed_pitch(post: &mut Post, fixed: bool) {
    post.is_fixed_pitch = u32::from(fixed);
}

/// Summary of a name table rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NameChanges {
    pub removed_copyrights: usize,
    pub records_written: usize,
}

/// Drops copyright records that do not mention `font_name`, then writes
/// the family/style names
pub fn apply_names(table: &mut Name, names: &FontNames, font_name: &str) -> NameChanges {
    table.name_record.retain(|record| {
        let known = !matches!(Encoding::new(record.platform_id, record.encoding_id), Encoding::Unknown);
        if !known {
            log::warn!(
                "Dropped name record {} with unsupported encoding ({}, {})",
                record.name_id,
                record.platform_id,
                record.encoding_id
            );
        }
        known
    });

    let before = table.name_record.len();
    table
        .name_record
        .retain(|record| record.name_id != NameId::COPYRIGHT_NOTICE || record.string.contains(font_name));
    let removed_copyrights = before - table.name_record.len();

    let mut records_written = set_text(table, NameId::FAMILY_NAME, &names.family);
    records_written += set_text(table, NameId::SUBFAMILY_NAME, &names.subfamily);
    records_written += set_text(table, NameId::FULL_NAME, &names.full_name);
    records_written += set_text(table, NameId::POSTSCRIPT_NAME, &names.postscript_name);
    if let Some((family, subfamily)) = &names.typographic {
        records_written += set_text(table, NameId::TYPOGRAPHIC_FAMILY_NAME, family);
        records_written += set_text(table, NameId::TYPOGRAPHIC_SUBFAMILY_NAME, subfamily);
    }
    table.name_record.sort();
    NameChanges {
        removed_copyrights,
        records_written,
    }
}

/// Rewrites every record with `name_id`, adding a Windows English one when
/// there is none; returns the number of records touched
fn set_text(table: &mut Name, name_id: NameId, text: &str) -> usize {
    let mut written = 0;
    for record in table.name_record.iter_mut().filter(|record| record.name_id == name_id) {
        let encoded = match Encoding::new(record.platform_id, record.encoding_id) {
            Encoding::MacRoman => mac_roman_safe(text),
            _ => text.to_string(),
        };
        *record.string = encoded;
        written += 1;
    }
    if written == 0 {
        let (platform, encoding, language) = WINDOWS_ENGLISH;
        table
            .name_record
            .push(NameRecord::new(platform, encoding, language, name_id, text.to_string().into()));
        written = 1;
    }
    written
}

/// Characters Mac Roman cannot hold become `?`
fn mac_roman_safe(text: &str) -> String {
    text.chars()
        .map(|c| if MacRomanMapping.encode(c).is_some() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample;

    fn record(platform: (u16, u16, u16), name_id: NameId, text: &str) -> NameRecord {
        NameRecord::new(platform.0, platform.1, platform.2, name_id, text.to_string().into())
    }

    fn texts(table: &Name, name_id: NameId) -> Vec<&str> {
        table
            .name_record
            .iter()
            .filter(|record| record.name_id == name_id)
            .map(|record| record.string.as_str())
            .collect()
    }

    #[test]
    fn test_os2_patch_when_regular_then_half_width_and_fixed_panose() {
        let patch = Os2Patch::for_variant(&FontVariant::new("Console", "Regular"), &sample());
        assert_eq!(patch.x_avg_char_width, 528);
        assert_eq!(patch.fs_selection, Some(0x0140));
        assert_eq!(patch.panose, [2, 11, 5, 9, 5, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn test_os2_patch_when_35_bold_then_full_width_and_proportional_panose() {
        let patch = Os2Patch::for_variant(&FontVariant::new("35Console", "Bold"), &sample());
        assert_eq!(patch.x_avg_char_width, 600);
        assert_eq!(patch.fs_selection, Some(0x0120));
        assert_eq!(patch.panose, [2, 11, 8, 3, 5, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn test_os2_patch_when_extended_style_then_fs_selection_kept() {
        let patch = Os2Patch::for_variant(&FontVariant::new("", "LightItalic"), &sample());
        assert_eq!(patch.fs_selection, None);
        assert_eq!(patch.panose[2], 8);

        let mut os2 = Os2 {
            fs_selection: SelectionFlags::from_bits_truncate(0x0081),
            ..Os2::default()
        };
        patch.apply(&mut os2);
        assert_eq!(os2.fs_selection.bits(), 0x0081);
        assert_eq!(os2.x_avg_char_width, 528);
        assert_eq!(os2.panose_10, patch.panose);
    }

    #[test]
    fn test_fixed_pitch_written_as_flag() {
        let mut post = Post::new_v2([".notdef"]);
        post.is_fixed_pitch = 7;
        set_fixed_pitch(&mut post, false);
        assert_eq!(post.is_fixed_pitch, 0);
        set_fixed_pitch(&mut post, true);
        assert_eq!(post.is_fixed_pitch, 1);
    }

    #[test]
    fn test_apply_names_removes_foreign_copyright_and_writes_ids() {
        let mut table = Name::new(vec![
            record(WINDOWS_ENGLISH, NameId::COPYRIGHT_NOTICE, "Copyright 2024 GLG Mono Project"),
            record((1, 0, 0), NameId::COPYRIGHT_NOTICE, "Copyright IBM Corp."),
            record(WINDOWS_ENGLISH, NameId::FAMILY_NAME, "fonttools GLG Mono"),
        ]);
        let names = FontVariant::new("", "Medium").names(&sample());
        let changes = apply_names(&mut table, &names, "GLG Mono");

        assert_eq!(changes.removed_copyrights, 1);
        assert_eq!(changes.records_written, 6);
        assert_eq!(texts(&table, NameId::FAMILY_NAME), ["GLG-Mono"]);
        assert_eq!(texts(&table, NameId::SUBFAMILY_NAME), ["Medium"]);
        assert_eq!(texts(&table, NameId::FULL_NAME), ["GLG-Mono Medium"]);
        assert_eq!(texts(&table, NameId::POSTSCRIPT_NAME), ["GLG-Mono-Medium"]);
        assert_eq!(texts(&table, NameId::TYPOGRAPHIC_SUBFAMILY_NAME), ["Medium"]);
        assert_eq!(
            texts(&table, NameId::COPYRIGHT_NOTICE),
            ["Copyright 2024 GLG Mono Project"]
        );
        assert!(write_fonts::dump_table(&table).is_ok());
    }

    #[test]
    fn test_apply_names_when_mac_record_then_text_stays_encodable() {
        let mut table = Name::new(vec![
            record((1, 0, 0), NameId::FAMILY_NAME, "GLG Mono"),
            record((3, 7, 0x409), NameId::SUBFAMILY_NAME, "Regular"),
        ]);
        let mut names = FontVariant::new("", "Regular").names(&sample());
        names.family = "GLG 모노".to_string();
        let changes = apply_names(&mut table, &names, "GLG Mono");

        assert_eq!(changes.records_written, 4);
        assert_eq!(texts(&table, NameId::FAMILY_NAME), ["GLG ??"]);
        // the (3, 7) record has no encoding to write, so a Windows one replaces it
        assert!(table.name_record.iter().all(|record| record.encoding_id != 7));
        assert_eq!(texts(&table, NameId::SUBFAMILY_NAME), ["Regular"]);
        assert!(write_fonts::dump_table(&table).is_ok());
    }
}
