//! Rewrite OS/2, post and name of merged build outputs
//!
//! Each `<FONTTOOLS_PREFIX><FONT_NAME><variant>-<style>_merged.ttf` in the
//! build directory gets its metadata patched for its variant and is written
//! next to it under the release file name.

use std::fs;
use std::path::{Path, PathBuf};

use glyphfix_core::{FontEditor, FontFile};
use read_fonts::{ReadError, TableProvider};
use walkdir::WalkDir;
use write_fonts::from_obj::ToOwnedTable;
use write_fonts::tables::{name::Name, os2::Os2, post::Post};

use crate::config::BuildSettings;
use crate::error::FixError;
use crate::naming::FontVariant;
use crate::patch::{apply_names, set_fixed_pitch, NameChanges, Os2Patch};

/// Outcome for one font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFix {
    pub input: PathBuf,
    pub output: PathBuf,
    pub variant: FontVariant,
    pub names: NameChanges,
}

/// Merged build outputs whose variant part starts with `filter`, sorted
pub fn find_merged(settings: &BuildSettings, filter: &str) -> std::io::Result<Vec<PathBuf>> {
    let prefix = format!("{}{}{}", settings.fonttools_prefix, settings.font_name, filter);
    let mut inputs = Vec::new();
    for entry in WalkDir::new(&settings.build_fonts_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if file_name.starts_with(&prefix)
            && FontVariant::from_merged_file_name(file_name, settings).is_some()
        {
            inputs.push(entry.path().to_path_buf());
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Patches the tables of one merged font and writes the release file
pub fn fix_font_tables(input: &Path, settings: &BuildSettings) -> Result<TableFix, FixError> {
    let variant = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| FontVariant::from_merged_file_name(name, settings))
        .ok_or_else(|| FixError::UnrecognisedName(input.to_path_buf()))?;

    let font = FontFile::open(input).map_err(FixError::Open)?;
    let font_ref = font.font_ref().map_err(FixError::Open)?;
    let mut os2: Os2 = owned(font_ref.os2(), "OS/2")?;
    let mut post: Post = owned(font_ref.post(), "post")?;
    let mut name: Name = owned(font_ref.name(), "name")?;

    Os2Patch::for_variant(&variant, settings).apply(&mut os2);
    set_fixed_pitch(&mut post, !variant.is_35(settings));
    let names = apply_names(&mut name, &variant.names(settings), &settings.font_name);

    let mut editor = FontEditor::new(&font)?;
    editor.set_table(&os2)?;
    editor.set_table(&post)?;
    editor.set_table(&name)?;

    let output = settings.build_fonts_dir.join(variant.output_file_name(settings));
    editor.save(&output)?;
    log::info!(
        "{} -> {} ({} copyright records removed)",
        input.display(),
        output.display(),
        names.removed_copyrights
    );
    Ok(TableFix {
        input: input.to_path_buf(),
        output,
        variant,
        names,
    })
}

/// Owned copy of a parsed table, ready to edit and compile
fn owned<R, T>(table: Result<R, ReadError>, tag: &'static str) -> Result<T, FixError>
where
    R: ToOwnedTable<T>,
{
    match table {
        Ok(table) => Ok(table.to_owned_table()),
        Err(ReadError::TableIsMissing(_)) => Err(FixError::MissingTable(tag)),
        Err(err) => Err(glyphfix_core::TableError::malformed(tag, err).into()),
    }
}

/// Removes intermediates of both tool prefixes whose names start with
/// `<prefix><FONT_NAME><filter>`; returns the removed paths
pub fn clean_intermediates(settings: &BuildSettings, filter: &str) -> std::io::Result<Vec<PathBuf>> {
    let prefixes = [
        format!("{}{}{}", settings.fontforge_prefix, settings.font_name, filter),
        format!("{}{}{}", settings.fonttools_prefix, settings.font_name, filter),
    ];
    let mut removed = Vec::new();
    for entry in WalkDir::new(&settings.build_fonts_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())));
        if entry.file_type().is_file() && matches {
            fs::remove_file(entry.path())?;
            log::debug!("Removed {}", entry.path().display());
            removed.push(entry.path().to_path_buf());
        }
    }
    removed.sort();
    Ok(removed)
}
