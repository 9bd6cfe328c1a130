//! Font files brought into memory
//!
//! A `FontFile` owns the raw bytes and hands out `read_fonts::FontRef`
//! views on demand, the same way a font database keeps data and parses
//! lazily. Saving writes to a sibling temporary file and renames it into
//! place.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use read_fonts::types::{GlyphId, Tag};
use read_fonts::{FontRef, ReadError, TableProvider};
use skrifa::MetadataProvider;

use crate::error::{FontLoadError, GlyfError, Result, TableError};

pub const GLYF: Tag = Tag::new(b"glyf");
pub const LOCA: Tag = Tag::new(b"loca");
pub const HEAD: Tag = Tag::new(b"head");
pub const HHEA: Tag = Tag::new(b"hhea");
pub const HMTX: Tag = Tag::new(b"hmtx");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const CMAP: Tag = Tag::new(b"cmap");
pub const OS2: Tag = Tag::new(b"OS/2");
pub const POST: Tag = Tag::new(b"post");
pub const NAME: Tag = Tag::new(b"name");
pub const CFF: Tag = Tag::new(b"CFF ");
pub const CFF2: Tag = Tag::new(b"CFF2");

/// `ttcf`, reported by `read-fonts` as the sfnt version of a collection
const TTC_TAG: u32 = u32::from_be_bytes(*b"ttcf");

/// Maps a failed table read onto our errors; absent tables are
/// [`FontLoadError::MissingTable`]
pub fn require<T>(table: std::result::Result<T, ReadError>, tag: Tag) -> Result<T> {
    table.map_err(|err| match err {
        ReadError::TableIsMissing(missing) => FontLoadError::MissingTable(missing.to_string()).into(),
        other => TableError::malformed(tag, other).into(),
    })
}

/// Raw bytes of every glyph, in glyph order, sliced through `loca`
pub(crate) fn glyph_slices<'a>(font: &FontRef<'a>) -> Result<Vec<&'a [u8]>> {
    if font.table_data(CFF).is_some() || font.table_data(CFF2).is_some() {
        return Err(FontLoadError::NotSupported("CFF outlines cannot be edited".into()).into());
    }
    let (Some(glyf), true) = (font.table_data(GLYF), font.table_data(LOCA).is_some()) else {
        return Err(FontLoadError::NotSupported("font has no TrueType outlines".into()).into());
    };
    let glyf = glyf.as_bytes();
    let loca = require(font.loca(None), LOCA)?;
    let num_glyphs = require(font.maxp(), MAXP)?.num_glyphs() as usize;
    if loca.len() < num_glyphs {
        return Err(
            FontLoadError::InvalidData(format!("loca too short for {num_glyphs} glyphs")).into(),
        );
    }

    let slices = (0..num_glyphs)
        .map(|index| {
            let glyph_id = index as u32;
            let (Some(start), Some(end)) = (loca.get_raw(index), loca.get_raw(index + 1)) else {
                return Err(GlyfError::Truncated { glyph_id });
            };
            if start > end {
                return Err(GlyfError::Truncated { glyph_id });
            }
            glyf.get(start as usize..end as usize)
                .ok_or(GlyfError::Truncated { glyph_id })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(slices)
}

pub struct FontFile {
    path: Option<PathBuf>,
    data: Vec<u8>,
}

impl std::fmt::Debug for FontFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFile")
            .field("path", &self.path)
            .field("len", &self.data.len())
            .finish()
    }
}

impl FontFile {
    /// Opens a font file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => FontLoadError::FileNotFound(path.to_path_buf()).into(),
            _ => crate::GlyphfixError::Io(err),
        })?;
        let mut font = Self::from_data(data)?;
        font.path = Some(path.to_path_buf());
        log::debug!("Opened {} ({} tables)", path.display(), font.tags().len());
        Ok(font)
    }

    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        // Validate the data by attempting to parse it
        FontRef::new(&data).map_err(load_error)?;
        Ok(Self { path: None, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Creates a FontRef on-demand for parsing operations
    pub fn font_ref(&self) -> Result<FontRef<'_>> {
        FontRef::new(&self.data).map_err(|err| load_error(err).into())
    }

    /// Tags of the tables in the font, in directory order
    pub fn tags(&self) -> Vec<Tag> {
        self.font_ref()
            .map(|font| font.table_directory().table_records().iter().map(|r| r.tag()).collect())
            .unwrap_or_default()
    }

    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        let font = self.font_ref().ok()?;
        font.table_data(tag).map(|data| data.as_bytes())
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.table(tag).is_some()
    }

    pub fn units_per_em(&self) -> Result<u16> {
        let font = self.font_ref()?;
        Ok(require(font.head(), HEAD)?.units_per_em())
    }

    pub fn num_glyphs(&self) -> Result<u16> {
        let font = self.font_ref()?;
        Ok(require(font.maxp(), MAXP)?.num_glyphs())
    }

    /// Raw `glyf` bytes of one glyph, empty for glyphs without outlines.
    /// CFF-flavoured fonts are rejected.
    pub fn glyph_data(&self, glyph_id: u32) -> Result<&[u8]> {
        let font = self.font_ref()?;
        let slices = glyph_slices(&font)?;
        slices.get(glyph_id as usize).copied().ok_or_else(|| {
            GlyfError::OutOfRange {
                glyph_id,
                num_glyphs: slices.len() as u32,
            }
            .into()
        })
    }

    /// Finds which glyph draws this code point
    pub fn glyph_for(&self, codepoint: u32) -> Option<GlyphId> {
        let font = self.font_ref().ok()?;
        font.charmap().map(codepoint)
    }

    /// Advance width in font units, straight from `hmtx`
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let font = self.font_ref().ok()?;
        font.hmtx().ok()?.advance(glyph_id)
    }

    /// Reverse cmap: each mapped glyph with its lowest code point
    pub fn codepoints_by_glyph(&self) -> Result<BTreeMap<u32, u32>> {
        let font = self.font_ref()?;
        let mut by_glyph = BTreeMap::new();
        for (codepoint, glyph_id) in font.charmap().mappings() {
            by_glyph
                .entry(glyph_id.to_u32())
                .and_modify(|lowest: &mut u32| *lowest = (*lowest).min(codepoint))
                .or_insert(codepoint);
        }
        Ok(by_glyph)
    }

    /// Writes `data` to `path` through a temporary sibling file
    pub fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
        let mut temp = path.as_os_str().to_owned();
        temp.push(".glyphfix-tmp");
        let temp = PathBuf::from(temp);
        fs::write(&temp, data)?;
        if let Err(err) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        log::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

fn load_error(err: ReadError) -> FontLoadError {
    match err {
        ReadError::InvalidSfnt(TTC_TAG) => {
            FontLoadError::NotSupported("font collections cannot be edited".into())
        },
        other => FontLoadError::InvalidData(other.to_string()),
    }
}
