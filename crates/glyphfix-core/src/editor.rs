//! In-memory font editing
//!
//! `FontEditor` borrows the source font and records which tables were
//! replaced or removed. Typed `write-fonts` tables are compiled when they are
//! set. Glyph edits go through a lazily loaded outline state that is compiled
//! back into `glyf`, `loca`, `hmtx`, `hhea` and `head` when the editor is
//! finished. Glyphs that are never touched keep their bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use read_fonts::tables::glyf::Glyph as GlyphRef;
use read_fonts::tables::glyf::CurvePoint;
use read_fonts::types::Tag;
use read_fonts::{FontData, FontRead, FontRef, TableProvider};
use skrifa::{MetadataProvider, OutlineGlyphCollection};
use write_fonts::from_obj::{FromTableRef, ToOwnedTable};
use write_fonts::read::TopLevelTable;
use write_fonts::tables::glyf::{
    Anchor, Bbox, Component, CompositeGlyph, Contour, GlyfLocaBuilder, Glyph,
    SimpleGlyph, SomeGlyph, Transform,
};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::types::{FWord, UfWord};
use write_fonts::validate::{Validate, ValidationCtx};
use write_fonts::{FontBuilder, FontWrite, TableWriter};

use crate::error::{GlyfError, Result, TableError};
use crate::font::{glyph_slices, require, FontFile, HEAD, HHEA, HMTX};
use crate::metrics::outline_bounds;

/// Tables that go stale once outlines or advances move
pub const STALE_AFTER_METRIC_EDIT: [Tag; 2] = [Tag::new(b"hdmx"), Tag::new(b"DSIG")];

/// Horizontal summary values stored in `hhea` and `head`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorizontalExtents {
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub x_min: i16,
    pub x_max: i16,
}

impl HorizontalExtents {
    /// Glyphs without a bbox only count towards the maximum advance
    pub fn compute<'a>(glyphs: impl IntoIterator<Item = (u16, Option<&'a Bbox>)>) -> Self {
        let mut extents = Self::default();
        let mut inked = false;
        for (advance, bbox) in glyphs {
            extents.advance_width_max = extents.advance_width_max.max(advance);
            let Some(bbox) = bbox else { continue };
            let rsb = clamp_i16(advance as i32 - bbox.x_max as i32);
            if inked {
                extents.min_left_side_bearing = extents.min_left_side_bearing.min(bbox.x_min);
                extents.min_right_side_bearing = extents.min_right_side_bearing.min(rsb);
                extents.x_max_extent = extents.x_max_extent.max(bbox.x_max);
                extents.x_min = extents.x_min.min(bbox.x_min);
                extents.x_max = extents.x_max.max(bbox.x_max);
            } else {
                inked = true;
                extents.min_left_side_bearing = bbox.x_min;
                extents.min_right_side_bearing = rsb;
                extents.x_max_extent = bbox.x_max;
                extents.x_min = bbox.x_min;
                extents.x_max = bbox.x_max;
            }
        }
        extents
    }

    /// Writes the values into `hhea` and `head`
    pub fn apply(&self, hhea: &mut Hhea, head: &mut Head) {
        hhea.advance_width_max = UfWord::new(self.advance_width_max);
        hhea.min_left_side_bearing = FWord::new(self.min_left_side_bearing);
        hhea.min_right_side_bearing = FWord::new(self.min_right_side_bearing);
        hhea.x_max_extent = FWord::new(self.x_max_extent);
        head.x_min = self.x_min;
        head.x_max = self.x_max;
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// `hmtx` with trailing runs of equal advances folded into the
/// left side bearing array
pub fn pack_hmtx(metrics: &[LongMetric]) -> Hmtx {
    let mut long = metrics.len();
    while long > 1 && metrics[long - 1].advance == metrics[long - 2].advance {
        long -= 1;
    }
    Hmtx::new(
        metrics[..long].to_vec(),
        metrics[long..].iter().map(|metric| metric.side_bearing).collect(),
    )
}

/// One entry of the glyph table under edit
#[derive(Debug, Clone)]
enum GlyphSlot<'a> {
    /// Untouched bytes from the source font
    Original(&'a [u8]),
    Edited(Glyph),
}

impl FontWrite for GlyphSlot<'_> {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            GlyphSlot::Original(data) => {
                writer.write_slice(data);
                writer.pad_to_2byte_aligned();
            },
            GlyphSlot::Edited(glyph) => glyph.write_into(writer),
        }
    }
}

impl Validate for GlyphSlot<'_> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if let GlyphSlot::Edited(glyph) = self {
            glyph.validate_impl(ctx);
        }
    }
}

impl SomeGlyph for GlyphSlot<'_> {}

/// Decodes glyph bytes; the flag tells whether a composite carries
/// instructions, which a rebuilt composite cannot keep
fn read_glyph(data: &[u8], glyph_id: u32) -> std::result::Result<(Glyph, bool), GlyfError> {
    if data.is_empty() {
        return Ok((Glyph::Empty, false));
    }
    let glyph = GlyphRef::read(FontData::new(data)).map_err(|_| GlyfError::Truncated { glyph_id })?;
    let hinted_composite = match &glyph {
        GlyphRef::Composite(composite) => composite.instructions().is_some_and(|code| !code.is_empty()),
        GlyphRef::Simple(_) => false,
    };
    Ok((Glyph::from_table_ref(&glyph), hinted_composite))
}

fn shift(value: i16, dx: i32, glyph_id: u32) -> std::result::Result<i16, GlyfError> {
    i16::try_from(value as i32 + dx).map_err(|_| GlyfError::CoordinateOverflow { glyph_id, dx })
}

fn shift_bbox(bbox: Bbox, dx: i32, glyph_id: u32) -> std::result::Result<Bbox, GlyfError> {
    Ok(Bbox {
        x_min: shift(bbox.x_min, dx, glyph_id)?,
        x_max: shift(bbox.x_max, dx, glyph_id)?,
        ..bbox
    })
}

fn shift_simple(
    mut glyph: SimpleGlyph,
    dx: i32,
    glyph_id: u32,
) -> std::result::Result<SimpleGlyph, GlyfError> {
    glyph.contours = std::mem::take(&mut glyph.contours)
        .into_iter()
        .map(|contour| {
            Vec::<CurvePoint>::from(contour)
                .into_iter()
                .map(|point| {
                    Ok(CurvePoint {
                        x: shift(point.x, dx, glyph_id)?,
                        ..point
                    })
                })
                .collect::<std::result::Result<Vec<_>, GlyfError>>()
                .map(Contour::from)
        })
        .collect::<std::result::Result<_, _>>()?;
    glyph.recompute_bounding_box();
    Ok(glyph)
}

/// How far a component's stored x offset must move so that its ink moves
/// by `dx`. Offsets flagged as scaled are multiplied by the length of the
/// transform's x basis when the glyph is drawn.
fn offset_step(component: &Component, dx: i32, glyph_id: u32) -> std::result::Result<i32, GlyfError> {
    let flags = component.flags;
    let scaled = flags.scaled_component_offset
        && !flags.unscaled_component_offset
        && component.transform != Transform::default();
    if !scaled {
        return Ok(dx);
    }
    let transform = component.transform;
    let scale = (transform.xx.to_f32() as f64).hypot(transform.xy.to_f32() as f64);
    let step = dx as f64 / scale;
    let rounded = step.round();
    if !step.is_finite() || (step - rounded).abs() * scale > 1e-3 {
        return Err(GlyfError::ScaledOffset { glyph_id, dx });
    }
    Ok(rounded as i32)
}

/// Moves every offset-anchored component; point-anchored components follow
/// the points they are attached to. `ink` is the drawn box before the move.
fn shift_composite(
    glyph: &CompositeGlyph,
    ink: Bbox,
    dx: i32,
    glyph_id: u32,
) -> std::result::Result<CompositeGlyph, GlyfError> {
    let moved = shift_bbox(ink, dx, glyph_id)?;
    let components = glyph
        .components()
        .iter()
        .map(|component| {
            let mut component = component.clone();
            if let Anchor::Offset { x, y } = component.anchor {
                let step = offset_step(&component, dx, glyph_id)?;
                component.anchor = Anchor::Offset {
                    x: shift(x, step, glyph_id)?,
                    y,
                };
            }
            Ok((component, moved))
        })
        .collect::<std::result::Result<Vec<_>, GlyfError>>()?;
    CompositeGlyph::try_from_iter(components).map_err(|_| GlyfError::Truncated { glyph_id })
}

struct OutlineState<'a> {
    glyphs: Vec<GlyphSlot<'a>>,
    metrics: Vec<LongMetric>,
    drawn: OutlineGlyphCollection<'a>,
    changed: bool,
}

impl<'a> OutlineState<'a> {
    fn load(font: &FontRef<'a>) -> Result<Self> {
        let glyphs: Vec<GlyphSlot<'a>> =
            glyph_slices(font)?.into_iter().map(GlyphSlot::Original).collect();
        let hmtx = require(font.hmtx(), HMTX)?;
        require(font.hhea(), HHEA)?;
        let metrics = (0..glyphs.len() as u32)
            .map(|glyph_id| {
                let gid = read_fonts::types::GlyphId::new(glyph_id);
                LongMetric::new(
                    hmtx.advance(gid).unwrap_or_default(),
                    hmtx.side_bearing(gid).unwrap_or_default(),
                )
            })
            .collect();
        Ok(Self {
            glyphs,
            metrics,
            drawn: font.outline_glyphs(),
            changed: false,
        })
    }

    fn check(&self, glyph_id: u32) -> std::result::Result<usize, GlyfError> {
        let index = glyph_id as usize;
        if index < self.glyphs.len() {
            Ok(index)
        } else {
            Err(GlyfError::OutOfRange {
                glyph_id,
                num_glyphs: self.glyphs.len() as u32,
            })
        }
    }

    /// Ink box of every glyph as it will be written
    fn ink_boxes(&self) -> Vec<Option<Bbox>> {
        self.glyphs
            .iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                GlyphSlot::Original(data) if data.is_empty() => None,
                GlyphSlot::Original(_) => outline_bounds(&self.drawn, index as u32),
                GlyphSlot::Edited(glyph) => glyph.bbox(),
            })
            .collect()
    }
}

/// Editable view of a font's tables
pub struct FontEditor<'a> {
    font: FontRef<'a>,
    replaced: BTreeMap<Tag, Vec<u8>>,
    removed: BTreeSet<Tag>,
    outlines: Option<OutlineState<'a>>,
}

impl std::fmt::Debug for FontEditor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontEditor")
            .field("replaced", &self.replaced.keys().collect::<Vec<_>>())
            .field("removed", &self.removed)
            .field("glyph_edits", &self.has_glyph_edits())
            .finish()
    }
}

impl<'a> FontEditor<'a> {
    pub fn new(font: &'a FontFile) -> Result<Self> {
        Ok(Self {
            font: font.font_ref()?,
            replaced: BTreeMap::new(),
            removed: BTreeSet::new(),
            outlines: None,
        })
    }

    /// The font as it was before any edit
    pub fn source(&self) -> &FontRef<'a> {
        &self.font
    }

    /// Current bytes of a table; glyph edits show up after [`Self::finish`]
    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        if self.removed.contains(&tag) {
            return None;
        }
        match self.replaced.get(&tag) {
            Some(data) => Some(data.as_slice()),
            None => self.font.table_data(tag).map(|data| data.as_bytes()),
        }
    }

    /// Compiles a typed table and stores it in place of the original
    pub fn set_table<T>(&mut self, table: &T) -> Result<()>
    where
        T: FontWrite + Validate + TopLevelTable,
    {
        let data = write_fonts::dump_table(table).map_err(|err| TableError::Compile {
            tag: T::TAG.to_string(),
            reason: err.to_string(),
        })?;
        self.removed.remove(&T::TAG);
        self.replaced.insert(T::TAG, data);
        Ok(())
    }

    /// Returns whether the table was present
    pub fn remove_table(&mut self, tag: Tag) -> bool {
        let present = self.table(tag).is_some();
        self.replaced.remove(&tag);
        if present {
            self.removed.insert(tag);
        }
        present
    }

    fn outline_state(&mut self) -> Result<&mut OutlineState<'a>> {
        let state = match self.outlines.take() {
            Some(state) => state,
            None => OutlineState::load(&self.font)?,
        };
        Ok(self.outlines.insert(state))
    }

    /// Current outline of a glyph
    pub fn glyph(&mut self, glyph_id: u32) -> Result<Glyph> {
        let state = self.outline_state()?;
        let index = state.check(glyph_id)?;
        match &state.glyphs[index] {
            GlyphSlot::Original(data) => Ok(read_glyph(data, glyph_id)?.0),
            GlyphSlot::Edited(glyph) => Ok(glyph.clone()),
        }
    }

    pub fn advance(&mut self, glyph_id: u32) -> Result<u16> {
        let state = self.outline_state()?;
        let index = state.check(glyph_id)?;
        Ok(state.metrics[index].advance)
    }

    /// Moves a glyph's outline horizontally; the side bearing in `hmtx`
    /// follows the new bbox
    pub fn translate(&mut self, glyph_id: u32, dx: i32) -> Result<()> {
        if dx == 0 {
            return Ok(());
        }
        let state = self.outline_state()?;
        let index = state.check(glyph_id)?;
        let (glyph, ink) = match &state.glyphs[index] {
            GlyphSlot::Original(data) => {
                let (glyph, hinted_composite) = read_glyph(data, glyph_id)?;
                if hinted_composite {
                    log::warn!("glyph {glyph_id}: composite instructions dropped on rewrite");
                }
                (glyph, outline_bounds(&state.drawn, glyph_id))
            },
            GlyphSlot::Edited(glyph) => (glyph.clone(), glyph.bbox()),
        };
        let moved = match glyph {
            Glyph::Empty => return Ok(()),
            Glyph::Simple(simple) => Glyph::Simple(shift_simple(simple, dx, glyph_id)?),
            Glyph::Composite(composite) => {
                let ink = ink.unwrap_or(composite.bbox);
                Glyph::Composite(shift_composite(&composite, ink, dx, glyph_id)?)
            },
        };
        if let Some(bbox) = moved.bbox() {
            state.metrics[index].side_bearing = bbox.x_min;
        }
        state.glyphs[index] = GlyphSlot::Edited(moved);
        state.changed = true;
        log::trace!("glyph {glyph_id}: moved by {dx}");
        Ok(())
    }

    pub fn set_advance(&mut self, glyph_id: u32, advance: u32) -> Result<()> {
        let advance = u16::try_from(advance).map_err(|_| GlyfError::AdvanceOverflow(advance))?;
        let state = self.outline_state()?;
        let index = state.check(glyph_id)?;
        let metric = &mut state.metrics[index];
        if metric.advance != advance {
            metric.advance = advance;
            state.changed = true;
        }
        Ok(())
    }

    /// Whether any glyph edit changed the outline state
    pub fn has_glyph_edits(&self) -> bool {
        self.outlines.as_ref().is_some_and(|state| state.changed)
    }

    /// Serialises the edited font
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if let Some(state) = self.outlines.take().filter(|state| state.changed) {
            self.write_outlines(&state)?;
        }
        let mut builder = FontBuilder::new();
        for record in self.font.table_directory().table_records() {
            let tag = record.tag();
            if self.removed.contains(&tag) || self.replaced.contains_key(&tag) {
                continue;
            }
            if let Some(data) = self.font.table_data(tag) {
                builder.add_raw(tag, data.as_bytes());
            }
        }
        for (tag, data) in &self.replaced {
            builder.add_raw(*tag, data.as_slice());
        }
        Ok(builder.build())
    }

    /// Finishes and writes the font to `path` atomically
    pub fn save(self, path: &Path) -> Result<()> {
        let data = self.finish()?;
        FontFile::write_atomically(path, &data)
    }

    fn write_outlines(&mut self, state: &OutlineState<'a>) -> Result<()> {
        let mut builder = GlyfLocaBuilder::new();
        for (index, slot) in state.glyphs.iter().enumerate() {
            builder.add_glyph(slot).map_err(|err| GlyfError::Compile {
                glyph_id: index as u32,
                reason: err.to_string(),
            })?;
        }
        let (glyf, loca, format) = builder.build();

        let bboxes = state.ink_boxes();
        let extents = HorizontalExtents::compute(
            state
                .metrics
                .iter()
                .zip(&bboxes)
                .map(|(metric, bbox)| (metric.advance, bbox.as_ref())),
        );
        let hmtx = pack_hmtx(&state.metrics);

        let mut hhea: Hhea = require(self.font.hhea(), HHEA)?.to_owned_table();
        hhea.number_of_h_metrics = hmtx.h_metrics.len() as u16;
        let mut head: Head = require(self.font.head(), HEAD)?.to_owned_table();
        let index_to_loc_format = match format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        };
        if head.index_to_loc_format != index_to_loc_format {
            log::info!("loca rewritten with indexToLocFormat {index_to_loc_format}");
        }
        head.index_to_loc_format = index_to_loc_format;
        extents.apply(&mut hhea, &mut head);

        self.set_table(&glyf)?;
        self.set_table(&loca)?;
        self.set_table(&hmtx)?;
        self.set_table(&hhea)?;
        self.set_table(&head)?;

        for tag in STALE_AFTER_METRIC_EDIT {
            if self.remove_table(tag) {
                log::warn!("Dropped '{tag}' table: glyph metrics changed");
            }
        }
        Ok(())
    }
}
