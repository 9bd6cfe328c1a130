//! Per-glyph horizontal metrics
//!
//! A [`GlyphMetrics`] record joins what the bearing tools look at: advance
//! from `hmtx`, ink box measured on the unhinted outline, the lowest code
//! point mapped to the glyph and its `post` name. Composite glyphs are
//! measured through their components, so a stale `glyf` header box does not
//! leak into the bearings.

use std::collections::{BTreeMap, BTreeSet};

use read_fonts::types::GlyphId;
use read_fonts::{FontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{MetadataProvider, OutlineGlyphCollection};
use write_fonts::OtRound;

pub use write_fonts::tables::glyf::Bbox;

use crate::error::Result;
use crate::font::{require, FontFile, HMTX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub glyph_id: u32,
    pub codepoint: Option<u32>,
    pub name: Option<String>,
    pub advance: u16,
    /// `None` for glyphs without outlines
    pub bbox: Option<Bbox>,
}

impl GlyphMetrics {
    fn ink(&self) -> Bbox {
        self.bbox.unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_none()
    }

    pub fn lsb(&self) -> i32 {
        self.ink().x_min as i32
    }

    pub fn rsb(&self) -> i32 {
        self.advance as i32 - self.ink().x_max as i32
    }

    pub fn ink_width(&self) -> i32 {
        let ink = self.ink();
        ink.x_max as i32 - ink.x_min as i32
    }

    pub fn bearing_diff(&self) -> i32 {
        (self.lsb() - self.rsb()).abs()
    }

    /// Name for reports: the `post` name, else `gidN`
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("gid{}", self.glyph_id))
    }
}

/// Accumulates the extremes of every point an outline emits
#[derive(Debug, Default)]
struct BoundsPen {
    bounds: Option<[f32; 4]>,
}

impl BoundsPen {
    fn add(&mut self, x: f32, y: f32) {
        let bounds = self.bounds.get_or_insert([x, y, x, y]);
        bounds[0] = bounds[0].min(x);
        bounds[1] = bounds[1].min(y);
        bounds[2] = bounds[2].max(x);
        bounds[3] = bounds[3].max(y);
    }

    fn finish(self) -> Option<Bbox> {
        let [x_min, y_min, x_max, y_max] = self.bounds?;
        Some(Bbox {
            x_min: x_min.ot_round(),
            y_min: y_min.ot_round(),
            x_max: x_max.ot_round(),
            y_max: y_max.ot_round(),
        })
    }
}

impl OutlinePen for BoundsPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(cx1, cy1);
        self.add(x, y);
    }

    fn close(&mut self) {}
}

/// Control box of the unhinted outline in font units; `None` when the glyph
/// draws nothing or cannot be loaded
pub fn outline_bounds(outlines: &OutlineGlyphCollection<'_>, glyph_id: u32) -> Option<Bbox> {
    let glyph = outlines.get(GlyphId::new(glyph_id))?;
    let mut pen = BoundsPen::default();
    let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
    if let Err(err) = glyph.draw(settings, &mut pen) {
        log::warn!("glyph {glyph_id}: outline not drawable: {err}");
        return None;
    }
    pen.finish()
}

/// Metrics for every glyph of a font plus its character map
#[derive(Debug, Clone)]
pub struct FontMetrics {
    glyphs: Vec<GlyphMetrics>,
    cmap: BTreeMap<u32, u32>,
}

impl FontMetrics {
    pub fn load(font: &FontFile) -> Result<Self> {
        let font_ref = font.font_ref()?;
        Self::from_font_ref(&font_ref)
    }

    pub fn from_font_ref(font: &FontRef<'_>) -> Result<Self> {
        let hmtx = require(font.hmtx(), HMTX)?;
        let num_glyphs = require(font.maxp(), crate::font::MAXP)?.num_glyphs();
        // only TrueType outlines are measured
        crate::font::glyph_slices(font)?;

        let cmap: BTreeMap<u32, u32> = font
            .charmap()
            .mappings()
            .map(|(codepoint, glyph_id)| (codepoint, glyph_id.to_u32()))
            .collect();
        let mut lowest = BTreeMap::new();
        for (&codepoint, &glyph_id) in &cmap {
            lowest.entry(glyph_id).or_insert(codepoint);
        }

        let names = font.glyph_names();
        let outlines = font.outline_glyphs();
        let glyphs: Vec<GlyphMetrics> = (0..num_glyphs as u32)
            .map(|glyph_id| {
                let gid = GlyphId::new(glyph_id);
                GlyphMetrics {
                    glyph_id,
                    codepoint: lowest.get(&glyph_id).copied(),
                    name: names
                        .get(gid)
                        .filter(|name| !name.is_synthesized())
                        .map(|name| name.as_str().to_string()),
                    advance: hmtx.advance(gid).unwrap_or_default(),
                    bbox: outline_bounds(&outlines, glyph_id),
                }
            })
            .collect();

        log::debug!("Loaded metrics for {} glyphs, {} mapped code points", glyphs.len(), cmap.len());
        Ok(Self { glyphs, cmap })
    }

    pub fn glyphs(&self) -> &[GlyphMetrics] {
        &self.glyphs
    }

    pub fn glyph(&self, glyph_id: u32) -> Option<&GlyphMetrics> {
        self.glyphs.get(glyph_id as usize)
    }

    /// Metrics of the glyph a code point maps to
    pub fn for_codepoint(&self, codepoint: u32) -> Option<&GlyphMetrics> {
        self.cmap.get(&codepoint).and_then(|&gid| self.glyph(gid))
    }

    pub fn advance_of(&self, codepoint: u32) -> Option<u16> {
        self.for_codepoint(codepoint).map(|glyph| glyph.advance)
    }

    /// Code point to glyph id, in code point order
    pub fn cmap(&self) -> &BTreeMap<u32, u32> {
        &self.cmap
    }

    /// Glyphs reachable from code points inside `contains`, each glyph
    /// once, in order of its lowest matching code point
    pub fn glyphs_in(&self, contains: impl Fn(u32) -> bool) -> Vec<(u32, &GlyphMetrics)> {
        let mut seen = BTreeSet::new();
        self.cmap
            .iter()
            .filter(|&(&codepoint, _)| contains(codepoint))
            .filter(|&(_, &glyph_id)| seen.insert(glyph_id))
            .filter_map(|(&codepoint, &glyph_id)| Some((codepoint, self.glyph(glyph_id)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{offset_component, FixtureFont};

    fn sample() -> FontMetrics {
        let data = FixtureFont::new("Fixture Mono")
            .rect_glyph("zero", Some(0x30), 528, 50, 478)
            .rect_glyph("uniAC00", Some(0xAC00), 1056, 40, 960)
            .empty_glyph("space", Some(0x20), 528)
            .map_codepoint(0xAC01, 2)
            .build()
            .expect("build fixture");
        FontMetrics::load(&FontFile::from_data(data).expect("font")).expect("metrics")
    }

    #[test]
    fn test_metrics_when_loaded_then_bearings_follow_bbox() {
        let metrics = sample();
        let ga = metrics.for_codepoint(0xAC00).expect("ga");
        assert_eq!(ga.name.as_deref(), Some("uniAC00"));
        assert_eq!((ga.lsb(), ga.rsb(), ga.ink_width()), (40, 96, 920));
        assert_eq!(ga.bearing_diff(), 56);
        assert_eq!(metrics.advance_of(0x30), Some(528));
    }

    #[test]
    fn test_empty_glyph_when_measured_then_rsb_is_advance() {
        let metrics = sample();
        let space = metrics.for_codepoint(0x20).expect("space");
        assert!(space.is_empty());
        assert_eq!((space.lsb(), space.rsb(), space.ink_width()), (0, 528, 0));
    }

    #[test]
    fn test_glyphs_in_when_glyph_shared_then_visited_once() {
        let metrics = sample();
        let hangul = metrics.glyphs_in(|cp| (0xAC00..=0xD7A3).contains(&cp));
        assert_eq!(hangul.len(), 1);
        assert_eq!(hangul[0].0, 0xAC00);
        assert_eq!(hangul[0].1.codepoint, Some(0xAC00));
        assert_eq!(metrics.glyph(0).map(GlyphMetrics::display_name).as_deref(), Some(".notdef"));
    }

    #[test]
    fn test_composite_when_header_box_stale_then_outline_wins() {
        let stale = Bbox {
            x_min: 0,
            y_min: 0,
            x_max: 1000,
            y_max: 700,
        };
        let data = FixtureFont::new("Fixture Mono")
            .rect_glyph("base", None, 1000, 100, 300)
            .composite_glyph_with_bbox("uniAC00", Some(0xAC00), 1000, vec![offset_component(1, 40, 0)], stale)
            .build()
            .expect("build fixture");
        let font = FontFile::from_data(data).expect("font");
        let metrics = FontMetrics::load(&font).expect("metrics");

        let ga = metrics.for_codepoint(0xAC00).expect("ga");
        assert_eq!((ga.lsb(), ga.rsb()), (140, 660));
    }
}
