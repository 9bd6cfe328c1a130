//! Synthetic TrueType fonts for tests
//!
//! Glyph 0 is always an empty `.notdef` with a 500 unit advance. Fonts have
//! 1000 units per em and the `head`, `hhea`, `maxp`, `OS/2`, `hmtx`, `loca`,
//! `glyf`, `cmap`, `post` (version 2) and `name` tables, all compiled with
//! `write-fonts`.

use std::collections::BTreeMap;
use std::path::Path;

use read_fonts::tables::glyf::CurvePoint;
use read_fonts::types::Tag;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{
    Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour,
    GlyfLocaBuilder, Glyph, SimpleGlyph, Transform,
};
use write_fonts::tables::head::{Flags, Head};
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::LongMetric;
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::{Os2, SelectionFlags};
use write_fonts::tables::post::Post;
use write_fonts::types::{F2Dot14, FWord, GlyphId, GlyphId16, NameId, UfWord};
use write_fonts::FontBuilder;

use crate::editor::{pack_hmtx, HorizontalExtents};
use crate::error::{GlyfError, GlyphfixError, Result, TableError};

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;
/// Height of rectangle glyphs
pub const CAP_HEIGHT: i16 = 700;

const WINDOWS: (u16, u16, u16) = (3, 1, 0x409);
const MAC_ROMAN: (u16, u16, u16) = (1, 0, 0);

/// An offset-anchored component without a transform
pub fn offset_component(glyph: u16, x: i16, y: i16) -> Component {
    Component::new(
        GlyphId16::new(glyph),
        Anchor::Offset { x, y },
        Transform::default(),
        ComponentFlags::default(),
    )
}

/// A uniformly scaled component whose offset is scaled along with it
pub fn scaled_component(glyph: u16, x: i16, y: i16, scale: f32) -> Component {
    let scale = F2Dot14::from_f32(scale);
    let transform = Transform {
        xx: scale,
        yy: scale,
        ..Transform::default()
    };
    let flags = ComponentFlags {
        scaled_component_offset: true,
        ..ComponentFlags::default()
    };
    Component::new(GlyphId16::new(glyph), Anchor::Offset { x, y }, transform, flags)
}

/// Where a component's base box lands once drawn
fn placed_bbox(component: &Component, base: Bbox) -> Option<Bbox> {
    let Anchor::Offset { x, y } = component.anchor else {
        return None;
    };
    let t = component.transform;
    let (xx, yx, xy, yy) = (t.xx.to_f32(), t.yx.to_f32(), t.xy.to_f32(), t.yy.to_f32());
    let (mut dx, mut dy) = (x as f32, y as f32);
    let flags = component.flags;
    if flags.scaled_component_offset && !flags.unscaled_component_offset && t != Transform::default() {
        dx *= xx.hypot(xy);
        dy *= yx.hypot(yy);
    }
    let corners = [
        (base.x_min, base.y_min),
        (base.x_min, base.y_max),
        (base.x_max, base.y_min),
        (base.x_max, base.y_max),
    ]
    .map(|(px, py)| {
        let (px, py) = (px as f32, py as f32);
        (xx * px + xy * py + dx, yx * px + yy * py + dy)
    });
    let fold = |pick: fn(f32, f32) -> f32, axis: fn(&(f32, f32)) -> f32| {
        corners.iter().map(axis).fold(axis(&corners[0]), pick).round() as i16
    };
    Some(Bbox {
        x_min: fold(f32::min, |c| c.0),
        y_min: fold(f32::min, |c| c.1),
        x_max: fold(f32::max, |c| c.0),
        y_max: fold(f32::max, |c| c.1),
    })
}

#[derive(Debug, Clone)]
struct FixtureGlyph {
    name: String,
    advance: u16,
    glyph: Glyph,
}

/// Builder for a small TrueType font
#[derive(Debug, Clone)]
pub struct FixtureFont {
    family: String,
    style: String,
    copyright: String,
    glyphs: Vec<FixtureGlyph>,
    cmap: BTreeMap<u32, u32>,
    extra_names: BTreeMap<((u16, u16, u16), NameId), String>,
    extra_tables: BTreeMap<Tag, Vec<u8>>,
}

impl FixtureFont {
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            style: "Regular".to_string(),
            copyright: format!("Copyright 2024 The {family} Authors"),
            glyphs: vec![FixtureGlyph {
                name: ".notdef".to_string(),
                advance: 500,
                glyph: Glyph::Empty,
            }],
            cmap: BTreeMap::new(),
            extra_names: BTreeMap::new(),
            extra_tables: BTreeMap::new(),
        }
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = style.to_string();
        self
    }

    pub fn copyright(mut self, copyright: &str) -> Self {
        self.copyright = copyright.to_string();
        self
    }

    /// Adds a glyph; it gets the next glyph id
    pub fn glyph(mut self, name: &str, codepoint: Option<u32>, advance: u16, glyph: Glyph) -> Self {
        let glyph_id = self.glyphs.len() as u32;
        self.glyphs.push(FixtureGlyph {
            name: name.to_string(),
            advance,
            glyph,
        });
        if let Some(codepoint) = codepoint {
            self.cmap.insert(codepoint, glyph_id);
        }
        self
    }

    /// A rectangle spanning `x_min..x_max` from the baseline to [`CAP_HEIGHT`]
    pub fn rect_glyph(
        self,
        name: &str,
        codepoint: Option<u32>,
        advance: u16,
        x_min: i16,
        x_max: i16,
    ) -> Self {
        let on = |x, y| CurvePoint::new(x, y, true);
        let contour = Contour::from(vec![
            on(x_min, 0),
            on(x_min, CAP_HEIGHT),
            on(x_max, CAP_HEIGHT),
            on(x_max, 0),
        ]);
        let mut simple = SimpleGlyph {
            bbox: Bbox::default(),
            contours: vec![contour],
            instructions: Vec::new(),
        };
        simple.recompute_bounding_box();
        self.glyph(name, codepoint, advance, Glyph::Simple(simple))
    }

    pub fn empty_glyph(self, name: &str, codepoint: Option<u32>, advance: u16) -> Self {
        self.glyph(name, codepoint, advance, Glyph::Empty)
    }

    /// A composite of earlier glyphs with its header box computed from the
    /// placed components
    pub fn composite_glyph(
        self,
        name: &str,
        codepoint: Option<u32>,
        advance: u16,
        components: Vec<Component>,
    ) -> Self {
        let bbox = components
            .iter()
            .filter_map(|component| {
                let base = self
                    .glyphs
                    .get(component.glyph.to_u16() as usize)
                    .and_then(|glyph| glyph.glyph.bbox())?;
                placed_bbox(component, base)
            })
            .reduce(Bbox::union)
            .unwrap_or_default();
        self.composite_glyph_with_bbox(name, codepoint, advance, components, bbox)
    }

    /// A composite whose header carries `bbox` verbatim
    pub fn composite_glyph_with_bbox(
        self,
        name: &str,
        codepoint: Option<u32>,
        advance: u16,
        components: Vec<Component>,
        bbox: Bbox,
    ) -> Self {
        let glyph = match CompositeGlyph::try_from_iter(components.into_iter().map(|c| (c, bbox))) {
            Ok(mut composite) => {
                composite.bbox = bbox;
                Glyph::Composite(composite)
            },
            Err(_) => Glyph::Empty,
        };
        self.glyph(name, codepoint, advance, glyph)
    }

    pub fn map_codepoint(mut self, codepoint: u32, glyph_id: u32) -> Self {
        self.cmap.insert(codepoint, glyph_id);
        self
    }

    /// Windows English `name` record, replacing a generated one with the
    /// same id
    pub fn name_record(mut self, name_id: NameId, text: &str) -> Self {
        self.extra_names.insert((WINDOWS, name_id), text.to_string());
        self
    }

    /// Macintosh Roman `name` record
    pub fn mac_name_record(mut self, name_id: NameId, text: &str) -> Self {
        self.extra_names.insert((MAC_ROMAN, name_id), text.to_string());
        self
    }

    /// Adds or replaces a table verbatim
    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.extra_tables.insert(Tag::new(tag), data);
        self
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        let mut glyf_builder = GlyfLocaBuilder::new();
        for (glyph_id, glyph) in self.glyphs.iter().enumerate() {
            glyf_builder.add_glyph(&glyph.glyph).map_err(|err| GlyfError::Compile {
                glyph_id: glyph_id as u32,
                reason: err.to_string(),
            })?;
        }
        let (glyf, loca, format) = glyf_builder.build();

        let bboxes: Vec<Option<Bbox>> = self.glyphs.iter().map(|g| g.glyph.bbox()).collect();
        let extents = HorizontalExtents::compute(
            self.glyphs
                .iter()
                .zip(&bboxes)
                .map(|(glyph, bbox)| (glyph.advance, bbox.as_ref())),
        );
        let metrics: Vec<LongMetric> = self
            .glyphs
            .iter()
            .zip(&bboxes)
            .map(|(glyph, bbox)| LongMetric::new(glyph.advance, bbox.map(|b| b.x_min).unwrap_or_default()))
            .collect();
        let hmtx = pack_hmtx(&metrics);

        let mut head = self.head(format);
        let mut hhea = Hhea::new(
            FWord::new(ASCENDER),
            FWord::new(DESCENDER),
            FWord::new(0),
            UfWord::new(0),
            FWord::new(0),
            FWord::new(0),
            FWord::new(0),
            1,
            0,
            0,
            hmtx.h_metrics.len() as u16,
        );
        extents.apply(&mut hhea, &mut head);

        let cmap = Cmap::from_mappings(self.cmap.iter().filter_map(|(&codepoint, &glyph_id)| {
            Some((char::from_u32(codepoint)?, GlyphId::new(glyph_id)))
        }))
        .map_err(|err| TableError::Compile {
            tag: "cmap".into(),
            reason: err.to_string(),
        })?;

        let mut post = Post::new_v2(self.glyphs.iter().map(|g| g.name.as_str()));
        post.underline_position = FWord::new(-100);
        post.underline_thickness = FWord::new(50);
        post.is_fixed_pitch = 1;

        let mut builder = FontBuilder::new();
        builder
            .add_table(&head)
            .and_then(|b| b.add_table(&hhea))
            .and_then(|b| b.add_table(&self.maxp()))
            .and_then(|b| b.add_table(&self.os2()))
            .and_then(|b| b.add_table(&hmtx))
            .and_then(|b| b.add_table(&loca))
            .and_then(|b| b.add_table(&glyf))
            .and_then(|b| b.add_table(&cmap))
            .and_then(|b| b.add_table(&post))
            .and_then(|b| b.add_table(&self.name()))
            .map_err(|err| GlyphfixError::Other(format!("fixture font: {err}")))?;
        for (tag, data) in &self.extra_tables {
            builder.add_raw(*tag, data.as_slice());
        }
        Ok(builder.build())
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.build()?)?;
        Ok(())
    }

    fn head(&self, format: LocaFormat) -> Head {
        Head {
            flags: Flags::from_bits_truncate(0x000B),
            units_per_em: UNITS_PER_EM,
            y_min: DESCENDER,
            y_max: ASCENDER,
            lowest_rec_ppem: 8,
            index_to_loc_format: if format == LocaFormat::Long { 1 } else { 0 },
            ..Head::default()
        }
    }

    fn maxp(&self) -> Maxp {
        let max_of = |measure: fn(&Glyph) -> Option<usize>| {
            self.glyphs
                .iter()
                .filter_map(|g| measure(&g.glyph))
                .max()
                .unwrap_or_default() as u16
        };
        let mut maxp = Maxp::new(self.glyphs.len() as u16);
        maxp.max_points = Some(max_of(|glyph| match glyph {
            Glyph::Simple(simple) => Some(simple.contours.iter().map(|c| c.len()).sum()),
            _ => None,
        }));
        maxp.max_contours = Some(max_of(|glyph| match glyph {
            Glyph::Simple(simple) => Some(simple.contours.len()),
            _ => None,
        }));
        maxp.max_composite_points = Some(0);
        maxp.max_composite_contours = Some(0);
        maxp.max_zones = Some(2);
        maxp.max_twilight_points = Some(0);
        maxp.max_storage = Some(0);
        maxp.max_function_defs = Some(0);
        maxp.max_instruction_defs = Some(0);
        maxp.max_stack_elements = Some(0);
        maxp.max_size_of_instructions = Some(0);
        maxp.max_component_elements = Some(max_of(|glyph| match glyph {
            Glyph::Composite(composite) => Some(composite.components().len()),
            _ => None,
        }));
        maxp.max_component_depth = Some(1);
        maxp
    }

    fn os2(&self) -> Os2 {
        Os2 {
            x_avg_char_width: 500,
            ach_vend_id: Tag::new(b"FXTR"),
            fs_selection: SelectionFlags::from_bits_truncate(0x0040),
            s_typo_ascender: ASCENDER,
            s_typo_descender: DESCENDER,
            us_win_ascent: ASCENDER as u16,
            us_win_descent: (-DESCENDER) as u16,
            sx_height: Some(500),
            s_cap_height: Some(CAP_HEIGHT),
            us_default_char: Some(0),
            us_break_char: Some(0x20),
            us_max_context: Some(0),
            ul_code_page_range_1: Some(0),
            ul_code_page_range_2: Some(0),
            ..Os2::default()
        }
    }

    fn name(&self) -> Name {
        let full_name = format!("{} {}", self.family, self.style);
        let postscript = format!("{}-{}", self.family, self.style).replace(' ', "");
        let generated = [
            (NameId::COPYRIGHT_NOTICE, self.copyright.clone()),
            (NameId::FAMILY_NAME, self.family.clone()),
            (NameId::SUBFAMILY_NAME, self.style.clone()),
            (NameId::FULL_NAME, full_name),
            (NameId::POSTSCRIPT_NAME, postscript),
        ];
        let mut texts: BTreeMap<_, String> = generated
            .into_iter()
            .map(|(name_id, text)| ((WINDOWS, name_id), text))
            .collect();
        texts.extend(self.extra_names.clone());
        // map order is platform, encoding, language, name id
        let records = texts
            .into_iter()
            .map(|(((platform, encoding, language), name_id), text)| {
                NameRecord::new(platform, encoding, language, name_id, text.into())
            })
            .collect();
        Name::new(records)
    }
}
