//! Find glyphs whose advance falls strictly between two widths

use glyphfix_core::{FontMetrics, GlyphScript};

pub const DEFAULT_MIN_WIDTH: u16 = 500;
pub const DEFAULT_MAX_WIDTH: u16 = 1000;
pub const DEFAULT_KOREAN_SAMPLES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthHit {
    pub glyph_id: u32,
    pub name: String,
    pub codepoint: Option<u32>,
    pub advance: u16,
    pub script: GlyphScript,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidthScan {
    pub hits: Vec<WidthHit>,
}

impl WidthScan {
    pub fn total(&self) -> usize {
        self.hits.len()
    }

    pub fn of(&self, script: GlyphScript) -> impl Iterator<Item = &WidthHit> {
        self.hits.iter().filter(move |hit| hit.script == script)
    }

    pub fn count(&self, script: GlyphScript) -> usize {
        self.of(script).count()
    }
}

/// Every glyph, mapped or not, with `min < advance < max`, in glyph order
pub fn scan_widths(metrics: &FontMetrics, min: u16, max: u16) -> WidthScan {
    let hits = metrics
        .glyphs()
        .iter()
        .filter(|glyph| min < glyph.advance && glyph.advance < max)
        .map(|glyph| WidthHit {
            glyph_id: glyph.glyph_id,
            name: glyph.display_name(),
            codepoint: glyph.codepoint,
            advance: glyph.advance,
            script: GlyphScript::classify(glyph.codepoint),
        })
        .collect();
    WidthScan { hits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfix_core::fixture::FixtureFont;
    use glyphfix_core::FontFile;

    #[test]
    fn test_scan_when_bounds_hit_exactly_then_excluded() {
        let data = FixtureFont::new("Fixture Mono")
            .rect_glyph("uniAC00", Some(0xAC00), 892, 40, 850)
            .rect_glyph("uni3042", Some(0x3042), 920, 40, 880)
            .rect_glyph("uni4E00", Some(0x4E00), 999, 40, 880)
            .rect_glyph("A", Some(0x41), 501, 20, 480)
            .rect_glyph("lower", None, 600, 20, 480)
            .rect_glyph("at_min", Some(0x42), 500, 20, 480)
            .rect_glyph("at_max", Some(0xAC01), 1000, 20, 980)
            .build()
            .expect("build fixture");
        let metrics = FontMetrics::load(&FontFile::from_data(data).expect("font")).expect("metrics");
        let scan = scan_widths(&metrics, DEFAULT_MIN_WIDTH, DEFAULT_MAX_WIDTH);

        assert_eq!(scan.total(), 5);
        assert_eq!(scan.count(GlyphScript::Korean), 1);
        assert_eq!(scan.count(GlyphScript::Japanese), 2);
        let other: Vec<_> = scan.of(GlyphScript::Other).map(|hit| hit.name.as_str()).collect();
        assert_eq!(other, vec!["A", "lower"]);
        assert!(scan.hits.iter().all(|hit| hit.name != ".notdef"));
    }
}
