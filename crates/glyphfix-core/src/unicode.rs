//! Unicode ranges and script buckets used to select glyphs

use std::fmt;
use std::str::FromStr;

/// Inclusive code point range with a display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeRange {
    pub start: u32,
    pub end: u32,
    pub name: String,
}

impl UnicodeRange {
    pub fn new(start: u32, end: u32, name: impl Into<String>) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            name: name.into(),
        }
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        (self.start..=self.end).contains(&codepoint)
    }

    /// Hangul Syllables, 가-힣 (11,172 characters)
    pub fn hangul_syllables() -> Self {
        Self::new(0xAC00, 0xD7A3, "Hangul Syllables")
    }

    /// Hangul Compatibility Jamo, ㄱ-ㆎ
    pub fn hangul_compatibility_jamo() -> Self {
        Self::new(0x3131, 0x318E, "Hangul Compatibility Jamo")
    }

    pub fn hiragana_katakana() -> Self {
        Self::new(0x3040, 0x30FF, "Hiragana and Katakana")
    }

    pub fn cjk_unified_ideographs() -> Self {
        Self::new(0x4E00, 0x9FFF, "CJK Unified Ideographs")
    }

    /// The ranges re-centred after a Nerd Fonts merge
    pub fn korean() -> Vec<Self> {
        vec![Self::hangul_syllables(), Self::hangul_compatibility_jamo()]
    }
}

impl fmt::Display for UnicodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{})", self.name, format_codepoint(self.start), format_codepoint(self.end))
    }
}

impl FromStr for UnicodeRange {
    type Err = String;

    /// Accepts `START-END` or a single code point, each in any form
    /// [`parse_codepoint`] understands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (start, end) = match s.split_once('-').filter(|(a, b)| !a.is_empty() && !b.is_empty()) {
            Some((start, end)) => (parse_codepoint(start)?, parse_codepoint(end)?),
            None => {
                let codepoint = parse_codepoint(s)?;
                (codepoint, codepoint)
            },
        };
        Ok(Self::new(start, end, s))
    }
}

/// Which report bucket a glyph falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphScript {
    Korean,
    Japanese,
    Other,
}

impl GlyphScript {
    /// Unmapped glyphs are `Other`
    pub fn classify(codepoint: Option<u32>) -> Self {
        match codepoint {
            Some(cp) if UnicodeRange::hangul_syllables().contains(cp) => Self::Korean,
            Some(cp)
                if UnicodeRange::hiragana_katakana().contains(cp)
                    || UnicodeRange::cjk_unified_ideographs().contains(cp) =>
            {
                Self::Japanese
            },
            _ => Self::Other,
        }
    }
}

/// `U+XXXX`, at least four hex digits
pub fn format_codepoint(codepoint: u32) -> String {
    format!("U+{codepoint:04X}")
}

/// The printable character for a code point, or an empty string
pub fn display_char(codepoint: Option<u32>) -> String {
    codepoint
        .filter(|&cp| cp > 0)
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_default()
}

/// Parses `U+AC00`, `0xAC00`, `AC00`, or a single literal character such as `가`
pub fn parse_codepoint(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if !ch.is_ascii_hexdigit() {
            return Ok(ch as u32);
        }
    }

    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let value = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid code point '{s}'"))?;
    if value > 0x10FFFF {
        return Err(format!("code point '{s}' is beyond U+10FFFF"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_point_spellings() {
        assert_eq!(parse_codepoint("U+AC00"), Ok(0xAC00));
        assert_eq!(parse_codepoint("0xd7a3"), Ok(0xD7A3));
        assert_eq!(parse_codepoint("3131"), Ok(0x3131));
        assert_eq!(parse_codepoint("가"), Ok(0xAC00));
        assert_eq!(parse_codepoint("A"), Ok(0xA));
        assert!(parse_codepoint("U+110000").is_err());
        assert!(parse_codepoint("zz").is_err());
    }

    #[test]
    fn parses_ranges() {
        let range: UnicodeRange = "AC00-D7A3".parse().expect("range");
        assert_eq!((range.start, range.end), (0xAC00, 0xD7A3));
        assert!(range.contains(0xAC00) && range.contains(0xD7A3));
        assert!(!range.contains(0xD7A4));

        let single: UnicodeRange = "U+3042".parse().expect("single");
        assert_eq!((single.start, single.end), (0x3042, 0x3042));

        let reversed = UnicodeRange::new(0x20, 0x10, "r");
        assert_eq!((reversed.start, reversed.end), (0x10, 0x20));
    }

    #[test]
    fn classifies_scripts() {
        assert_eq!(GlyphScript::classify(Some(0xAC00)), GlyphScript::Korean);
        assert_eq!(GlyphScript::classify(Some(0x3042)), GlyphScript::Japanese);
        assert_eq!(GlyphScript::classify(Some(0x4E00)), GlyphScript::Japanese);
        // compatibility jamo are not syllables
        assert_eq!(GlyphScript::classify(Some(0x3131)), GlyphScript::Other);
        assert_eq!(GlyphScript::classify(None), GlyphScript::Other);
    }

    #[test]
    fn formats_code_points() {
        assert_eq!(format_codepoint(0x30), "U+0030");
        assert_eq!(format_codepoint(0x1F600), "U+1F600");
        assert_eq!(display_char(Some(0xAC00)), "가");
        assert_eq!(display_char(None), "");
    }
}
