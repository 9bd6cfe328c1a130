//! JSON view of the tables `fix-tables` edits

use glyphfix_core::{FontFile, Result};
use read_fonts::{ReadError, TableProvider};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Os2Dump {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub fs_selection: u16,
    pub panose: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDump {
    pub is_fixed_pitch: u32,
    pub italic_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameDump {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub text: String,
}

/// Absent tables serialise as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDump {
    pub os2: Option<Os2Dump>,
    pub post: Option<PostDump>,
    pub name: Vec<NameDump>,
}

impl TableDump {
    pub fn collect(font: &FontFile) -> Result<Self> {
        let font_ref = font.font_ref()?;
        let os2 = optional(font_ref.os2())?.map(|os2| Os2Dump {
            version: os2.version(),
            x_avg_char_width: os2.x_avg_char_width(),
            us_weight_class: os2.us_weight_class(),
            fs_selection: os2.fs_selection().bits(),
            panose: os2.panose_10().to_vec(),
        });
        let post = optional(font_ref.post())?.map(|post| PostDump {
            is_fixed_pitch: post.is_fixed_pitch(),
            italic_angle: post.italic_angle().to_f64(),
        });
        let name = match optional(font_ref.name())? {
            Some(name) => name
                .name_record()
                .iter()
                .map(|record| NameDump {
                    platform_id: record.platform_id(),
                    encoding_id: record.encoding_id(),
                    language_id: record.language_id(),
                    name_id: record.name_id().to_u16(),
                    text: record
                        .string(name.string_data())
                        .map(|text| text.to_string())
                        .unwrap_or_default(),
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(Self { os2, post, name })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn optional<T>(table: std::result::Result<T, ReadError>) -> Result<Option<T>> {
    match table {
        Ok(table) => Ok(Some(table)),
        Err(ReadError::TableIsMissing(_)) => Ok(None),
        Err(err) => Err(glyphfix_core::TableError::Malformed {
            tag: "OS/2|post|name".into(),
            reason: err.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfix_core::fixture::FixtureFont;

    #[test]
    fn test_dump_when_fixture_then_reports_fields_and_names() {
        let font = FontFile::from_data(
            FixtureFont::new("GLG Mono")
                .style("Bold")
                .rect_glyph("zero", Some(0x30), 528, 50, 478)
                .build()
                .expect("build fixture"),
        )
        .expect("font");
        let dump = TableDump::collect(&font).expect("dump");

        let os2 = dump.os2.as_ref().expect("OS/2");
        assert_eq!(os2.x_avg_char_width, 500);
        assert_eq!(os2.fs_selection, 0x0040);
        assert_eq!(os2.panose.len(), 10);
        assert_eq!(dump.post.as_ref().map(|post| post.is_fixed_pitch), Some(1));
        assert!(dump.name.iter().any(|record| record.name_id == 2 && record.text == "Bold"));

        let json = dump.to_json().expect("json");
        assert!(json.contains("\"x_avg_char_width\": 500"));
    }
}
