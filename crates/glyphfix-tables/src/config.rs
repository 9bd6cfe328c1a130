//! Build settings shared with the rest of the font pipeline
//!
//! The settings file is the pipeline's `build.ini`: unquoted values under the
//! upper-case keys, normally in the `[DEFAULT]` section. Keys are matched
//! without regard to case, `;` and `#` start comment lines, and keys placed
//! before any section header override `[DEFAULT]`.
//!
//! ```ini
//! [DEFAULT]
//! FONT_NAME = GLG Mono
//! FONTFORGE_PREFIX = fontforge_
//! FONTTOOLS_PREFIX = fonttools_
//! BUILD_FONTS_DIR = build
//! HALF_WIDTH_12 = 528
//! FULL_WIDTH_35 = 600
//! WIDTH_35_STR = 35
//! CONSOLE_STR = Console
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use serde::Serialize;
use thiserror::Error;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "GLYPHFIX_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "build.ini";
const DEFAULT_SECTION: &str = "DEFAULT";
const INLINE: &str = "<inline>";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Syntax {
        path: PathBuf,
        source: ini::ParseError,
    },

    #[error("invalid settings {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BuildSettings {
    pub font_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_font_name: Option<String>,
    pub fontforge_prefix: String,
    pub fonttools_prefix: String,
    pub build_fonts_dir: PathBuf,
    pub half_width_12: i16,
    pub full_width_35: i16,
    pub width_35_str: String,
    pub console_str: String,
}

/// Upper-cased key to value, `[DEFAULT]` first and overridden by the
/// section-less keys
struct Values {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl Values {
    fn from_ini(ini: &Ini, path: &Path) -> Self {
        let mut map = BTreeMap::new();
        for section in [Some(DEFAULT_SECTION), None] {
            if let Some(properties) = ini.section(section) {
                for (key, value) in properties.iter() {
                    map.insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
                }
            }
        }
        for (section, _) in ini.iter() {
            if let Some(name) = section.filter(|name| *name != DEFAULT_SECTION) {
                log::debug!("Ignoring settings section [{name}]");
            }
        }
        Self {
            path: path.to_path_buf(),
            map,
        }
    }

    fn error(&self, reason: String) -> SettingsError {
        SettingsError::Parse {
            path: self.path.clone(),
            reason,
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.map.get(key).filter(|value| !value.is_empty()).cloned()
    }

    fn text(&self, key: &str) -> Result<String, SettingsError> {
        self.map
            .get(key)
            .cloned()
            .ok_or_else(|| self.error(format!("missing key {key}")))
    }

    fn number(&self, key: &str) -> Result<i16, SettingsError> {
        let text = self.text(key)?;
        text.parse()
            .map_err(|err| self.error(format!("{key} = {text}: {err}")))
    }
}

impl BuildSettings {
    /// `explicit`, else `$GLYPHFIX_SETTINGS`, else `build.ini`
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        std::env::var_os(SETTINGS_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&text, path)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_ini_str(text: &str) -> Result<Self, SettingsError> {
        Self::parse(text, Path::new(INLINE))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, SettingsError> {
        let ini = Ini::load_from_str(text).map_err(|source| SettingsError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        let values = Values::from_ini(&ini, path);
        let settings = Self {
            font_name: values.text("FONT_NAME")?,
            new_font_name: values.optional("NEW_FONT_NAME"),
            fontforge_prefix: values.text("FONTFORGE_PREFIX")?,
            fonttools_prefix: values.text("FONTTOOLS_PREFIX")?,
            build_fonts_dir: PathBuf::from(values.text("BUILD_FONTS_DIR")?),
            half_width_12: values.number("HALF_WIDTH_12")?,
            full_width_35: values.number("FULL_WIDTH_35")?,
            width_35_str: values.text("WIDTH_35_STR")?,
            console_str: values.text("CONSOLE_STR")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.font_name.trim().is_empty() {
            return Err(SettingsError::Invalid("FONT_NAME is empty".into()));
        }
        if self.width_35_str.is_empty() {
            return Err(SettingsError::Invalid("WIDTH_35_STR is empty".into()));
        }
        Ok(())
    }

    /// `NEW_FONT_NAME`, falling back to `FONT_NAME`
    pub fn new_font_name(&self) -> &str {
        self.new_font_name.as_deref().unwrap_or(&self.font_name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = "\
[DEFAULT]
FONT_NAME = GLG Mono
NEW_FONT_NAME = GLG-Mono
FONTFORGE_PREFIX = fontforge_
FONTTOOLS_PREFIX = fonttools_
BUILD_FONTS_DIR = build
HALF_WIDTH_12 = 528
FULL_WIDTH_35 = 600
WIDTH_35_STR = 35
CONSOLE_STR = Console
";

    pub(crate) fn sample() -> BuildSettings {
        BuildSettings::from_ini_str(SAMPLE).expect("sample settings")
    }

    #[test]
    fn test_settings_when_default_section_then_parsed() {
        let settings = sample();
        assert_eq!(settings.font_name, "GLG Mono");
        assert_eq!(settings.new_font_name(), "GLG-Mono");
        assert_eq!(settings.build_fonts_dir, PathBuf::from("build"));
        assert_eq!((settings.half_width_12, settings.full_width_35), (528, 600));
    }

    #[test]
    fn test_settings_when_build_ini_with_comments_then_parsed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        fs::write(
            &path,
            "\
; settings shared by the fontforge and fonttools steps
[DEFAULT]
# names
font_name = GLG Mono
FONTFORGE_PREFIX = fontforge_
FONTTOOLS_PREFIX = fonttools_
BUILD_FONTS_DIR = build

; widths
HALF_WIDTH_12 = 528
FULL_WIDTH_35 = 600
WIDTH_35_STR = 35
CONSOLE_STR = Console

[nerd]
PATCHER = font-patcher
",
        )
        .expect("write build.ini");

        let settings = BuildSettings::load(&path).expect("settings");
        assert_eq!(settings.font_name, "GLG Mono");
        assert_eq!(settings.new_font_name, None);
        assert_eq!(settings.new_font_name(), "GLG Mono");
        assert_eq!(settings.fonttools_prefix, "fonttools_");
        assert_eq!(settings.width_35_str, "35");
        assert_eq!(settings.half_width_12, 528);
    }

    #[test]
    fn test_settings_when_general_keys_then_override_default() {
        let text = "\
HALF_WIDTH_12 = 500

[DEFAULT]
FONT_NAME = GLG
FONTFORGE_PREFIX = fontforge_
FONTTOOLS_PREFIX = fonttools_
BUILD_FONTS_DIR = build
HALF_WIDTH_12 = 528
FULL_WIDTH_35 = 600
WIDTH_35_STR = 35
CONSOLE_STR = Console
";
        let settings = BuildSettings::from_ini_str(text).expect("settings");
        assert_eq!(settings.font_name, "GLG");
        assert_eq!(settings.new_font_name(), "GLG");
        assert_eq!(settings.half_width_12, 500);
    }

    #[test]
    fn test_settings_when_key_missing_then_parse_error() {
        let text = SAMPLE.replace("CONSOLE_STR = Console\n", "");
        let err = BuildSettings::from_ini_str(&text).expect_err("missing key");
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("CONSOLE_STR"));
    }

    #[test]
    fn test_settings_when_width_not_a_number_then_parse_error() {
        let text = SAMPLE.replace("HALF_WIDTH_12 = 528", "HALF_WIDTH_12 = wide");
        let err = BuildSettings::from_ini_str(&text).expect_err("bad number");
        assert!(err.to_string().contains("HALF_WIDTH_12 = wide"));
    }

    #[test]
    fn test_settings_when_font_name_blank_then_invalid() {
        let text = SAMPLE.replace("FONT_NAME = GLG Mono", "FONT_NAME =");
        assert!(matches!(
            BuildSettings::from_ini_str(&text),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_locate_when_explicit_then_wins() {
        let path = BuildSettings::locate(Some(Path::new("custom.ini")));
        assert_eq!(path, PathBuf::from("custom.ini"));
    }

    #[test]
    fn test_load_when_file_missing_then_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = BuildSettings::load(&dir.path().join(DEFAULT_SETTINGS_FILE)).expect_err("missing");
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
