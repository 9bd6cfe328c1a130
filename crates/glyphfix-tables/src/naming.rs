//! Variant and style names of build outputs

use crate::config::BuildSettings;

/// Styles that fit the legacy family model (nameIDs 1/2 alone)
pub const RIBBI: [&str; 4] = ["Regular", "Italic", "Bold", "BoldItalic"];

const MERGED_SUFFIX: &str = "_merged";

/// `variant` is the part between the font name and the dash (`35Console`,
/// `Console`, or empty), `style` the part after it (`BoldItalic`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontVariant {
    pub variant: String,
    pub style: String,
}

/// Name table strings for one output font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontNames {
    pub family: String,
    pub subfamily: String,
    pub full_name: String,
    pub postscript_name: String,
    /// nameIDs 16/17, only for non-RIBBI styles
    pub typographic: Option<(String, String)>,
}

impl FontVariant {
    pub fn new(variant: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            style: style.into(),
        }
    }

    /// Parses `<FONTTOOLS_PREFIX><FONT_NAME><variant>-<style>_merged.ttf`
    pub fn from_merged_file_name(file_name: &str, settings: &BuildSettings) -> Option<Self> {
        let stem = file_name.strip_suffix(".ttf")?;
        let rest = stem
            .strip_prefix(settings.fonttools_prefix.as_str())?
            .strip_prefix(settings.font_name.as_str())?
            .strip_suffix(MERGED_SUFFIX)?;
        let (variant, style) = rest.split_once('-')?;
        if style.is_empty() || style.contains('-') {
            return None;
        }
        Some(Self::new(variant, style))
    }

    pub fn merged_file_name(&self, settings: &BuildSettings) -> String {
        format!(
            "{}{}{}-{}{MERGED_SUFFIX}.ttf",
            settings.fonttools_prefix, settings.font_name, self.variant, self.style
        )
    }

    /// `<NEW_FONT_NAME without spaces><variant without CONSOLE_STR>-<style>.ttf`
    pub fn output_file_name(&self, settings: &BuildSettings) -> String {
        let variant = if settings.console_str.is_empty() {
            self.variant.clone()
        } else {
            self.variant.replace(settings.console_str.as_str(), "")
        };
        format!(
            "{}{}-{}.ttf",
            settings.new_font_name().replace(' ', ""),
            variant,
            self.style
        )
    }

    pub fn is_ribbi(&self) -> bool {
        RIBBI.contains(&self.style.as_str())
    }

    pub fn is_35(&self, settings: &BuildSettings) -> bool {
        self.variant.contains(settings.width_35_str.as_str())
    }

    /// `BoldItalic` becomes `Bold Italic`; non-RIBBI styles get a space
    /// before `Italic`
    pub fn weight_name(&self) -> String {
        match self.style.as_str() {
            "BoldItalic" => "Bold Italic".to_string(),
            style if self.is_ribbi() => style.to_string(),
            style => style.replace("Italic", " Italic"),
        }
    }

    pub fn family_name(&self, settings: &BuildSettings) -> String {
        let mut family = settings.new_font_name().to_string();
        if self.is_35(settings) {
            family.push(' ');
            family.push_str(&settings.width_35_str);
        }
        family
    }

    pub fn names(&self, settings: &BuildSettings) -> FontNames {
        let family = self.family_name(settings);
        let weight = self.weight_name();
        FontNames {
            full_name: format!("{family} {weight}"),
            postscript_name: format!("{family}-{weight}").replace(' ', ""),
            typographic: (!self.is_ribbi()).then(|| (family.clone(), weight.clone())),
            family,
            subfamily: weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample;

    #[test]
    fn test_merged_file_name_when_parsed_then_variant_and_style_split() {
        let settings = sample();
        assert_eq!(
            FontVariant::from_merged_file_name("fonttools_GLG Mono35Console-BoldItalic_merged.ttf", &settings),
            Some(FontVariant::new("35Console", "BoldItalic"))
        );
        assert_eq!(
            FontVariant::from_merged_file_name("fonttools_GLG Mono-Regular_merged.ttf", &settings),
            Some(FontVariant::new("", "Regular"))
        );
        assert_eq!(
            FontVariant::from_merged_file_name("fonttools_GLG Mono-Regular.ttf", &settings),
            None
        );
        assert_eq!(
            FontVariant::from_merged_file_name("fontforge_GLG Mono-Regular_merged.ttf", &settings),
            None
        );
        let variant = FontVariant::new("Console", "Light");
        assert_eq!(
            FontVariant::from_merged_file_name(&variant.merged_file_name(&settings), &settings),
            Some(variant)
        );
    }

    #[test]
    fn test_output_file_name_drops_console_and_spaces() {
        let settings = sample();
        assert_eq!(
            FontVariant::new("35Console", "Bold").output_file_name(&settings),
            "GLG-Mono35-Bold.ttf"
        );
        assert_eq!(
            FontVariant::new("Console", "Regular").output_file_name(&settings),
            "GLG-Mono-Regular.ttf"
        );
    }

    #[test]
    fn test_names_when_ribbi_then_no_typographic_names() {
        let settings = sample();
        let names = FontVariant::new("35Console", "BoldItalic").names(&settings);
        assert_eq!(names, FontNames {
            family: "GLG-Mono 35".into(),
            subfamily: "Bold Italic".into(),
            full_name: "GLG-Mono 35 Bold Italic".into(),
            postscript_name: "GLG-Mono35-BoldItalic".into(),
            typographic: None,
        });
    }

    #[test]
    fn test_names_when_extended_style_then_typographic_names_set() {
        let settings = sample();
        let names = FontVariant::new("Console", "LightItalic").names(&settings);
        assert_eq!(names.family, "GLG-Mono");
        assert_eq!(names.subfamily, "Light Italic");
        assert_eq!(names.postscript_name, "GLG-Mono-LightItalic");
        assert_eq!(
            names.typographic,
            Some(("GLG-Mono".to_string(), "Light Italic".to_string()))
        );
    }
}
