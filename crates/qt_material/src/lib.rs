//! Material Design colour themes.
//!
//! Themes are small XML resource files (the qt-material format) shipped in the
//! crate's `themes/` directory:
//!
//! ```xml
//! <resources>
//!   <color name="primaryColor">#1de9b6</color>
//!   ...
//! </resources>
//! ```
//!
//! Packaged applications load them from disk at run time through
//! [`load_theme`]; the same files are compiled in as a fallback for
//! development runs (see [`builtin`]).

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// Name under which the theme files are bundled.
pub const LIBRARY_NAME: &str = "qt_material";

/// Directory, relative to the crate root, holding the theme files.
pub const THEME_DIR: &str = "themes";

/// Suffix of a theme definition file.
pub const THEME_SUFFIX: &str = ".xml";

/// Theme applied when nothing else is configured.
pub const DEFAULT_THEME: &str = "dark_teal.xml";

/// Colour keys every theme must define.
pub const REQUIRED_COLORS: [&str; 7] = [
    "primaryColor",
    "primaryLightColor",
    "secondaryColor",
    "secondaryLightColor",
    "secondaryDarkColor",
    "primaryTextColor",
    "secondaryTextColor",
];

static COLOR_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<color\s+name="([^"]+)"\s*>\s*([^<]*?)\s*</color>"#)
        .expect("color entry pattern is valid")
});

const BUILTIN: &[(&str, &str)] = &[
    ("dark_amber.xml", include_str!("../themes/dark_amber.xml")),
    ("dark_blue.xml", include_str!("../themes/dark_blue.xml")),
    ("dark_cyan.xml", include_str!("../themes/dark_cyan.xml")),
    ("dark_pink.xml", include_str!("../themes/dark_pink.xml")),
    ("dark_purple.xml", include_str!("../themes/dark_purple.xml")),
    ("dark_red.xml", include_str!("../themes/dark_red.xml")),
    ("dark_teal.xml", include_str!("../themes/dark_teal.xml")),
    ("light_amber.xml", include_str!("../themes/light_amber.xml")),
    ("light_blue.xml", include_str!("../themes/light_blue.xml")),
    ("light_teal.xml", include_str!("../themes/light_teal.xml")),
];

/// Errors raised while reading or parsing a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("theme {theme} does not define `{key}`")]
    MissingColor { theme: String, key: &'static str },

    #[error("theme {theme} has an invalid colour for `{key}`: {value:?}")]
    InvalidColor {
        theme: String,
        key: String,
        value: String,
    },

    #[error("unknown theme: {0}")]
    NotFound(String),
}

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Relative luminance in `0.0..=1.0` (Rec. 709 weights, no gamma).
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A parsed theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: String,
    colors: BTreeMap<String, Rgb>,
}

impl Theme {
    /// Parses theme XML. `name` is the file name, e.g. `dark_teal.xml`.
    pub fn parse(name: &str, xml: &str) -> Result<Self, ThemeError> {
        let mut colors = BTreeMap::new();
        for capture in COLOR_ENTRY.captures_iter(xml) {
            let key = capture[1].to_string();
            let value = &capture[2];
            let rgb = Rgb::from_hex(value).ok_or_else(|| ThemeError::InvalidColor {
                theme: name.to_string(),
                key: key.clone(),
                value: value.to_string(),
            })?;
            colors.insert(key, rgb);
        }

        for key in REQUIRED_COLORS {
            if !colors.contains_key(key) {
                return Err(ThemeError::MissingColor {
                    theme: name.to_string(),
                    key,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            colors,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up any colour defined by the theme.
    pub fn color(&self, key: &str) -> Option<Rgb> {
        self.colors.get(key).copied()
    }

    fn required(&self, key: &str) -> Rgb {
        // presence checked in `parse`
        self.colors[key]
    }

    pub fn primary(&self) -> Rgb {
        self.required("primaryColor")
    }

    pub fn primary_light(&self) -> Rgb {
        self.required("primaryLightColor")
    }

    pub fn secondary(&self) -> Rgb {
        self.required("secondaryColor")
    }

    pub fn secondary_light(&self) -> Rgb {
        self.required("secondaryLightColor")
    }

    pub fn secondary_dark(&self) -> Rgb {
        self.required("secondaryDarkColor")
    }

    pub fn primary_text(&self) -> Rgb {
        self.required("primaryTextColor")
    }

    pub fn secondary_text(&self) -> Rgb {
        self.required("secondaryTextColor")
    }

    /// Whether the theme uses a dark surface.
    pub fn is_dark(&self) -> bool {
        self.secondary().luminance() < 0.5
    }
}

/// Lists theme files in `dir`, sorted by name.
pub fn list_themes(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(THEME_SUFFIX) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Loads and parses `dir/name`.
pub fn load_theme(dir: &Path, name: &str) -> Result<Theme, ThemeError> {
    let path = dir.join(name);
    let xml = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ThemeError::NotFound(name.to_string())
        } else {
            ThemeError::Io {
                name: name.to_string(),
                source,
            }
        }
    })?;
    Theme::parse(name, &xml)
}

/// Names of the compiled-in themes.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

/// Returns a compiled-in theme by file name.
pub fn builtin(name: &str) -> Result<Theme, ThemeError> {
    let (_, xml) = BUILTIN
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
    Theme::parse(name, xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_builtin() {
        let theme = builtin(DEFAULT_THEME).unwrap();
        assert_eq!(theme.primary(), Rgb::new(0x1d, 0xe9, 0xb6));
        assert!(theme.is_dark());
    }

    #[test]
    fn every_builtin_theme_parses() {
        for name in builtin_names() {
            let theme = builtin(name).unwrap();
            assert_eq!(theme.name(), name);
        }
        assert!(!builtin("light_teal.xml").unwrap().is_dark());
    }

    #[test]
    fn missing_color_is_reported() {
        let xml = r#"<resources><color name="primaryColor">#ffffff</color></resources>"#;
        let err = Theme::parse("broken.xml", xml).unwrap_err();
        assert!(matches!(
            err,
            ThemeError::MissingColor {
                key: "primaryLightColor",
                ..
            }
        ));
    }

    #[test]
    fn invalid_color_is_reported() {
        let xml = r#"<resources><color name="primaryColor">teal</color></resources>"#;
        let err = Theme::parse("broken.xml", xml).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidColor { .. }));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#009688"), Some(Rgb::new(0, 0x96, 0x88)));
        assert_eq!(Rgb::from_hex("009688"), None);
        assert_eq!(Rgb::from_hex("#0096"), None);
        assert_eq!(Rgb::new(0, 0x96, 0x88).to_string(), "#009688");
    }

    #[test]
    fn list_themes_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xml"), "").unwrap();
        std::fs::write(dir.path().join("a.xml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.xml")).unwrap();

        assert_eq!(list_themes(dir.path()).unwrap(), vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn load_theme_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let xml = builtin_xml("dark_blue.xml");
        std::fs::write(dir.path().join("dark_blue.xml"), xml).unwrap();

        let theme = load_theme(dir.path(), "dark_blue.xml").unwrap();
        assert_eq!(theme.primary().to_string(), "#448aff");
        assert!(matches!(
            load_theme(dir.path(), "nope.xml"),
            Err(ThemeError::NotFound(_))
        ));
    }

    fn builtin_xml(name: &str) -> &'static str {
        BUILTIN.iter().find(|(n, _)| *n == name).unwrap().1
    }
}
