//! Token themes.
//!
//! A theme is a `plain` style for the whole block plus an ordered list of
//! rules, each styling one or more token types:
//!
//! ```json
//! {
//!   "plain": { "color": "#393a34", "backgroundColor": "#f6f8fa" },
//!   "styles": [
//!     { "types": ["comment"], "style": { "color": "#999988", "fontStyle": "italic" } },
//!     { "types": ["tag"], "languages": ["jsx"], "style": { "color": "#00009f" } }
//!   ]
//! }
//! ```
//!
//! Missing top-level fields fall back to [`Theme::light`]. Nested objects
//! are taken as written and never merged with the defaults.

use std::collections::HashMap;
use std::path::Path;

use glint_syntax::TokenType;
use serde::{Deserialize, Serialize};

/// RGBA color, serialized as a `#rrggbb` or `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError(hex.to_string()))?;
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorError(hex.to_string()));

        let (r, g, b, a) = match digits.len() {
            3 if digits.is_ascii() => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                (expand(0)?, expand(1)?, expand(2)?, 255)
            }
            6 | 8 if digits.is_ascii() => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    255
                },
            ),
            _ => return Err(ColorError(hex.to_string())),
        };

        Ok(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b));
        if self.a >= 1.0 {
            rgb
        } else {
            format!("{}{:02x}", rgb, byte(self.a))
        }
    }

    /// Scales alpha by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Converts to iced Color.
    pub fn to_iced(&self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(value.trim())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A string that is not a hex color.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid color '{0}', expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    None,
    Underline,
    LineThrough,
}

/// How whitespace and line wrapping are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    Normal,
    Pre,
    PreWrap,
    BreakSpaces,
}

/// Visual attributes of a token. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_space: Option<WhiteSpace>,
}

impl TokenStyle {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn italic(mut self) -> Self {
        self.font_style = Some(FontStyle::Italic);
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some(FontWeight::Bold);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Returns `self` with every field set in `over` replaced.
    pub fn merge(&self, over: &TokenStyle) -> TokenStyle {
        TokenStyle {
            color: over.color.or(self.color),
            background_color: over.background_color.or(self.background_color),
            font_style: over.font_style.or(self.font_style),
            font_weight: over.font_weight.or(self.font_weight),
            text_decoration: over.text_decoration.or(self.text_decoration),
            opacity: over.opacity.or(self.opacity),
            white_space: over.white_space.or(self.white_space),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TokenStyle::default()
    }

    /// Foreground color after opacity, if any color is set.
    pub fn effective_color(&self) -> Option<Color> {
        self.color
            .map(|c| c.with_opacity(self.opacity.unwrap_or(1.0)))
    }
}

/// Styles a set of token types, optionally only for some languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRule {
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub style: TokenStyle,
}

impl ThemeRule {
    pub fn new(types: &[&str], style: TokenStyle) -> Self {
        Self {
            types: types.iter().map(|t| t.to_string()).collect(),
            languages: None,
            style,
        }
    }

    pub fn for_languages(mut self, languages: &[&str]) -> Self {
        self.languages = Some(languages.iter().map(|l| l.to_string()).collect());
        self
    }

    fn applies_to(&self, language: &str) -> bool {
        self.languages
            .as_ref()
            .is_none_or(|langs| langs.iter().any(|l| l == language))
    }
}

/// Editor theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Theme name
    pub name: String,

    /// Style of the block as a whole and of unclassified text
    pub plain: TokenStyle,

    /// Rules in order; later rules override earlier ones
    pub styles: Vec<ThemeRule>,
}

impl Theme {
    /// Creates the default light theme.
    pub fn light() -> Self {
        let hex = Color::from_rgb8;
        Self {
            name: "Glint Light".to_string(),
            plain: TokenStyle {
                color: Some(hex(0x39, 0x3a, 0x34)),
                background_color: Some(hex(0xf6, 0xf8, 0xfa)),
                ..TokenStyle::default()
            },
            styles: vec![
                ThemeRule::new(
                    &["comment", "prolog", "doctype", "cdata"],
                    TokenStyle::color(hex(0x99, 0x99, 0x88)).italic(),
                ),
                ThemeRule::new(&["namespace"], TokenStyle::default().with_opacity(0.7)),
                ThemeRule::new(&["string", "attr-value"], TokenStyle::color(hex(0xe3, 0x11, 0x6c))),
                ThemeRule::new(&["punctuation", "operator"], TokenStyle::color(hex(0x39, 0x3a, 0x34))),
                ThemeRule::new(
                    &[
                        "entity", "url", "symbol", "number", "boolean", "variable", "constant",
                        "property", "regex", "inserted",
                    ],
                    TokenStyle::color(hex(0x36, 0xac, 0xaa)),
                ),
                ThemeRule::new(
                    &["atrule", "keyword", "attr-name", "selector"],
                    TokenStyle::color(hex(0x00, 0xa4, 0xdb)),
                ),
                ThemeRule::new(&["function", "deleted", "tag"], TokenStyle::color(hex(0xd7, 0x3a, 0x49))),
                ThemeRule::new(
                    &["function-variable", "class-name", "builtin"],
                    TokenStyle::color(hex(0x6f, 0x42, 0xc1)),
                ),
                ThemeRule::new(&["tag", "selector", "keyword"], TokenStyle::color(hex(0x00, 0x00, 0x9f))),
            ],
        }
    }

    /// Creates a dark theme.
    pub fn dark() -> Self {
        let hex = Color::from_rgb8;
        Self {
            name: "Glint Dark".to_string(),
            plain: TokenStyle {
                color: Some(hex(0x9c, 0xdc, 0xfe)),
                background_color: Some(hex(0x1e, 0x1e, 0x1e)),
                ..TokenStyle::default()
            },
            styles: vec![
                ThemeRule::new(&["prolog"], TokenStyle::color(hex(0x00, 0x00, 0x80))),
                ThemeRule::new(&["comment"], TokenStyle::color(hex(0x6a, 0x99, 0x55)).italic()),
                ThemeRule::new(&["builtin", "changed", "keyword"], TokenStyle::color(hex(0x56, 0x9c, 0xd6))),
                ThemeRule::new(&["number", "inserted"], TokenStyle::color(hex(0xb5, 0xce, 0xa8))),
                ThemeRule::new(&["constant", "boolean"], TokenStyle::color(hex(0x56, 0x9c, 0xd6))),
                ThemeRule::new(&["attr-name", "variable"], TokenStyle::color(hex(0x9c, 0xdc, 0xfe))),
                ThemeRule::new(
                    &["deleted", "string", "attr-value", "regex"],
                    TokenStyle::color(hex(0xce, 0x91, 0x78)),
                ),
                ThemeRule::new(&["selector"], TokenStyle::color(hex(0xd7, 0xba, 0x7d))),
                ThemeRule::new(&["tag"], TokenStyle::color(hex(0x4e, 0xc9, 0xb0))),
                ThemeRule::new(&["tag"], TokenStyle::color(hex(0x56, 0x9c, 0xd6)))
                    .for_languages(&["markup"]),
                ThemeRule::new(&["punctuation", "operator"], TokenStyle::color(hex(0xd4, 0xd4, 0xd4))),
                ThemeRule::new(&["punctuation"], TokenStyle::color(hex(0x80, 0x80, 0x80)))
                    .for_languages(&["markup"]),
                ThemeRule::new(&["function"], TokenStyle::color(hex(0xdc, 0xdc, 0xaa))),
                ThemeRule::new(&["class-name", "property"], TokenStyle::color(hex(0x4e, 0xc9, 0xb0))),
            ],
        }
    }

    /// Resolves a built-in theme by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Parses a theme from JSON.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a theme from a file.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Saves the theme to a file.
    pub fn save(&self, path: &Path) -> Result<(), ThemeError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Flattens the rules that apply to `language` into a lookup table.
    pub fn dict(&self, language: &str) -> ThemeDict {
        let mut types: HashMap<String, TokenStyle> = HashMap::new();
        for rule in self.styles.iter().filter(|r| r.applies_to(language)) {
            for ty in &rule.types {
                let entry = types.entry(ty.clone()).or_default();
                *entry = entry.merge(&rule.style);
            }
        }

        let plain = TokenStyle {
            background_color: None,
            ..self.plain.clone()
        };
        types.insert(TokenType::Plain.as_str().to_string(), plain);

        ThemeDict {
            root: self.plain.clone(),
            types,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// The theme the editor actually renders with.
///
/// The host theme replaces the light theme wholesale. Line wrapping defaults
/// to `break-spaces` unless the host's `plain` style chooses otherwise.
pub fn effective_theme(host: Option<&Theme>) -> Theme {
    let mut theme = host.cloned().unwrap_or_else(Theme::light);
    if theme.plain.white_space.is_none() {
        theme.plain.white_space = Some(WhiteSpace::BreakSpaces);
    }
    theme
}

/// Per-language lookup of token styles.
#[derive(Debug, Clone)]
pub struct ThemeDict {
    /// Style of the whole block
    pub root: TokenStyle,
    types: HashMap<String, TokenStyle>,
}

impl ThemeDict {
    pub fn get(&self, ty: &str) -> Option<&TokenStyle> {
        self.types.get(ty)
    }

    /// Style for a token with the given types, outermost first.
    ///
    /// A lone `plain` token gets no style of its own and inherits the
    /// block's. Otherwise the styles of all types are layered in order.
    pub fn style_for(&self, types: &[TokenType]) -> TokenStyle {
        match types {
            [] | [TokenType::Plain] => TokenStyle::default(),
            [single] => self.get(single.as_str()).cloned().unwrap_or_default(),
            many => many.iter().fold(TokenStyle::default(), |acc, ty| {
                match self.get(ty.as_str()) {
                    Some(style) => acc.merge(style),
                    None => acc,
                }
            }),
        }
    }
}

/// Theme loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid theme: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        let blue = Color::from_hex("#276EF1").unwrap();
        assert_eq!(blue, Color::from_rgb8(0x27, 0x6e, 0xf1));
        assert_eq!(blue.to_hex(), "#276ef1");

        assert_eq!(Color::from_hex("#ccc").unwrap(), Color::from_rgb8(0xcc, 0xcc, 0xcc));

        let translucent = Color::from_hex("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(translucent.to_hex(), "#00000080");

        assert!(Color::from_hex("276EF1").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_merge_prefers_override() {
        let base = TokenStyle::color(Color::rgb(1.0, 0.0, 0.0)).italic();
        let over = TokenStyle::color(Color::rgb(0.0, 0.0, 1.0));
        let merged = base.merge(&over);
        assert_eq!(merged.color, Some(Color::rgb(0.0, 0.0, 1.0)));
        assert_eq!(merged.font_style, Some(FontStyle::Italic));
    }

    #[test]
    fn test_later_rules_win() {
        let dict = Theme::light().dict("jsx");
        assert_eq!(
            dict.style_for(&[TokenType::Keyword]).color,
            Some(Color::from_rgb8(0x00, 0x00, 0x9f))
        );
    }

    #[test]
    fn test_plain_token_has_no_style() {
        let dict = Theme::light().dict("jsx");
        assert!(dict.style_for(&[TokenType::Plain]).is_empty());
        assert_eq!(dict.get("plain").unwrap().background_color, None);
        assert!(dict.root.background_color.is_some());
    }

    #[test]
    fn test_nested_types_layer_in_order() {
        let theme = Theme {
            name: "test".to_string(),
            plain: TokenStyle::default(),
            styles: vec![
                ThemeRule::new(&["string"], TokenStyle::color(Color::rgb(1.0, 0.0, 0.0)).italic()),
                ThemeRule::new(&["punctuation"], TokenStyle::color(Color::rgb(0.0, 1.0, 0.0))),
            ],
        };
        let style = theme
            .dict("jsx")
            .style_for(&[TokenType::String, TokenType::Punctuation]);
        assert_eq!(style.color, Some(Color::rgb(0.0, 1.0, 0.0)));
        assert_eq!(style.font_style, Some(FontStyle::Italic));
    }

    #[test]
    fn test_language_scoped_rules() {
        let dark = Theme::dark();
        let jsx_tag = dark.dict("jsx").style_for(&[TokenType::Tag]).color;
        let markup_tag = dark.dict("markup").style_for(&[TokenType::Tag]).color;
        assert_eq!(jsx_tag, Some(Color::from_rgb8(0x4e, 0xc9, 0xb0)));
        assert_eq!(markup_tag, Some(Color::from_rgb8(0x56, 0x9c, 0xd6)));
    }

    #[test]
    fn test_effective_theme_forces_break_spaces() {
        let theme = effective_theme(None);
        assert_eq!(theme.name, "Glint Light");
        assert_eq!(theme.plain.white_space, Some(WhiteSpace::BreakSpaces));

        let mut host = Theme::dark();
        host.plain.white_space = Some(WhiteSpace::Pre);
        assert_eq!(
            effective_theme(Some(&host)).plain.white_space,
            Some(WhiteSpace::Pre)
        );
    }

    #[test]
    fn test_partial_json_falls_back_shallowly() {
        let theme = Theme::from_json(r##"{ "plain": { "color": "#ffffff" } }"##).unwrap();
        // Missing top-level fields come from the light theme...
        assert_eq!(theme.styles, Theme::light().styles);
        // ...but a present `plain` replaces the default one entirely.
        assert_eq!(theme.plain.color, Some(Color::rgb(1.0, 1.0, 1.0)));
        assert_eq!(theme.plain.background_color, None);
    }

    #[test]
    fn test_json_rule_fields() {
        let theme = Theme::from_json(
            r##"{ "styles": [ { "types": ["tag"], "languages": ["jsx"],
                  "style": { "color": "#00009f", "fontWeight": "bold", "whiteSpace": "pre-wrap" } } ] }"##,
        )
        .unwrap();
        let rule = &theme.styles[0];
        assert_eq!(rule.languages.as_deref(), Some(&["jsx".to_string()][..]));
        assert_eq!(rule.style.font_weight, Some(FontWeight::Bold));
        assert_eq!(rule.style.white_space, Some(WhiteSpace::PreWrap));
    }

    #[test]
    fn test_invalid_color_is_parse_error() {
        let result = Theme::from_json(r#"{ "plain": { "color": "blue" } }"#);
        assert!(matches!(result, Err(ThemeError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");

        let theme = Theme::dark();
        theme.save(&path).unwrap();
        let loaded = Theme::load(&path).unwrap();
        assert_eq!(loaded.name, theme.name);
        assert_eq!(loaded.styles.len(), theme.styles.len());
        assert_eq!(loaded.plain, theme.plain);
    }
}
