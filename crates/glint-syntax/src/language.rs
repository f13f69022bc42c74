//! Grammar and highlight query lookup.

use tree_sitter::Language;

const JAVASCRIPT_HIGHLIGHTS: &str = include_str!("../queries/javascript.scm");
const JSON_HIGHLIGHTS: &str = include_str!("../queries/json.scm");
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;

/// Languages the tokenizer has grammars for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// JavaScript including JSX
    JavaScript,
    Rust,
    Python,
    Json,
}

impl LanguageId {
    /// Resolves a language identifier such as `"jsx"` or `"rs"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jsx" | "javascript" | "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "rust" | "rs" => Some(Self::Rust),
            "python" | "py" => Some(Self::Python),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detects the language from a file name's extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?;
        Self::from_name(ext)
    }

    /// Canonical name, as accepted by [`LanguageId::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::JavaScript => "jsx",
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Json => "json",
        }
    }

    pub(crate) fn grammar(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Json => tree_sitter_json::LANGUAGE.into(),
        }
    }

    pub(crate) fn highlights_query(self) -> &'static str {
        match self {
            Self::JavaScript => JAVASCRIPT_HIGHLIGHTS,
            Self::Rust => RUST_HIGHLIGHTS,
            Self::Python => PYTHON_HIGHLIGHTS,
            Self::Json => JSON_HIGHLIGHTS,
        }
    }

    /// All supported languages.
    pub fn all() -> &'static [LanguageId] {
        &[Self::JavaScript, Self::Rust, Self::Python, Self::Json]
    }
}
