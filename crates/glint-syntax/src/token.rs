//! Token classification.

/// Syntactic category of a token.
///
/// Names follow the class names themes are written against (`keyword`,
/// `class-name`, `attr-name`, ...), so a theme rule can target a type by
/// its [`TokenType::as_str`] name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Plain,
    Comment,
    Keyword,
    String,
    Regex,
    Number,
    Boolean,
    Constant,
    Builtin,
    Function,
    ClassName,
    Property,
    Variable,
    Operator,
    Punctuation,
    Tag,
    AttrName,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Plain => "plain",
            TokenType::Comment => "comment",
            TokenType::Keyword => "keyword",
            TokenType::String => "string",
            TokenType::Regex => "regex",
            TokenType::Number => "number",
            TokenType::Boolean => "boolean",
            TokenType::Constant => "constant",
            TokenType::Builtin => "builtin",
            TokenType::Function => "function",
            TokenType::ClassName => "class-name",
            TokenType::Property => "property",
            TokenType::Variable => "variable",
            TokenType::Operator => "operator",
            TokenType::Punctuation => "punctuation",
            TokenType::Tag => "tag",
            TokenType::AttrName => "attr-name",
        }
    }

    /// Maps a tree-sitter capture name (`function.method`, `tag.attribute`,
    /// ...) to a token type. Unknown captures return `None` and are left
    /// unhighlighted.
    pub fn from_capture(name: &str) -> Option<Self> {
        let ty = match name {
            "tag.attribute" | "attribute" => TokenType::AttrName,
            "string.regex" | "string.special.regex" => TokenType::Regex,
            "variable.builtin" | "function.builtin" | "type.builtin" => TokenType::Builtin,
            "constructor" => TokenType::ClassName,
            "escape" => TokenType::String,
            "float" => TokenType::Number,
            "label" => TokenType::Constant,
            _ => match name.split('.').next().unwrap_or(name) {
                "comment" => TokenType::Comment,
                "keyword" => TokenType::Keyword,
                "string" => TokenType::String,
                "number" => TokenType::Number,
                "boolean" => TokenType::Boolean,
                "constant" => TokenType::Constant,
                "function" | "method" => TokenType::Function,
                "type" => TokenType::ClassName,
                "property" | "field" => TokenType::Property,
                "variable" => TokenType::Variable,
                "operator" => TokenType::Operator,
                "punctuation" => TokenType::Punctuation,
                "tag" => TokenType::Tag,
                _ => return None,
            },
        };
        Some(ty)
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified fragment of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Outermost category first, e.g. `[String, Punctuation]`
    pub types: Vec<TokenType>,
    pub content: String,
    /// Placeholder emitted for a line with no text
    pub empty: bool,
}

impl Token {
    pub fn new(types: Vec<TokenType>, content: impl Into<String>) -> Self {
        Self {
            types,
            content: content.into(),
            empty: false,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(vec![TokenType::Plain], content)
    }

    /// The structural token standing in for an empty line.
    pub fn empty() -> Self {
        Self {
            types: vec![TokenType::Plain],
            content: String::new(),
            empty: true,
        }
    }

    /// Whether any of this token's types is `ty`.
    pub fn is(&self, ty: TokenType) -> bool {
        self.types.contains(&ty)
    }
}
