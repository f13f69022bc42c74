//! Turns code into styled lines of fragments.
//!
//! Tokenizing is delegated to `glint_syntax`; this module only decides what
//! each token looks like. How a token becomes a fragment is an injected
//! [`TokenRenderer`]: [`DefaultSpan`] produces a plain styled [`Span`], and
//! any `Fn(TokenProps) -> F` closure can take over completely.
//!
//! ```rust,ignore
//! let lines = render("const x = 1;", &theme, None, &|props: TokenProps| {
//!     format!("<{}>{}", props.class_name, props.content)
//! });
//! ```

use std::ops::Range;
use std::sync::Arc;

use glint_syntax::TokenType;

use crate::theme::{Theme, ThemeDict, TokenStyle};

/// Grammar used when the host does not name one.
pub const DEFAULT_LANGUAGE: &str = "jsx";

/// Everything needed to draw one token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenProps {
    /// Position among the line's non-empty tokens
    pub key: usize,
    pub types: Vec<TokenType>,
    /// `"token"` followed by the type names, e.g. `"token string"`
    pub class_name: String,
    pub content: String,
    pub style: TokenStyle,
}

/// Attributes of a rendered line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineProps {
    pub key: usize,
    pub class_name: &'static str,
    /// The theme's block style
    pub style: TokenStyle,
}

/// The default fragment: text with a style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub class_name: String,
    pub style: TokenStyle,
}

impl From<TokenProps> for Span {
    fn from(props: TokenProps) -> Self {
        Self {
            text: props.content,
            class_name: props.class_name,
            style: props.style,
        }
    }
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<F> {
    pub props: LineProps,
    pub fragments: Vec<F>,
    /// Byte range of each fragment's token within the source line
    pub source_ranges: Vec<Range<usize>>,
}

impl<F> Line<F> {
    /// Appended after every line so breaks survive whitespace-sensitive
    /// layout.
    pub const TERMINATOR: &'static str = "\n";
}

impl Line<Span> {
    /// The line's text followed by [`Line::TERMINATOR`].
    pub fn to_text(&self) -> String {
        let mut text: String = self.fragments.iter().map(|s| s.text.as_str()).collect();
        text.push_str(Self::TERMINATOR);
        text
    }
}

/// Strategy that turns token props into a fragment.
pub trait TokenRenderer {
    type Fragment;

    fn render_token(&self, props: TokenProps) -> Self::Fragment;
}

/// Renders every token as a [`Span`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpan;

impl TokenRenderer for DefaultSpan {
    type Fragment = Span;

    fn render_token(&self, props: TokenProps) -> Span {
        Span::from(props)
    }
}

impl<F, R> TokenRenderer for F
where
    F: Fn(TokenProps) -> R,
{
    type Fragment = R;

    fn render_token(&self, props: TokenProps) -> R {
        self(props)
    }
}

/// Host override for how tokens render in the editor.
pub type TransformToken = Arc<dyn Fn(TokenProps) -> Span + Send + Sync>;

/// Tokenizes `code` and renders each non-empty token with `renderer`.
///
/// Returns one [`Line`] per `\n`-separated segment of `code`.
pub fn render<R: TokenRenderer>(
    code: &str,
    theme: &Theme,
    language: Option<&str>,
    renderer: &R,
) -> Vec<Line<R::Fragment>> {
    let language = language
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    let dict = theme.dict(language);

    glint_syntax::tokenize(code, language)
        .into_iter()
        .enumerate()
        .map(|(line_key, tokens)| {
            let mut fragments = Vec::with_capacity(tokens.len());
            let mut source_ranges = Vec::with_capacity(tokens.len());
            let mut offset = 0;

            for (key, token) in tokens.into_iter().filter(|token| !token.empty).enumerate() {
                let end = offset + token.content.len();
                source_ranges.push(offset..end);
                offset = end;
                fragments.push(renderer.render_token(token_props(
                    &dict,
                    key,
                    token.types,
                    token.content,
                )));
            }

            Line {
                props: LineProps {
                    key: line_key,
                    class_name: "token-line",
                    style: dict.root.clone(),
                },
                fragments,
                source_ranges,
            }
        })
        .collect()
}

/// Renders with the host's transform when there is one, else [`DefaultSpan`].
pub fn render_with_transform(
    code: &str,
    theme: &Theme,
    language: Option<&str>,
    transform: Option<&TransformToken>,
) -> Vec<Line<Span>> {
    match transform {
        Some(transform) => render(code, theme, language, &|props: TokenProps| transform(props)),
        None => render(code, theme, language, &DefaultSpan),
    }
}

fn token_props(dict: &ThemeDict, key: usize, types: Vec<TokenType>, content: String) -> TokenProps {
    let mut class_name = String::from("token");
    for ty in &types {
        class_name.push(' ');
        class_name.push_str(ty.as_str());
    }

    TokenProps {
        key,
        style: dict.style_for(&types),
        types,
        class_name,
        content,
    }
}
