//! Splits source text into per-line tokens.
//!
//! Highlight captures from the query are painted onto a per-byte owner map.
//! Captures are applied outermost first, so a nested capture (an operator
//! inside a template string) paints over its parent and remembers it. Each
//! run of bytes with one owner becomes a token whose types are the owner's
//! chain of enclosing captures.

use std::cmp::Reverse;
use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use crate::language::LanguageId;
use crate::token::{Token, TokenType};
use crate::SyntaxError;

/// Tokenizer for one language.
pub struct Tokenizer {
    language: LanguageId,
    parser: Parser,
    query: Query,
    /// Capture index -> token type, `None` for captures we don't style
    capture_types: Vec<Option<TokenType>>,
}

#[derive(Debug, Clone, Copy)]
struct Capture {
    start: usize,
    end: usize,
    ty: TokenType,
    pattern: usize,
}

impl Tokenizer {
    /// Creates a tokenizer for a language name such as `"jsx"`.
    pub fn new(lang: &str) -> Result<Self, SyntaxError> {
        let language = LanguageId::from_name(lang)
            .ok_or_else(|| SyntaxError::UnknownLanguage(lang.to_string()))?;
        Self::for_language(language)
    }

    pub fn for_language(language: LanguageId) -> Result<Self, SyntaxError> {
        let grammar = language.grammar();

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| SyntaxError::Language(e.to_string()))?;

        let query = Query::new(&grammar, language.highlights_query())
            .map_err(|e| SyntaxError::Query(format!("{}: {}", language.name(), e)))?;

        let capture_types = query
            .capture_names()
            .iter()
            .map(|name| TokenType::from_capture(name))
            .collect();

        Ok(Self {
            language,
            parser,
            query,
            capture_types,
        })
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Tokenizes `source` into lines.
    ///
    /// There is one entry per `\n`-separated segment, so a trailing newline
    /// yields a trailing line holding a single empty token.
    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Vec<Token>>, SyntaxError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(SyntaxError::Parse)?;

        let mut captures = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.captures(&self.query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = matches.next() {
            let capture = &query_match.captures[*capture_idx];
            let Some(ty) = self
                .capture_types
                .get(capture.index as usize)
                .copied()
                .flatten()
            else {
                continue;
            };

            let node = capture.node;
            if node.start_byte() < node.end_byte() {
                captures.push(Capture {
                    start: node.start_byte(),
                    end: node.end_byte(),
                    ty,
                    pattern: query_match.pattern_index,
                });
            }
        }

        Ok(split_lines(source, captures))
    }
}

/// Paints `captures` over `source` and cuts the result into line tokens.
fn split_lines(source: &str, mut captures: Vec<Capture>) -> Vec<Vec<Token>> {
    // Outer before inner; for the same node the earliest pattern wins.
    captures.sort_by_key(|c| (c.start, Reverse(c.end), c.pattern));
    captures.dedup_by(|later, kept| later.start == kept.start && later.end == kept.end);

    let mut owner: Vec<Option<usize>> = vec![None; source.len()];
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(captures.len());
    for (idx, capture) in captures.iter().enumerate() {
        let end = capture.end.min(source.len());
        let parent = owner
            .get(capture.start)
            .copied()
            .flatten()
            .filter(|&p| captures[p].end >= capture.end);
        parents.push(parent);
        for slot in &mut owner[capture.start..end] {
            *slot = Some(idx);
        }
    }

    let types_of = |owner: Option<usize>| -> Vec<TokenType> {
        let Some(mut idx) = owner else {
            return vec![TokenType::Plain];
        };
        let mut chain = vec![captures[idx].ty];
        while let Some(parent) = parents[idx] {
            chain.push(captures[parent].ty);
            idx = parent;
        }
        chain.reverse();
        chain.dedup();
        chain
    };

    let mut lines = Vec::new();
    let mut line_start = 0;
    for segment in source.split('\n') {
        let text = segment.strip_suffix('\r').unwrap_or(segment);
        let line_end = line_start + text.len();

        let mut tokens = Vec::new();
        let mut run_start = line_start;
        for pos in line_start..=line_end {
            let boundary = pos == line_end || owner[pos] != owner[run_start];
            if boundary && pos > run_start {
                tokens.push(Token::new(
                    types_of(owner[run_start]),
                    &source[run_start..pos],
                ));
                run_start = pos;
            }
        }
        if tokens.is_empty() {
            tokens.push(Token::empty());
        }
        lines.push(tokens);

        line_start += segment.len() + 1;
    }
    lines
}

/// Tokenizes without a grammar: one plain token per non-empty line.
pub fn plain_lines(source: &str) -> Vec<Vec<Token>> {
    split_lines(source, Vec::new())
}

/// Caches one tokenizer per language.
///
/// Compiling a highlight query is far more expensive than running it, and
/// the editor re-tokenizes on every render. A grammar that fails to load is
/// cached as `None` and reported once.
pub struct LanguageRegistry {
    tokenizers: HashMap<LanguageId, Option<Tokenizer>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            tokenizers: HashMap::new(),
        }
    }

    /// Gets or creates the tokenizer for a language.
    ///
    /// Returns `None` if the grammar or its query failed to load.
    pub fn get_mut(&mut self, language: LanguageId) -> Option<&mut Tokenizer> {
        self.tokenizers
            .entry(language)
            .or_insert_with(|| match Tokenizer::for_language(language) {
                Ok(tokenizer) => Some(tokenizer),
                Err(e) => {
                    tracing::warn!(
                        "Highlighting disabled for {}: {}",
                        language.name(),
                        e
                    );
                    None
                }
            })
            .as_mut()
    }

    /// Tokenizes `source`, falling back to plain text when the language is
    /// unknown or the grammar fails.
    pub fn tokenize(&mut self, source: &str, lang: &str) -> Vec<Vec<Token>> {
        let Some(language) = LanguageId::from_name(lang) else {
            tracing::debug!("No grammar for '{}', rendering plain text", lang);
            return plain_lines(source);
        };

        let Some(tokenizer) = self.get_mut(language) else {
            return plain_lines(source);
        };

        match tokenizer.tokenize(source) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Tokenizing {} failed, rendering plain text: {}", lang, e);
                plain_lines(source)
            }
        }
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(line: &[Token]) -> Vec<(&str, Vec<TokenType>)> {
        line.iter()
            .map(|t| (t.content.as_str(), t.types.clone()))
            .collect()
    }

    #[test]
    fn test_every_bundled_query_compiles() {
        for lang in LanguageId::all() {
            assert!(
                Tokenizer::for_language(*lang).is_ok(),
                "query for {} failed to compile",
                lang.name()
            );
        }
    }

    #[test]
    fn test_unknown_language() {
        let result = Tokenizer::new("unknown_lang");
        assert!(matches!(result, Err(SyntaxError::UnknownLanguage(_))));
    }

    #[test]
    fn test_jsx_const_declaration() {
        let mut tokenizer = Tokenizer::new("jsx").unwrap();
        let lines = tokenizer.tokenize("const x = 1;").unwrap();

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        let text: String = line.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(text, "const x = 1;");

        assert_eq!(line[0].content, "const");
        assert!(line[0].is(TokenType::Keyword));
        assert!(line.iter().any(|t| t.content == "1" && t.is(TokenType::Number)));
        assert!(line.iter().any(|t| t.content == "=" && t.is(TokenType::Operator)));
        assert!(line.iter().any(|t| t.content == ";" && t.is(TokenType::Punctuation)));
        assert!(line.iter().any(|t| t.content.contains('x') && t.is(TokenType::Plain)));
    }

    #[test]
    fn test_jsx_element_tags() {
        let mut tokenizer = Tokenizer::new("jsx").unwrap();
        let lines = tokenizer
            .tokenize("const el = <div className=\"box\">hi</div>;")
            .unwrap();

        let line = &lines[0];
        assert!(line.iter().any(|t| t.content == "div" && t.is(TokenType::Tag)));
        assert!(
            line.iter()
                .any(|t| t.content == "className" && t.is(TokenType::AttrName))
        );
        assert!(
            line.iter()
                .any(|t| t.content == "\"box\"" && t.is(TokenType::String))
        );
    }

    #[test]
    fn test_multiline_comment_splits_across_lines() {
        let mut tokenizer = Tokenizer::new("jsx").unwrap();
        let lines = tokenizer.tokenize("/* one\ntwo */\nlet a;").unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(kinds(&lines[0]), vec![("/* one", vec![TokenType::Comment])]);
        assert_eq!(kinds(&lines[1]), vec![("two */", vec![TokenType::Comment])]);
        assert!(lines[2][0].is(TokenType::Keyword));
    }

    #[test]
    fn test_empty_lines_get_empty_token() {
        let lines = plain_lines("a\n\nb\n");
        assert_eq!(lines.len(), 4);
        assert!(lines[1][0].empty);
        assert!(lines[3][0].empty);
        assert!(!lines[0][0].empty);
    }

    #[test]
    fn test_crlf_is_not_part_of_tokens() {
        let lines = plain_lines("a\r\nb");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].content, "a");
        assert_eq!(lines[1][0].content, "b");
    }

    #[test]
    fn test_registry_falls_back_to_plain() {
        let mut registry = LanguageRegistry::new();
        let lines = registry.tokenize("fn main() {}", "klingon");
        assert_eq!(lines, vec![vec![Token::plain("fn main() {}")]]);
    }

    #[test]
    fn test_registry_reuses_tokenizer() {
        let mut registry = LanguageRegistry::new();
        registry.tokenize("let a = 1;", "jsx");
        registry.tokenize("let b = 2;", "javascript");
        assert_eq!(registry.tokenizers.len(), 1);
    }

    #[test]
    fn test_registry_caches_failed_grammar() {
        let mut registry = LanguageRegistry::new();
        registry.tokenizers.insert(LanguageId::Json, None);

        let lines = registry.tokenize("{\"a\": 1}", "json");
        assert_eq!(lines, vec![vec![Token::plain("{\"a\": 1}")]]);

        registry.tokenize("[]", "json");
        assert!(registry.get_mut(LanguageId::Json).is_none());
        assert_eq!(registry.tokenizers.len(), 1);
    }

    #[test]
    fn test_registry_loads_default_grammar() {
        let mut registry = LanguageRegistry::new();
        assert!(registry.get_mut(LanguageId::JavaScript).is_some());
    }

    #[test]
    fn test_jsx_closing_and_self_closing_brackets() {
        let mut tokenizer = Tokenizer::new("jsx").unwrap();
        let lines = tokenizer.tokenize("<a>x</a>;\n<br />;").unwrap();

        assert!(
            lines[0]
                .iter()
                .any(|t| t.content == "</" && t.is(TokenType::Punctuation))
        );
        assert!(
            lines[1]
                .iter()
                .any(|t| t.content == "/>" && t.is(TokenType::Punctuation))
        );
        assert!(lines[1].iter().any(|t| t.content == "br" && t.is(TokenType::Tag)));
    }

    #[test]
    fn test_rust_highlighting() {
        let mut registry = LanguageRegistry::new();
        let lines = registry.tokenize("fn main() {\n    let x = \"hi\";\n}", "rust");

        assert_eq!(lines.len(), 3);
        assert!(lines[0].iter().any(|t| t.content == "fn" && t.is(TokenType::Keyword)));
        assert!(lines[1].iter().any(|t| t.is(TokenType::String)));
    }

    #[test]
    fn test_json_keys_are_properties() {
        let mut registry = LanguageRegistry::new();
        let lines = registry.tokenize("{\"a\": 1}", "json");
        assert!(
            lines[0]
                .iter()
                .any(|t| t.content == "\"a\"" && t.is(TokenType::Property))
        );
    }

    proptest! {
        #[test]
        fn prop_whitespace_line_count(segments in proptest::collection::vec("[ \t]{0,4}", 1..12)) {
            let source = segments.join("\n");
            let mut registry = LanguageRegistry::new();
            let lines = registry.tokenize(&source, "jsx");

            prop_assert_eq!(lines.len(), segments.len());
            for (line, segment) in lines.iter().zip(&segments) {
                let text: String = line.iter().map(|t| t.content.as_str()).collect();
                prop_assert_eq!(&text, segment);
            }
        }

        #[test]
        fn prop_tokens_cover_source(source in "[a-z0-9 =;(){}\"\n+]{0,60}") {
            let mut registry = LanguageRegistry::new();
            let lines = registry.tokenize(&source, "jsx");
            let rebuilt: Vec<String> = lines
                .iter()
                .map(|l| l.iter().map(|t| t.content.as_str()).collect())
                .collect();
            prop_assert_eq!(rebuilt.join("\n"), source);
        }
    }
}
