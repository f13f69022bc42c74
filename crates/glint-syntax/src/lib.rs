//! # Glint Syntax
//!
//! Turns source text into lines of classified tokens using tree-sitter.
//!
//! ## Why Tree-sitter?
//!
//! Tree-sitter is a parser generator tool and incremental parsing library:
//! - **Error-tolerant**: Produces valid syntax trees even with errors, so
//!   half-typed code still highlights
//! - **Fast**: Written in C with Rust bindings
//! - **Accurate**: Real parsing, not regex-based highlighting
//!
//! ## Output Shape
//!
//! ```text
//! "const x = 1;\n"  ──▶  [ [const:keyword][ x :plain][=:operator]...[;:punctuation] ]
//!                        [ [<empty>] ]
//! ```
//!
//! Lines never contain the newline itself. A line with no text holds a
//! single token with `empty == true`, which renderers are expected to skip.

mod language;
mod token;
mod tokenizer;

use std::cell::RefCell;

pub use language::LanguageId;
pub use token::{Token, TokenType};
pub use tokenizer::{plain_lines, LanguageRegistry, Tokenizer};

/// Errors that can occur while setting up or running a tokenizer.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Incompatible grammar: {0}")]
    Language(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Parser error")]
    Parse,
}

thread_local! {
    static REGISTRY: RefCell<LanguageRegistry> = RefCell::new(LanguageRegistry::new());
}

/// Tokenizes `source` with this thread's shared tokenizers.
///
/// Unknown languages and grammar failures fall back to plain text.
pub fn tokenize(source: &str, lang: &str) -> Vec<Vec<Token>> {
    REGISTRY.with(|registry| registry.borrow_mut().tokenize(source, lang))
}

/// Languages with a bundled grammar, by canonical name.
pub fn supported_languages() -> Vec<&'static str> {
    LanguageId::all().iter().map(|l| l.name()).collect()
}
