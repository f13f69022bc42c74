//! # Glint UI
//!
//! A syntax-highlighting code editor widget for iced.
//!
//! ## Architecture
//!
//! ```text
//! code ──► render (tokenize + theme) ──► Line<Span> ──► TokenHighlighter
//!   ▲                                                        │
//!   │                                                  text_editor
//!   │                                                        │
//!   └──── Action::Changed ◄── Debouncer ◄── edits ◄──────────┘
//! ```
//!
//! - [`editor`]: the `CodeEditor` component and its messages
//! - [`render`]: token to fragment rendering, with host overrides
//! - [`theme`]: themes, token styles and their JSON form
//! - [`style`]: container chrome and the editing surface style
//! - [`highlighter`]: the bridge into iced's text editor
//! - [`app`]: a standalone demo host

pub mod app;
pub mod editor;
pub mod highlighter;
pub mod render;
pub mod style;
pub mod theme;

pub use app::{run, App, AppMessage, Flags};
pub use editor::{Action, CodeEditor, EditorProps, Message};
pub use render::{render, render_with_transform, DefaultSpan, Line, Span, TokenProps, TokenRenderer};
pub use style::{ContainerPatch, ContainerStyle};
pub use theme::{effective_theme, Color, Theme, ThemeError, TokenStyle};
