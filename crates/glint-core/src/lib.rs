//! # Glint Core
//!
//! Framework-independent state behind the Glint code editor widget.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  CodeEditor (ui)              │
//! │  ┌──────────────────┐   ┌──────────────────┐ │
//! │  │ Debouncer<String>│   │      Config      │ │
//! │  │  displayed value │   │ editor / ui keys │ │
//! │  │  pending ticket  │   └──────────────────┘ │
//! │  └──────────────────┘                         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate knows about iced. The UI crate drives the
//! debouncer from its update loop and turns [`debounce::elapsed`] into a
//! cancellable task.

pub mod config;
pub mod debounce;

pub use config::{Config, ConfigError, EditorConfig, UiConfig};
pub use debounce::{Debouncer, Ticket, DEFAULT_INTERVAL};
