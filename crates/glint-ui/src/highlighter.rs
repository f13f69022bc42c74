//! Feeds rendered lines to iced's `text_editor`.
//!
//! The editor asks for highlights one line at a time. The whole document
//! has already been rendered by [`crate::render`], so each call just turns
//! the next line's spans into byte ranges.

use std::ops::Range;
use std::sync::Arc;

use iced::advanced::text::highlighter::{Format, Highlighter};
use iced::{font, Font};

use crate::render::{Line, Span};
use crate::theme::{FontStyle, FontWeight, TokenStyle};

/// Settings for the highlighter.
///
/// Equality is by `revision`, which the editor bumps whenever it re-renders.
#[derive(Debug, Clone)]
pub struct HighlightSettings {
    pub revision: u64,
    pub lines: Arc<Vec<Line<Span>>>,
}

impl PartialEq for HighlightSettings {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision
    }
}

/// Syntax highlighter for the text editor.
pub struct TokenHighlighter {
    lines: Arc<Vec<Line<Span>>>,
    current_line: usize,
}

impl Highlighter for TokenHighlighter {
    type Settings = HighlightSettings;
    type Highlight = TokenStyle;
    type Iterator<'a> = std::vec::IntoIter<(Range<usize>, TokenStyle)> where Self: 'a;

    fn new(settings: &Self::Settings) -> Self {
        Self {
            lines: Arc::clone(&settings.lines),
            current_line: 0,
        }
    }

    fn update(&mut self, new_settings: &Self::Settings) {
        self.lines = Arc::clone(&new_settings.lines);
        self.current_line = 0;
    }

    fn change_line(&mut self, line: usize) {
        self.current_line = self.current_line.min(line);
    }

    fn highlight_line(&mut self, line: &str) -> Self::Iterator<'_> {
        let ranges = self
            .lines
            .get(self.current_line)
            .map(|l| span_ranges(l, line.len()))
            .unwrap_or_default();
        self.current_line += 1;

        ranges.into_iter()
    }

    fn current_line(&self) -> usize {
        self.current_line
    }
}

/// Pairs each span's style with the source range of its token.
///
/// A transform may change a span's text, but the editing surface shows the
/// real code, so ranges come from the tokens. They are clamped to the line in
/// case the text moved on since the render.
fn span_ranges(line: &Line<Span>, line_len: usize) -> Vec<(Range<usize>, TokenStyle)> {
    line.fragments
        .iter()
        .zip(&line.source_ranges)
        .filter(|(span, _)| !span.style.is_empty())
        .filter_map(|(span, range)| {
            let end = range.end.min(line_len);
            (range.start < end).then(|| (range.start..end, span.style.clone()))
        })
        .collect()
}

/// Maps a token style onto what the editing surface can draw: color and
/// font. Backgrounds and decorations are not representable there.
pub fn highlight_format(style: &TokenStyle, _theme: &iced::Theme) -> Format<Font> {
    let italic = style.font_style == Some(FontStyle::Italic);
    let bold = style.font_weight == Some(FontWeight::Bold);

    let font = (italic || bold).then(|| Font {
        weight: if bold {
            font::Weight::Bold
        } else {
            font::Weight::Normal
        },
        style: if italic {
            font::Style::Italic
        } else {
            font::Style::Normal
        },
        ..Font::MONOSPACE
    });

    Format {
        color: style.effective_color().map(|c| c.to_iced()),
        font,
    }
}
