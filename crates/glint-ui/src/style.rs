//! Style definitions for the editor container.

use iced::widget::{container, text, text_editor};
use iced::{Background, Border, Padding};

use crate::theme::{Color, TokenStyle, WhiteSpace};

/// Fixed colors of the editor chrome.
pub mod colors {
    use crate::theme::Color;

    pub const BORDER: Color = Color::from_rgb8(0xcc, 0xcc, 0xcc);
    pub const BORDER_FOCUSED: Color = Color::from_rgb8(0x27, 0x6e, 0xf1);
    pub const SELECTION: Color = Color::rgba(0.153, 0.431, 0.945, 0.25);
}

/// Padding inside the editing surface, around the text.
pub const EDITOR_PADDING: f32 = 8.0;

/// Computed style of the box around the editing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerStyle {
    pub padding_left: f32,
    pub padding_right: f32,
    pub border_width: f32,
    pub border_color: Color,
    pub border_radius: f32,
    /// Clip overflowing content
    pub clip: bool,
    /// `None` sizes to the content
    pub max_width: Option<f32>,
}

impl ContainerStyle {
    /// The container style for the given focus state.
    pub fn for_focus(focused: bool) -> Self {
        Self {
            padding_left: 4.0,
            padding_right: 4.0,
            border_width: 1.0,
            border_color: if focused {
                colors::BORDER_FOCUSED
            } else {
                colors::BORDER
            },
            border_radius: 5.0,
            clip: true,
            max_width: None,
        }
    }

    /// Applies host overrides on top of the computed style.
    pub fn merge(self, patch: &ContainerPatch) -> Self {
        Self {
            padding_left: patch.padding_left.unwrap_or(self.padding_left),
            padding_right: patch.padding_right.unwrap_or(self.padding_right),
            border_width: patch.border_width.unwrap_or(self.border_width),
            border_color: patch.border_color.unwrap_or(self.border_color),
            border_radius: patch.border_radius.unwrap_or(self.border_radius),
            clip: patch.clip.unwrap_or(self.clip),
            max_width: patch.max_width.or(self.max_width),
        }
    }

    pub fn padding(&self) -> Padding {
        Padding {
            top: 0.0,
            right: self.padding_right,
            bottom: 0.0,
            left: self.padding_left,
        }
    }

    pub fn to_iced(&self) -> container::Style {
        container::Style {
            border: Border {
                color: self.border_color.to_iced(),
                width: self.border_width,
                radius: self.border_radius.into(),
            },
            ..Default::default()
        }
    }
}

/// Host-supplied overrides for [`ContainerStyle`]; set fields win.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerPatch {
    pub padding_left: Option<f32>,
    pub padding_right: Option<f32>,
    pub border_width: Option<f32>,
    pub border_color: Option<Color>,
    pub border_radius: Option<f32>,
    pub clip: Option<bool>,
    pub max_width: Option<f32>,
}

/// The container style for a focus state, with host overrides applied last.
pub fn container_style(focused: bool, patch: Option<&ContainerPatch>) -> ContainerStyle {
    let style = ContainerStyle::for_focus(focused);
    match patch {
        Some(patch) => style.merge(patch),
        None => style,
    }
}

/// Style of the editing surface itself.
///
/// The surface never draws a border of its own, in any status. Focus is
/// shown only by the container's border.
pub fn editor_style(plain: &TokenStyle, theme: &iced::Theme) -> text_editor::Style {
    let palette = theme.extended_palette();
    let value = plain
        .effective_color()
        .map(|c| c.to_iced())
        .unwrap_or(palette.background.base.text);
    let background = plain
        .background_color
        .map(|c| c.to_iced())
        .unwrap_or(iced::Color::TRANSPARENT);

    text_editor::Style {
        background: Background::Color(background),
        border: Border {
            width: 0.0,
            radius: 0.0.into(),
            color: iced::Color::TRANSPARENT,
        },
        icon: value,
        placeholder: iced::Color { a: 0.5, ..value },
        value,
        selection: colors::SELECTION.to_iced(),
    }
}

/// How the surface wraps long lines for a `white-space` setting.
pub fn wrapping(white_space: Option<WhiteSpace>) -> text::Wrapping {
    match white_space {
        Some(WhiteSpace::Pre) => text::Wrapping::None,
        Some(WhiteSpace::Normal) | Some(WhiteSpace::PreWrap) => text::Wrapping::Word,
        Some(WhiteSpace::BreakSpaces) | None => text::Wrapping::WordOrGlyph,
    }
}
