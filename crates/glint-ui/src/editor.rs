//! The code editor widget.
//!
//! ## Learning: Components in the Elm Architecture
//!
//! `CodeEditor` owns its own state and `Message` type. The host embeds it
//! by mapping messages in both directions:
//!
//! ```rust,ignore
//! // update
//! HostMessage::Editor(msg) => match self.editor.update(msg) {
//!     Action::None => Task::none(),
//!     Action::Run(task) => task.map(HostMessage::Editor),
//!     Action::Changed(code) => { self.code = code; Task::none() }
//! }
//! // view
//! self.editor.view().map(HostMessage::Editor)
//! ```
//!
//! `Action::Changed` plays the role of a change callback: it is returned
//! once per settled burst of edits, never for each keystroke.

use std::sync::Arc;
use std::time::Duration;

use glint_core::debounce::{self, Debouncer, Ticket, DEFAULT_INTERVAL};
use iced::widget::{container, text_editor};
use iced::{event, mouse, task, window, Element, Event, Font, Subscription, Task};

use crate::highlighter::{highlight_format, HighlightSettings, TokenHighlighter};
use crate::render::{render_with_transform, Line, Span, TransformToken};
use crate::style::{self, ContainerPatch, ContainerStyle, EDITOR_PADDING};
use crate::theme::{effective_theme, Theme};

/// Configuration supplied by the host.
#[derive(Clone, Default)]
pub struct EditorProps {
    /// Controlled text content
    pub code: String,
    pub placeholder: Option<String>,
    /// Grammar name; `jsx` when unset
    pub language: Option<String>,
    /// Replaces the light theme
    pub theme: Option<Theme>,
    pub transform_token: Option<TransformToken>,
    /// Overrides merged over the computed container style
    pub class_name: Option<ContainerPatch>,
    /// Passed verbatim as the container's widget id
    pub test_id: Option<String>,
    /// Quiet period before `Action::Changed`; 250ms when unset
    pub code_debounce_interval: Option<Duration>,
    pub font_size: Option<f32>,
}

impl EditorProps {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn transform_token(
        mut self,
        transform: impl Fn(crate::render::TokenProps) -> Span + Send + Sync + 'static,
    ) -> Self {
        self.transform_token = Some(Arc::new(transform));
        self
    }

    pub fn class_name(mut self, patch: ContainerPatch) -> Self {
        self.class_name = Some(patch);
        self
    }

    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    pub fn code_debounce_interval(mut self, interval: Duration) -> Self {
        self.code_debounce_interval = Some(interval);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }
}

impl std::fmt::Debug for EditorProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorProps")
            .field("code", &self.code)
            .field("placeholder", &self.placeholder)
            .field("language", &self.language)
            .field("theme", &self.theme.as_ref().map(|t| &t.name))
            .field("transform_token", &self.transform_token.is_some())
            .field("class_name", &self.class_name)
            .field("test_id", &self.test_id)
            .field("code_debounce_interval", &self.code_debounce_interval)
            .field("font_size", &self.font_size)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// An action from the editing surface
    Edit(text_editor::Action),
    /// The debounce timer for a ticket elapsed
    Settled(Ticket),
    Focused,
    Blurred,
}

/// What the host should do after an update.
pub enum Action {
    None,
    /// Run this task and route its messages back to the editor
    Run(Task<Message>),
    /// The code settled on a new value
    Changed(String),
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::None => f.write_str("None"),
            Action::Run(_) => f.write_str("Run(..)"),
            Action::Changed(code) => f.debug_tuple("Changed").field(code).finish(),
        }
    }
}

/// Syntax-highlighting code editor.
pub struct CodeEditor {
    props: EditorProps,
    theme: Theme,
    content: text_editor::Content,
    value: Debouncer<String>,
    focused: bool,
    /// Aborts the pending timer when replaced or dropped
    timer: Option<task::Handle>,
    /// Plain handles to every armed timer, to observe cancellation
    #[cfg(test)]
    armed: Vec<task::Handle>,
    revision: u64,
    rendered: Arc<Vec<Line<Span>>>,
}

impl CodeEditor {
    pub fn new(props: EditorProps) -> Self {
        let theme = effective_theme(props.theme.as_ref());
        let interval = props.code_debounce_interval.unwrap_or(DEFAULT_INTERVAL);

        let mut editor = Self {
            content: text_editor::Content::with_text(&props.code),
            value: Debouncer::new(props.code.clone(), interval),
            props,
            theme,
            focused: false,
            timer: None,
            #[cfg(test)]
            armed: Vec::new(),
            revision: 0,
            rendered: Arc::new(Vec::new()),
        };
        editor.refresh();
        editor
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Edit(action) => {
                if !matches!(action, text_editor::Action::Scroll { .. }) {
                    self.set_focused(true);
                }

                let is_edit = action.is_edit();
                self.content.perform(action);
                if !is_edit {
                    return Action::None;
                }

                let ticket = self.value.set(content_text(&self.content));
                self.refresh();
                Action::Run(self.arm(ticket))
            }
            Message::Settled(ticket) => match self.value.fire(ticket) {
                Some(code) => {
                    self.timer = None;
                    Action::Changed(code)
                }
                None => Action::None,
            },
            Message::Focused => {
                self.set_focused(true);
                Action::None
            }
            Message::Blurred => {
                self.set_focused(false);
                Action::None
            }
        }
    }

    /// Applies a new controlled value from the host.
    ///
    /// Echoes of a value this editor reported are ignored; anything else
    /// replaces the text and drops the pending notification.
    pub fn sync(&mut self, code: &str) {
        self.props.code = code.to_string();
        if self.value.sync(code.to_string()) {
            tracing::debug!("Editor resynced to host value ({} bytes)", code.len());
            self.timer = None;
            self.content = text_editor::Content::with_text(code);
            self.refresh();
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let settings = HighlightSettings {
            revision: self.revision,
            lines: Arc::clone(&self.rendered),
        };
        let plain = self.theme.plain.clone();

        let mut editor = text_editor(&self.content)
            .padding(EDITOR_PADDING)
            .font(Font::MONOSPACE)
            .wrapping(style::wrapping(plain.white_space))
            .style(move |theme, _status| style::editor_style(&plain, theme))
            .highlight_with::<TokenHighlighter>(settings, highlight_format)
            .on_action(Message::Edit);

        if let Some(placeholder) = &self.props.placeholder {
            editor = editor.placeholder(placeholder.as_str());
        }
        if let Some(size) = self.props.font_size {
            editor = editor.size(size);
        }

        let frame = self.container_style();
        let mut root = container(editor)
            .padding(frame.padding())
            .clip(frame.clip)
            .style(move |_theme| frame.to_iced());

        if let Some(max_width) = frame.max_width {
            root = root.max_width(max_width);
        }
        if let Some(id) = &self.props.test_id {
            root = root.id(container::Id::new(id.clone()));
        }

        root.into()
    }

    /// Blurs on presses no widget captured and when the window loses focus.
    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| match (event, status) {
            (Event::Mouse(mouse::Event::ButtonPressed(_)), event::Status::Ignored) => {
                Some(Message::Blurred)
            }
            (Event::Window(window::Event::Unfocused), _) => Some(Message::Blurred),
            _ => None,
        })
    }

    /// The displayed code.
    pub fn value(&self) -> &str {
        self.value.value()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn props(&self) -> &EditorProps {
        &self.props
    }

    /// Lines as last rendered for the editing surface.
    pub fn rendered(&self) -> &[Line<Span>] {
        &self.rendered
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.value.pending_ticket()
    }

    pub fn container_style(&self) -> ContainerStyle {
        style::container_style(self.focused, self.props.class_name.as_ref())
    }

    fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            tracing::trace!("Editor focus: {}", focused);
            self.focused = focused;
        }
    }

    /// Starts the timer for `ticket`, aborting the previous one.
    fn arm(&mut self, ticket: Ticket) -> Task<Message> {
        tracing::debug!(
            "Debounce armed for {:?} (generation {})",
            self.value.interval(),
            ticket.generation
        );
        let (task, handle) =
            Task::perform(debounce::elapsed(self.value.interval(), ticket), Message::Settled)
                .abortable();
        #[cfg(test)]
        self.armed.push(handle.clone());
        self.timer = Some(handle.abort_on_drop());
        task
    }

    fn refresh(&mut self) {
        self.revision += 1;
        self.rendered = Arc::new(render_with_transform(
            self.value.value(),
            &self.theme,
            self.props.language.as_deref(),
            self.props.transform_token.as_ref(),
        ));
    }
}

impl Drop for CodeEditor {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
            self.value.cancel();
            tracing::debug!("Editor dropped with a pending notification; cancelled");
        }
    }
}

fn content_text(content: &text_editor::Content) -> String {
    (0..content.line_count())
        .filter_map(|i| {
            content.line(i).map(|line| {
                let s: &str = &line;
                s.to_string()
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::colors;
    use glint_syntax::TokenType;
    use text_editor::{Action as EditorAction, Edit};

    fn type_text(editor: &mut CodeEditor, text: &str) -> Vec<Ticket> {
        text.chars()
            .map(|c| {
                let action = editor.update(Message::Edit(EditorAction::Edit(Edit::Insert(c))));
                assert!(matches!(action, Action::Run(_)));
                editor.pending_ticket().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        let editor = CodeEditor::new(EditorProps::new("const x = 1;"));
        assert_eq!(editor.value(), "const x = 1;");
        assert!(!editor.is_focused());
        assert_eq!(editor.theme().name, "Glint Light");
        assert_eq!(editor.value.interval(), Duration::from_millis(250));

        let line = &editor.rendered()[0];
        assert_eq!(line.fragments[0].text, "const");
        assert!(line.fragments[0].class_name.contains(TokenType::Keyword.as_str()));
    }

    #[test]
    fn test_edit_updates_value_immediately() {
        let mut editor = CodeEditor::new(EditorProps::new(""));
        type_text(&mut editor, "ab");
        assert_eq!(editor.value(), "ab");
        assert_eq!(editor.rendered()[0].to_text(), "ab\n");
        assert!(editor.is_focused());
    }

    #[test]
    fn test_zero_interval_burst_reports_final_value_once() {
        let mut editor =
            CodeEditor::new(EditorProps::new("").code_debounce_interval(Duration::ZERO));
        let tickets = type_text(&mut editor, "abc");

        let changes: Vec<String> = tickets
            .into_iter()
            .filter_map(|t| match editor.update(Message::Settled(t)) {
                Action::Changed(code) => Some(code),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec!["abc".to_string()]);
        assert!(editor.pending_ticket().is_none());
    }

    #[test]
    fn test_host_reset_discards_pending_change() {
        let mut editor = CodeEditor::new(EditorProps::new("start"));
        let tickets = type_text(&mut editor, "!");

        editor.sync("reset");
        assert_eq!(editor.value(), "reset");
        assert_eq!(content_text(&editor.content), "reset");
        assert!(matches!(
            editor.update(Message::Settled(tickets[0])),
            Action::None
        ));
    }

    #[test]
    fn test_host_echo_keeps_editing() {
        let mut editor = CodeEditor::new(EditorProps::new(""));
        let ticket = type_text(&mut editor, "a")[0];
        let Action::Changed(code) = editor.update(Message::Settled(ticket)) else {
            panic!("expected a change");
        };

        type_text(&mut editor, "b");
        editor.sync(&code);
        assert_eq!(editor.value(), "ab");
        assert!(editor.pending_ticket().is_some());
    }

    #[test]
    fn test_rearming_aborts_previous_timer() {
        let mut editor = CodeEditor::new(EditorProps::new(""));
        type_text(&mut editor, "ab");

        assert_eq!(editor.armed.len(), 2);
        assert!(editor.armed[0].is_aborted());
        assert!(!editor.armed[1].is_aborted());
    }

    #[test]
    fn test_resync_aborts_pending_timer() {
        let mut editor = CodeEditor::new(EditorProps::new("start"));
        type_text(&mut editor, "!");
        editor.sync("reset");
        assert!(editor.armed[0].is_aborted());
    }

    #[test]
    fn test_drop_aborts_pending_timer() {
        let mut editor = CodeEditor::new(EditorProps::new(""));
        type_text(&mut editor, "a");

        let armed = std::mem::take(&mut editor.armed);
        assert!(!armed[0].is_aborted());
        drop(editor);
        assert!(armed[0].is_aborted());
    }

    #[test]
    fn test_focus_toggles_border() {
        let mut editor = CodeEditor::new(EditorProps::new(""));
        assert_eq!(editor.container_style().border_color, colors::BORDER);

        editor.update(Message::Focused);
        assert_eq!(editor.container_style().border_color, colors::BORDER_FOCUSED);

        editor.update(Message::Blurred);
        assert_eq!(editor.container_style().border_color, colors::BORDER);
    }

    #[test]
    fn test_scroll_does_not_focus() {
        let mut editor = CodeEditor::new(EditorProps::new("a\nb"));
        let action = editor.update(Message::Edit(EditorAction::Scroll { lines: 1 }));
        assert!(matches!(action, Action::None));
        assert!(!editor.is_focused());
    }

    #[test]
    fn test_transform_token_styles_every_fragment() {
        let editor = CodeEditor::new(EditorProps::new("let a = 1;\nb").transform_token(|props| Span {
            text: props.content,
            class_name: "custom".to_string(),
            style: props.style.bold(),
        }));
        assert!(
            editor
                .rendered()
                .iter()
                .flat_map(|l| &l.fragments)
                .all(|s| s.class_name == "custom")
        );
    }

    #[test]
    fn test_class_name_patch_applies() {
        let editor = CodeEditor::new(EditorProps::new("").class_name(ContainerPatch {
            border_width: Some(2.0),
            ..Default::default()
        }));
        assert_eq!(editor.container_style().border_width, 2.0);
        assert_eq!(editor.container_style().border_radius, 5.0);
    }

    #[test]
    fn test_host_theme_replaces_default() {
        let editor = CodeEditor::new(EditorProps::new("").theme(Theme::dark()));
        assert_eq!(editor.theme().name, "Glint Dark");
        assert!(editor.theme().plain.white_space.is_some());
    }
}
