//! Standalone demo host for [`CodeEditor`].
//!
//! The host owns the code as a controlled value: it stores whatever the
//! editor reports and hands it straight back through [`CodeEditor::sync`].

use std::time::Duration;

use iced::widget::{button, column, container, row, text, Space};
use iced::{Element, Length, Subscription, Task};

use crate::editor::{Action, CodeEditor, EditorProps, Message};
use crate::theme::Theme;

#[derive(Debug, Default)]
pub struct Flags {
    pub code: String,
    pub file: Option<String>,
    pub language: Option<String>,
    pub theme: Option<Theme>,
    pub debounce: Option<Duration>,
    pub placeholder: Option<String>,
    pub font_size: Option<f32>,
    pub window_width: f32,
    pub window_height: f32,
}

#[derive(Debug, Clone)]
pub enum AppMessage {
    Editor(Message),
    /// Restore the code the demo started with
    Reset,
}

pub struct App {
    editor: CodeEditor,
    code: String,
    initial: String,
    file: Option<String>,
    changes: usize,
    status: String,
}

impl App {
    fn new(flags: Flags) -> (Self, Task<AppMessage>) {
        let mut props = EditorProps::new(flags.code.clone()).test_id("glint-editor");
        props.language = flags.language;
        props.theme = flags.theme;
        props.placeholder = flags.placeholder;
        props.code_debounce_interval = flags.debounce;
        props.font_size = flags.font_size;

        let app = Self {
            editor: CodeEditor::new(props),
            code: flags.code.clone(),
            initial: flags.code,
            file: flags.file,
            changes: 0,
            status: "Ready".to_string(),
        };
        (app, Task::none())
    }

    fn title(&self) -> String {
        match &self.file {
            Some(file) => format!("{} - Glint", file),
            None => "Glint".to_string(),
        }
    }

    fn update(&mut self, message: AppMessage) -> Task<AppMessage> {
        match message {
            AppMessage::Editor(msg) => match self.editor.update(msg) {
                Action::None => Task::none(),
                Action::Run(task) => task.map(AppMessage::Editor),
                Action::Changed(code) => {
                    self.changes += 1;
                    tracing::info!("Code changed ({} bytes)", code.len());
                    self.status = format!("Change #{}: {} bytes", self.changes, code.len());
                    self.code = code;
                    self.editor.sync(&self.code);
                    Task::none()
                }
            },
            AppMessage::Reset => {
                tracing::info!("Resetting code");
                self.code = self.initial.clone();
                self.editor.sync(&self.code);
                self.status = "Reset".to_string();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, AppMessage> {
        let language = self
            .editor
            .props()
            .language
            .clone()
            .unwrap_or_else(|| crate::render::DEFAULT_LANGUAGE.to_string());

        let header = row![
            text(self.file.as_deref().unwrap_or("untitled")).size(14),
            Space::with_width(Length::Fill),
            text(language).size(12),
        ]
        .spacing(8);

        let footer = row![
            text(&self.status).size(12),
            Space::with_width(Length::Fill),
            button(text("Reset").size(12)).on_press(AppMessage::Reset),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        container(
            column![
                header,
                self.editor.view().map(AppMessage::Editor),
                footer
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn subscription(&self) -> Subscription<AppMessage> {
        self.editor.subscription().map(AppMessage::Editor)
    }
}

pub fn run(flags: Flags) -> iced::Result {
    let size = iced::Size::new(flags.window_width, flags.window_height);
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(size)
        .theme(|_| iced::Theme::Light)
        .antialiasing(true)
        .run_with(move || App::new(flags))
}
