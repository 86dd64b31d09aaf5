#[cfg(test)]
#[path = "upload_surface_test.rs"]
mod tests;

use std::path;

use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use crate::domain::models::PdfFile;

pub const INVALID_FILE_TEXT: &str = "Please select a PDF file (.pdf extension)";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Landing view used before any conversation exists. Dropping a file on a
/// terminal pastes its path, which is what the drag state tracks.
#[derive(Default)]
pub struct UploadSurface {
    dragging: bool,
    error: Option<String>,
}

impl UploadSurface {
    pub fn drag_enter(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        return self.dragging;
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    pub fn report_error(&mut self, text: &str) {
        self.error = Some(text.to_string());
    }

    pub fn clear(&mut self) {
        self.dragging = false;
        self.error = None;
    }

    /// Accepts the file when it is a PDF by MIME type or extension. Rejections
    /// are kept for display until the next attempt.
    pub fn validate(&mut self, file: PdfFile) -> Result<PdfFile, ValidationError> {
        self.dragging = false;

        if !file.is_pdf() {
            tracing::debug!(name = file.name, mime_type = ?file.mime_type, "Rejected file");
            self.error = Some(INVALID_FILE_TEXT.to_string());
            return Err(ValidationError(INVALID_FILE_TEXT.to_string()));
        }

        self.error = None;
        return Ok(file);
    }

    /// Cleans up a typed or pasted path. Terminals quote, escape or send
    /// dropped paths as `file://` URLs.
    pub fn parse_path(input: &str) -> Option<path::PathBuf> {
        let mut text = input.trim();
        for quote in ['\'', '"'] {
            if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
                text = &text[1..text.len() - 1];
            }
        }

        if text.is_empty() {
            return None;
        }

        if text.starts_with("file://") {
            return reqwest::Url::parse(text).ok()?.to_file_path().ok();
        }

        let unescaped = text.replace("\\ ", " ");
        return Some(path::PathBuf::from(unescaped));
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, busy: bool) {
        let mut border_style = Style::default();
        if self.is_dragging() {
            border_style = Style {
                fg: Some(Color::Cyan),
                ..Style::default()
            };
        }

        let mut lines = vec![
            Line::from(Span::styled(
                "Learn with PDF",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Upload your PDF document and start learning with your AI Tutor"),
            Line::from(""),
        ];

        if busy {
            lines.push(Line::from("Processing PDF..."));
            lines.push(Line::from("This may take a few moments"));
        } else if self.is_dragging() {
            lines.push(Line::from("Press Enter to upload the dropped file, Esc to cancel"));
        } else {
            lines.push(Line::from("Drop your PDF here or type its path below"));
        }

        if let Some(error) = self.error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(border_style)
                        .padding(Padding::new(1, 1, 1, 1)),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rect,
        );
    }
}
