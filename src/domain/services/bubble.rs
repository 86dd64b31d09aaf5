#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::ImageLoadState;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::Sender;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct BubbleConfig {
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

/// A styled row inside a bubble, before borders are applied.
struct Row {
    text: String,
    style: Style,
}

impl Row {
    fn plain(text: &str) -> Row {
        return Row {
            text: text.to_string(),
            style: Style::default(),
        };
    }

    fn styled(text: &str, style: Style) -> Row {
        return Row {
            text: text.to_string(),
            style,
        };
    }
}

fn width(text: &str) -> usize {
    return text.chars().count();
}

/// Renders one message as a bordered chat bubble. Pure, the output only
/// depends on the arguments.
pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
    sender_name: String,
    image_state: Option<ImageLoadState>,
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
        sender_name: &str,
        image_state: Option<ImageLoadState>,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
            sender_name: sender_name.to_string(),
            image_state,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // left border + left padding + (text, not counted) + right padding + right border.
            border_elements_length: 4,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();

        let rows = match self.message.kind() {
            MessageKind::Pdf => self.pdf_rows(max_line_length),
            MessageKind::Text => {
                let mut rows = self
                    .message
                    .as_string_lines(max_line_length)
                    .iter()
                    .map(|line| return Row::plain(line))
                    .collect::<Vec<Row>>();
                rows.extend(self.image_rows(max_line_length));
                rows
            }
        };

        let inner_width = rows
            .iter()
            .map(|row| return width(&row.text))
            .max()
            .unwrap_or(0)
            .max(self.min_inner_width());

        return self.wrap_rows_in_bubble(rows, inner_width);
    }

    /// The attachment chip, never run through the text renderer.
    fn pdf_rows(&self, max_line_length: usize) -> Vec<Row> {
        let accent = Style {
            fg: Some(Color::Cyan),
            ..Style::default()
        };

        let mut rows = Message::new(Sender::System, &format!("[PDF] {}", self.message.text))
            .as_string_lines(max_line_length)
            .iter()
            .map(|line| return Row::styled(line, accent.add_modifier(Modifier::BOLD)))
            .collect::<Vec<Row>>();
        rows.push(Row::plain("PDF Document"));
        rows.push(Row::styled("Ctrl+O to view", accent));

        return rows;
    }

    fn image_rows(&self, max_line_length: usize) -> Vec<Row> {
        let image = match self.message.image() {
            Some(image) => image,
            None => return vec![],
        };

        let dim = Style {
            fg: Some(Color::DarkGray),
            ..Style::default()
        };
        let wrap = |text: &str| {
            return Message::new(Sender::System, text).as_string_lines(max_line_length);
        };

        let mut rows = vec![Row::plain("")];
        match self.image_state.unwrap_or(ImageLoadState::Loading) {
            ImageLoadState::Loading => {
                rows.push(Row::styled("[image] Loading image...", dim));
            }
            ImageLoadState::Loaded => {
                for line in wrap(&format!("[image] {}", image.title)) {
                    rows.push(Row::styled(
                        &line,
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                }
                for line in wrap(&image.url) {
                    rows.push(Row::styled(&line, dim));
                }
            }
            ImageLoadState::Failed => {
                rows.push(Row::styled(
                    "[image] Failed to load image",
                    Style {
                        fg: Some(Color::Red),
                        ..Style::default()
                    },
                ));
                for line in wrap(&image.title) {
                    rows.push(Row::styled(&line, dim));
                }
            }
        }

        return rows;
    }

    fn min_inner_width(&self) -> usize {
        // Bottom border holds the time plus one dash on each side.
        return width(&self.sender_name).max(width(&self.message.time_label()));
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding + scrollbar.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length + 1;

        return self
            .window_max_width
            .saturating_sub(line_border_width)
            .max(self.min_inner_width())
            .max(1);
    }

    fn wrap_rows_in_bubble(&self, rows: Vec<Row>, inner_width: usize) -> Vec<Line<'static>> {
        let bubble_width = inner_width + Bubble::style_config().border_elements_length;
        let outer_padding = " ".repeat(self.window_max_width.saturating_sub(bubble_width));

        let name = &self.sender_name;
        let top_bar = format!(
            "╭{name}{}╮",
            "─".repeat((inner_width + 2).saturating_sub(width(name)))
        );

        let time = self.message.time_label();
        let bottom_bar = format!(
            "╰{}{time}─╯",
            "─".repeat((inner_width + 1).saturating_sub(width(&time)))
        );

        let mut lines = vec![self.pad_line(vec![self.border_span(top_bar)], &outer_padding)];
        for row in rows {
            let fill = " ".repeat(inner_width.saturating_sub(width(&row.text)));
            let spans = vec![
                self.border_span("│ ".to_string()),
                Span::styled(row.text, row.style),
                self.border_span(format!("{fill} │")),
            ];
            lines.push(self.pad_line(spans, &outer_padding));
        }
        lines.push(self.pad_line(vec![self.border_span(bottom_bar)], &outer_padding));

        return lines;
    }

    fn pad_line(&self, mut spans: Vec<Span<'static>>, outer_padding: &str) -> Line<'static> {
        if self.alignment == BubbleAlignment::Left {
            spans.push(Span::from(outer_padding.to_string()));
            return Line::from(spans);
        }

        let mut line_spans = vec![Span::from(outer_padding.to_string())];
        line_spans.extend(spans);

        return Line::from(line_spans);
    }

    fn border_span(&self, text: String) -> Span<'static> {
        if self.message.sender == Sender::System {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(138, 85, 63)), // Brown
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }
}
