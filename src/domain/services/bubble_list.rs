#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::ImageLoadState;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::Sender;

struct BubbleCacheEntry {
    image_state: Option<ImageLoadState>,
    lines: Vec<Line<'static>>,
}

/// Rendered conversation. Messages never change after they are appended, so
/// a bubble is only redrawn when the width or its image state changes.
pub struct BubbleList {
    cache: HashMap<String, BubbleCacheEntry>,
    order: Vec<String>,
    line_width: usize,
    lines_len: usize,
    username: String,
}

impl BubbleList {
    pub fn new(username: &str) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            order: vec![],
            line_width: 0,
            lines_len: 0,
            username: username.to_string(),
        };
    }

    fn sender_name(&self, message: &Message) -> String {
        if message.sender == Sender::User && !self.username.is_empty() {
            return self.username.to_string();
        }

        return message.sender.to_string();
    }

    pub fn set_messages(
        &mut self,
        messages: &[Message],
        line_width: usize,
        image_states: &HashMap<String, ImageLoadState>,
    ) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = messages.iter().map(|e| return e.id.to_string()).collect();
        self.cache
            .retain(|id, _| return messages.iter().any(|e| return &e.id == id));

        self.lines_len = messages
            .iter()
            .map(|message| {
                let image_state = image_states.get(&message.id).copied();
                if let Some(cache_entry) = self.cache.get(&message.id) {
                    if cache_entry.image_state == image_state {
                        return cache_entry.lines.len();
                    }
                }

                // Uploaded documents sit on the user's side.
                let mut align = BubbleAlignment::Left;
                if message.sender == Sender::User || message.kind() == MessageKind::Pdf {
                    align = BubbleAlignment::Right;
                }

                let sender_name = self.sender_name(message);
                let lines =
                    Bubble::new(message, align, line_width, &sender_name, image_state).as_lines();
                let lines_len = lines.len();

                self.cache.insert(
                    message.id.to_string(),
                    BubbleCacheEntry { image_state, lines },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        return self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: usize) {
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(Block::default())
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            rect,
        );
    }
}
