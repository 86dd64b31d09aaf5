#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

use super::create_id;
use super::ImageAttachment;
use super::PdfFile;
use super::Sender;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Pdf,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    kind: MessageKind,
    file: Option<PdfFile>,
    image: Option<ImageAttachment>,
}

impl Message {
    pub fn new(sender: Sender, text: &str) -> Message {
        return Message {
            id: create_id(),
            sender,
            text: text.to_string().replace('\t', "  "),
            timestamp: Local::now(),
            kind: MessageKind::Text,
            file: None,
            image: None,
        };
    }

    /// Attachment chip for an uploaded document. The text is the file name.
    pub fn new_pdf(file: PdfFile) -> Message {
        let mut msg = Message::new(Sender::System, &file.name);
        msg.kind = MessageKind::Pdf;
        msg.file = Some(file);

        return msg;
    }

    pub fn new_ai(text: &str, image: Option<ImageAttachment>) -> Message {
        let mut msg = Message::new(Sender::Ai, text);
        msg.image = image;

        return msg;
    }

    pub fn kind(&self) -> MessageKind {
        return self.kind;
    }

    pub fn file(&self) -> Option<&PdfFile> {
        return self.file.as_ref();
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        return self.image.as_ref();
    }

    pub fn time_label(&self) -> String {
        return self.timestamp.format("%H:%M").to_string();
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let line_max_width = line_max_width.max(1);
        let mut lines: Vec<String> = Vec::new();

        for full_line in self.text.split('\n') {
            if full_line.trim().is_empty() {
                lines.push("".to_string());
                continue;
            }

            let mut current = String::new();
            let mut char_count = 0;

            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                let sep = usize::from(char_count > 0);

                if char_count + sep + word_len <= line_max_width {
                    if sep == 1 {
                        current.push(' ');
                    }
                    current.push_str(word);
                    char_count += sep + word_len;
                    continue;
                }

                if char_count > 0 {
                    lines.push(current.trim_end().to_string());
                    current = String::new();
                    char_count = 0;
                }

                // Words wider than the bubble are hard split.
                let chars = word.chars().collect::<Vec<char>>();
                let mut chunks = chars.chunks(line_max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        lines.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        char_count = chunk.len();
                    }
                }
            }

            if char_count > 0 {
                lines.push(current.trim_end().to_string());
            }
        }

        return lines;
    }
}
