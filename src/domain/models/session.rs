#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use uuid::Uuid;

use super::Message;
use super::PdfFile;
use super::UploadResult;

const DISPLAY_NAME_MAX_CHARS: usize = 20;

pub fn create_id() -> String {
    return Uuid::new_v4().simple().to_string();
}

pub fn display_name(file_name: &str) -> String {
    let truncated = file_name
        .chars()
        .take(DISPLAY_NAME_MAX_CHARS)
        .collect::<String>();

    if file_name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        return format!("PDF: {truncated}...");
    }

    return format!("PDF: {truncated}");
}

pub struct Session {
    pub id: String,
    pub topic_id: String,
    pub display_name: String,
    pub original_file_name: String,
    messages: Vec<Message>,
}

impl Session {
    /// Starts a conversation for a processed upload, seeded with the
    /// attachment chip and a greeting.
    pub fn from_upload(file: PdfFile, upload: &UploadResult) -> Session {
        let name = file.name.to_string();
        let greeting = format!(
            "I've read {name} and indexed {} sections. Ask me anything about it.",
            upload.chunks_processed
        );

        return Session {
            id: create_id(),
            topic_id: upload.topic_id.to_string(),
            display_name: display_name(&name),
            original_file_name: name,
            messages: vec![Message::new_pdf(file), Message::new_ai(&greeting, None)],
        };
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}
