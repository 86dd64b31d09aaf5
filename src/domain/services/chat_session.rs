#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use std::collections::HashMap;

use crate::domain::models::ChatAnswer;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ImageLoadState;
use crate::domain::models::ImageProbe;
use crate::domain::models::Message;
use crate::domain::models::MessageKind;
use crate::domain::models::PdfFile;
use crate::domain::models::Sender;
use crate::domain::models::Session;

pub const CHAT_FALLBACK_TEXT: &str = "Sorry, I couldn't get an answer to that. Please try again.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    AwaitingResponse,
}

/// Drives one conversation. Only one question can be outstanding at a time.
pub struct ChatSession {
    session: Session,
    phase: ChatPhase,
    image_states: HashMap<String, ImageLoadState>,
}

impl ChatSession {
    pub fn new(session: Session) -> ChatSession {
        return ChatSession {
            session,
            phase: ChatPhase::Idle,
            image_states: HashMap::new(),
        };
    }

    pub fn id(&self) -> &str {
        return &self.session.id;
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    pub fn messages(&self) -> &[Message] {
        return self.session.messages();
    }

    pub fn phase(&self) -> ChatPhase {
        return self.phase;
    }

    pub fn is_waiting(&self) -> bool {
        return self.phase() == ChatPhase::AwaitingResponse;
    }

    /// Appends the question and returns the request to send, or nothing when
    /// the input is blank or a previous question is still pending.
    pub fn submit(&mut self, input: &str) -> Option<ChatPrompt> {
        let question = input.trim();
        if question.is_empty() || self.is_waiting() {
            return None;
        }

        self.session.push(Message::new(Sender::User, question));
        self.phase = ChatPhase::AwaitingResponse;

        return Some(ChatPrompt {
            session_id: self.session.id.to_string(),
            topic_id: self.session.topic_id.to_string(),
            question: question.to_string(),
        });
    }

    /// Failures become a fixed apology, the conversation always returns to
    /// idle. Returns the image to probe when the answer carries one.
    pub fn apply_answer(&mut self, res: Result<ChatAnswer, String>) -> Option<ImageProbe> {
        if !self.is_waiting() {
            tracing::warn!(session_id = self.id(), "Dropping answer with no pending question");
            return None;
        }
        self.phase = ChatPhase::Idle;

        let answer = match res {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(session_id = self.id(), error = %err, "Chat request failed");
                self.session.push(Message::new(Sender::Ai, CHAT_FALLBACK_TEXT));
                return None;
            }
        };

        let msg = Message::new_ai(&answer.text, answer.image);
        let probe = msg.image().map(|image| {
            return ImageProbe {
                session_id: self.session.id.to_string(),
                message_id: msg.id.to_string(),
                url: image.url.to_string(),
            };
        });
        if probe.is_some() {
            self.image_states
                .insert(msg.id.to_string(), ImageLoadState::Loading);
        }
        self.session.push(msg);

        return probe;
    }

    /// Image load state per message id, only for messages carrying an image.
    pub fn image_states(&self) -> &HashMap<String, ImageLoadState> {
        return &self.image_states;
    }

    pub fn set_image_status(&mut self, message_id: &str, loaded: bool) -> Option<ImageLoadState> {
        let state = self.image_states.get_mut(message_id)?;
        *state = state.transition(loaded);

        return Some(*state);
    }

    pub fn append_notice(&mut self, text: &str) {
        self.session.push(Message::new(Sender::System, text));
    }

    pub fn pdf_attachment(&self) -> Option<&PdfFile> {
        return self
            .messages()
            .iter()
            .find(|e| return e.kind() == MessageKind::Pdf)
            .and_then(|e| return e.file());
    }
}
