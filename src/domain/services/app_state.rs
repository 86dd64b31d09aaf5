#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::BubbleList;
use super::ChatSession;
use super::Scroll;
use super::UploadSurface;
use crate::domain::models::Action;
use crate::domain::models::ChatAnswer;
use crate::domain::models::ImageDescriptor;
use crate::domain::models::ImageProbe;
use crate::domain::models::PdfFile;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;
use crate::domain::models::UploadResult;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /open (/o) - Opens the uploaded PDF in your system viewer.
- /images (/i) - Lists the diagrams the tutor found in your document.
- /new (/n) - Discards this conversation and returns to the upload screen.
- /quit /exit (/q) - Exit.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Enter - Send your question
- Alt+Enter / Shift+Enter - New line
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+O - Open the uploaded PDF
- CTRL+N - New chat
- CTRL+C - Exit
        "#;

    return text.trim().to_string();
}

fn format_topic_images(images: &[ImageDescriptor]) -> String {
    if images.is_empty() {
        return "No diagrams were found in this document.".to_string();
    }

    let list = images
        .iter()
        .enumerate()
        .map(|(idx, image)| {
            let n = idx + 1;
            return format!("- ({n}) {} [{}]", image.title, image.filename);
        })
        .collect::<Vec<String>>();

    return format!("Diagrams in this document:\n{}", list.join("\n"));
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    NoSession,
    Session,
}

/// Owns the single live conversation and every transition between the upload
/// screen and the chat. Results from background work carry the ticket of
/// whatever issued them and are dropped when that owner is gone.
pub struct AppState {
    pub bubble_list: BubbleList,
    pub last_known_height: usize,
    pub last_known_width: usize,
    pub scroll: Scroll,
    pub upload_surface: UploadSurface,
    chat: Option<ChatSession>,
    generation: u64,
    pending_upload: Option<PdfFile>,
}

impl AppState {
    pub fn new(username: &str) -> AppState {
        return AppState {
            bubble_list: BubbleList::new(username),
            last_known_height: 0,
            last_known_width: 0,
            scroll: Scroll::default(),
            upload_surface: UploadSurface::default(),
            chat: None,
            generation: 0,
            pending_upload: None,
        };
    }

    pub fn view(&self) -> View {
        if self.chat.is_some() {
            return View::Session;
        }

        return View::NoSession;
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        return self.chat.as_ref();
    }

    pub fn generation(&self) -> u64 {
        return self.generation;
    }

    pub fn is_uploading(&self) -> bool {
        return self.pending_upload.is_some();
    }

    pub fn is_waiting(&self) -> bool {
        return self.chat.as_ref().map(|e| return e.is_waiting()).unwrap_or(false);
    }

    /// Starts an upload from the landing view. Invalid files stay on the
    /// upload surface as an error.
    pub fn begin_upload(&mut self, file: PdfFile) -> Option<Action> {
        if self.view() != View::NoSession || self.is_uploading() {
            return None;
        }

        let file = self.upload_surface.validate(file).ok()?;
        tracing::debug!(name = file.name, generation = self.generation, "Uploading PDF");
        self.pending_upload = Some(file.clone());

        return Some(Action::Upload(self.generation(), file));
    }

    pub fn complete_upload(&mut self, ticket: u64, res: Result<UploadResult, String>) {
        if ticket != self.generation {
            tracing::debug!(
                ticket,
                generation = self.generation,
                "Dropping stale upload result"
            );
            return;
        }

        let file = match self.pending_upload.take() {
            Some(file) => file,
            None => return,
        };

        let upload = match res {
            Ok(upload) => upload,
            Err(err) => {
                tracing::error!(name = file.name, error = %err, "Upload failed");
                self.upload_surface
                    .report_error(&format!("Upload failed: {err}"));
                return;
            }
        };

        self.generation += 1;
        self.upload_surface.clear();
        self.chat = Some(ChatSession::new(Session::from_upload(file, &upload)));
        self.sync_dependants();
        self.scroll.last();
    }

    /// Drops the conversation without asking. Anything still in flight for it
    /// is ignored when it lands.
    pub fn new_chat(&mut self) {
        self.chat = None;
        self.pending_upload = None;
        self.generation += 1;
        self.upload_surface.clear();
        self.sync_dependants();
    }

    /// Applies `f` to the active conversation when `session_id` still names
    /// it. The view follows the newest content while it sits at the bottom.
    pub fn update_session<T>(
        &mut self,
        session_id: &str,
        f: impl FnOnce(&mut ChatSession) -> T,
    ) -> Option<T> {
        let was_at_bottom = self.scroll.is_at_bottom();
        let lines = self.bubble_list.len();
        let chat = match self.chat.as_mut() {
            Some(chat) if chat.id() == session_id => chat,
            _ => {
                tracing::debug!(session_id, "Dropping result for an inactive session");
                return None;
            }
        };

        let len = chat.messages().len();
        let res = f(chat);
        let grew = chat.messages().len() != len;

        self.sync_dependants();
        if grew || (was_at_bottom && self.bubble_list.len() > lines) {
            self.scroll.last();
        }

        return Some(res);
    }

    pub fn submit(&mut self, input: &str) -> Option<Action> {
        let session_id = self.chat.as_ref()?.id().to_string();
        let prompt = self
            .update_session(&session_id, |chat| return chat.submit(input))
            .flatten()?;

        return Some(Action::ChatRequest(prompt));
    }

    pub fn handle_chat_response(
        &mut self,
        session_id: &str,
        res: Result<ChatAnswer, String>,
    ) -> Option<Action> {
        let probe = self
            .update_session(session_id, |chat| return chat.apply_answer(res))
            .flatten()?;

        return Some(Action::ProbeImage(probe));
    }

    pub fn handle_image_status(&mut self, probe: &ImageProbe, loaded: bool) {
        self.update_session(&probe.session_id, |chat| {
            return chat.set_image_status(&probe.message_id, loaded);
        });
    }

    pub fn request_topic_images(&self) -> Option<Action> {
        let session = self.chat.as_ref()?.session();

        return Some(Action::ListImages(
            session.id.to_string(),
            session.topic_id.to_string(),
        ));
    }

    pub fn handle_topic_images(
        &mut self,
        session_id: &str,
        res: Result<Vec<ImageDescriptor>, String>,
    ) {
        let text = match res {
            Ok(images) => format_topic_images(&images),
            Err(err) => format!("Couldn't load the diagrams: {err}"),
        };

        self.update_session(session_id, |chat| return chat.append_notice(&text));
    }

    pub fn open_pdf(&self) -> Option<Action> {
        let file = self.chat.as_ref()?.pdf_attachment()?;
        return Some(Action::OpenPdf(file.clone()));
    }

    pub fn add_notice(&mut self, text: &str) {
        if let Some(session_id) = self.chat.as_ref().map(|e| return e.id().to_string()) {
            self.update_session(&session_id, |chat| return chat.append_notice(text));
            return;
        }

        self.upload_surface.report_error(text);
    }

    /// Returns (should_break, handled).
    pub fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, true));
        }

        if command.is_new_chat() {
            self.new_chat();
            return Ok((false, true));
        }

        if command.is_help() {
            self.add_notice(&help_text());
            return Ok((false, true));
        }

        if command.is_open_pdf() {
            match self.open_pdf() {
                Some(action) => tx.send(action)?,
                None => self.add_notice("There's no PDF to open yet."),
            }
            return Ok((false, true));
        }

        if command.is_list_images() {
            match self.request_topic_images() {
                Some(action) => tx.send(action)?,
                None => self.add_notice("Upload a PDF before asking for its diagrams."),
            }
            return Ok((false, true));
        }

        return Ok((false, false));
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = usize::from(rect.width);
        self.last_known_height = usize::from(rect.height);
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        match &self.chat {
            Some(chat) => {
                self.bubble_list.set_messages(
                    chat.messages(),
                    self.last_known_width,
                    chat.image_states(),
                );
            }
            None => {
                self.bubble_list
                    .set_messages(&[], self.last_known_width, &HashMap::new());
            }
        }

        self.scroll
            .set_state(self.bubble_list.len(), self.last_known_height);
    }
}
