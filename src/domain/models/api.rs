#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ImageAttachment;
use super::ImageDescriptor;
use super::PdfFile;

fn server_message(status: &u16, body: &str) -> String {
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }

    return reqwest::StatusCode::from_u16(*status)
        .ok()
        .and_then(|e| return e.canonical_reason())
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return format!("HTTP {status}"));
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Could not reach the tutor service: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{}", server_message(.status, .body))]
    Server { status: u16, body: String },
    #[error("Unexpected response from the tutor service: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub topic_id: String,
    pub chunks_processed: u64,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub relevant_chunks: Vec<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub image_title: Option<String>,
}

/// A reply with its image reference resolved against the asset host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatAnswer {
    pub text: String,
    pub image: Option<ImageAttachment>,
}

impl ChatReply {
    pub fn resolve(self, api: &(dyn TutorApi + Send + Sync)) -> ChatAnswer {
        let filename = self.image_filename.unwrap_or_default();
        let image = api.image_url(Some(&filename)).map(|url| {
            return ImageAttachment {
                id: self.image_id.unwrap_or_else(|| return filename.to_string()),
                title: self.image_title.unwrap_or_else(|| return filename.to_string()),
                filename: filename.to_string(),
                url,
            };
        });

        return ChatAnswer {
            text: self.answer,
            image,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPrompt {
    pub session_id: String,
    pub topic_id: String,
    pub question: String,
}

#[async_trait]
pub trait TutorApi {
    /// Sends the document as multipart form data. The returned topic id
    /// correlates every later chat call for this upload.
    async fn upload_pdf(&self, file: &PdfFile) -> Result<UploadResult, ApiError>;

    async fn send_chat_message(
        &self,
        topic_id: &str,
        question: &str,
    ) -> Result<ChatReply, ApiError>;

    async fn get_topic_images(&self, topic_id: &str) -> Result<Vec<ImageDescriptor>, ApiError>;

    /// Fetches a static image to find out whether it can be displayed.
    async fn probe_image(&self, url: &str) -> Result<(), ApiError>;

    /// Pure URL construction against the asset host, no I/O. Empty or missing
    /// file names have no URL.
    fn image_url(&self, filename: Option<&str>) -> Option<String>;
}
