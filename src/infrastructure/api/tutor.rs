#[cfg(test)]
#[path = "tutor_test.rs"]
mod tests;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::ChatReply;
use crate::domain::models::ImageDescriptor;
use crate::domain::models::PdfFile;
use crate::domain::models::TutorApi;
use crate::domain::models::UploadResult;
use crate::domain::models::PDF_MIME_TYPE;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRequest {
    topic_id: String,
    question: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TopicImagesResponse {
    images: Vec<ImageDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSettings {
    pub api_url: String,
    pub asset_url: String,
}

impl Default for ApiSettings {
    fn default() -> ApiSettings {
        return ApiSettings {
            api_url: Config::get(ConfigKey::ApiURL),
            asset_url: Config::get(ConfigKey::AssetURL),
        };
    }
}

/// Reads a JSON body, turning non-2xx statuses into `ApiError::Server` with
/// the body text as the message.
async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ApiError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        tracing::error!(status = status.as_u16(), body = %body, "Tutor service request failed");
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }

    return Ok(serde_json::from_str::<T>(&body)?);
}

pub struct TutorClient {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl Default for TutorClient {
    fn default() -> TutorClient {
        return TutorClient::new(ApiSettings::default());
    }
}

impl TutorClient {
    pub fn new(settings: ApiSettings) -> TutorClient {
        return TutorClient {
            client: reqwest::Client::new(),
            settings,
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{}{path}", self.settings.api_url.trim_end_matches('/'));
    }
}

#[async_trait]
impl TutorApi for TutorClient {
    #[allow(clippy::implicit_return)]
    async fn upload_pdf(&self, file: &PdfFile) -> Result<UploadResult, ApiError> {
        tracing::debug!(name = file.name, "Uploading PDF to the tutor service");

        let part = reqwest::multipart::Part::bytes(file.contents().to_vec())
            .file_name(file.name.to_string())
            .mime_str(PDF_MIME_TYPE)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.endpoint("/upload"))
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Failed to reach the tutor service");
                return ApiError::from(err);
            })?;

        return read_json::<UploadResult>(res).await;
    }

    #[allow(clippy::implicit_return)]
    async fn send_chat_message(
        &self,
        topic_id: &str,
        question: &str,
    ) -> Result<ChatReply, ApiError> {
        tracing::debug!(topic_id, "Sending chat message");

        let req = ChatRequest {
            topic_id: topic_id.to_string(),
            question: question.to_string(),
        };

        let res = self
            .client
            .post(self.endpoint("/chat"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&req)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Failed to reach the tutor service");
                return ApiError::from(err);
            })?;

        return read_json::<ChatReply>(res).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_topic_images(&self, topic_id: &str) -> Result<Vec<ImageDescriptor>, ApiError> {
        tracing::debug!(topic_id, "Fetching topic images");

        let res = self
            .client
            .get(self.endpoint(&format!("/images/{topic_id}")))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Failed to reach the tutor service");
                return ApiError::from(err);
            })?;

        return Ok(read_json::<TopicImagesResponse>(res).await?.images);
    }

    #[allow(clippy::implicit_return)]
    async fn probe_image(&self, url: &str) -> Result<(), ApiError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Image is unavailable");
            return Err(ApiError::Server {
                status: status.as_u16(),
                body: "".to_string(),
            });
        }

        return Ok(());
    }

    fn image_url(&self, filename: Option<&str>) -> Option<String> {
        let filename = filename.filter(|e| return !e.is_empty())?;

        return Some(format!(
            "{}/static/images/{filename}",
            self.settings.asset_url.trim_end_matches('/')
        ));
    }
}
