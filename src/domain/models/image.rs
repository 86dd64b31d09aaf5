use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Diagram attached to an ai answer. The url is resolved when the answer
/// arrives and is never stored anywhere else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAttachment {
    pub id: String,
    pub filename: String,
    pub title: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub id: String,
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageLoadState {
    Loading,
    Loaded,
    Failed,
}

impl ImageLoadState {
    /// Loaded and Failed are terminal, a broken image is never retried.
    pub fn transition(self, loaded: bool) -> ImageLoadState {
        if self != ImageLoadState::Loading {
            return self;
        }

        if loaded {
            return ImageLoadState::Loaded;
        }

        return ImageLoadState::Failed;
    }
}

/// Identifies the image of one ai message within one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageProbe {
    pub session_id: String,
    pub message_id: String,
    pub url: String,
}
