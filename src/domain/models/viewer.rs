use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::PdfFile;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViewerName {
    System,
    None,
}

impl ViewerName {
    pub fn parse(text: &str) -> Option<ViewerName> {
        return ViewerName::iter().find(|e| return e.to_string() == text);
    }
}

#[async_trait]
pub trait PdfViewer {
    fn name(&self) -> ViewerName;

    /// Shows the in-memory document outside of the terminal.
    async fn open(&self, file: &PdfFile) -> Result<()>;
}
