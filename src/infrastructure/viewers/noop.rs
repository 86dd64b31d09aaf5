#[cfg(test)]
#[path = "noop_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::PdfFile;
use crate::domain::models::PdfViewer;
use crate::domain::models::ViewerName;

#[derive(Default)]
pub struct NoopViewer {}

#[async_trait]
impl PdfViewer for NoopViewer {
    fn name(&self) -> ViewerName {
        return ViewerName::None;
    }

    #[allow(clippy::implicit_return)]
    async fn open(&self, file: &PdfFile) -> Result<()> {
        tracing::debug!(name = file.name, "Viewer disabled, not opening PDF");
        return Ok(());
    }
}
