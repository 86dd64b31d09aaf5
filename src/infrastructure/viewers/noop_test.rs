use anyhow::Result;
use test_utils::pdf_fixture;

use super::NoopViewer;
use crate::domain::models::PdfFile;
use crate::domain::models::PdfViewer;
use crate::domain::models::ViewerName;
use crate::infrastructure::viewers::ViewerManager;

#[tokio::test]
async fn it_opens_without_side_effects() -> Result<()> {
    let file = PdfFile::new("notes.pdf", None, pdf_fixture().to_vec());
    NoopViewer::default().open(&file).await?;

    return Ok(());
}

#[test]
fn it_is_returned_by_the_manager() -> Result<()> {
    let viewer = ViewerManager::get(ViewerName::None)?;
    assert_eq!(viewer.name(), ViewerName::None);

    let viewer = ViewerManager::get(ViewerName::System)?;
    assert_eq!(viewer.name(), ViewerName::System);

    return Ok(());
}
