#[cfg(test)]
#[path = "pdf_file_test.rs"]
mod tests;

use std::fmt;
use std::path;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use tokio::fs;

pub const PDF_MIME_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// An uploaded document held in memory. Clones share the same bytes, and the
/// contents only live as long as the last clone.
#[derive(Clone)]
pub struct PdfFile {
    pub name: String,
    pub mime_type: Option<String>,
    contents: Arc<[u8]>,
}

impl fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("PdfFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.contents.len())
            .finish();
    }
}

impl PdfFile {
    pub fn new(name: &str, mime_type: Option<&str>, contents: Vec<u8>) -> PdfFile {
        return PdfFile {
            name: name.to_string(),
            mime_type: mime_type.map(|e| return e.to_string()),
            contents: Arc::from(contents),
        };
    }

    /// Reads a file from disk. The MIME type is only set when the contents
    /// carry the PDF header.
    pub async fn load(file_path: &path::Path) -> Result<PdfFile> {
        if !file_path.is_file() {
            bail!(format!("No file found at {}", file_path.display()));
        }

        let name = match file_path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => bail!(format!("{} is not a file", file_path.display())),
        };

        let contents = fs::read(file_path).await?;
        let mut mime_type = None;
        if contents.starts_with(PDF_MAGIC) {
            mime_type = Some(PDF_MIME_TYPE);
        }

        tracing::debug!(
            path = ?file_path,
            len = contents.len(),
            mime_type = mime_type,
            "Loaded file"
        );

        return Ok(PdfFile::new(&name, mime_type, contents));
    }

    pub fn contents(&self) -> &[u8] {
        return &self.contents;
    }

    pub fn is_pdf(&self) -> bool {
        if self.mime_type.as_deref() == Some(PDF_MIME_TYPE) {
            return true;
        }

        return self.name.to_lowercase().ends_with(".pdf");
    }
}
