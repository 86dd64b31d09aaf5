use std::path::Path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::domain::models::PdfFile;
use crate::domain::models::PdfViewer;
use crate::domain::models::ViewerName;

fn open_command(path: &Path) -> (&'static str, Vec<String>) {
    let path = path.to_string_lossy().to_string();

    if cfg!(target_os = "macos") {
        return ("open", vec![path]);
    }

    if cfg!(target_os = "windows") {
        return (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), "".to_string(), path],
        );
    }

    return ("xdg-open", vec![path]);
}

/// Hands documents to the desktop's default PDF application. The bytes only
/// live in memory, so each open writes a temporary copy that is removed when
/// the process exits.
#[derive(Default)]
pub struct SystemViewer {
    open_files: Mutex<Vec<TempPath>>,
}

impl SystemViewer {
    async fn write_temp_copy(&self, file: &PdfFile) -> Result<TempPath> {
        let temp_path = tempfile::Builder::new()
            .prefix("pdftutor-")
            .suffix(".pdf")
            .tempfile()?
            .into_temp_path();

        let mut out = File::create(&temp_path).await?;
        out.write_all(file.contents()).await?;
        out.flush().await?;

        return Ok(temp_path);
    }
}

#[async_trait]
impl PdfViewer for SystemViewer {
    fn name(&self) -> ViewerName {
        return ViewerName::System;
    }

    #[allow(clippy::implicit_return)]
    async fn open(&self, file: &PdfFile) -> Result<()> {
        let temp_path = self.write_temp_copy(file).await?;
        let (program, args) = open_command(&temp_path);
        tracing::debug!(name = file.name, program, path = ?temp_path, "Opening PDF");

        let status = Command::new(program).args(args).status().await?;
        if !status.success() {
            tracing::error!(program, status = ?status.code(), "PDF viewer failed to start");
            bail!("Couldn't open {} with {program}", file.name);
        }

        self.open_files.lock().await.push(temp_path);

        return Ok(());
    }
}
