#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Event;
use crate::domain::models::ImageProbe;
use crate::domain::models::PdfFile;
use crate::domain::models::PdfViewer;
use crate::domain::models::TutorApi;

pub type ApiArc = Arc<dyn TutorApi + Send + Sync>;
pub type ViewerArc = Arc<dyn PdfViewer + Send + Sync>;

async fn upload(
    api: ApiArc,
    ticket: u64,
    file: PdfFile,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let res = api
        .upload_pdf(&file)
        .await
        .map_err(|err| return err.to_string());

    tx.send(Event::UploadResponse(ticket, res))?;
    return Ok(());
}

async fn chat(api: ApiArc, prompt: ChatPrompt, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    let res = api
        .send_chat_message(&prompt.topic_id, &prompt.question)
        .await
        .map(|reply| return reply.resolve(api.as_ref()))
        .map_err(|err| return err.to_string());

    tx.send(Event::ChatResponse(prompt.session_id, res))?;
    return Ok(());
}

async fn list_images(
    api: ApiArc,
    session_id: String,
    topic_id: String,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let res = api
        .get_topic_images(&topic_id)
        .await
        .map_err(|err| return err.to_string());

    tx.send(Event::TopicImages(session_id, res))?;
    return Ok(());
}

async fn probe_image(
    api: ApiArc,
    probe: ImageProbe,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let loaded = api.probe_image(&probe.url).await.is_ok();

    tx.send(Event::ImageStatus(probe, loaded))?;
    return Ok(());
}

async fn open_pdf(
    viewer: ViewerArc,
    file: PdfFile,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::debug!(name = file.name, viewer = %viewer.name(), "Opening PDF");
    if let Err(err) = viewer.open(&file).await {
        tracing::error!(
            name = file.name,
            viewer = %viewer.name(),
            error = ?err,
            "Failed to open PDF"
        );
        tx.send(Event::Notice(format!("Couldn't open {}: {err}", file.name)))?;
    }

    return Ok(());
}

fn spawn_worker<F>(worker: F)
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = worker.await {
            tracing::error!(error = ?err, "Worker could not report its result");
        }
    });
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs each action on its own worker task. Results carry the ticket of
    /// whoever asked.
    pub async fn start(
        api: ApiArc,
        viewer: ViewerArc,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            let worker_api = api.clone();

            match action {
                Action::Upload(ticket, file) => {
                    spawn_worker(upload(worker_api, ticket, file, worker_tx));
                }
                Action::ChatRequest(prompt) => {
                    spawn_worker(chat(worker_api, prompt, worker_tx));
                }
                Action::ListImages(session_id, topic_id) => {
                    spawn_worker(list_images(worker_api, session_id, topic_id, worker_tx));
                }
                Action::ProbeImage(probe) => {
                    spawn_worker(probe_image(worker_api, probe, worker_tx));
                }
                Action::OpenPdf(file) => {
                    spawn_worker(open_pdf(viewer.clone(), file, worker_tx));
                }
            }
        }

        return Ok(());
    }
}
