use super::ChatPrompt;
use super::ImageProbe;
use super::PdfFile;

pub enum Action {
    ChatRequest(ChatPrompt),
    ListImages(String, String),
    OpenPdf(PdfFile),
    ProbeImage(ImageProbe),
    /// Upload tagged with the generation that issued it.
    Upload(u64, PdfFile),
}
