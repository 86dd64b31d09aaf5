use tui_textarea::Input;

use super::ChatAnswer;
use super::ImageDescriptor;
use super::ImageProbe;
use super::UploadResult;

pub enum Event {
    ChatResponse(String, Result<ChatAnswer, String>),
    ImageStatus(ImageProbe, bool),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardCTRLO(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardNewline(),
    KeyboardPaste(String),
    Notice(String),
    TopicImages(String, Result<Vec<ImageDescriptor>, String>),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
    UploadResponse(u64, Result<UploadResult, String>),
}
