mod action;
mod api;
mod event;
mod image;
mod loading;
mod message;
mod pdf_file;
mod sender;
mod session;
mod slash_commands;
mod textarea;
mod viewer;

pub use action::*;
pub use api::*;
pub use event::*;
pub use image::*;
pub use loading::*;
pub use message::*;
pub use pdf_file::*;
pub use sender::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use viewer::*;
