use super::Message;
use super::MessageKind;
use crate::domain::models::ImageAttachment;
use crate::domain::models::PdfFile;
use crate::domain::models::Sender;

#[test]
fn it_executes_new() {
    let msg = Message::new(Sender::User, "Hi there!");
    assert_eq!(msg.sender, Sender::User);
    assert_eq!(msg.text, "Hi there!".to_string());
    assert_eq!(msg.kind(), MessageKind::Text);
    assert!(msg.file().is_none());
    assert!(msg.image().is_none());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(Sender::Ai, "\t\tHi there!");
    assert_eq!(msg.text, "    Hi there!".to_string());
}

#[test]
fn it_creates_unique_ids_within_the_same_tick() {
    let ids = (0..100)
        .map(|_| return Message::new(Sender::User, "same").id)
        .collect::<std::collections::HashSet<String>>();

    assert_eq!(ids.len(), 100);
}

#[test]
fn it_creates_pdf_attachments() {
    let file = PdfFile::new("biology.pdf", Some("application/pdf"), vec![1, 2, 3]);
    let msg = Message::new_pdf(file);

    assert_eq!(msg.sender, Sender::System);
    assert_eq!(msg.kind(), MessageKind::Pdf);
    assert_eq!(msg.text, "biology.pdf");
    assert_eq!(msg.file().unwrap().contents(), &[1, 2, 3]);
}

#[test]
fn it_creates_ai_messages_with_images() {
    let image = ImageAttachment {
        id: "img-1".to_string(),
        filename: "fig1.png".to_string(),
        title: "Figure 1".to_string(),
        url: "http://localhost:8000/static/images/fig1.png".to_string(),
    };
    let msg = Message::new_ai("Look at this.", Some(image.clone()));

    assert_eq!(msg.sender, Sender::Ai);
    assert_eq!(msg.kind(), MessageKind::Text);
    assert_eq!(msg.image(), Some(&image));
}

#[test]
fn it_wraps_lines() {
    let msg = Message::new(
        Sender::Ai,
        "The mitochondria is the powerhouse of the cell.\n\nIt makes ATP.",
    );

    assert_eq!(
        msg.as_string_lines(20),
        vec![
            "The mitochondria is",
            "the powerhouse of",
            "the cell.",
            "",
            "It makes ATP.",
        ]
    );
}

#[test]
fn it_splits_words_wider_than_the_line() {
    let msg = Message::new(Sender::Ai, "see abcdefghijkl now");

    assert_eq!(msg.as_string_lines(5), vec!["see", "abcde", "fghij", "kl", "now"]);
}
