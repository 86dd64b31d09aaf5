use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::AppState;
use super::View;
use crate::domain::models::Action;
use crate::domain::models::ChatAnswer;
use crate::domain::models::ImageAttachment;
use crate::domain::models::ImageDescriptor;
use crate::domain::models::ImageLoadState;
use crate::domain::models::MessageKind;
use crate::domain::models::PdfFile;
use crate::domain::models::Sender;
use crate::domain::models::UploadResult;
use crate::domain::services::CHAT_FALLBACK_TEXT;

fn pdf() -> PdfFile {
    return PdfFile::new("photosynthesis.pdf", Some("application/pdf"), vec![1, 2]);
}

fn upload_result() -> UploadResult {
    return UploadResult {
        topic_id: "t1".to_string(),
        chunks_processed: 3,
        message: "ok".to_string(),
    };
}

fn app_state() -> AppState {
    let mut app_state = AppState::new("You");
    app_state.set_rect(Rect::new(0, 0, 100, 300));
    return app_state;
}

fn app_state_with_session() -> AppState {
    let mut app_state = app_state();
    let ticket = match app_state.begin_upload(pdf()) {
        Some(Action::Upload(ticket, _)) => ticket,
        _ => panic!("expected an upload"),
    };
    app_state.complete_upload(ticket, Ok(upload_result()));
    return app_state;
}

fn session_id(app_state: &AppState) -> String {
    return app_state.chat().unwrap().id().to_string();
}

fn image_answer() -> ChatAnswer {
    return ChatAnswer {
        text: "Here is the diagram.".to_string(),
        image: Some(ImageAttachment {
            id: "img-1".to_string(),
            filename: "fig1.png".to_string(),
            title: "Figure 1".to_string(),
            url: "http://x/static/images/fig1.png".to_string(),
        }),
    };
}

mod upload {
    use super::*;

    #[test]
    fn it_starts_without_a_session() {
        let app_state = app_state();

        assert_eq!(app_state.view(), View::NoSession);
        assert!(!app_state.is_uploading());
        assert!(app_state.bubble_list.is_empty());
    }

    #[test]
    fn it_creates_a_session_from_the_upload() {
        let app_state = app_state_with_session();
        let chat = app_state.chat().unwrap();

        assert_eq!(app_state.view(), View::Session);
        assert!(!app_state.is_uploading());
        assert_eq!(chat.session().topic_id, "t1");
        assert_eq!(chat.session().display_name, "PDF: photosynthesis.pdf");
        assert_eq!(chat.messages().len(), 2);

        let chip = &chat.messages()[0];
        assert_eq!(chip.sender, Sender::System);
        assert_eq!(chip.kind(), MessageKind::Pdf);
        assert_eq!(chip.text, "photosynthesis.pdf");

        let greeting = &chat.messages()[1];
        assert_eq!(greeting.sender, Sender::Ai);
        insta::assert_snapshot!(greeting.text, @"I've read photosynthesis.pdf and indexed 3 sections. Ask me anything about it.");
    }

    #[test]
    fn it_marks_busy_while_uploading() {
        let mut app_state = app_state();
        assert!(app_state.begin_upload(pdf()).is_some());

        assert!(app_state.is_uploading());
        assert_eq!(app_state.view(), View::NoSession);
        assert!(app_state.begin_upload(pdf()).is_none());
    }

    #[test]
    fn it_rejects_non_pdf_files() {
        let mut app_state = app_state();
        let action = app_state.begin_upload(PdfFile::new("image.png", Some("image/png"), vec![]));

        assert!(action.is_none());
        assert!(!app_state.is_uploading());
        assert_eq!(
            app_state.upload_surface.error(),
            Some("Please select a PDF file (.pdf extension)")
        );
    }

    #[test]
    fn it_reports_failures_on_the_upload_surface() {
        let mut app_state = app_state();
        let ticket = app_state.generation();
        app_state.begin_upload(pdf());
        app_state.complete_upload(ticket, Err("Internal Server Error".to_string()));

        assert_eq!(app_state.view(), View::NoSession);
        assert!(!app_state.is_uploading());
        assert_eq!(
            app_state.upload_surface.error(),
            Some("Upload failed: Internal Server Error")
        );
    }

    #[test]
    fn it_ignores_uploads_finishing_after_new_chat() {
        let mut app_state = app_state();
        let ticket = app_state.generation();
        app_state.begin_upload(pdf());
        app_state.new_chat();
        app_state.complete_upload(ticket, Ok(upload_result()));

        assert_eq!(app_state.view(), View::NoSession);
        assert!(app_state.chat().is_none());
        assert!(!app_state.is_uploading());
    }

    #[test]
    fn it_ignores_uploads_in_the_session_view() {
        let mut app_state = app_state_with_session();
        assert!(app_state.begin_upload(pdf()).is_none());
    }
}

mod chat {
    use super::*;

    #[test]
    fn it_sends_chat_requests() -> Result<()> {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);

        match app_state.submit("  What is chlorophyll?  ") {
            Some(Action::ChatRequest(prompt)) => {
                assert_eq!(prompt.session_id, id);
                assert_eq!(prompt.topic_id, "t1");
                assert_eq!(prompt.question, "What is chlorophyll?");
            }
            _ => bail!("Wrong enum"),
        }

        assert!(app_state.is_waiting());
        assert!(app_state.submit("Another?").is_none());

        return Ok(());
    }

    #[test]
    fn it_ignores_submits_without_a_session() {
        let mut app_state = app_state();
        assert!(app_state.submit("Hello").is_none());
    }

    #[test]
    fn it_appends_answers() {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);
        app_state.submit("What is chlorophyll?");

        let action = app_state.handle_chat_response(
            &id,
            Ok(ChatAnswer {
                text: "A pigment.".to_string(),
                image: None,
            }),
        );

        assert!(action.is_none());
        assert!(!app_state.is_waiting());
        let last = app_state.chat().unwrap().messages().last().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, "A pigment.");
    }

    #[test]
    fn it_appends_the_fallback_on_failure() {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);
        app_state.submit("What is chlorophyll?");
        app_state.handle_chat_response(&id, Err("Service Unavailable".to_string()));

        let messages = app_state.chat().unwrap().messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].text, "What is chlorophyll?");
        assert_eq!(messages[3].text, CHAT_FALLBACK_TEXT);
        assert!(!app_state.is_waiting());
    }

    #[test]
    fn it_drops_replies_for_discarded_sessions() {
        let mut app_state = app_state_with_session();
        let old_id = session_id(&app_state);
        app_state.submit("What is chlorophyll?");
        app_state.new_chat();

        let ticket = app_state.generation();
        app_state.begin_upload(pdf());
        app_state.complete_upload(ticket, Ok(upload_result()));

        let action = app_state.handle_chat_response(&old_id, Ok(image_answer()));

        assert!(action.is_none());
        assert_ne!(session_id(&app_state), old_id);
        assert_eq!(app_state.chat().unwrap().messages().len(), 2);
    }

    #[test]
    fn it_scrolls_to_new_messages() {
        let mut app_state = app_state_with_session();
        app_state.set_rect(Rect::new(0, 0, 100, 4));
        let id = session_id(&app_state);

        app_state.submit("What is chlorophyll?");
        app_state.handle_chat_response(
            &id,
            Ok(ChatAnswer {
                text: "A pigment.".to_string(),
                image: None,
            }),
        );

        assert_eq!(
            app_state.scroll.position,
            app_state.bubble_list.len() - 4
        );
    }
}

mod images {
    use super::*;

    #[test]
    fn it_probes_attached_images() -> Result<()> {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);
        app_state.submit("Show me");

        let probe = match app_state.handle_chat_response(&id, Ok(image_answer())) {
            Some(Action::ProbeImage(probe)) => probe,
            _ => bail!("Wrong enum"),
        };

        assert_eq!(probe.session_id, id);
        assert_eq!(probe.url, "http://x/static/images/fig1.png");
        assert_eq!(
            app_state.chat().unwrap().image_states().get(&probe.message_id),
            Some(&ImageLoadState::Loading)
        );

        return Ok(());
    }

    #[test]
    fn it_never_revives_failed_images() -> Result<()> {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);
        app_state.submit("Show me");

        let probe = match app_state.handle_chat_response(&id, Ok(image_answer())) {
            Some(Action::ProbeImage(probe)) => probe,
            _ => bail!("Wrong enum"),
        };

        app_state.handle_image_status(&probe, false);
        app_state.handle_image_status(&probe, true);

        assert_eq!(
            app_state.chat().unwrap().image_states().get(&probe.message_id),
            Some(&ImageLoadState::Failed)
        );

        return Ok(());
    }

    #[test]
    fn it_follows_images_that_grow_the_last_bubble() -> Result<()> {
        let mut app_state = app_state_with_session();
        app_state.set_rect(Rect::new(0, 0, 100, 4));
        let id = session_id(&app_state);
        app_state.submit("Show me");

        let probe = match app_state.handle_chat_response(&id, Ok(image_answer())) {
            Some(Action::ProbeImage(probe)) => probe,
            _ => bail!("Wrong enum"),
        };
        let loading_len = app_state.bubble_list.len();
        assert_eq!(app_state.scroll.position, loading_len - 4);

        app_state.handle_image_status(&probe, true);

        assert!(app_state.bubble_list.len() > loading_len);
        assert_eq!(
            app_state.scroll.position,
            app_state.bubble_list.len() - 4
        );

        return Ok(());
    }

    #[test]
    fn it_keeps_the_reading_position_when_scrolled_up() -> Result<()> {
        let mut app_state = app_state_with_session();
        app_state.set_rect(Rect::new(0, 0, 100, 4));
        let id = session_id(&app_state);
        app_state.submit("Show me");

        let probe = match app_state.handle_chat_response(&id, Ok(image_answer())) {
            Some(Action::ProbeImage(probe)) => probe,
            _ => bail!("Wrong enum"),
        };
        app_state.scroll.up();
        let position = app_state.scroll.position;

        app_state.handle_image_status(&probe, true);

        assert_eq!(app_state.scroll.position, position);

        return Ok(());
    }

    #[test]
    fn it_lists_topic_images_as_a_notice() -> Result<()> {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);

        match app_state.request_topic_images() {
            Some(Action::ListImages(session_id, topic_id)) => {
                assert_eq!(session_id, id);
                assert_eq!(topic_id, "t1");
            }
            _ => bail!("Wrong enum"),
        }

        app_state.handle_topic_images(
            &id,
            Ok(vec![ImageDescriptor {
                id: "img-1".to_string(),
                filename: "fig1.png".to_string(),
                title: "Light reactions".to_string(),
                keywords: vec![],
                description: "".to_string(),
            }]),
        );

        let last = app_state.chat().unwrap().messages().last().unwrap();
        assert_eq!(last.sender, Sender::System);
        insta::assert_snapshot!(last.text, @r###"
        Diagrams in this document:
        - (1) Light reactions [fig1.png]
        "###);

        return Ok(());
    }

    #[test]
    fn it_reports_empty_topic_images() {
        let mut app_state = app_state_with_session();
        let id = session_id(&app_state);
        app_state.handle_topic_images(&id, Ok(vec![]));

        let last = app_state.chat().unwrap().messages().last().unwrap();
        assert_eq!(last.text, "No diagrams were found in this document.");
    }
}

mod handle_slash_commands {
    use super::*;

    #[test]
    fn it_breaks_on_quit() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        let (should_break, handled) = app_state.handle_slash_commands("/q", &tx)?;

        assert!(should_break);
        assert!(handled);

        return Ok(());
    }

    #[test]
    fn it_ignores_regular_questions() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        let (should_break, handled) =
            app_state.handle_slash_commands("What is /n in this equation?", &tx)?;

        assert!(!should_break);
        assert!(!handled);

        return Ok(());
    }

    #[test]
    fn it_starts_a_new_chat() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        let (should_break, handled) = app_state.handle_slash_commands("/new", &tx)?;

        assert!(!should_break);
        assert!(handled);
        assert_eq!(app_state.view(), View::NoSession);
        assert!(app_state.bubble_list.is_empty());

        return Ok(());
    }

    #[test]
    fn it_opens_the_pdf() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        app_state.handle_slash_commands("/open", &tx)?;

        match rx.try_recv()? {
            Action::OpenPdf(file) => {
                assert_eq!(file.name, "photosynthesis.pdf");
                assert_eq!(file.contents(), &[1, 2]);
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_lists_images() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        app_state.handle_slash_commands("/i", &tx)?;

        match rx.try_recv()? {
            Action::ListImages(_, topic_id) => {
                assert_eq!(topic_id, "t1");
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_shows_help() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_session();
        app_state.handle_slash_commands("/help", &tx)?;

        let last = app_state.chat().unwrap().messages().last().unwrap();
        assert_eq!(last.sender, Sender::System);
        assert!(last.text.starts_with("COMMANDS:"));

        return Ok(());
    }

    #[test]
    fn it_reports_missing_pdfs_without_a_session() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();
        app_state.handle_slash_commands("/open", &tx)?;

        assert!(rx.try_recv().is_err());
        assert_eq!(
            app_state.upload_surface.error(),
            Some("There's no PDF to open yet.")
        );

        return Ok(());
    }
}
