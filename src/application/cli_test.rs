use anyhow::Result;

use super::build;
use super::format_images;
use super::log_enabled;
use super::open_log_file;
use crate::domain::models::ImageDescriptor;
use crate::infrastructure::api::ApiSettings;
use crate::infrastructure::api::TutorClient;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_chat_with_a_file() -> Result<()> {
    let matches =
        build().try_get_matches_from(vec!["pdftutor", "chat", "--file", "/tmp/notes.pdf"])?;
    let (name, chat_matches) = matches.subcommand().unwrap();

    assert_eq!(name, "chat");
    assert_eq!(
        chat_matches.get_one::<String>("file").map(|e| return e.as_str()),
        Some("/tmp/notes.pdf")
    );

    return Ok(());
}

#[test]
fn it_requires_a_question_to_ask() {
    let res = build().try_get_matches_from(vec!["pdftutor", "ask", "--topic-id", "t1"]);
    assert!(res.is_err());
}

#[test]
fn it_rejects_unknown_viewers() {
    let res = build().try_get_matches_from(vec!["pdftutor", "--viewer", "acrobat"]);
    assert!(res.is_err());
}

#[test]
fn it_formats_topic_images() {
    let api = TutorClient::new(ApiSettings {
        api_url: "http://localhost:8000/api/v1".to_string(),
        asset_url: "http://localhost:8000".to_string(),
    });
    let images = vec![ImageDescriptor {
        id: "img-1".to_string(),
        filename: "fig1.png".to_string(),
        title: "Light reactions".to_string(),
        keywords: vec![],
        description: "".to_string(),
    }];

    insta::assert_snapshot!(format_images(&api, &images), @"- Light reactions [fig1.png] http://localhost:8000/static/images/fig1.png");
    insta::assert_snapshot!(format_images(&api, &[]), @"No diagrams were found for this topic.");
}

#[test]
fn it_only_logs_when_asked() {
    assert!(log_enabled("pdftutor=debug"));
    assert!(log_enabled("info,pdftutor"));
    assert!(!log_enabled(""));
    assert!(!log_enabled("debug"));
}

#[tokio::test]
async fn it_creates_the_log_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("nested").join("debug.log");

    open_log_file(&log_path).await?;
    assert!(log_path.exists());

    return Ok(());
}

#[tokio::test]
async fn it_reports_an_unwritable_log_directory() -> Result<()> {
    let blocker = tempfile::NamedTempFile::new()?;
    let log_path = blocker.path().join("logs").join("debug.log");

    let res = open_log_file(&log_path).await;
    assert!(res.is_err());
    assert!(!log_path.exists());

    return Ok(());
}
