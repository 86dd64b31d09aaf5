use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::cli::Launch;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::PdfFile;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::UploadSurface;
use crate::domain::services::View;

const PATH_INPUT_TITLE: &str = "PDF path (Enter to upload)";

fn input_for(view: View) -> tui_textarea::TextArea<'static> {
    if view == View::NoSession {
        return TextArea::with_title(PATH_INPUT_TITLE);
    }

    return TextArea::default();
}

/// Reads the file at `input` and starts uploading it. Problems are shown on
/// the upload surface.
async fn upload_from_path(
    app_state: &mut AppState,
    input: &str,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    let file_path = match UploadSurface::parse_path(input) {
        Some(file_path) => file_path,
        None => return Ok(false),
    };

    let file = match PdfFile::load(&file_path).await {
        Ok(file) => file,
        Err(err) => {
            app_state.upload_surface.drag_leave();
            app_state.upload_surface.report_error(&err.to_string());
            return Ok(false);
        }
    };

    if let Some(action) = app_state.begin_upload(file) {
        tx.send(action)?;
        return Ok(true);
    }

    return Ok(false);
}

fn draw_no_session<B: Backend>(
    frame: &mut Frame<B>,
    app_state: &AppState,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Max(3)])
        .split(frame.size());

    let uploading = app_state.is_uploading();
    app_state
        .upload_surface
        .render(frame, layout[0], uploading);

    if uploading {
        loading.render(frame, layout[1]);
    } else {
        frame.render_widget(textarea.widget(), layout[1]);
    }
}

fn draw_session<B: Backend>(
    frame: &mut Frame<B>,
    app_state: &mut AppState,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Max(4),
        ])
        .split(frame.size());

    let title = app_state
        .chat()
        .map(|e| return e.session().display_name.to_string())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                "  Ctrl+O open PDF, Ctrl+N new chat, /help",
                Style {
                    fg: Some(Color::DarkGray),
                    ..Style::default()
                },
            ),
        ])),
        layout[0],
    );

    if usize::from(layout[1].width) != app_state.last_known_width
        || usize::from(layout[1].height) != app_state.last_known_height
    {
        app_state.set_rect(layout[1]);
    }

    app_state
        .bubble_list
        .render(frame, layout[1], app_state.scroll.position);
    if !app_state.bubble_list.is_empty() {
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            layout[1].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app_state.scroll.scrollbar_state,
        );
    }

    if app_state.is_waiting() {
        loading.render(frame, layout[2]);
    } else {
        frame.render_widget(textarea.widget(), layout[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    launch: Launch,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut view = app_state.view();
    let mut textarea = input_for(view);
    let mut loading = Loading::new("Processing PDF");

    if let Some(file_path) = launch.file {
        upload_from_path(app_state, &file_path.to_string_lossy(), &tx).await?;
    }

    loop {
        if app_state.view() != view {
            view = app_state.view();
            textarea = input_for(view);
            if view == View::Session {
                loading = Loading::new("AI Tutor is thinking");
            } else {
                loading = Loading::new("Processing PDF");
            }
        }

        terminal.draw(|frame| {
            if view == View::Session {
                draw_session(frame, app_state, &textarea, &loading);
            } else {
                draw_no_session(frame, app_state, &textarea, &loading);
            }
        })?;

        let busy = app_state.is_uploading() || app_state.is_waiting();

        match events.next().await? {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLN() => {
                app_state.new_chat();
                textarea = input_for(app_state.view());
            }
            Event::KeyboardCTRLO() => {
                if let Some(action) = app_state.open_pdf() {
                    tx.send(action)?;
                }
            }
            Event::KeyboardEsc() => {
                if view == View::NoSession && !busy {
                    app_state.upload_surface.clear();
                    textarea = input_for(view);
                }
            }
            Event::KeyboardPaste(text) => {
                if busy {
                    continue;
                }

                if view == View::NoSession {
                    if let Some(file_path) = UploadSurface::parse_path(&text) {
                        app_state.upload_surface.drag_enter();
                        textarea = input_for(view);
                        textarea.insert_str(file_path.to_string_lossy());
                    }
                } else {
                    textarea.insert_str(text);
                }
            }
            Event::KeyboardNewline() => {
                if view == View::Session && !busy {
                    textarea.insert_newline();
                }
            }
            Event::KeyboardCharInput(input) => {
                if !busy {
                    if view == View::NoSession {
                        app_state.upload_surface.drag_leave();
                    }
                    textarea.input(input);
                }
            }
            Event::KeyboardEnter() => {
                if busy {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                let (should_break, handled) = app_state.handle_slash_commands(&input_str, &tx)?;
                if should_break {
                    break;
                }
                if handled {
                    textarea = input_for(app_state.view());
                    continue;
                }

                if view == View::NoSession {
                    if upload_from_path(app_state, &input_str, &tx).await? {
                        textarea = input_for(view);
                    }
                    continue;
                }

                if let Some(action) = app_state.submit(&input_str) {
                    textarea = input_for(view);
                    tx.send(action)?;
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                loading.tick();
            }
            Event::UIResize() => (),
            Event::UploadResponse(ticket, res) => {
                app_state.complete_upload(ticket, res);
            }
            Event::ChatResponse(session_id, res) => {
                if let Some(action) = app_state.handle_chat_response(&session_id, res) {
                    tx.send(action)?;
                }
            }
            Event::ImageStatus(probe, loaded) => {
                app_state.handle_image_status(&probe, loaded);
            }
            Event::TopicImages(session_id, res) => {
                app_state.handle_topic_images(&session_id, res);
            }
            Event::Notice(text) => {
                app_state.add_notice(&text);
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    launch: Launch,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::new(&Config::get(ConfigKey::Username));

    start_loop(&mut terminal, &mut app_state, tx, rx, launch).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
