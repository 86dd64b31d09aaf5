#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use domain::models::ViewerName;
use infrastructure::api::TutorClient;
use infrastructure::viewers::ViewerManager;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! pdftutor has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

/// Writes JSON logs to the debug log when `RUST_LOG` mentions pdftutor.
/// Nothing is created on disk otherwise.
async fn init_logging() -> Result<Option<WorkerGuard>> {
    if !cli::log_enabled(&env::var("RUST_LOG").unwrap_or_default()) {
        return Ok(None);
    }

    let log_path = cli::log_path();
    let file = cli::open_log_file(&log_path)
        .await
        .with_context(|| return format!("Failed to open log file {}", log_path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Ok(Some(guard));
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let _log_guard = match init_logging().await {
        Ok(guard) => guard,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let launch = match cli::parse().await {
        Ok(Some(launch)) => launch,
        Ok(None) => return,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let viewer = match ViewerName::parse(&Config::get(ConfigKey::Viewer))
        .ok_or_else(|| return anyhow::anyhow!("Unknown viewer"))
        .and_then(ViewerManager::get)
    {
        Ok(viewer) => viewer,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(
            Arc::new(TutorClient::default()),
            Arc::from(viewer),
            event_tx,
            &mut action_rx,
        )
        .await;
    });

    let ui_future = ui::start(action_tx, event_rx, launch);

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    if let Err(err) = res {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    // Dropping the actions service removes the viewer's temporary copies.
    background_futures.shutdown().await;
}
