#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ImageDescriptor;
use crate::domain::models::PdfFile;
use crate::domain::models::TutorApi;
use crate::domain::models::ViewerName;
use crate::domain::services::help_text;
use crate::domain::services::INVALID_FILE_TEXT;
use crate::infrastructure::api::TutorClient;

/// What the terminal UI should do once it starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Launch {
    pub file: Option<path::PathBuf>,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn log_path() -> path::PathBuf {
    let log_dir = std::env::var("PDFTUTOR_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("pdftutor")
            .to_string_lossy()
            .to_string();
    });

    return path::PathBuf::from(log_dir).join("debug.log");
}

pub fn log_enabled(rust_log: &str) -> bool {
    return rust_log.contains("pdftutor");
}

/// Opens the debug log for appending, creating its directory first.
pub async fn open_log_file(log_path: &path::Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .await?;

    return Ok(file.into_std().await);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_pdf(matches: &ArgMatches) -> Result<PdfFile> {
    let file_path = match matches.get_one::<String>("file") {
        Some(file_path) => path::PathBuf::from(file_path),
        None => bail!("A file is required"),
    };

    let file = PdfFile::load(&file_path).await?;
    if !file.is_pdf() {
        bail!(INVALID_FILE_TEXT);
    }

    return Ok(file);
}

fn format_images(api: &TutorClient, images: &[ImageDescriptor]) -> String {
    if images.is_empty() {
        return "No diagrams were found for this topic.".to_string();
    }

    return images
        .iter()
        .map(|image| {
            let url = api.image_url(Some(&image.filename)).unwrap_or_default();
            return format!("- {} [{}] {url}", image.title, image.filename);
        })
        .collect::<Vec<String>>()
        .join("\n");
}

async fn upload(matches: &ArgMatches) -> Result<()> {
    let file = load_pdf(matches).await?;
    let res = TutorClient::default().upload_pdf(&file).await?;

    println!("Topic ID: {}", res.topic_id);
    println!("Sections indexed: {}", res.chunks_processed);
    if !res.message.is_empty() {
        println!("{}", res.message);
    }

    return Ok(());
}

async fn ask(matches: &ArgMatches) -> Result<()> {
    let (topic_id, question) = match (
        matches.get_one::<String>("topic-id"),
        matches.get_one::<String>("question"),
    ) {
        (Some(topic_id), Some(question)) => (topic_id, question),
        _ => bail!("A topic id and a question are required"),
    };

    let api = TutorClient::default();
    let answer = api
        .send_chat_message(topic_id, question)
        .await?
        .resolve(&api);

    println!("{}", answer.text);
    if let Some(image) = answer.image {
        println!("\nImage: {} {}", image.title, image.url);
    }

    return Ok(());
}

async fn images(matches: &ArgMatches) -> Result<()> {
    let topic_id = match matches.get_one::<String>("topic-id") {
        Some(topic_id) => topic_id,
        None => bail!("A topic id is required"),
    };

    let api = TutorClient::default();
    let images = api.get_topic_images(topic_id).await?;
    println!("{}", format_images(&api, &images));

    return Ok(());
}

fn arg_file(required: bool) -> Arg {
    return Arg::new("file")
        .short('f')
        .long("file")
        .num_args(1)
        .required(required)
        .help("Path to the PDF document.");
}

fn arg_topic_id() -> Arg {
    return Arg::new("topic-id")
        .short('t')
        .long("topic-id")
        .num_args(1)
        .required(true)
        .help("Topic ID returned when the document was uploaded.");
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Start the tutor. Passing a file uploads it right away.")
        .arg(arg_file(false));
}

fn subcommand_upload() -> Command {
    return Command::new("upload")
        .about("Upload a PDF without starting the tutor and print its topic ID.")
        .arg(arg_file(true));
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Ask a single question about an uploaded document.")
        .arg(arg_topic_id())
        .arg(
            Arg::new("question")
                .short('q')
                .long("question")
                .num_args(1)
                .required(true)
                .help("The question to ask."),
        );
}

fn subcommand_images() -> Command {
    return Command::new("images")
        .about("List the diagrams extracted from an uploaded document.")
        .arg(arg_topic_id());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for pdftutor")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running pdftutor with environment variable RUST_LOG=pdftutor")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("pdftutor")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_upload())
        .subcommand(subcommand_ask())
        .subcommand(subcommand_images())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ApiURL.as_str())
                .long(ConfigKey::ApiURL.as_str())
                .env("PDFTUTOR_API_URL")
                .num_args(1)
                .help(format!("Base URL of the tutor API. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::AssetURL.as_str())
                .long(ConfigKey::AssetURL.as_str())
                .env("PDFTUTOR_ASSET_URL")
                .num_args(1)
                .help(format!("Base URL serving the diagrams referenced in answers. [default: {}]", Config::default(ConfigKey::AssetURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.as_str())
                .short('c')
                .long(ConfigKey::ConfigFile.as_str())
                .env("PDFTUTOR_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Username.as_str())
                .short('u')
                .long(ConfigKey::Username.as_str())
                .env("PDFTUTOR_USERNAME")
                .num_args(1)
                .help(format!("Your name displayed on your chat bubbles. [default: {}]", Config::default(ConfigKey::Username)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Viewer.as_str())
                .long(ConfigKey::Viewer.as_str())
                .env("PDFTUTOR_VIEWER")
                .num_args(1)
                .help(format!("How uploaded documents are opened from the chat. [default: {}]", Config::default(ConfigKey::Viewer)))
                .value_parser(PossibleValuesParser::new(ViewerName::VARIANTS))
                .global(true),
        );
}

/// Handles every subcommand that does not need the terminal UI. Returns what
/// to launch, or nothing when the process is done.
pub async fn parse() -> Result<Option<Launch>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let file = subcmd_matches
                .get_one::<String>("file")
                .map(path::PathBuf::from);

            return Ok(Some(Launch { file }));
        }
        Some(("upload", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            upload(subcmd_matches).await?;
            return Ok(None);
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            ask(subcmd_matches).await?;
            return Ok(None);
        }
        Some(("images", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            images(subcmd_matches).await?;
            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Some(Launch::default()));
}
