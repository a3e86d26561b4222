//! haui-chat CLI: terminal client for the HaUI chatbot

use clap::{Parser, Subcommand};
use haui_chat_engine::{ChatSession, Config, HttpGenerator, MessageGenerator, Role};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = ".haui-chat/config.json";

const DEFAULT_LOG_FILTER: &str = "haui_chat=info";

/// Chat with the HaUI admissions chatbot from the terminal
#[derive(Parser)]
#[command(name = "haui-chat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to read
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true, env = "HAUI_CHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Write logs to this file while the chat window is open
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat window (default when no command specified)
    Tui,

    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        None | Some(Commands::Tui) => cmd_tui(&cli),
        Some(Commands::Ask { question }) => cmd_ask(&cli, &question.join(" ")),
        Some(Commands::Init { force }) => cmd_init(&cli.config, *force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to a file, or nowhere: stderr would tear the alternate screen.
fn init_file_logging(path: Option<&Path>) -> CliResult {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

fn init_stderr_logging() -> CliResult {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

fn cmd_tui(cli: &Cli) -> CliResult {
    init_file_logging(cli.log_file.as_deref())?;
    let config = load_config(cli)?;
    let generator = Arc::new(HttpGenerator::from_config(&config)?);
    tracing::info!(endpoint = %generator.url(), "starting chat window");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(haui_chat_tui::run_tui(&config, generator))
}

fn cmd_ask(cli: &Cli, question: &str) -> CliResult {
    init_stderr_logging()?;
    let config = load_config(cli)?;
    let generator = HttpGenerator::from_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut session = ChatSession::new();
    let Some(request) = session.begin_send(question) else {
        return Err("question is empty".into());
    };
    let result = rt.block_on(generator.generate(&request.body));
    let failed = result.is_err();
    session.apply_reply(request.id, result);

    if let Some(reply) = session
        .conversation()
        .last()
        .filter(|m| m.role() == Role::Bot)
    {
        println!("{}", reply.content());
    }

    if failed {
        return Err("request failed".into());
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> CliResult {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
