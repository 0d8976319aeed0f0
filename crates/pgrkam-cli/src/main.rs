//! pgrkam - terminal client for the PGRKAM employment assistant

mod commands;
mod config;
mod ui;

use clap::Parser;
use pgrkam_api::HttpChatClient;
use pgrkam_chat::{
    Chat, ChatConfig, ChatEvent, CommandRecognizerFactory, FileStorage, LANGUAGE_KEY, Language,
    MemoryStorage, NoSpeech, RecognizerFactory, SESSION_KEY, ScopedStorage,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// pgrkam - ask the PGRKAM assistant about jobs, training and schemes
#[derive(Parser, Debug)]
#[command(name = "pgrkam")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chat endpoint base (default: http://localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    /// Language to start in when none is saved (en, pa)
    #[arg(short, long)]
    language: Option<String>,

    /// Send a single question and print the reply
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Keep language and session in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Forget the saved language and session before starting
    #[arg(long)]
    forget: bool,

    /// External transcriber for speech input, e.g. "whisper-stream --language {lang}".
    /// Split on whitespace with no quoting; use `[speech] command` in the config
    /// file for arguments that contain spaces.
    #[arg(long)]
    speech_command: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

fn parse_language(code: &str) -> Option<Language> {
    let language = Language::from_code(code);
    if language.is_none() {
        eprintln!("Warning: Unknown language '{}', using English", code);
    }
    language
}

/// Transcriber argv: the CLI string split on whitespace, else the configured argv
fn speech_argv(cli: Option<&str>, configured: Option<&[String]>) -> Option<Vec<String>> {
    match cli {
        Some(command) => Some(command.split_whitespace().map(String::from).collect()),
        None => configured.map(<[String]>::to_vec),
    }
}

/// Where logs go while the TUI owns the terminal
fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pgrkam")
        .join("pgrkam.log")
}

fn init_tracing(verbose: bool, to_file: bool) {
    let filter = if verbose {
        EnvFilter::new("pgrkam_api=debug,pgrkam_chat=debug,pgrkam_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if to_file {
        let path = log_path();
        let file = path
            .parent()
            .map(std::fs::create_dir_all)
            .transpose()
            .and_then(|_| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
            });
        // Without a log file stay silent; stderr would corrupt the TUI
        if let Ok(file) = file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let use_tui = args.command.is_none() && !args.no_tui && cfg.tui.unwrap_or(true);
    init_tracing(args.verbose, use_tui);

    // Merge config with CLI args (CLI takes precedence)
    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| cfg.api_url().to_string());
    let timeout = Duration::from_secs(args.timeout.unwrap_or_else(|| cfg.timeout_secs()));
    let default_language = args
        .language
        .as_deref()
        .or(cfg.language.as_deref())
        .and_then(parse_language)
        .unwrap_or_default();
    let ephemeral = args.ephemeral || cfg.ephemeral.unwrap_or(false);

    let api = Arc::new(HttpChatClient::with_timeout(api_url, timeout)?);
    tracing::debug!(endpoint = %api.endpoint(), "using chat endpoint");

    let storage: Arc<dyn ScopedStorage> = if ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::open_or_reset(FileStorage::default_path()))
    };
    if args.forget {
        storage.remove(LANGUAGE_KEY);
        storage.remove(SESSION_KEY);
    }

    let argv = speech_argv(args.speech_command.as_deref(), cfg.speech.command.as_deref());
    let speech: Arc<dyn RecognizerFactory> = match argv
        .as_deref()
        .and_then(CommandRecognizerFactory::from_argv)
    {
        Some(factory) => Arc::new(factory),
        None => Arc::new(NoSpeech),
    };

    let config = ChatConfig {
        default_language,
        ..Default::default()
    };
    let mut chat = Chat::new(config, api, storage, speech);

    // Non-interactive mode
    if let Some(command) = args.command {
        return run_command(&mut chat, &command).await;
    }

    // TUI mode
    if use_tui {
        return ui::run_tui(chat, cfg.theme()).await;
    }

    // Interactive mode (simple stdin/stdout)
    run_interactive(&mut chat).await
}

/// Print what the controller reported since the last call
fn print_events(events: &mut broadcast::Receiver<ChatEvent>) {
    loop {
        match events.try_recv() {
            Ok(ChatEvent::MessageAppended { message }) if message.is_assistant() => {
                println!("{}", message.content);
                println!();
            }
            Ok(ChatEvent::Error { state }) => {
                eprintln!("⚠ {}", state.message);
                eprintln!();
            }
            Ok(ChatEvent::LanguageChanged { language }) => {
                println!("[Language: {}]", language.native_name());
            }
            Ok(ChatEvent::SessionChanged { session_id }) => {
                tracing::debug!(%session_id, "session assigned");
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("Skipped {} chat events", n);
            }
            Err(_) => break,
        }
    }
}

async fn run_command(chat: &mut Chat, command: &str) -> anyhow::Result<()> {
    let mut events = chat.subscribe();
    chat.set_draft(command);
    if !chat.send().await {
        eprintln!("Error: Nothing to send");
        std::process::exit(2);
    }
    print_events(&mut events);

    if chat.error().has_error {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_interactive(chat: &mut Chat) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let mut events = chat.subscribe();

    // Show the greeting and a hint (hint only if TTY)
    if let Some(greeting) = chat.messages().first() {
        println!("{}", greeting.content);
        println!();
    }
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("Type /help for commands, /quit to exit.");
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Handle slash commands
        if input.starts_with('/') {
            if let Some(result) = commands::execute_command(input, chat) {
                match result {
                    commands::CommandResult::Reset => {
                        chat.reset();
                        print_events(&mut events);
                        if let Some(greeting) = chat.messages().first() {
                            println!("{}", greeting.content);
                            println!();
                        }
                    }
                    commands::CommandResult::SetLanguage(language) => {
                        chat.set_language(language);
                        print_events(&mut events);
                    }
                    commands::CommandResult::ToggleLanguage => {
                        chat.toggle_language();
                        print_events(&mut events);
                    }
                    commands::CommandResult::UseExample(index) => {
                        if chat.use_example(index) {
                            println!("> {}", chat.draft());
                            chat.send().await;
                            print_events(&mut events);
                        }
                    }
                    commands::CommandResult::Message(msg) => {
                        println!("{}", msg);
                    }
                    commands::CommandResult::Exit => {
                        break;
                    }
                    commands::CommandResult::Unknown(cmd) => {
                        println!("Unknown command: /{}", cmd);
                        println!("Type /help for available commands.");
                    }
                }
            }
            continue;
        }

        chat.set_draft(input);
        chat.send().await;
        print_events(&mut events);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_argv_prefers_cli_and_splits_on_whitespace() {
        let configured = vec!["transcribe".to_string(), "--model".to_string(), "small en".to_string()];
        assert_eq!(
            speech_argv(Some("whisper-stream  --language {lang}"), Some(configured.as_slice())),
            Some(vec![
                "whisper-stream".to_string(),
                "--language".to_string(),
                "{lang}".to_string()
            ])
        );
        // The config argv keeps arguments with spaces intact
        assert_eq!(speech_argv(None, Some(configured.as_slice())), Some(configured.clone()));
        assert_eq!(speech_argv(None, None), None);
    }

    #[test]
    fn test_cli_args_parse() {
        let args = Args::try_parse_from([
            "pgrkam",
            "--speech-command",
            "transcribe {lang}",
            "--language",
            "pa",
            "--no-tui",
        ])
        .unwrap();
        assert_eq!(args.speech_command.as_deref(), Some("transcribe {lang}"));
        assert_eq!(args.language.as_deref(), Some("pa"));
        assert!(args.no_tui);
    }
}
