//! Slash commands for line mode

use pgrkam_chat::{Chat, EXAMPLE_QUERIES, Language};

/// Result of parsing a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Start a new conversation
    Reset,
    /// Switch to a language
    SetLanguage(Language),
    /// Switch to the other language
    ToggleLanguage,
    /// Put an example query (zero-based) in the draft and send it
    UseExample(usize),
    /// Show a message to the user (not sent to the assistant)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command
pub fn execute_command(input: &str, chat: &Chat) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next().unwrap_or_default().to_lowercase();
    let args = parts.next().map(str::trim).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "reset" | "r" => CommandResult::Reset,

        "quit" | "exit" | "q" => CommandResult::Exit,

        "lang" | "l" => {
            if args.is_empty() {
                CommandResult::ToggleLanguage
            } else {
                match Language::from_code(args) {
                    Some(language) => CommandResult::SetLanguage(language),
                    None => CommandResult::Message(format!(
                        "Unknown language: {}. Use one of: {}",
                        args,
                        Language::ALL.map(|l| l.code()).join(", ")
                    )),
                }
            }
        }

        "examples" | "e" => CommandResult::Message(examples_message(chat)),

        "example" => match args.parse::<usize>() {
            Ok(n) if (1..=EXAMPLE_QUERIES.len()).contains(&n) => CommandResult::UseExample(n - 1),
            _ => CommandResult::Message(format!(
                "Usage: /example <1-{}>",
                EXAMPLE_QUERIES.len()
            )),
        },

        "session" | "s" => CommandResult::Message(session_message(chat)),

        _ => CommandResult::Unknown(command),
    })
}

fn examples_message(chat: &Chat) -> String {
    let strings = chat.strings();
    let mut out = format!("{} {}", strings.tip, strings.examples().join(" · "));
    for (i, query) in EXAMPLE_QUERIES.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, query));
    }
    out.push_str("\n\nUse /example <n> to ask one.");
    out
}

fn session_message(chat: &Chat) -> String {
    format!(
        "Language: {} ({})\nSession:  {}\nMessages: {}",
        chat.language().native_name(),
        chat.language().code(),
        chat.session_id().unwrap_or("(none yet)"),
        chat.messages().len()
    )
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?        Show this help message
  /reset, /r           Start a new conversation
  /lang, /l [en|pa]    Switch language (toggles without an argument)
  /examples, /e        List example questions
  /example <n>         Ask example question n
  /session, /s         Show language and session id
  /quit, /exit, /q     Exit

Anything else is sent to the assistant."#
        .to_string()
}
