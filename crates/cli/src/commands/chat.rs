//! `seriloka chat`: Interactive or single-message chat mode.

use super::{CommandResult, load_config, open_session, print_turn};
use seriloka_agent::TurnOutcome;
use seriloka_core::turn::TurnId;
use std::io::Write;
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Message(String),
    Edit { id: TurnId, text: String },
    History,
    Reset,
    Search(bool),
    Exit,
    Invalid(String),
    Empty,
}

/// Interpret a prompt line. Anything not starting with `/` is a message.
pub fn parse_command(line: &str) -> ChatCommand {
    let line = line.trim();
    if line.is_empty() {
        return ChatCommand::Empty;
    }
    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return ChatCommand::Exit;
    }
    if !line.starts_with('/') {
        return ChatCommand::Message(line.to_string());
    }

    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "/history" => ChatCommand::History,
        "/reset" => ChatCommand::Reset,
        "/search" => match rest {
            "on" => ChatCommand::Search(true),
            "off" => ChatCommand::Search(false),
            _ => ChatCommand::Invalid("Usage: /search on|off".into()),
        },
        "/edit" => {
            let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match (id.parse::<TurnId>(), text.trim()) {
                (Ok(_), "") | (Err(_), _) => {
                    ChatCommand::Invalid("Usage: /edit <id> <new text>".into())
                }
                (Ok(id), text) => ChatCommand::Edit {
                    id,
                    text: text.to_string(),
                },
            }
        }
        other => ChatCommand::Invalid(format!("Unknown command: {other}")),
    }
}

pub async fn run(config_path: Option<&Path>, message: Option<String>, search: bool) -> CommandResult {
    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;
    if search {
        session.set_search_enabled(true);
    }

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = session.send_turn(&msg).await;
        eprint!("\r              \r");
        let outcome = outcome?;
        print_reply(&outcome);
        session.close()?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      Seriloka - Hanafi, Virtual CEO          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", session.model());
    println!("  Search:    {}", if session.search_enabled() { "on" } else { "off" });
    println!();
    println!("  Commands:  /history  /edit <id> <text>  /reset  /search on|off");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    for turn in session.transcript().turns() {
        print_turn(turn);
    }
    if let Some(greeting) = session.ensure_greeting().await? {
        print_turn(&greeting);
    }

    let mut lines = BufReader::new(io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            ChatCommand::Empty => {}
            ChatCommand::Exit => break,
            ChatCommand::Message(text) => {
                eprint!("  ...");
                let outcome = session.send_turn(&text).await;
                eprint!("\r     \r");
                match outcome {
                    Ok(outcome) => print_reply(&outcome),
                    Err(e) => {
                        warn!(error = %e, "Message not sent");
                        eprintln!("  [Error] {e}");
                    }
                }
            }
            ChatCommand::History => {
                for turn in session.transcript().turns() {
                    print_turn(turn);
                }
            }
            ChatCommand::Edit { id, text } => match session.edit_turn(id, &text) {
                Ok(stale) => println!(
                    "  Message #{id} updated; {} later repl{} marked as possibly outdated.",
                    stale.len(),
                    if stale.len() == 1 { "y" } else { "ies" }
                ),
                Err(e) => {
                    warn!(turn = %id, error = %e, "Edit rejected");
                    eprintln!("  [Error] {e}");
                }
            },
            ChatCommand::Reset => {
                print!("  Clear the whole conversation? Type 'yes' to confirm: ");
                std::io::stdout().flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("yes") {
                    match session.reset_transcript().await {
                        Ok(greeting) => print_turn(&greeting),
                        Err(e) => {
                            warn!(error = %e, "Reset failed");
                            eprintln!("  [Error] {e}");
                        }
                    }
                } else {
                    println!("  Kept the conversation.");
                }
            }
            ChatCommand::Search(enabled) => {
                session.set_search_enabled(enabled);
                info!(enabled, "Live search toggled");
                println!("  Live search {}.", if enabled { "on" } else { "off" });
            }
            ChatCommand::Invalid(usage) => eprintln!("  {usage}"),
        }
        prompt()?;
    }

    session.close()?;
    println!();
    println!("  Jumpa lagi!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_reply(outcome: &TurnOutcome) {
    println!();
    if let Some(search) = &outcome.search {
        println!("  (looked up \"{}\": {} result(s))", search.query, search.results.len());
    }
    print_turn(&outcome.reply);
}
