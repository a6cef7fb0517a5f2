//! Seriloka CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write the default config
//! - `chat`: Interactive chat or single-message mode
//! - `history`: Show the stored conversation
//! - `edit`: Change an earlier message
//! - `reset`: Clear the conversation and start over
//! - `export`: Save the conversation as JSON
//! - `key`: Store or clear the OpenRouter API key
//! - `model`: Show or switch the model

use clap::{Parser, Subcommand};
use seriloka_core::TurnId;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "seriloka",
    about = "Seriloka - chat with Hanafi, the virtual CEO assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.seriloka/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Onboard,

    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Enable live encyclopedia search for this session
        #[arg(long)]
        search: bool,
    },

    /// Show the stored conversation
    History,

    /// Replace the text of an earlier message
    Edit {
        /// Id of the message, as shown by `history`
        id: TurnId,

        /// The new text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Clear the conversation and start with a fresh greeting
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Save the conversation as pretty-printed JSON
    Export {
        /// Output file (default: seriloka-chat-history-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the OpenRouter API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show the active model, or switch to another
    Model {
        /// Model identifier, e.g. openai/gpt-4o-mini
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a new key
    Set { key: String },
    /// Remove the stored key
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Onboard => commands::onboard::run(config_path).await?,
        Commands::Chat { message, search } => {
            commands::chat::run(config_path, message, search).await?
        }
        Commands::History => commands::history::run(config_path).await?,
        Commands::Edit { id, text } => commands::edit::run(config_path, id, &text.join(" ")).await?,
        Commands::Reset { yes } => commands::reset::run(config_path, yes).await?,
        Commands::Export { output } => commands::export::run(config_path, output).await?,
        Commands::Key { action } => match action {
            KeyAction::Set { key } => commands::key::set(config_path, &key).await?,
            KeyAction::Clear => commands::key::clear(config_path).await?,
        },
        Commands::Model { id } => commands::model::run(config_path, id).await?,
    }

    Ok(())
}
