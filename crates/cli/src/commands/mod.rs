//! Subcommand implementations and the wiring they share.

pub mod chat;
pub mod edit;
pub mod export;
pub mod history;
pub mod key;
pub mod model;
pub mod onboard;
pub mod reset;

use seriloka_agent::Session;
use seriloka_config::AppConfig;
use seriloka_core::event::EventBus;
use seriloka_core::turn::{Turn, TurnId, TurnRole};
use seriloka_store::FileStore;
use std::path::Path;
use std::sync::Arc;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_from(path).map(AppConfig::with_env_overrides),
        None => AppConfig::load(),
    };
    config.map_err(|e| format!("Failed to load config: {e}").into())
}

/// Build the live provider, lookup and file store, and load the session.
pub fn open_session(config: &AppConfig) -> seriloka_core::Result<Session> {
    let provider = seriloka_providers::build_from_config(config)?;
    let lookup = seriloka_lookup::build_from_config(config)?;
    let store = FileStore::open(config.store_path())?;

    Session::load(
        config,
        Arc::new(provider),
        Arc::new(lookup),
        Arc::new(store),
        Arc::new(EventBus::default()),
    )
}

/// Print one turn the way the chat shows it.
pub fn print_turn(turn: &Turn) {
    let label = match turn.role {
        TurnRole::User => "You",
        TurnRole::Assistant => "Hanafi",
        TurnRole::Search => "Search",
        TurnRole::System => "System",
    };
    let time = turn.created_at.format("%H:%M");

    // Id 0 marks a prompt that was shown but never stored.
    if turn.id == TurnId::default() {
        println!("  {label} ({time})");
    } else {
        println!("  #{} {label} ({time})", turn.id);
    }
    for line in turn.content.lines() {
        println!("    {line}");
    }
    if turn.stale {
        println!("    (may be outdated: an earlier message was edited)");
    }
    if let Some(model) = &turn.model {
        println!("    [{model}]");
    }
    println!();
}
