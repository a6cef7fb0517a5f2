//! `seriloka key`: Store or clear the OpenRouter API key.

use super::{CommandResult, load_config, open_session};
use std::path::Path;

pub async fn set(config_path: Option<&Path>, key: &str) -> CommandResult {
    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;
    session.set_credential(key)?;
    println!("  API key saved to {}", config.store_path().display());
    Ok(())
}

pub async fn clear(config_path: Option<&Path>) -> CommandResult {
    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;
    session.clear_credential()?;
    println!("  API key removed.");
    if config.api_key.is_some() {
        println!("  Note: a key is still set in the config file or environment.");
    }
    Ok(())
}
