//! `seriloka export`: Save the conversation as JSON.

use super::{CommandResult, load_config, open_session};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// `seriloka-chat-history-YYYY-MM-DD.json` for today's date.
pub fn default_file_name() -> PathBuf {
    PathBuf::from(format!(
        "seriloka-chat-history-{}.json",
        Utc::now().format("%Y-%m-%d")
    ))
}

pub async fn run(config_path: Option<&Path>, output: Option<PathBuf>) -> CommandResult {
    let config = load_config(config_path)?;
    let session = open_session(&config)?;

    let path = output.unwrap_or_else(default_file_name);
    let json = session.export_transcript()?;
    std::fs::write(&path, json)
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

    println!(
        "  Exported {} message(s) to {}",
        session.transcript().len(),
        path.display()
    );
    Ok(())
}
