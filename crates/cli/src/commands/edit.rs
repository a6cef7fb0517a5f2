//! `seriloka edit`: Replace the text of an earlier message.

use super::{CommandResult, load_config, open_session};
use seriloka_core::turn::TurnId;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, id: TurnId, text: &str) -> CommandResult {
    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;

    let stale = session.edit_turn(id, text)?;
    println!("  Message #{id} updated.");
    if !stale.is_empty() {
        let ids: Vec<String> = stale.iter().map(|id| format!("#{id}")).collect();
        println!("  Now possibly outdated: {}", ids.join(", "));
    }
    session.close()?;
    Ok(())
}
