//! `seriloka history`: Show the stored conversation.

use super::{CommandResult, load_config, open_session, print_turn};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    let config = load_config(config_path)?;
    let session = open_session(&config)?;
    let transcript = session.transcript();

    if transcript.is_empty() {
        println!("  No conversation yet. Start one with `seriloka chat`.");
        return Ok(());
    }

    println!();
    for turn in transcript.turns() {
        print_turn(turn);
    }
    if transcript.has_stale() {
        println!("  Some replies may be outdated because an earlier message was edited.");
    }
    Ok(())
}
