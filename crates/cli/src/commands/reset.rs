//! `seriloka reset`: Clear the conversation and start over.

use super::{CommandResult, load_config, open_session, print_turn};
use std::io::Write;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, yes: bool) -> CommandResult {
    if !yes && !confirm()? {
        println!("  Kept the conversation.");
        return Ok(());
    }

    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;

    let greeting = session.reset_transcript().await?;
    println!("  Conversation cleared.\n");
    print_turn(&greeting);
    session.close()?;
    Ok(())
}

fn confirm() -> std::io::Result<bool> {
    print!("  Clear the whole conversation? This cannot be undone. [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
