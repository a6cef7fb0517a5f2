//! `seriloka model`: Show or switch the active model.

use super::{CommandResult, load_config, open_session};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, id: Option<String>) -> CommandResult {
    let config = load_config(config_path)?;
    let mut session = open_session(&config)?;

    match id {
        Some(id) => {
            session.set_model(&id)?;
            println!("  Model set to {}", session.model());
        }
        None => println!("  {}", session.model()),
    }
    Ok(())
}
