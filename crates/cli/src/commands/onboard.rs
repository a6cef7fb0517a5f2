//! `seriloka onboard`: First-time setup.

use super::CommandResult;
use seriloka_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    let default_path = AppConfig::config_dir().join("config.toml");
    let config_path = config_path.unwrap_or(default_path.as_path());

    println!("Seriloka - First-Time Setup");
    println!("===========================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if dir.exists() {
            println!("  Config directory exists: {}", dir.display());
        } else {
            std::fs::create_dir_all(dir)?;
            println!("  Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("  Created config.toml at: {}", config_path.display());
        println!("\n  Next steps:");
        println!("   1. Get an OpenRouter key at https://openrouter.ai/keys");
        println!("   2. Run: seriloka key set <KEY>");
        println!("   3. Run: seriloka chat\n");
    }

    println!("  Setup complete! Run `seriloka chat` to start.\n");
    Ok(())
}
