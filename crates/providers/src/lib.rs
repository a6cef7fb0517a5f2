//! Completion service implementations for Seriloka.
//!
//! All providers implement the `seriloka_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use seriloka_config::AppConfig;
use seriloka_core::error::ProviderError;

/// Build the configured completion provider.
pub fn build_from_config(config: &AppConfig) -> Result<OpenAiCompatProvider, ProviderError> {
    let mut provider = OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.api_url,
        config.provider.timeout_secs,
    )?
    .with_title(&config.provider.title);

    if let Some(referer) = &config.provider.referer {
        provider = provider.with_referer(referer);
    }

    Ok(provider)
}
