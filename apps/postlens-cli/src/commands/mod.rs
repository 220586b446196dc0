//! CLI command implementations

pub mod analyze;
pub mod completions;
pub mod config;
pub mod extract;
pub mod version;

use crate::config::Settings;
use postlens_sdk::PostlensClient;

fn build_client(settings: &Settings) -> anyhow::Result<PostlensClient> {
    let client = PostlensClient::builder()
        .base_url(&settings.api_url)
        .timeout_opt(settings.timeout)
        .user_agent(format!("postlens-cli/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
