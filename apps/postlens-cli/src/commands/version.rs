//! Version information command

use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use postlens_core::AcceptFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run(all: bool, format: OutputFormat) -> Result<()> {
    let version_info = VersionInfo {
        cli_version: VERSION.to_string(),
        sdk_version: postlens_sdk::VERSION.to_string(),
        accepted_types: AcceptFilter::default().accept_attribute(),
        git_commit: option_env!("GIT_COMMIT").map(String::from),
        rust_version: option_env!("RUST_VERSION").map(String::from),
    };

    if output::print_structured(&version_info, format)? {
        return Ok(());
    }

    println!("{} {}", "postlens".cyan().bold(), VERSION.green());

    if all {
        println!();
        println!("{}", "Components:".bold());
        println!("  SDK: {}", version_info.sdk_version.green());
        println!("  Accepted types: {}", version_info.accepted_types);

        if let Some(commit) = &version_info.git_commit {
            println!("  Git Commit: {}", &commit[..7.min(commit.len())]);
        }
        if let Some(rust) = &version_info.rust_version {
            println!("  Rust: {}", rust);
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct VersionInfo {
    cli_version: String,
    sdk_version: String,
    accepted_types: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rust_version: Option<String>,
}
