//! Configuration management commands

use crate::config::{CliConfig, KEYS};
use crate::output::{self, OutputFormat};
use crate::ConfigCommands;
use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::Path;

pub fn run(cmd: ConfigCommands, path: &Path, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(path, format),
        ConfigCommands::Set { key, value } => set_config(path, &key, &value),
        ConfigCommands::Get { key } => get_config(path, &key),
        ConfigCommands::Reset { force } => reset_config(path, force),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn show_config(path: &Path, format: OutputFormat) -> Result<()> {
    let config = CliConfig::load_from(path)?;

    if output::print_structured(&config, format)? {
        return Ok(());
    }

    println!("{}: {}", "Config file".bold(), path.display());
    println!();

    for key in KEYS {
        match config.get(key)? {
            Some(value) => println!("{}: {}", key.cyan(), value),
            None => println!("{}: {}", key.cyan(), "(not set)".dimmed()),
        }
    }

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load_from(path)?;
    config.set(key, value)?;
    config.save_to(path)?;

    output::success(&format!("Set {} = {}", key.cyan(), value));
    Ok(())
}

fn get_config(path: &Path, key: &str) -> Result<()> {
    let config = CliConfig::load_from(path)?;

    match config.get(key)? {
        Some(v) => println!("{}", v),
        None => output::dimmed("(not set)"),
    }

    Ok(())
}

fn reset_config(path: &Path, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    if path.exists() {
        std::fs::remove_file(path)?;
    }

    output::success("Configuration reset");
    Ok(())
}
