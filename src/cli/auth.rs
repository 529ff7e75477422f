//! Auth commands - store and inspect credentials

use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Password;
use pr_squash::auth::resolve_token;
use pr_squash::config::{config_path, load_config, save_config};
use pr_squash::error::{Error, Result};

/// Validate and store a token, prompting for it when not given
pub fn run_set_token(token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => Password::new()
            .with_prompt("GitHub personal access token")
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read token: {e}")))?,
    };

    let path = config_path()?;
    let mut config = load_config(&path)?;
    config.set_token(&token)?;
    save_config(&path, &config)?;

    println!(
        "{} Token saved to {}",
        check(),
        path.display().to_string().muted()
    );
    Ok(())
}

/// Store the GitHub Enterprise host
pub fn run_set_enterprise_host(host: &str) -> Result<()> {
    let path = config_path()?;
    let mut config = load_config(&path)?;
    config.set_enterprise_host(host);
    save_config(&path, &config)?;

    match config.enterprise_host {
        Some(ref host) => println!("{} Enterprise host set to {}", check(), host.accent()),
        None => println!("{} Enterprise host cleared", check()),
    }
    Ok(())
}

/// Show where credentials come from
pub fn run_status() -> Result<()> {
    let path = config_path()?;
    let config = load_config(&path)?.with_env_overrides();

    println!("{} {}", "Config:".emphasis(), path.display());
    match resolve_token(&config) {
        Some(auth) => println!(
            "{} {} ({})",
            "Token:".emphasis(),
            mask(&auth.token),
            auth.source.to_string().muted()
        ),
        None => println!(
            "{} {}",
            "Token:".emphasis(),
            "not set (will try 'gh auth token')".warn()
        ),
    }
    println!(
        "{} {}",
        "Enterprise host:".emphasis(),
        config
            .enterprise_host
            .as_deref()
            .unwrap_or("none")
            .accent()
    );
    Ok(())
}

/// Show only the token prefix
fn mask(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}…")
}
