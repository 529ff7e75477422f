//! Persistent configuration in `<config_dir>/pr-squash/config.toml`.
//!
//! Holds the stored GitHub token and the optional enterprise host. The
//! configuration is loaded once and handed to the client at construction.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "pr-squash";

/// Filename for the configuration.
const CONFIG_FILE: &str = "config.toml";

/// Env var overriding the configured enterprise host.
pub const ENTERPRISE_HOST_ENV: &str = "PR_SQUASH_ENTERPRISE_HOST";

/// Prefixes GitHub uses for its token types.
pub const TOKEN_PREFIXES: &[&str] = &["ghp_", "github_pat_", "gho_", "ghu_", "ghs_"];

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquashConfig {
    /// Stored GitHub token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// GitHub Enterprise host (e.g. `github.example.com`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_host: Option<String>,
}

impl SquashConfig {
    /// Validate and store a token.
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        let token = token.trim();
        validate_token(token)?;
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Store the enterprise host, normalising away scheme and trailing slash.
    pub fn set_enterprise_host(&mut self, host: &str) {
        let host = normalize_host(host);
        self.enterprise_host = (!host.is_empty()).then_some(host);
    }

    /// Apply environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var(ENTERPRISE_HOST_ENV)
            && !host.trim().is_empty()
        {
            self.set_enterprise_host(&host);
        }
        self
    }

    /// Whether `host` is the configured enterprise host.
    pub fn is_enterprise_host(&self, host: &str) -> bool {
        self.enterprise_host
            .as_deref()
            .is_some_and(|configured| configured.eq_ignore_ascii_case(&normalize_host(host)))
    }
}

/// Check that a token carries a recognised GitHub prefix.
pub fn validate_token(token: &str) -> Result<()> {
    if TOKEN_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) && token.len() > 8 {
        Ok(())
    } else {
        Err(Error::InvalidToken(format!(
            "token should start with one of: {}",
            TOKEN_PREFIXES.join(", ")
        )))
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    host.trim_end_matches('/').to_ascii_lowercase()
}

/// Default location of the configuration file.
pub fn config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}

/// Load configuration from disk.
///
/// Returns the default configuration if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<SquashConfig> {
    if !path.exists() {
        return Ok(SquashConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Save configuration to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_config(path: &Path, config: &SquashConfig) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Config(format!("failed to create {}: {e}", dir.display())))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

    let content_with_header = format!("# pr-squash configuration\n\n{content}");

    write_private(path, content_with_header.as_bytes())
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}

/// Write `content` readable by the owner only; the file holds a token.
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}
