use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use gqlbatch_client::ClientConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileConfig {
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
}

impl ProfileConfig {
    /// Applies `key = value` as written by `gqlbatch config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => self.endpoint = Some(value.to_string()),
            "timeout_ms" => {
                let ms: u64 = value
                    .parse()
                    .with_context(|| format!("timeout_ms must be a number, got {value}"))?;
                self.timeout_ms = Some(ms);
            }
            other => match other.strip_prefix("header.") {
                Some(name) if !name.is_empty() => {
                    self.headers.insert(name.to_string(), value.to_string());
                }
                _ => anyhow::bail!(
                    "Unknown config key: {other}. Valid keys: endpoint, timeout_ms, header.<name>"
                ),
            },
        }
        Ok(())
    }
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".gqlbatch");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)?;
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(cfg)
}

fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let all = load_all_from(&config_path()?)?;
    Ok(all.get(profile).cloned().unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

/// Splits `name=value`.
pub fn parse_pair(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected name=value, got {raw}"))?;
    if name.is_empty() {
        anyhow::bail!("Empty name in {raw}");
    }
    Ok((name.to_string(), value.to_string()))
}

/// Builds the client configuration.
///
/// Endpoint: `--endpoint` / GQLBATCH_ENDPOINT, then the profile.
/// Headers: profile first, then `--header` flags.
pub fn resolve_client_config(
    cli_endpoint: Option<&str>,
    cli_timeout_ms: Option<u64>,
    cli_headers: &[String],
    profile: &ProfileConfig,
) -> Result<ClientConfig> {
    let endpoint = cli_endpoint
        .or(profile.endpoint.as_deref())
        .context(
            "No endpoint configured. Use --endpoint, set GQLBATCH_ENDPOINT, or run: gqlbatch config set endpoint <url>",
        )?;

    let mut config = ClientConfig::parse(endpoint)?;
    if let Some(ms) = cli_timeout_ms.or(profile.timeout_ms) {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    for (name, value) in &profile.headers {
        config = config.with_header(name, value);
    }
    for raw in cli_headers {
        let (name, value) = parse_pair(raw)?;
        config = config.with_header(name, value);
    }
    config.validate()?;
    Ok(config)
}
