use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "spendlog_tui", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    pub base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    pub username: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

/// Layer the config file, `SPENDLOG_TUI_*` variables and CLI overrides.
pub fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings: AppConfig = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPENDLOG_TUI"))
        .build()?
        .try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }

    Ok(settings)
}
