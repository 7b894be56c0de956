//! Configuration loader and validator for the admin client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::section::Section;

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "CONTENT_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    pub admin: Admin,
}

/// Content API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub user_agent: String,
}

/// Admin panel defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub default_section: String,
}

impl Config {
    /// Section preselected when none is given on the command line.
    pub fn default_section(&self) -> Section {
        self.admin
            .default_section
            .parse()
            .unwrap_or(Section::Testimonials)
    }

    /// Apply an origin override (e.g. from `CONTENT_API_URL`) and re-validate.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.api.base_url = url;
            validate(&self)?;
        }
        Ok(self)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let base = cfg.api.base_url.trim();
    if base.is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    match Url::parse(base) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => {
            return Err(ConfigError::Invalid(
                "api.base_url must be an absolute http(s) URL",
            ))
        }
    }
    if cfg.api.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("api.user_agent must be non-empty"));
    }
    if cfg.admin.default_section.parse::<Section>().is_err() {
        return Err(ConfigError::Invalid(
            "admin.default_section must be a known section key",
        ));
    }
    Ok(())
}

/// Returns the canonical example YAML content.
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://nurse-back.onrender.com/"
  user_agent: "nurse-admin/0.1"

admin:
  # one of: testimonials, home-video, home-services, services, about-video,
  # address, social, blog, pdf
  default_section: "testimonials"
"#
}
