//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::export::preview::DEFAULT_PAGE_HEIGHT;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Maximum accepted request body size in bytes
    pub body_limit_bytes: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
            body_limit_bytes: 2 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Defaults applied to preview and PDF export
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Company name used when a request does not supply one
    pub company_name: String,
    /// `chrono` format string for the header date
    pub date_format: String,
    /// Flate-compress PDF content streams
    pub compress: bool,
    /// Estimated page height used by the preview paginator
    pub preview_page_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            company_name: "Your Company Name".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
            compress: true,
            preview_page_height: DEFAULT_PAGE_HEIGHT,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub export: ExportConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: parse_or(&lookup, "HOST", server_defaults.host),
            port: parse_or(&lookup, "PORT", server_defaults.port),
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", server_defaults.body_limit_bytes),
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                server_defaults.request_timeout_secs,
            ),
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let export_defaults = ExportConfig::default();
        let export = ExportConfig {
            company_name: lookup("EXPORT_COMPANY_NAME").unwrap_or(export_defaults.company_name),
            date_format: lookup("EXPORT_DATE_FORMAT").unwrap_or(export_defaults.date_format),
            compress: parse_or(&lookup, "EXPORT_COMPRESS", export_defaults.compress),
            preview_page_height: parse_or(
                &lookup,
                "PREVIEW_PAGE_HEIGHT",
                export_defaults.preview_page_height,
            ),
        };

        if export.preview_page_height == 0 {
            return Err(ConfigError::InvalidValue(
                "PREVIEW_PAGE_HEIGHT must be greater than zero".to_string(),
            ));
        }
        if export.date_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "EXPORT_DATE_FORMAT must not be empty".to_string(),
            ));
        }
        if !formats_dates(&export.date_format) {
            return Err(ConfigError::InvalidValue(format!(
                "EXPORT_DATE_FORMAT '{}' is not a valid date format",
                export.date_format
            )));
        }

        Ok(Self {
            server,
            cors,
            export,
        })
    }
}

/// True when `format` renders a plain date (no time or zone fields)
fn formats_dates(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::MIN.format(format)).is_ok()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
