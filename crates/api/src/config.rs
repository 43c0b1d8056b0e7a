//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the MediQueue API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `SLOT_LOOKAHEAD_DAYS`: Days of availability offered, starting tomorrow (default: 7)
//! - `SLOT_TIME_FORMAT`: Slot label format, `12h` or `24h` (default: "12h")

use eyre::{Result, WrapErr, eyre};
use mediqueue_core::{slots::DEFAULT_LOOKAHEAD_DAYS, time_label::TimeFormat};
use std::env;
use tracing::Level;

/// Upper bound for `SLOT_LOOKAHEAD_DAYS`
pub const MAX_LOOKAHEAD_DAYS: u32 = 60;

/// Slot generation settings shared by the availability and booking handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSettings {
    /// Number of days, starting tomorrow, that slots are generated for
    pub lookahead_days: u32,

    /// Label format used when a request does not ask for one
    pub time_format: TimeFormat,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            time_format: TimeFormat::default(),
        }
    }
}

/// Configuration for the MediQueue API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use mediqueue_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Slot generation settings
    pub slots: SlotSettings,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - SLOT_LOOKAHEAD_DAYS or SLOT_TIME_FORMAT hold invalid values
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so callers other than
    /// the process environment (tests, config files) can supply values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Slot settings
        let lookahead_days = match lookup("SLOT_LOOKAHEAD_DAYS") {
            Some(value) => value
                .parse::<u32>()
                .wrap_err("Invalid SLOT_LOOKAHEAD_DAYS value")?,
            None => DEFAULT_LOOKAHEAD_DAYS,
        };
        if lookahead_days == 0 || lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(eyre!(
                "SLOT_LOOKAHEAD_DAYS must be between 1 and {}",
                MAX_LOOKAHEAD_DAYS
            ));
        }

        let time_format = match lookup("SLOT_TIME_FORMAT") {
            Some(value) => value
                .parse::<TimeFormat>()
                .wrap_err("Invalid SLOT_TIME_FORMAT value")?,
            None => TimeFormat::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            slots: SlotSettings {
                lookahead_days,
                time_format,
            },
        })
    }

    /// Returns the server address as a string
    ///
    /// # Returns
    ///
    /// * `String` - Formatted server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
