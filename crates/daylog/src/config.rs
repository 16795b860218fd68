//! Logger configuration and environment loading.
//!
//! Raw values arrive as optional strings where an empty value means "use the
//! default". Defaults are resolved once, here, so the rest of the crate only
//! ever sees concrete `Mode`, `Category` and path values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{LoggerError, Result};

/// Environment key selecting `prod` or `dev`.
pub const ENV_MODE: &str = "LOGGER_MOD";
/// Environment key selecting `service` or `request`.
pub const ENV_CATEGORY: &str = "LOGGER_TYPE";
/// Environment key naming the log directory.
pub const ENV_SERVICE_PATH: &str = "LOGGER_SERVICE_PATH";

/// Directory of service logs when none is configured.
pub const DEFAULT_SERVICE_PATH: &str = "./logs/service_logs/";
/// Directory of request logs when none is configured.
pub const DEFAULT_REQUEST_PATH: &str = "./logs/request_logs/";

/// Output mode of a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Colorized text on stderr, no files.
    #[default]
    Development,
    /// JSON on stdout and in a daily file, with rotation.
    Production,
}

impl Mode {
    /// Short name, as accepted in `LOGGER_MOD`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "dev",
            Mode::Production => "prod",
        }
    }
}

impl FromStr for Mode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Mode::Development),
            "prod" | "production" => Ok(Mode::Production),
            _ => Err(LoggerError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive tag distinguishing independent log streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Application logs.
    #[default]
    Service,
    /// Per-request access logs.
    Request,
}

impl Category {
    /// Short name, as accepted in `LOGGER_TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Service => "service",
            Category::Request => "request",
        }
    }

    /// Directory used when no log path is configured.
    pub fn default_path(&self) -> &'static Path {
        match self {
            Category::Service => Path::new(DEFAULT_SERVICE_PATH),
            Category::Request => Path::new(DEFAULT_REQUEST_PATH),
        }
    }
}

impl FromStr for Category {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" => Ok(Category::Service),
            "request" => Ok(Category::Request),
            _ => Err(LoggerError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub mode: Mode,
    pub category: Category,
    /// Directory holding the dated files.
    pub path: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            category: Category::default(),
            path: PathBuf::from(DEFAULT_SERVICE_PATH),
        }
    }
}

impl LoggerConfig {
    /// Load configuration from `LOGGER_MOD`, `LOGGER_TYPE` and
    /// `LOGGER_SERVICE_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset and empty values both resolve to the defaults. The path always
    /// defaults to the service directory, whatever the category.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = value(ENV_MODE)
            .map(|v| v.parse::<Mode>())
            .transpose()?
            .unwrap_or_default();
        let category = value(ENV_CATEGORY)
            .map(|v| v.parse::<Category>())
            .transpose()?
            .unwrap_or_default();
        let path = value(ENV_SERVICE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_PATH));

        Ok(Self {
            mode,
            category,
            path,
        })
    }
}

/// Resolve an optional log directory against the category default.
///
/// An empty path counts as unset.
pub fn resolve_path(path: Option<&Path>, category: Category) -> PathBuf {
    match path {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => category.default_path().to_path_buf(),
    }
}
