//! Configuration management for acton-crud
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_CRUD_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `/etc/acton-crud/{service}/config.toml` (system config)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [admin]
//! base_path = "/admin"
//! timezone = "Europe/Stockholm"
//! resource_path = "crud-res"
//!
//! [security]
//! csrf_enabled = true
//! csrf_lifetime_secs = 86400
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::CrudError;

/// Admin screen settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Path prefix for all admin routes
    pub base_path: String,

    /// IANA timezone used to show and parse timestamp fields
    pub timezone: String,

    /// Path segment (below `base_path`) serving static assets
    pub resource_path: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            base_path: "/admin".to_string(),
            timezone: "UTC".to_string(),
            resource_path: "crud-res".to_string(),
        }
    }
}

impl AdminSettings {
    /// Parse the configured timezone
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::Config`] if the name is not a known IANA timezone.
    pub fn tz(&self) -> Result<Tz, CrudError> {
        parse_timezone(&self.timezone)
    }

    /// Base path without a trailing slash
    #[must_use]
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim_end_matches('/');
        if trimmed.starts_with('/') || trimmed.is_empty() {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Check CSRF tokens on form submissions
    pub csrf_enabled: bool,

    /// Secret for token signing; a random one is generated per process if unset
    pub csrf_secret: Option<String>,

    /// Token lifetime in seconds
    pub csrf_lifetime_secs: u64,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            csrf_enabled: true,
            csrf_secret: None,
            csrf_lifetime_secs: 86400, // 24 hours
        }
    }
}

/// Complete acton-crud configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrudConfig {
    /// Admin screen settings
    #[serde(default)]
    pub admin: AdminSettings,

    /// Security settings
    #[serde(default)]
    pub security: SecuritySettings,
}

impl CrudConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or a value
    /// has the wrong type.
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/acton-crud")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("ACTON_CRUD_").split("__").lowercase(true));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file, layered over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("configuration file not found: {}", path.display());
        }
        let config = Self::defaults()?.merge(Toml::file(path)).extract()?;
        Ok(config)
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }
}

/// Parse an IANA timezone name
///
/// # Errors
///
/// Returns [`CrudError::Config`] for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, CrudError> {
    name.parse::<Tz>()
        .map_err(|e| CrudError::Config(format!("unknown timezone '{name}': {e}")))
}
