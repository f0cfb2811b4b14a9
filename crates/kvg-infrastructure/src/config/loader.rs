//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values.

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use kvg_domain::constants::CACHE_LOCK_KEY_PREFIX;
use kvg_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default
    ///    location that exists)
    /// 3. Environment variables, e.g. `KVG__STORE__PROVIDER=redis`
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First default configuration file that exists
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_store_config(config)?;
    validate_cache_config(config)?;
    validate_lock_config(config)?;
    validate_seckill_config(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_store_config(config: &AppConfig) -> Result<()> {
    let store = &config.store;
    if store.provider.trim().is_empty() {
        return Err(Error::config("Store provider cannot be empty"));
    }
    if store.provider == "redis" && store.redis_url.as_deref().is_none_or(str::is_empty) {
        return Err(Error::config(
            "A Redis URL is required when the redis store provider is selected",
        ));
    }
    if store.operation_timeout_ms == 0 {
        return Err(Error::config("Store operation timeout cannot be 0"));
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    let cache = &config.cache;
    if cache.positive_ttl_secs == 0 {
        return Err(Error::config("Cache positive TTL cannot be 0"));
    }
    if cache.negative_ttl_secs == 0 {
        return Err(Error::config("Cache negative TTL cannot be 0"));
    }
    if cache.lock_ttl_secs == 0 {
        return Err(Error::config("Cache lock TTL cannot be 0"));
    }
    if cache.poll.max_attempts == 0 {
        return Err(Error::config("Cache poll attempts cannot be 0"));
    }
    Ok(())
}

fn validate_lock_config(config: &AppConfig) -> Result<()> {
    if config.lock.default_ttl_secs == 0 {
        return Err(Error::config("Lock default TTL cannot be 0"));
    }
    Ok(())
}

fn validate_seckill_config(config: &AppConfig) -> Result<()> {
    let seckill = &config.seckill;
    if seckill.stock_key.trim().is_empty() {
        return Err(Error::config("Seckill stock key cannot be empty"));
    }
    if seckill.lock_key.trim().is_empty() {
        return Err(Error::config("Seckill lock key cannot be empty"));
    }
    if seckill.stock_key == seckill.lock_key {
        return Err(Error::config(
            "Seckill stock key and lock key must differ",
        ));
    }
    if seckill.lock_key.starts_with(CACHE_LOCK_KEY_PREFIX) {
        return Err(Error::config(format!(
            "Seckill lock key cannot use the cache lock prefix '{CACHE_LOCK_KEY_PREFIX}'"
        )));
    }
    if seckill.stock_ttl_secs == 0 {
        return Err(Error::config("Seckill stock TTL cannot be 0"));
    }
    if seckill.retry.max_attempts == 0 {
        return Err(Error::config("Seckill retry attempts cannot be 0"));
    }
    Ok(())
}
