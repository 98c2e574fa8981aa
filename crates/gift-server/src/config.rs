//! Server configuration
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file
//! (`GIFT_CONFIG`, default `gift-server.toml`), then `GIFT_*` environment
//! variables with `__` between nested keys (`GIFT_CACHE__BACKEND=redis`).

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "gift-server.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Installation prefix for cache keys
    #[serde(default)]
    pub key_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_path: String,
    pub cache: CacheConfig,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        let path = std::env::var("GIFT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let builder = Self::defaults()?
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("GIFT")
                    .prefix_separator("_")
                    .separator("__"),
            );
        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("bind_address", "0.0.0.0:16790")?
            .set_default("database_path", "data/gifts.db")?
            .set_default("cache.backend", "memory")?
            .set_default("log.json", false)?)
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config: ServerConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_none() {
            anyhow::bail!("cache.redis_url is required when cache.backend = \"redis\"");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<ServerConfig> {
        ServerConfig::from_builder(
            ServerConfig::defaults()?.add_source(config::File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn defaults_use_memory_cache() -> Result<()> {
        let config = from_toml("")?;
        assert_eq!(config.bind_address, "0.0.0.0:16790");
        assert_eq!(config.database_path, "data/gifts.db");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.key_prefix, None);
        assert!(!config.log.json);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let config = from_toml(
            r#"
            bind_address = "127.0.0.1:9000"

            [cache]
            backend = "redis"
            redis_url = "redis://127.0.0.1/"
            key_prefix = "wikidb"
            "#,
        )?;
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.key_prefix.as_deref(), Some("wikidb"));
        Ok(())
    }

    #[test]
    fn redis_backend_requires_url() {
        let err = from_toml("[cache]\nbackend = \"redis\"").unwrap_err();
        assert!(err.to_string().contains("redis_url"));
    }
}
