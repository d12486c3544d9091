//! Configuration management for RAX Auth Server
//!
//! Values are layered: built-in defaults, then `config.toml`, then
//! `RAX_AUTH_*` environment variables. Everything is read once at startup.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default port of the HTTP listener
pub const DEFAULT_PORT: u16 = 5000;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Work factor range accepted by bcrypt
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// bcrypt ignores every byte of a password past this length
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Locations searched for `config.toml`, lowest precedence first
const CONFIG_PATHS: [&str; 2] = [
    "rax-auth-server/config", // Docker production: /app/rax-auth-server/config.toml
    "config",                 // Local development: ./config.toml
];

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port of the HTTP listener
    pub port: u16,

    // ═══ CREDENTIALS ═══
    /// bcrypt work factor used for every new registration
    pub bcrypt_cost: u32,

    /// Input limits enforced before any hashing happens
    pub max_username_length: usize,
    pub max_password_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            max_username_length: 64,
            max_password_length: BCRYPT_MAX_PASSWORD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("bcrypt_cost", i64::from(defaults.bcrypt_cost))?
            .set_default("max_username_length", defaults.max_username_length as i64)?
            .set_default("max_password_length", defaults.max_password_length as i64)?;

        for config_path in CONFIG_PATHS {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_AUTH").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "bcrypt_cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }

        if self.max_username_length == 0 {
            return Err(ConfigError::Message(
                "max_username_length must be greater than 0".into(),
            ));
        }

        if self.max_password_length == 0 || self.max_password_length > BCRYPT_MAX_PASSWORD_BYTES {
            return Err(ConfigError::Message(format!(
                "max_password_length must be between 1 and {BCRYPT_MAX_PASSWORD_BYTES}"
            )));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
