use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs, io};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

use crate::password::PasswordHasher;

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid value {value:?} for env var {key}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8080,
            shutdown_timeout_secs: 5,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            dsn: None,
            max_connections: 10,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_owned(),
        }
    }
}

impl LogConfig {
    /// `fatal` is accepted as an alias for `error`. Unknown levels fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        let level = self.level.trim().to_ascii_lowercase();
        if level == "fatal" {
            return LevelFilter::ERROR;
        }
        LevelFilter::from_str(&level).unwrap_or_else(|_| {
            warn!(level = %self.level, "Unknown log level, using info");
            LevelFilter::INFO
        })
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        PasswordConfig {
            memory_kib: 4096,
            iterations: 3,
        }
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.memory_kib, self.iterations)
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub password: PasswordConfig,
}

impl Config {
    /// Loads defaults, then `config.yaml`, then the environment (which absorbs `.env`
    /// first). Later sources win.
    pub fn load() -> Result<Config, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded env file"),
            Err(_) => info!("No .env file found, using process environment"),
        }

        let config = Config::from_sources(Path::new(CONFIG_FILE), |key| env::var(key).ok())?;
        if config.database.dsn.is_none() {
            warn!("DB_DSN is not set, database operations will fail");
        }
        Ok(config)
    }

    pub fn from_sources<F>(path: &Path, env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::from_file(path)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Config::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Config, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(contents)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // empty values count as unset
        let read = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = read("APP_PORT") {
            self.server.port = parse_env("APP_PORT", port)?;
        }
        if let Some(timeout) = read("SHUTDOWN_TIMEOUT_SECS") {
            self.server.shutdown_timeout_secs = parse_env("SHUTDOWN_TIMEOUT_SECS", timeout)?;
        }
        if let Some(dsn) = read("DB_DSN") {
            self.database.dsn = Some(dsn);
        }
        if let Some(max) = read("DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("DB_MAX_CONNECTIONS", max)?;
        }
        if let Some(level) = read("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(memory) = read("PASSWORD_MEMORY_KIB") {
            self.password.memory_kib = parse_env("PASSWORD_MEMORY_KIB", memory)?;
        }
        if let Some(iterations) = read("PASSWORD_ITERATIONS") {
            self.password.iterations = parse_env("PASSWORD_ITERATIONS", iterations)?;
        }
        if self
            .database
            .dsn
            .as_deref()
            .is_some_and(|dsn| dsn.trim().is_empty())
        {
            self.database.dsn = None;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1"));
        }
        // argon2 needs at least 8 KiB per lane
        if self.password.memory_kib < 8 {
            return Err(ConfigError::Invalid("password.memory_kib must be at least 8"));
        }
        if self.password.iterations == 0 {
            return Err(ConfigError::Invalid("password.iterations must be at least 1"));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
