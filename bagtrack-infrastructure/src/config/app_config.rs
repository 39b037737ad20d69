use std::env;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use bagtrack_domain::{RuntimeConfig, StorageBackend, StorageConfig};

pub const CONFIG_PATH_ENV: &str = "BAGTRACK_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage_backend: StorageBackend,
    pub sqlite_path: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub default_since_minutes: i64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            storage_backend: StorageBackend::Sqlite,
            sqlite_path: "./baggage.db".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "bagtrack".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            default_since_minutes: 60,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(path).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let file_path = path.as_ref();
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::parse(&content)?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.is_empty() {
                self.clickhouse_password = None;
            }
        }
        self.clickhouse_database = self.clickhouse_database.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.sqlite_path = resolve_path(base, &self.sqlite_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        match self.storage_backend {
            StorageBackend::Memory => {}
            StorageBackend::Sqlite => {
                if self.sqlite_path.trim().is_empty() {
                    return Err(anyhow!("sqlite_path must not be empty"));
                }
            }
            StorageBackend::Clickhouse => {
                if self.clickhouse_url.trim().is_empty() {
                    return Err(anyhow!("clickhouse_url must not be empty"));
                }
                if self.clickhouse_database.is_empty()
                    || !self
                        .clickhouse_database
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(anyhow!(
                        "clickhouse_database must be a plain identifier, got '{}'",
                        self.clickhouse_database
                    ));
                }
            }
        }
        if self.default_since_minutes < 0 {
            return Err(anyhow!("default_since_minutes must not be negative"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            default_since_minutes: self.default_since_minutes,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_storage_config(&self) -> StorageConfig {
        StorageConfig {
            backend: self.storage_backend,
            sqlite_path: self.sqlite_path.clone(),
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("BAGTRACK_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("BAGTRACK_STORAGE_BACKEND") {
            match StorageBackend::parse(&value) {
                Some(backend) => self.storage_backend = backend,
                None => warn!("ignoring unknown BAGTRACK_STORAGE_BACKEND '{}'", value),
            }
        }
        if let Ok(value) = env::var("BAGTRACK_SQLITE_PATH") {
            self.sqlite_path = value;
        }
        if let Ok(value) = env::var("BAGTRACK_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("BAGTRACK_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("BAGTRACK_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("BAGTRACK_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("BAGTRACK_DEFAULT_SINCE_MINUTES") {
            self.default_since_minutes =
                parse_override("BAGTRACK_DEFAULT_SINCE_MINUTES", &value, self.default_since_minutes);
        }
        if let Ok(value) = env::var("BAGTRACK_MAX_BODY_BYTES") {
            self.max_body_bytes = parse_override("BAGTRACK_MAX_BODY_BYTES", &value, self.max_body_bytes);
        }
        if let Ok(value) = env::var("BAGTRACK_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = parse_override(
                "BAGTRACK_REQUEST_TIMEOUT_SECONDS",
                &value,
                self.request_timeout_seconds,
            );
        }
    }
}

fn parse_override<T>(name: &str, value: &str, current: T) -> T
where
    T: FromStr + Display,
{
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("ignoring unparsable {} '{}', keeping {}", name, value, current);
            current
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
