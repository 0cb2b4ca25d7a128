use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Raw server setting, either `host` or `host\instance`
    pub server: String,
    pub instance_name: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub database: Option<String>,
    pub domain: Option<String>,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub default_limit: u32,
    pub max_limit: u32,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// SQL Server login method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    SqlServer { user: String, password: String },
    /// NTLM login; tiberius only supports it on Windows targets
    #[cfg(windows)]
    Windows { domain: String, user: String, password: String },
}

/// Resolved connection descriptor for the content database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub instance_name: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub credentials: Credentials,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (process env in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // Data source
        self.database.server = text("SQL_SERVER_HOST")
            .or_else(|| text("SQL_SERVER"))
            .unwrap_or_default();
        self.database.instance_name = text("SQL_INSTANCE_NAME");
        self.database.user = text("SQL_USER");
        self.database.password = lookup("SQL_PASSWORD");
        self.database.database = text("SQL_DATABASE");
        self.database.domain = text("SQL_DOMAIN");
        if let Some(port) = parse_var(lookup, "SQL_PORT")? {
            self.database.port = Some(port);
        }
        if let Some(v) = parse_var(lookup, "SQL_ENCRYPT")? {
            self.database.encrypt = v;
        }
        if let Some(v) = parse_var(lookup, "SQL_TRUST_SERVER_CERTIFICATE")? {
            self.database.trust_server_certificate = v;
        }

        // Pool overrides
        if let Some(v) = parse_var(lookup, "DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = v;
        }
        if let Some(v) = parse_var(lookup, "DATABASE_CONNECTION_TIMEOUT")? {
            self.database.connection_timeout = v;
        }
        if let Some(v) = parse_var(lookup, "DATABASE_ENABLE_QUERY_LOGGING")? {
            self.database.enable_query_logging = v;
        }
        if let Some(v) = parse_var(lookup, "DATABASE_SLOW_QUERY_THRESHOLD_MS")? {
            self.database.slow_query_threshold_ms = v;
        }

        // API overrides
        if let Some(v) = parse_var(lookup, "PORT")? {
            self.api.port = v;
        }
        if let Some(v) = parse_var(lookup, "AFE_DEFAULT_LIMIT")? {
            self.api.default_limit = v;
        }
        if let Some(v) = parse_var(lookup, "AFE_MAX_LIMIT")? {
            self.api.max_limit = v;
        }
        if let Some(v) = parse_var(lookup, "API_MAX_REQUEST_SIZE_BYTES")? {
            self.api.max_request_size_bytes = v;
        }
        if self.api.default_limit == 0 {
            return Err(ConfigError::Invalid { key: "AFE_DEFAULT_LIMIT", value: "0".to_string() });
        }
        if self.api.max_limit < self.api.default_limit {
            return Err(ConfigError::Invalid { key: "AFE_MAX_LIMIT", value: self.api.max_limit.to_string() });
        }

        // Security overrides
        self.security.api_key = lookup("API_KEY").unwrap_or_default();
        if let Some(v) = parse_var(lookup, "SECURITY_ENABLE_CORS")? {
            self.security.enable_cors = v;
        }
        if let Some(v) = text("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::with_pool(10, 30, true, 250),
            api: ApiConfig {
                port: 4000,
                default_limit: 50,
                max_limit: 1000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                api_key: String::new(),
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig::with_pool(20, 10, true, 500),
            api: ApiConfig {
                port: 4000,
                default_limit: 50,
                max_limit: 500,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                api_key: String::new(),
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::with_pool(50, 5, false, 1000),
            api: ApiConfig {
                port: 4000,
                default_limit: 50,
                max_limit: 200,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                api_key: String::new(),
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }
}

impl DatabaseConfig {
    fn with_pool(max_connections: u32, connection_timeout: u64, enable_query_logging: bool, slow_query_threshold_ms: u64) -> Self {
        Self {
            server: String::new(),
            instance_name: None,
            port: None,
            user: None,
            password: None,
            database: None,
            domain: None,
            encrypt: false,
            trust_server_certificate: true,
            max_connections,
            connection_timeout,
            enable_query_logging,
            slow_query_threshold_ms,
        }
    }

    /// Resolve the configured server into a connection descriptor.
    ///
    /// `host\instance` is split in two; an explicit `SQL_INSTANCE_NAME` wins over the suffix.
    pub fn connection_target(&self) -> Result<ConnectionTarget, ConfigError> {
        let raw = self.server.trim();
        let mut host = raw;
        let mut instance_name = self
            .instance_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some((before, after)) = raw.split_once('\\') {
            host = before.trim();
            if instance_name.is_none() && !after.trim().is_empty() {
                instance_name = Some(after.trim().to_string());
            }
        }

        if host.is_empty() {
            return Err(ConfigError::Missing("SQL_SERVER_HOST or SQL_SERVER"));
        }

        let user = self.user.clone().ok_or(ConfigError::Missing("SQL_USER"))?;
        let password = self.password.clone().unwrap_or_default();
        let credentials = match &self.domain {
            #[cfg(windows)]
            Some(domain) => Credentials::Windows { domain: domain.clone(), user, password },
            #[cfg(not(windows))]
            Some(domain) => {
                return Err(ConfigError::Invalid { key: "SQL_DOMAIN", value: domain.clone() });
            }
            None => Credentials::SqlServer { user, password },
        };

        Ok(ConnectionTarget {
            host: host.to_string(),
            instance_name,
            port: self.port,
            database: self.database.clone(),
            credentials,
            encrypt: self.encrypt,
            trust_server_certificate: self.trust_server_certificate,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

// Global singleton config - initialized once at startup, after .env is loaded
pub static CONFIG: Lazy<Result<AppConfig, ConfigError>> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> Result<&'static AppConfig, ConfigError> {
    CONFIG.as_ref().map_err(Clone::clone)
}
