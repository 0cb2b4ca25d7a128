use async_trait::async_trait;
use bb8::{ManageConnection, Pool, PooledConnection, RunError};
use std::time::Duration;
use thiserror::Error;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::info;

use crate::config::{ConfigError, ConnectionTarget, Credentials, DatabaseConfig};

pub type SqlClient = Client<Compat<TcpStream>>;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Timed out waiting for a pooled connection")]
    PoolTimeout,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Tds(#[from] tiberius::error::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<RunError<DatabaseError>> for DatabaseError {
    fn from(err: RunError<DatabaseError>) -> Self {
        match err {
            RunError::User(e) => e,
            RunError::TimedOut => DatabaseError::PoolTimeout,
        }
    }
}

/// Opens TDS connections for the pool
pub struct TdsConnectionManager {
    config: Config,
    named_instance: bool,
}

impl TdsConnectionManager {
    pub fn new(target: &ConnectionTarget) -> Self {
        Self {
            config: tds_config(target),
            // SQL Browser resolves the instance port unless one is pinned
            named_instance: target.instance_name.is_some() && target.port.is_none(),
        }
    }
}

#[async_trait]
impl ManageConnection for TdsConnectionManager {
    type Connection = SqlClient;
    type Error = DatabaseError;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let tcp = if self.named_instance {
            TcpStream::connect_named(&self.config).await?
        } else {
            TcpStream::connect(self.config.get_addr()).await?
        };
        tcp.set_nodelay(true)?;

        let client = Client::connect(self.config.clone(), tcp.compat_write()).await?;
        Ok(client)
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Translate the resolved connection descriptor into a tiberius config
pub fn tds_config(target: &ConnectionTarget) -> Config {
    let mut config = Config::new();
    config.host(&target.host);
    if let Some(port) = target.port {
        config.port(port);
    }
    if let Some(instance) = &target.instance_name {
        config.instance_name(instance);
    }
    if let Some(database) = &target.database {
        config.database(database);
    }
    config.application_name("afe-bridge-api");

    match &target.credentials {
        Credentials::SqlServer { user, password } => {
            config.authentication(AuthMethod::sql_server(user, password));
        }
        #[cfg(windows)]
        Credentials::Windows { domain, user, password } => {
            config.authentication(AuthMethod::windows(format!("{}\\{}", domain, user), password));
        }
    }

    if target.encrypt {
        config.encryption(EncryptionLevel::Required);
    } else {
        config.encryption(EncryptionLevel::Off);
    }
    if target.trust_server_certificate {
        config.trust_cert();
    }

    config
}

/// Shared connection pool for the content database
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<TdsConnectionManager>,
}

impl DatabaseManager {
    /// Build the pool without connecting; connections open on first checkout.
    pub fn connect_lazy(database: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let target = database.connection_target()?;
        info!(
            "Configured content database pool for {}{} (max {} connections)",
            target.host,
            target.instance_name.as_deref().map(|i| format!("\\{}", i)).unwrap_or_default(),
            database.max_connections
        );

        let pool = Pool::builder()
            .max_size(database.max_connections.max(1))
            .connection_timeout(Duration::from_secs(database.connection_timeout.max(1)))
            .build_unchecked(TdsConnectionManager::new(&target));

        Ok(Self { pool })
    }

    /// Check out a connection; it returns to the pool when dropped
    pub async fn acquire(&self) -> Result<PooledConnection<'_, TdsConnectionManager>, DatabaseError> {
        Ok(self.pool.get().await?)
    }

    /// Round-trips a trivial query to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let mut conn = self.acquire().await?;
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(instance: Option<&str>, port: Option<u16>) -> ConnectionTarget {
        ConnectionTarget {
            host: "db01".to_string(),
            instance_name: instance.map(str::to_string),
            port,
            database: Some("Content".to_string()),
            credentials: Credentials::SqlServer { user: "svc".to_string(), password: "pw".to_string() },
            encrypt: false,
            trust_server_certificate: true,
        }
    }

    #[test]
    fn named_instance_uses_browser_unless_port_pinned() {
        assert!(TdsConnectionManager::new(&target(Some("CONTENT"), None)).named_instance);
        assert!(!TdsConnectionManager::new(&target(Some("CONTENT"), Some(1444))).named_instance);
        assert!(!TdsConnectionManager::new(&target(None, None)).named_instance);
    }

    #[test]
    fn tds_config_targets_host_and_port() {
        let config = tds_config(&target(None, Some(1444)));
        assert_eq!(config.get_addr(), "db01:1444");
    }

    #[test]
    fn default_port_is_1433() {
        let config = tds_config(&target(None, None));
        assert_eq!(config.get_addr(), "db01:1433");
    }

    #[tokio::test]
    async fn pool_builds_without_connecting() {
        let mut database = crate::config::AppConfig::from_lookup(|key| match key {
            "SQL_SERVER" => Some(r"db01\CONTENT".to_string()),
            "SQL_USER" => Some("svc".to_string()),
            _ => None,
        })
        .unwrap()
        .database;
        database.max_connections = 0;
        assert!(DatabaseManager::connect_lazy(&database).is_ok());
    }

    #[test]
    fn pool_requires_host() {
        let database = crate::config::AppConfig::from_lookup(|_| None).unwrap().database;
        assert!(matches!(
            DatabaseManager::connect_lazy(&database),
            Err(DatabaseError::Config(ConfigError::Missing(_)))
        ));
    }
}
