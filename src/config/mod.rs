use std::fmt;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Environment prefix used by [`Config::load`].
pub const ENV_PREFIX: &str = "CLIENTS_DB_";

/// Connection settings for the client directory database
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Database name
    pub database: String,
    /// Role to connect as
    pub user: String,
    /// Password for `user`
    pub password: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-statement timeout in milliseconds, sent as the `statement_timeout`
    /// session parameter. Unset means the server default.
    #[serde(default)]
    pub statement_timeout_ms: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Config {
    /// Build a configuration in code, using the default host and port.
    pub fn new(
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            user: user.into(),
            password: password.into(),
            host: default_host(),
            port: default_port(),
            statement_timeout_ms: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize `CLIENTS_DB_*` variables into Config struct
    pub fn load() -> Result<Self> {
        Self::load_prefixed(ENV_PREFIX)
    }

    /// Same as [`Config::load`] but reads variables under a custom prefix.
    pub fn load_prefixed(prefix: &str) -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed(prefix).from_env::<Config>()?;

        Ok(config)
    }

    /// Deserialize from explicit `(key, value)` pairs, keys already stripped of any prefix.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(pairs)?;

        Ok(config)
    }

    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_statement_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.statement_timeout_ms = Some(timeout_ms);
        self
    }

    /// Options used to open every per-operation connection
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password);

        match self.statement_timeout_ms {
            Some(timeout_ms) => options.options([("statement_timeout", timeout_ms.to_string())]),
            None => options,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    Config::load()
}
