//! Shared setup for tests that need a PostgreSQL server.
//!
//! Connection settings come from `TEST_CLIENTS_DB_DATABASE`,
//! `TEST_CLIENTS_DB_USER`, `TEST_CLIENTS_DB_PASSWORD` and the optional
//! `TEST_CLIENTS_DB_HOST` / `TEST_CLIENTS_DB_PORT`. Database tests are
//! `#[ignore]`d by default; run them with `cargo test -- --ignored`.

#![allow(dead_code)]

use std::sync::OnceLock;

use client_directory::{ClientDirectory, Config};
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tokio::sync::{Mutex, MutexGuard};

pub const TEST_ENV_PREFIX: &str = "TEST_CLIENTS_DB_";

/// `initialize_schema` drops both tables, so tests take turns on the database.
fn database_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Test database settings. Panics when the variables are missing.
pub fn test_config() -> Config {
    Config::load_prefixed(TEST_ENV_PREFIX).unwrap_or_else(|err| {
        panic!("{TEST_ENV_PREFIX}DATABASE, USER and PASSWORD must be set to run database tests: {err}")
    })
}

pub struct TestDirectory {
    pub directory: ClientDirectory,
    pub config: Config,
    _guard: MutexGuard<'static, ()>,
}

impl TestDirectory {
    /// Connection outside the directory, for setting up server-side state.
    pub async fn side_connection(&self) -> PgConnection {
        PgConnection::connect_with(&self.config.connect_options())
            .await
            .expect("Failed to open side connection")
    }
}

impl std::ops::Deref for TestDirectory {
    type Target = ClientDirectory;

    fn deref(&self) -> &Self::Target {
        &self.directory
    }
}

/// Exclusive access to a freshly initialized schema.
pub async fn fresh_directory() -> TestDirectory {
    let config = test_config().with_statement_timeout_ms(10_000);

    let guard = database_lock().lock().await;
    let directory = ClientDirectory::new(&config);
    directory
        .initialize_schema()
        .await
        .expect("Failed to initialize test schema");

    TestDirectory {
        directory,
        config,
        _guard: guard,
    }
}
