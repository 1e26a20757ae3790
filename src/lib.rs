//! Client and phone-number directory backed by PostgreSQL.
//!
//! [`ClientDirectory`] owns the connection settings and exposes the schema
//! setup plus CRUD and search operations over the `clients` and `phones`
//! tables. Interactive flows live in the `clients` binary, not here.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::Config;
pub use db::ClientDirectory;
pub use error::{DirectoryError, Result};
pub use models::{Client, ClientField, ClientRecord, PhoneNumber};
