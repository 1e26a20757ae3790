//! DDL for the `clients` / `phones` schema.
//!
//! Statements are executed one at a time inside a single transaction by
//! [`ClientDirectory::initialize_schema`](super::ClientDirectory::initialize_schema).

/// Drop order respects the `phones.id_client` foreign key.
pub const DROP_TABLES: [&str; 2] = ["DROP TABLE IF EXISTS phones", "DROP TABLE IF EXISTS clients"];

pub const CREATE_CLIENTS: &str = r#"
CREATE TABLE clients (
    id_client SERIAL PRIMARY KEY,
    first_name VARCHAR(30) NOT NULL,
    last_name VARCHAR(30) NOT NULL,
    email VARCHAR(50) UNIQUE NOT NULL,
    CONSTRAINT chk_first_name CHECK (first_name !~ '[0-9]'),
    CONSTRAINT chk_last_name CHECK (last_name !~ '[0-9]'),
    CONSTRAINT chk_email CHECK (email LIKE '%@%')
)
"#;

pub const CREATE_PHONES: &str = r#"
CREATE TABLE phones (
    id_phone SERIAL PRIMARY KEY,
    id_client INTEGER NOT NULL,
    phone_number VARCHAR(11),
    FOREIGN KEY (id_client) REFERENCES clients(id_client),
    CONSTRAINT chk_phone_number CHECK (phone_number ~ '^[0-9]{11}$')
)
"#;

/// Every statement run by schema initialisation, in execution order.
pub fn statements() -> impl Iterator<Item = &'static str> {
    DROP_TABLES
        .into_iter()
        .chain([CREATE_CLIENTS, CREATE_PHONES])
}
