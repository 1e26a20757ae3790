pub mod schema;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgExecutor};
use sqlx::Connection;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::models::{Client, ClientField, ClientRecord, PhoneNumber};

const RECORD_SELECT_SQL: &str = r#"
SELECT c.id_client, c.first_name, c.last_name, c.email, p.phone_number
FROM clients c
LEFT JOIN phones p ON c.id_client = p.id_client
"#;

/// Access point to the `clients` / `phones` tables.
///
/// Holds connection options only. Every operation opens its own connection,
/// runs inside one transaction where it writes, and closes the connection
/// before returning. Any early return drops the transaction, which rolls it
/// back, and then drops the connection.
#[derive(Debug, Clone)]
pub struct ClientDirectory {
    options: PgConnectOptions,
}

impl ClientDirectory {
    pub fn new(config: &Config) -> Self {
        Self::with_options(config.connect_options())
    }

    pub fn with_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    async fn connect(&self) -> Result<PgConnection> {
        let conn = PgConnection::connect_with(&self.options).await?;
        Ok(conn)
    }

    /// Check that the server is reachable with the configured credentials.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        conn.ping().await?;
        conn.close().await?;
        Ok(())
    }

    // Schema operations

    /// Drop both tables if present and recreate them empty.
    ///
    /// Destroys all existing data. Runs as one transaction, so a failure
    /// leaves the previous schema in place.
    pub async fn initialize_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await.map_err(DirectoryError::SchemaError)?;

        for statement in schema::statements() {
            debug!(statement = statement.trim(), "executing schema statement");
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(DirectoryError::SchemaError)?;
        }

        tx.commit().await.map_err(DirectoryError::SchemaError)?;
        conn.close().await?;

        info!("client schema initialized");
        Ok(())
    }

    // Client operations

    /// Insert a client and, when `phone_number` is non-empty, one phone for it.
    ///
    /// Returns the new `id_client`. Both inserts share a transaction; a
    /// rejected phone number leaves no client behind.
    pub async fn add_client(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<i32> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        let id_client = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO clients (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id_client
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(number) = phone_number.filter(|n| !n.is_empty()) {
            sqlx::query("INSERT INTO phones (id_client, phone_number) VALUES ($1, $2)")
                .bind(id_client)
                .bind(number)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        conn.close().await?;

        info!(id_client, "client added");
        Ok(id_client)
    }

    /// Attach a phone number to the client owning `email`. Returns the new `id_phone`.
    pub async fn add_phone_number(&self, email: &str, phone_number: &str) -> Result<i32> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        let id_client = find_client_id(&mut *tx, email)
            .await?
            .ok_or_else(|| email_not_found(email))?;

        let id_phone = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO phones (id_client, phone_number)
            VALUES ($1, $2)
            RETURNING id_phone
            "#,
        )
        .bind(id_client)
        .bind(phone_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        conn.close().await?;

        info!(id_client, id_phone, "phone number added");
        Ok(id_phone)
    }

    /// Change one column of the client with `id`.
    ///
    /// `field` must be `name`, `lastname` or `email`; anything else is
    /// [`DirectoryError::InvalidField`] and nothing is executed.
    pub async fn update_client_field(&self, id: i32, field: &str, new_value: &str) -> Result<()> {
        let field: ClientField = field.parse()?;
        self.update_client(id, field, new_value).await
    }

    pub async fn update_client(&self, id: i32, field: ClientField, new_value: &str) -> Result<()> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        let result = sqlx::query(field.update_sql())
            .bind(new_value)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(format!("client with id {id}")));
        }

        tx.commit().await?;
        conn.close().await?;

        info!(id_client = id, %field, "client updated");
        Ok(())
    }

    /// Remove the phone rows of client `id` equal to `number`. Returns how many were removed.
    pub async fn delete_phone_number(&self, id: i32, number: &str) -> Result<u64> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        let removed = sqlx::query("DELETE FROM phones WHERE id_client = $1 AND phone_number = $2")
            .bind(id)
            .bind(number)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        conn.close().await?;

        debug!(id_client = id, removed, "phone numbers deleted");
        Ok(removed)
    }

    /// Remove client `id` together with its phone numbers.
    ///
    /// Returns the number of client rows removed, 0 when the id does not exist.
    pub async fn delete_client(&self, id: i32) -> Result<u64> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        // Phones first, they reference the client
        let phones = sqlx::query("DELETE FROM phones WHERE id_client = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let clients = sqlx::query("DELETE FROM clients WHERE id_client = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        conn.close().await?;

        info!(id_client = id, clients, phones, "client deleted");
        Ok(clients)
    }

    // Lookups

    /// Every joined row whose first name, last name, email or phone number equals `query`.
    ///
    /// All matches are returned, ordered by client then phone; an empty vec
    /// means nothing matched.
    pub async fn search_client(&self, query: &str) -> Result<Vec<ClientRecord>> {
        let sql = format!(
            "{RECORD_SELECT_SQL} WHERE c.first_name = $1 OR c.last_name = $1 OR c.email = $1 OR p.phone_number = $1 \
             ORDER BY c.id_client, p.id_phone"
        );

        let mut conn = self.connect().await?;
        let records = sqlx::query_as::<_, ClientRecord>(&sql)
            .bind(query)
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        debug!(matches = records.len(), "client search finished");
        Ok(records)
    }

    /// All clients joined with their phone numbers.
    pub async fn list_all(&self) -> Result<Vec<ClientRecord>> {
        let sql = format!("{RECORD_SELECT_SQL} ORDER BY c.id_client, p.id_phone");

        let mut conn = self.connect().await?;
        let records = sqlx::query_as::<_, ClientRecord>(&sql)
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        Ok(records)
    }

    pub async fn client_id_by_email(&self, email: &str) -> Result<i32> {
        let mut conn = self.connect().await?;
        let id = find_client_id(&mut conn, email).await?;
        conn.close().await?;

        id.ok_or_else(|| email_not_found(email))
    }

    pub async fn get_client(&self, id: i32) -> Result<Client> {
        let mut conn = self.connect().await?;
        let client = sqlx::query_as::<_, Client>(
            "SELECT id_client, first_name, last_name, email FROM clients WHERE id_client = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        client.ok_or_else(|| DirectoryError::NotFound(format!("client with id {id}")))
    }

    pub async fn phone_numbers(&self, id: i32) -> Result<Vec<PhoneNumber>> {
        let mut conn = self.connect().await?;
        let phones = sqlx::query_as::<_, PhoneNumber>(
            "SELECT id_phone, id_client, phone_number FROM phones WHERE id_client = $1 ORDER BY id_phone",
        )
        .bind(id)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        Ok(phones)
    }
}

async fn find_client_id<'e, E>(executor: E, email: &str) -> Result<Option<i32>>
where
    E: PgExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i32>("SELECT id_client FROM clients WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await?;

    Ok(id)
}

fn email_not_found(email: &str) -> DirectoryError {
    DirectoryError::NotFound(format!("client with email {email}"))
}

/// Build a directory from configuration and verify the database is reachable
pub async fn init(config: &Config) -> Result<ClientDirectory> {
    let directory = ClientDirectory::new(config);
    directory.ping().await?;

    Ok(directory)
}
