use std::fmt;

/// One row of `clients LEFT JOIN phones`.
///
/// A client without phone numbers yields a single record with `phone_number`
/// set to `None`; a client with N numbers yields N records.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub id_client: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.id_client,
            self.first_name,
            self.last_name,
            self.email,
            self.phone_number.as_deref().unwrap_or("-")
        )
    }
}
