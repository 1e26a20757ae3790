use std::fmt;
use std::str::FromStr;

use crate::error::DirectoryError;

/// Client column that can be changed by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    FirstName,
    LastName,
    Email,
}

impl ClientField {
    pub const ALL: [ClientField; 3] = [ClientField::FirstName, ClientField::LastName, ClientField::Email];

    /// Name accepted by [`FromStr`]
    pub fn as_str(self) -> &'static str {
        match self {
            ClientField::FirstName => "name",
            ClientField::LastName => "lastname",
            ClientField::Email => "email",
        }
    }

    pub(crate) fn update_sql(self) -> &'static str {
        match self {
            ClientField::FirstName => "UPDATE clients SET first_name = $1 WHERE id_client = $2",
            ClientField::LastName => "UPDATE clients SET last_name = $1 WHERE id_client = $2",
            ClientField::Email => "UPDATE clients SET email = $1 WHERE id_client = $2",
        }
    }
}

impl FromStr for ClientField {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ClientField::FirstName),
            "lastname" => Ok(ClientField::LastName),
            "email" => Ok(ClientField::Email),
            other => Err(DirectoryError::InvalidField(other.to_string())),
        }
    }
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
