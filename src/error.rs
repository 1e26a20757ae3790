use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Unique, check, not-null, foreign-key or length violation reported by the database.
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid field `{0}`, expected one of: name, lastname, email")]
    InvalidField(String),

    #[error("schema error: {0}")]
    SchemaError(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl DirectoryError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DirectoryError::ConstraintViolation { .. })
    }

    /// Name of the violated constraint, when the server reported one.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DirectoryError::ConstraintViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }
}

/// SQLSTATE codes surfaced as [`DirectoryError::ConstraintViolation`].
///
/// Class 23 covers integrity constraints; 22001 is `string_data_right_truncation`,
/// raised when a value exceeds its `VARCHAR(n)` limit.
pub(crate) fn is_constraint_code(code: &str) -> bool {
    code.starts_with("23") || code == "22001"
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let is_constraint = db_err
                    .code()
                    .map(|code| is_constraint_code(&code))
                    .unwrap_or(false);

                if is_constraint {
                    let constraint = db_err.constraint().map(str::to_string);
                    tracing::debug!(constraint = ?constraint, "{}", db_err.message());
                    DirectoryError::ConstraintViolation {
                        constraint,
                        message: db_err.message().to_string(),
                    }
                } else {
                    DirectoryError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => DirectoryError::Database(other),
        }
    }
}
