//! Custom error types for the common library
//!
//! Database failures are classified by the constraint that rejected them so
//! the services can answer with a conflict or validation error instead of a
//! blanket 500.

use sqlx::{Error as SqlxError, error::ErrorKind};
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A unique constraint rejected the write
    #[error("Duplicate value violates {constraint}")]
    UniqueViolation { constraint: String },

    /// A referenced row does not exist
    #[error("Referenced row missing for {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A check or not-null constraint rejected the write
    #[error("Value rejected by {constraint}")]
    CheckViolation { constraint: String },

    /// A stored value could not be mapped onto its domain type
    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

impl DatabaseError {
    /// Classify an error raised while running a statement
    pub fn from_query(err: SqlxError) -> Self {
        let classified = match &err {
            SqlxError::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Some(DatabaseError::UniqueViolation { constraint }),
                    ErrorKind::ForeignKeyViolation => {
                        Some(DatabaseError::ForeignKeyViolation { constraint })
                    }
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        Some(DatabaseError::CheckViolation { constraint })
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        classified.unwrap_or(DatabaseError::Query(err))
    }

    /// Whether the error is a duplicate-key rejection
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::from_query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
