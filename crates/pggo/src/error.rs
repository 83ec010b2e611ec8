//! Error types for pggo

use thiserror::Error;

/// Result type alias for pggo operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for building, executing and binding statements
#[derive(Debug, Error)]
pub enum OrmError {
    /// An IN group was compiled without any candidate value
    #[error("values list must not be empty")]
    EmptyGroup,

    /// AND/OR was compiled without any child condition
    #[error("conditions list must not be empty")]
    EmptyConditions,

    /// INSERT was compiled without any row
    #[error("sqlb: there must be at least one row")]
    NoRows,

    /// The executor returned a column the record cannot bind
    #[error("sqlb: {0} is not found")]
    UnknownColumn(String),

    /// The same column was requested twice from one record
    #[error("sqlb: {0} is requested more than once")]
    DuplicateColumn(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Query execution error, passed through from the driver
    #[error(transparent)]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Execution was attempted through a factory without a database
    #[error("sqlb: no DB was provided to execute the query")]
    NoDb,

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was raised while compiling a statement, before any execution
    pub fn is_build_error(&self) -> bool {
        matches!(self, Self::EmptyGroup | Self::EmptyConditions | Self::NoRows)
    }

    /// Check if this error was raised while binding a row to a record
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumn(_) | Self::DuplicateColumn(_) | Self::Decode { .. }
        )
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
