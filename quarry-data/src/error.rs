/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// A malformed dynamic finder name, or a condition/argument arity mismatch.
    InvalidQuery(String),
    /// The driver cannot perform the requested operation, e.g. a soft delete
    /// on an entity that declares no deletion marker.
    Unsupported(String),
    /// Any error raised by the underlying storage driver, passed through unchanged.
    Driver(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl DataError {
    /// Construct a `Driver` variant from any error type.
    ///
    /// Used by backend crates (e.g. `quarry-data-sqlx`, `quarry-data-memory`)
    /// to wrap driver-specific errors.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Driver(Box::new(err))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::InvalidQuery(msg) => write!(f, "Invalid query: {msg}"),
            DataError::Unsupported(msg) => write!(f, "Unsupported operation: {msg}"),
            DataError::Driver(err) => write!(f, "Driver error: {err}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Driver(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
