use crate::{Error, error::StorageError};

/// Extension trait for Result types to simplify database error mapping
///
/// Storage backends use this to turn driver errors into hostel storage errors
/// without repeating the conversion at every call site.
///
/// # Example
///
/// ```rust,ignore
/// use hostel_core::error::utilities::DatabaseResultExt;
///
/// query.execute(&pool).await.map_db_err_with_context("Failed to write entry")?;
/// ```
pub trait DatabaseResultExt<T> {
    /// Convert a database error to a storage error with additional context
    fn map_db_err_with_context(self, context: &str) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> DatabaseResultExt<T> for Result<T, E> {
    fn map_db_err_with_context(self, context: &str) -> Result<T, Error> {
        self.map_err(|e| {
            tracing::error!(error = %e, context, "Storage operation failed");
            Error::Storage(StorageError::Database(format!("{context}: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_result_ext() {
        let error_result: Result<i32, &str> = Err("timeout");
        let mapped = error_result.map_db_err_with_context("Failed to read entry");

        match mapped.unwrap_err() {
            Error::Storage(StorageError::Database(msg)) => {
                assert_eq!(msg, "Failed to read entry: timeout");
            }
            _ => panic!("Expected storage database error"),
        }
    }

    #[test]
    fn test_ok_passes_through() {
        let ok: Result<i32, &str> = Ok(7);
        assert_eq!(ok.map_db_err_with_context("unused").unwrap(), 7);
    }
}
