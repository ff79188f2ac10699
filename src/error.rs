//! Error types for card_sync

use thiserror::Error;

/// Unified error type for fetch and import operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// A paginated listing answered with a different page than requested
    #[error("Requested page {requested} but the server returned page {returned}")]
    PageMismatch { requested: u32, returned: u32 },
    /// Failed to parse a JSON payload
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Downloaded archive could not be read
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Archive did not contain exactly one file
    #[error("Found an unexpected number of files in the MTGJSON archive: {0}")]
    ArchiveLayout(usize),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for card_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_layout_message_names_file_count() {
        let err = SyncError::ArchiveLayout(3);
        assert_eq!(
            err.to_string(),
            "Found an unexpected number of files in the MTGJSON archive: 3"
        );
    }

    #[test]
    fn database_error_converts_with_question_mark() {
        fn failing() -> Result<()> {
            let conn = rusqlite::Connection::open_in_memory()?;
            conn.execute("INSERT INTO missing_table VALUES (1)", [])?;
            Ok(())
        }

        assert!(matches!(failing(), Err(SyncError::Database(_))));
    }
}
