use thiserror::Error;

/// Errors produced by the task core.
///
/// None of these are fatal: callers either recover to a safe default
/// (empty collection, coordinate fallback) or report them as a notice.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required text field was empty or whitespace-only.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// Stored JSON could not be decoded.
    #[error("stored data is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading or writing the backing store failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A task with this id is already in the collection.
    #[error("task id {0} already exists")]
    DuplicateId(crate::models::TaskId),

    /// The geocoding provider failed.
    #[error("geocoding failed: {0}")]
    Geocode(String),

    #[error("invalid date '{0}', use yyyy-MM-dd HH:mm")]
    InvalidDate(String),

    #[error("unknown status '{0}', use In Progress, Completed or Cancelled")]
    InvalidStatus(String),
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation { .. })
    }
}
