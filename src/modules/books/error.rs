use thiserror::Error;

/// Boxed cause of a failed store call.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Recoverable errors from book operations. The shell reports them and keeps going.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("invalid id '{0}': expected a 24-character hexadecimal ObjectId")]
    InvalidId(String),

    #[error("invalid search field '{0}': expected title, author or genre")]
    InvalidField(String),

    #[error("invalid status '{0}': expected 'Read' or 'Unread'")]
    InvalidStatus(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl BookError {
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| {
            tracing::warn!(operation, error = %source, "store call failed");
            BookError::Store { operation, source }
        }
    }
}

pub type BookResult<T> = std::result::Result<T, BookError>;
