//! The seam between the repository and whatever holds the documents.

use async_trait::async_trait;

use super::error::StoreError;
use super::models::{Book, BookId, BookPatch, NewBook, SearchField};

/// Counts reported by a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

/// One method per store interaction. Implementations do no validation; the
/// repository hands them already-checked input.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert_one(&self, book: &NewBook) -> Result<BookId, StoreError>;

    /// Every book, in whatever order the store yields them.
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_one(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// `patch` is never empty.
    async fn update_one(&self, id: BookId, patch: &BookPatch) -> Result<UpdateCounts, StoreError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, id: BookId) -> Result<u64, StoreError>;

    /// Case-insensitive substring match of `term` against `field`.
    async fn find_matching(&self, field: SearchField, term: &str) -> Result<Vec<Book>, StoreError>;
}
