use super::error::{BookError, BookResult};
use super::models::{Book, BookId, BookPatch, DeleteOutcome, NewBook, SearchField, UpdateOutcome};
use super::store::BookStore;

/// Validated CRUD and search over a `BookStore`.
///
/// Every malformed input is rejected before the store is contacted. Store
/// failures come back as `BookError::Store` with the driver error attached.
pub struct BookRepository<S> {
    store: S,
}

impl<S: BookStore> BookRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert a book and return the id the store assigned.
    pub async fn insert(&self, book: NewBook) -> BookResult<BookId> {
        let book = book.normalized()?;
        let id = self
            .store
            .insert_one(&book)
            .await
            .map_err(BookError::store("add book"))?;

        tracing::debug!(id = %id, title = %book.title, "book inserted");
        Ok(id)
    }

    pub async fn list_all(&self) -> BookResult<Vec<Book>> {
        self.store
            .find_all()
            .await
            .map_err(BookError::store("list books"))
    }

    pub async fn find_by_id(&self, id: &str) -> BookResult<Option<Book>> {
        let id = BookId::parse(id)?;
        self.store
            .find_one(id)
            .await
            .map_err(BookError::store("look up book"))
    }

    /// Apply the supplied fields of `patch`. An empty patch never reaches the store.
    pub async fn update_fields(&self, id: &str, patch: BookPatch) -> BookResult<UpdateOutcome> {
        let id = BookId::parse(id)?;
        let patch = patch.normalized();
        if patch.is_empty() {
            tracing::debug!(id = %id, "update skipped, nothing supplied");
            return Ok(UpdateOutcome::NoChanges);
        }

        let counts = self
            .store
            .update_one(id, &patch)
            .await
            .map_err(BookError::store("update book"))?;

        let outcome = if counts.matched == 0 {
            UpdateOutcome::NotFound
        } else if counts.modified > 0 {
            UpdateOutcome::Modified
        } else {
            UpdateOutcome::Unchanged
        };

        tracing::debug!(id = %id, ?outcome, "book update applied");
        Ok(outcome)
    }

    pub async fn delete_by_id(&self, id: &str) -> BookResult<DeleteOutcome> {
        let id = BookId::parse(id)?;
        let deleted = self
            .store
            .delete_one(id)
            .await
            .map_err(BookError::store("delete book"))?;

        tracing::debug!(id = %id, deleted, "book delete applied");
        Ok(if deleted > 0 {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        })
    }

    /// Case-insensitive substring search on title, author or genre.
    pub async fn search(&self, field: &str, term: &str) -> BookResult<Vec<Book>> {
        let field: SearchField = field.parse()?;
        self.store
            .find_matching(field, term.trim())
            .await
            .map_err(BookError::store("search books"))
    }
}
