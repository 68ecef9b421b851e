//! Test fixture: an in-process `BookStore` for exercising the repository and
//! shell without a MongoDB server. Counts calls so tests can assert that
//! validation failures never reach the store.
//!
//! Compiled only for this crate's tests and under the `test-support` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::error::StoreError;
use super::models::{Book, BookId, BookPatch, NewBook, SearchField};
use super::store::{BookStore, UpdateCounts};

#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: Mutex<Vec<Book>>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total store calls, reads and writes alike.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// While set, every call fails as if the server dropped the connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self, write: bool) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if write {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err("connection closed by store".into());
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert_one(&self, book: &NewBook) -> Result<BookId, StoreError> {
        self.enter(true)?;
        let id = BookId::generate();
        self.books.lock().await.push(book.clone().into_book(id));
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        self.enter(false)?;
        Ok(self.books.lock().await.clone())
    }

    async fn find_one(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.enter(false)?;
        Ok(self.books.lock().await.iter().find(|b| b.id == id).cloned())
    }

    async fn update_one(&self, id: BookId, patch: &BookPatch) -> Result<UpdateCounts, StoreError> {
        self.enter(true)?;
        let mut books = self.books.lock().await;
        let counts = match books.iter_mut().find(|b| b.id == id) {
            Some(book) => UpdateCounts {
                matched: 1,
                modified: u64::from(patch.apply_to(book)),
            },
            None => UpdateCounts::default(),
        };
        Ok(counts)
    }

    async fn delete_one(&self, id: BookId) -> Result<u64, StoreError> {
        self.enter(true)?;
        let mut books = self.books.lock().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok((before - books.len()) as u64)
    }

    async fn find_matching(&self, field: SearchField, term: &str) -> Result<Vec<Book>, StoreError> {
        self.enter(false)?;
        let needle = term.to_lowercase();
        Ok(self
            .books
            .lock()
            .await
            .iter()
            .filter(|b| field.value_of(b).to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
