//! `BookStore` over a MongoDB collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use super::error::StoreError;
use super::models::{legacy_key, Book, BookId, BookPatch, NewBook, SearchField};
use super::store::{BookStore, UpdateCounts};

#[derive(Debug, Clone)]
pub struct MongoBookStore {
    books: Collection<Book>,
}

impl MongoBookStore {
    pub fn new(books: Collection<Book>) -> Self {
        Self { books }
    }

    pub fn collection(&self) -> &Collection<Book> {
        &self.books
    }
}

fn by_id(id: BookId) -> Document {
    doc! { "_id": id.object_id() }
}

/// `$set` body holding only the supplied fields.
pub(crate) fn set_document(patch: &BookPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(author) = &patch.author {
        set.insert("author", author.as_str());
    }
    if let Some(genre) = &patch.genre {
        set.insert("genre", genre.as_str());
    }
    if let Some(status) = patch.status {
        set.insert("status", status.as_str());
    }
    set
}

/// `$unset` body dropping the Spanish key of every field being set, so a
/// patched legacy document never carries both spellings.
pub(crate) fn unset_document(set: &Document) -> Document {
    let mut unset = Document::new();
    for key in set.keys() {
        if let Some(legacy) = legacy_key(key) {
            unset.insert(legacy, "");
        }
    }
    unset
}

/// Unanchored, case-insensitive match on the field under either spelling;
/// the term is taken literally.
pub(crate) fn search_filter(field: SearchField, term: &str) -> Document {
    let pattern = doc! { "$regex": regex::escape(term), "$options": "i" };
    let mut clauses = Vec::new();
    for key in std::iter::once(field.as_str()).chain(legacy_key(field.as_str())) {
        let mut clause = Document::new();
        clause.insert(key, pattern.clone());
        clauses.push(clause);
    }
    doc! { "$or": clauses }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn insert_one(&self, book: &NewBook) -> Result<BookId, StoreError> {
        let result = self
            .books
            .clone_with_type::<NewBook>()
            .insert_one(book)
            .await?;

        result
            .inserted_id
            .as_object_id()
            .map(BookId::from)
            .ok_or_else(|| format!("store returned a non-ObjectId id: {}", result.inserted_id).into())
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let cursor = self.books.find(doc! {}).await?;
        let books: Vec<Book> = cursor.try_collect().await?;
        Ok(books)
    }

    async fn find_one(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.find_one(by_id(id)).await?)
    }

    async fn update_one(&self, id: BookId, patch: &BookPatch) -> Result<UpdateCounts, StoreError> {
        let set = set_document(patch);
        let unset = unset_document(&set);
        let result = self
            .books
            .update_one(by_id(id), doc! { "$set": set, "$unset": unset })
            .await?;

        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, id: BookId) -> Result<u64, StoreError> {
        Ok(self.books.delete_one(by_id(id)).await?.deleted_count)
    }

    async fn find_matching(&self, field: SearchField, term: &str) -> Result<Vec<Book>, StoreError> {
        let cursor = self.books.find(search_filter(field, term)).await?;
        let books: Vec<Book> = cursor.try_collect().await?;
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::Status;

    #[test]
    fn set_document_only_holds_supplied_fields() {
        let patch = BookPatch::default()
            .genre("Science Fiction")
            .status(Status::Unread);
        assert_eq!(
            set_document(&patch),
            doc! { "genre": "Science Fiction", "status": "Unread" }
        );
    }

    #[test]
    fn unset_document_drops_spanish_keys_of_set_fields() {
        let patch = BookPatch::default().title("Dune").status(Status::Read);
        assert_eq!(
            unset_document(&set_document(&patch)),
            doc! { "titulo": "", "estado": "" }
        );
    }

    #[test]
    fn search_filter_is_case_insensitive_and_literal() {
        let pattern = doc! { "$regex": r"C\+\+ \(2nd ed\.\)", "$options": "i" };
        assert_eq!(
            search_filter(SearchField::Title, "C++ (2nd ed.)"),
            doc! { "$or": [ { "title": pattern.clone() }, { "titulo": pattern } ] }
        );
    }
}
