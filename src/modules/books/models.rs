use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::error::BookError;
use super::status::Status;

/// Store-assigned identifier of a book: a 24-hex-character ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(ObjectId);

impl BookId {
    /// Parse user input. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, BookError> {
        ObjectId::parse_str(raw.trim())
            .map(BookId)
            .map_err(|_| BookError::InvalidId(raw.trim().to_string()))
    }

    pub fn generate() -> Self {
        BookId(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for BookId {
    fn from(oid: ObjectId) -> Self {
        BookId(oid)
    }
}

impl FromStr for BookId {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookId::parse(s)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// A persisted book.
///
/// Documents written by the earlier Spanish-keyed tool (`titulo`, `autor`,
/// `genero`, `estado`) load through the aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned by the store on insert
    #[serde(rename = "_id")]
    pub id: BookId,
    /// Title of the book
    #[serde(alias = "titulo")]
    pub title: String,
    /// Author of the book
    #[serde(alias = "autor")]
    pub author: String,
    /// Genre, free-form
    #[serde(alias = "genero")]
    pub genre: String,
    /// Whether the book has been read
    #[serde(alias = "estado")]
    pub status: Status,
}

/// Document key the earlier tool used for a field, where it differs.
const LEGACY_KEYS: [(&str, &str); 4] = [
    ("title", "titulo"),
    ("author", "autor"),
    ("genre", "genero"),
    ("status", "estado"),
];

pub(crate) fn legacy_key(key: &str) -> Option<&'static str> {
    LEGACY_KEYS
        .iter()
        .find(|(current, _)| *current == key)
        .map(|(_, legacy)| *legacy)
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: Status,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            status,
        }
    }

    /// Trim every text field and reject any that end up empty.
    pub(crate) fn normalized(self) -> Result<Self, BookError> {
        Ok(Self {
            title: required("title", self.title)?,
            author: required("author", self.author)?,
            genre: required("genre", self.genre)?,
            status: self.status,
        })
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            status: self.status,
        }
    }
}

fn required(field: &'static str, value: String) -> Result<String, BookError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Partial update: `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub status: Option<Status>,
}

impl BookPatch {
    /// Build a patch from raw answers, where a blank answer means "keep".
    ///
    /// The status is validated before anything else is accepted, so a bad
    /// status rejects the whole patch.
    pub fn parse(title: &str, author: &str, genre: &str, status: &str) -> Result<Self, BookError> {
        let status = match status.trim() {
            "" => None,
            raw => Some(raw.parse::<Status>()?),
        };

        Ok(Self {
            title: supplied(title),
            author: supplied(author),
            genre: supplied(genre),
            status,
        })
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Drop blank text slots and trim the rest.
    pub(crate) fn normalized(self) -> Self {
        Self {
            title: self.title.as_deref().and_then(supplied),
            author: self.author.as_deref().and_then(supplied),
            genre: self.genre.as_deref().and_then(supplied),
            status: self.status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.genre.is_none() && self.status.is_none()
    }

    /// Apply to an in-memory record; returns whether anything changed.
    pub fn apply_to(&self, book: &mut Book) -> bool {
        let mut changed = false;
        changed |= replace(&mut book.title, &self.title);
        changed |= replace(&mut book.author, &self.author);
        changed |= replace(&mut book.genre, &self.genre);
        if let Some(status) = self.status {
            changed |= book.status != status;
            book.status = status;
        }
        changed
    }
}

fn supplied(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn replace(slot: &mut String, value: &Option<String>) -> bool {
    match value {
        Some(value) if slot != value => {
            *slot = value.clone();
            true
        }
        _ => false,
    }
}

/// Which text field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [SearchField::Title, SearchField::Author, SearchField::Genre];

    /// Document key this field is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Genre => "genre",
        }
    }

    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
            SearchField::Genre => &book.genre,
        }
    }
}

impl FromStr for SearchField {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SearchField::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| BookError::InvalidField(s.trim().to_string()))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The patch was empty; the store was not contacted.
    NoChanges,
    /// No book has that id.
    NotFound,
    /// The book exists but already held every supplied value.
    Unchanged,
    Modified,
}

impl UpdateOutcome {
    pub fn modified_count(&self) -> u64 {
        match self {
            UpdateOutcome::Modified => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}
