//! Read-status validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::BookError;

/// Canonical read status of a book.
///
/// Documents written with the Spanish display forms load as the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Read", alias = "Leído")]
    Read,
    #[serde(rename = "Unread", alias = "No leído")]
    Unread,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Read => "Read",
            Status::Unread => "Unread",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_status(s).ok_or_else(|| BookError::InvalidStatus(s.trim().to_string()))
    }
}

/// Map raw user input onto a canonical status, or `None` if it matches nothing.
///
/// Matching ignores case and surrounding whitespace, and accepts the Spanish
/// spellings with or without the accent.
pub fn normalize_status(raw: &str) -> Option<Status> {
    match raw.trim().to_lowercase().as_str() {
        "read" | "leído" | "leido" => Some(Status::Read),
        "unread" | "not read" | "no leído" | "no leido" => Some(Status::Unread),
        _ => None,
    }
}
