//! Shelf: a personal library manager backed by MongoDB.
//!
//! The `books` module holds the records and their repository; `shell` is the
//! interactive menu that drives it.

pub mod modules;
pub mod shell;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
