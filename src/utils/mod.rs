//! Display helpers shared by the shell and the `shelf` command.

use std::io::{self, Write};

use crate::books::Book;

const RULE_WIDTH: usize = 80;

/// One-line summary of a book.
pub fn book_line(book: &Book) -> String {
    format!(
        "ID: {} | Title: {} | Author: {} | Genre: {} | Status: {}",
        book.id, book.title, book.author, book.genre, book.status
    )
}

/// Write `books` under `heading`, framed by horizontal rules.
pub fn write_books<W: Write>(out: &mut W, heading: &str, books: &[Book]) -> io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(out, "\n{heading}")?;
    writeln!(out, "{rule}")?;
    for book in books {
        writeln!(out, "{}", book_line(book))?;
    }
    writeln!(out, "{rule}\n")
}
