//! Interactive menu over a `BookRepository`.
//!
//! Input and output are injected so the loop can be driven from tests. Every
//! book error is printed and the loop continues; end of input acts as quit.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::books::{
    BookError, BookPatch, BookRepository, BookStore, DeleteOutcome, NewBook, SearchField, Status,
    UpdateOutcome,
};
use crate::utils::write_books;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    Update,
    Delete,
    List,
    Search,
    Quit,
}

impl MenuChoice {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Update),
            "3" => Some(MenuChoice::Delete),
            "4" => Some(MenuChoice::List),
            "5" => Some(MenuChoice::Search),
            "6" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Shell<'a, S, R, W> {
    repo: &'a BookRepository<S>,
    input: R,
    output: W,
}

impl<'a, S, R, W> Shell<'a, S, R, W>
where
    S: BookStore,
    R: BufRead,
    W: Write,
{
    pub fn new(repo: &'a BookRepository<S>, input: R, output: W) -> Self {
        Self {
            repo,
            input,
            output,
        }
    }

    /// Run the menu until the user quits or input ends.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.print_menu()?;

            let choice = match self.prompt("Choose an option (1-6): ") {
                Ok(choice) => choice,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            writeln!(self.output)?;

            let result = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => self.add_book().await,
                Some(MenuChoice::Update) => self.update_book().await,
                Some(MenuChoice::Delete) => self.delete_book().await,
                Some(MenuChoice::List) => self.list_books().await,
                Some(MenuChoice::Search) => self.search_books().await,
                Some(MenuChoice::Quit) => break,
                None => {
                    writeln!(self.output, "Invalid option. Please try again.\n")?;
                    Ok(())
                }
            };

            match result {
                Ok(()) => {}
                Err(ActionError::Book(err)) => {
                    tracing::debug!(error = %err, ?choice, "menu action failed");
                    writeln!(self.output, "Error: {err}\n")?;
                }
                Err(ActionError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(ActionError::Io(e)) => return Err(e.into()),
            }
        }

        writeln!(self.output, "Exiting...")?;
        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "============ PERSONAL LIBRARY ============")?;
        writeln!(self.output, "1. Add a book")?;
        writeln!(self.output, "2. Update a book")?;
        writeln!(self.output, "3. Delete a book")?;
        writeln!(self.output, "4. List books")?;
        writeln!(self.output, "5. Search books")?;
        writeln!(self.output, "6. Quit")?;
        writeln!(self.output, "==========================================")
    }

    /// Print `label`, read one line, and return it trimmed.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    async fn add_book(&mut self) -> Result<(), ActionError> {
        let title = self.prompt("Title: ")?;
        let author = self.prompt("Author: ")?;
        let genre = self.prompt("Genre: ")?;
        let raw_status = self.prompt("Status (Read/Unread): ")?;

        let status = match raw_status.parse::<Status>() {
            Ok(status) => status,
            Err(err) => {
                writeln!(self.output, "{err}\nThe book was not added.\n")?;
                return Ok(());
            }
        };

        let id = self
            .repo
            .insert(NewBook::new(title, author, genre, status))
            .await?;
        writeln!(self.output, "Book added with ID: {id}\n")?;
        Ok(())
    }

    async fn list_books(&mut self) -> Result<(), ActionError> {
        let books = self.repo.list_all().await?;
        if books.is_empty() {
            writeln!(self.output, "\nNo books recorded.\n")?;
        } else {
            write_books(&mut self.output, "BOOKS:", &books)?;
        }
        Ok(())
    }

    /// Listing shown before asking for an id. A failed listing is reported
    /// but the user can still type an id they know.
    async fn show_listing(&mut self) -> Result<(), ActionError> {
        match self.list_books().await {
            Err(ActionError::Book(err)) => {
                writeln!(self.output, "Error: {err}\n")?;
                Ok(())
            }
            other => other,
        }
    }

    async fn update_book(&mut self) -> Result<(), ActionError> {
        self.show_listing().await?;
        let id = self.prompt("ID of the book to update: ")?;

        let Some(book) = self.repo.find_by_id(&id).await? else {
            writeln!(self.output, "No book found with that ID.\n")?;
            return Ok(());
        };

        writeln!(self.output, "Leave a field blank to keep its current value.")?;
        let title = self.prompt(&format!("New title [{}]: ", book.title))?;
        let author = self.prompt(&format!("New author [{}]: ", book.author))?;
        let genre = self.prompt(&format!("New genre [{}]: ", book.genre))?;
        let status = self.prompt(&format!("New status (Read/Unread) [{}]: ", book.status))?;

        let patch = match BookPatch::parse(&title, &author, &genre, &status) {
            Ok(patch) => patch,
            Err(err) => {
                writeln!(self.output, "{err}\nThe book was not updated.\n")?;
                return Ok(());
            }
        };

        let message = match self.repo.update_fields(&id, patch).await? {
            UpdateOutcome::Modified => "Book updated.",
            UpdateOutcome::NoChanges => "No changes were made.",
            UpdateOutcome::Unchanged => "The book already had those values; nothing changed.",
            UpdateOutcome::NotFound => "No book found with that ID.",
        };
        writeln!(self.output, "{message}\n")?;
        Ok(())
    }

    async fn delete_book(&mut self) -> Result<(), ActionError> {
        self.show_listing().await?;
        let id = self.prompt("ID of the book to delete: ")?;

        let message = match self.repo.delete_by_id(&id).await? {
            DeleteOutcome::Deleted => "Book deleted.",
            DeleteOutcome::NotFound => "No book found with that ID.",
        };
        writeln!(self.output, "{message}\n")?;
        Ok(())
    }

    async fn search_books(&mut self) -> Result<(), ActionError> {
        let raw_field = self.prompt("Search by (title/author/genre): ")?;
        let field: SearchField = raw_field.parse()?;
        let term = self.prompt(&format!("Enter the {field} to search for: "))?;

        let books = self.repo.search(field.as_str(), &term).await?;
        if books.is_empty() {
            writeln!(self.output, "No books match that search.\n")?;
        } else {
            write_books(&mut self.output, "SEARCH RESULTS:", &books)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{BookId, MemoryBookStore};

    async fn drive(repo: &BookRepository<MemoryBookStore>, script: &str) -> String {
        let mut output = Vec::new();
        Shell::new(repo, script.as_bytes(), &mut output)
            .run()
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn repo() -> BookRepository<MemoryBookStore> {
        BookRepository::new(MemoryBookStore::new())
    }

    async fn with_dune(repo: &BookRepository<MemoryBookStore>) -> BookId {
        repo.insert(NewBook::new("Dune", "Frank Herbert", "Sci-Fi", Status::Read))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn add_then_list() {
        let repo = repo();
        let out = drive(&repo, "1\nDune\nFrank Herbert\nSci-Fi\nleído\n4\n6\n").await;

        assert!(out.contains("Book added with ID: "));
        assert!(out.contains("Title: Dune | Author: Frank Herbert | Genre: Sci-Fi | Status: Read"));
        assert!(out.trim_end().ends_with("Exiting..."));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_with_invalid_status_writes_nothing() {
        let repo = repo();
        let out = drive(&repo, "1\nDune\nFrank Herbert\nSci-Fi\nhalf read\n6\n").await;

        assert!(out.contains("invalid status 'half read'"));
        assert!(out.contains("The book was not added."));
        assert_eq!(repo.store().writes(), 0);
    }

    #[tokio::test]
    async fn add_with_blank_title_reports_and_continues() {
        let repo = repo();
        let out = drive(&repo, "1\n\nFrank Herbert\nSci-Fi\nRead\n4\n6\n").await;

        assert!(out.contains("Error: title is required"));
        assert!(out.contains("No books recorded."));
    }

    #[tokio::test]
    async fn update_changes_only_answered_fields() {
        let repo = repo();
        let id = with_dune(&repo).await;
        let script = format!("2\n{id}\n\n\nScience Fiction\n\n6\n");
        let out = drive(&repo, &script).await;

        assert!(out.contains("New genre [Sci-Fi]: "));
        assert!(out.contains("Book updated."));
        let book = repo.find_by_id(&id.to_string()).await.unwrap().unwrap();
        assert_eq!(book.genre, "Science Fiction");
        assert_eq!(book.title, "Dune");
    }

    #[tokio::test]
    async fn update_with_all_blank_answers_makes_no_changes() {
        let repo = repo();
        let id = with_dune(&repo).await;
        let writes = repo.store().writes();
        let out = drive(&repo, &format!("2\n{id}\n\n\n\n\n6\n")).await;

        assert!(out.contains("No changes were made."));
        assert_eq!(repo.store().writes(), writes);
    }

    #[tokio::test]
    async fn update_with_bad_status_is_aborted() {
        let repo = repo();
        let id = with_dune(&repo).await;
        let writes = repo.store().writes();
        let out = drive(&repo, &format!("2\n{id}\nDune Messiah\n\n\nbogus\n6\n")).await;

        assert!(out.contains("The book was not updated."));
        assert_eq!(repo.store().writes(), writes);
        let book = repo.find_by_id(&id.to_string()).await.unwrap().unwrap();
        assert_eq!(book.title, "Dune");
    }

    #[tokio::test]
    async fn update_with_malformed_id_reports_error() {
        let repo = repo();
        let out = drive(&repo, "2\nnot-an-id\n6\n").await;
        assert!(out.contains("Error: invalid id 'not-an-id'"));
    }

    #[tokio::test]
    async fn delete_known_and_unknown_ids() {
        let repo = repo();
        let id = with_dune(&repo).await;
        let script = format!("3\n{id}\n3\n{}\n6\n", BookId::generate());
        let out = drive(&repo, &script).await;

        assert!(out.contains("Book deleted."));
        assert!(out.contains("No book found with that ID."));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_by_genre() {
        let repo = repo();
        repo.insert(NewBook::new("SPQR", "Mary Beard", "History", Status::Unread))
            .await
            .unwrap();
        repo.insert(NewBook::new("Dune", "Frank Herbert", "Science Fiction", Status::Read))
            .await
            .unwrap();

        let out = drive(&repo, "5\ngenre\nsci\n5\nauthor\ntolkien\n6\n").await;
        assert!(out.contains("SEARCH RESULTS:"));
        assert!(out.contains("Title: Dune"));
        assert!(!out.contains("Title: SPQR"));
        assert!(out.contains("No books match that search."));
    }

    #[tokio::test]
    async fn search_with_unknown_field_skips_the_term_prompt() {
        let repo = repo();
        let out = drive(&repo, "5\nisbn\n6\n").await;

        assert!(out.contains("Error: invalid search field 'isbn'"));
        assert!(!out.contains("to search for"));
        assert_eq!(repo.store().calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_does_not_end_the_loop() {
        let repo = repo();
        repo.store().set_unavailable(true);
        let out = drive(&repo, "4\n7\n6\n").await;

        assert!(out.contains("Error: failed to list books"));
        assert!(out.contains("Invalid option. Please try again."));
        assert!(out.trim_end().ends_with("Exiting..."));
    }

    #[tokio::test]
    async fn failed_listing_still_prompts_for_the_id() {
        let repo = repo();
        let id = with_dune(&repo).await;
        repo.store().set_unavailable(true);
        let out = drive(&repo, &format!("3\n{id}\n6\n")).await;

        assert!(out.contains("Error: failed to list books"));
        assert!(out.contains("ID of the book to delete: "));
        assert!(out.contains("Error: failed to delete book"));

        repo.store().set_unavailable(false);
        let out = drive(&repo, &format!("3\n{id}\n6\n")).await;
        assert!(out.contains("Book deleted."));
    }

    #[tokio::test]
    async fn end_of_input_mid_action_exits_cleanly() {
        let repo = repo();
        let out = drive(&repo, "1\nDune\n").await;
        assert!(out.trim_end().ends_with("Exiting..."));
        assert_eq!(repo.store().calls(), 0);
    }
}
