//! Subcommands and their execution against the repository.

use std::io::Write;

use clap::Subcommand;
use shelf_app::books::{
    BookError, BookId, BookPatch, BookRepository, BookStore, DeleteOutcome, NewBook, SearchField,
    Status, UpdateOutcome,
};
use shelf_app::shell::Shell;
use shelf_app::utils::{book_line, write_books};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu
    Shell,
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        genre: String,
        /// Read or Unread (Leído / No leído also accepted)
        #[arg(long)]
        status: String,
    },
    /// List every book
    List,
    /// Show one book
    Show { id: String },
    /// Change some fields of a book
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a book
    Delete { id: String },
    /// Case-insensitive substring search on title, author or genre
    Search { field: String, term: String },
}

/// A command whose arguments have been validated.
#[derive(Debug)]
pub enum Request {
    Shell,
    Add(NewBook),
    List,
    Show(BookId),
    Update(BookId, BookPatch),
    Delete(BookId),
    Search(SearchField, String),
}

impl Command {
    pub fn into_request(self) -> Result<Request, BookError> {
        let request = match self {
            Command::Shell => Request::Shell,
            Command::Add {
                title,
                author,
                genre,
                status,
            } => Request::Add(NewBook::new(title, author, genre, status.parse::<Status>()?)),
            Command::List => Request::List,
            Command::Show { id } => Request::Show(BookId::parse(&id)?),
            Command::Update {
                id,
                title,
                author,
                genre,
                status,
            } => {
                let id = BookId::parse(&id)?;
                let patch = BookPatch::parse(
                    title.as_deref().unwrap_or_default(),
                    author.as_deref().unwrap_or_default(),
                    genre.as_deref().unwrap_or_default(),
                    status.as_deref().unwrap_or_default(),
                )?;
                Request::Update(id, patch)
            }
            Command::Delete { id } => Request::Delete(BookId::parse(&id)?),
            Command::Search { field, term } => Request::Search(field.parse()?, term),
        };
        Ok(request)
    }
}

pub async fn execute<S, W>(
    repo: &BookRepository<S>,
    request: Request,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: BookStore,
    W: Write,
{
    match request {
        Request::Shell => {
            let stdin = std::io::stdin();
            Shell::new(repo, stdin.lock(), &mut *out).run().await?;
        }
        Request::Add(book) => {
            let id = repo.insert(book).await?;
            writeln!(out, "{id}")?;
        }
        Request::List => {
            let books = repo.list_all().await?;
            if books.is_empty() {
                writeln!(out, "No books recorded.")?;
            } else {
                write_books(out, "BOOKS:", &books)?;
            }
        }
        Request::Show(id) => match repo.find_by_id(&id.to_string()).await? {
            Some(book) => writeln!(out, "{}", book_line(&book))?,
            None => writeln!(out, "No book found with ID {id}.")?,
        },
        Request::Update(id, patch) => {
            let message = match repo.update_fields(&id.to_string(), patch).await? {
                UpdateOutcome::Modified => "Book updated.",
                UpdateOutcome::NoChanges => "No changes were made.",
                UpdateOutcome::Unchanged => "The book already had those values; nothing changed.",
                UpdateOutcome::NotFound => "No book found with that ID.",
            };
            writeln!(out, "{message}")?;
        }
        Request::Delete(id) => {
            let message = match repo.delete_by_id(&id.to_string()).await? {
                DeleteOutcome::Deleted => "Book deleted.",
                DeleteOutcome::NotFound => "No book found with that ID.",
            };
            writeln!(out, "{message}")?;
        }
        Request::Search(field, term) => {
            let books = repo.search(field.as_str(), &term).await?;
            if books.is_empty() {
                writeln!(out, "No books match that search.")?;
            } else {
                write_books(out, "SEARCH RESULTS:", &books)?;
            }
        }
    }

    tracing::debug!("command finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_app::books::MemoryBookStore;

    async fn run(repo: &BookRepository<MemoryBookStore>, command: Command) -> String {
        let mut out = Vec::new();
        execute(repo, command.into_request().unwrap(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn add_dune() -> Command {
        Command::Add {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Sci-Fi".into(),
            status: "no leido".into(),
        }
    }

    #[test]
    fn add_with_bad_status_is_rejected_up_front() {
        let err = Command::Add {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Sci-Fi".into(),
            status: "bogus".into(),
        }
        .into_request()
        .unwrap_err();
        assert!(matches!(err, BookError::InvalidStatus(_)));
    }

    #[test]
    fn malformed_ids_are_rejected_up_front() {
        let err = Command::Delete { id: "42".into() }.into_request().unwrap_err();
        assert!(matches!(err, BookError::InvalidId(_)));
    }

    #[test]
    fn search_field_is_checked_up_front() {
        let err = Command::Search {
            field: "isbn".into(),
            term: "978".into(),
        }
        .into_request()
        .unwrap_err();
        assert!(matches!(err, BookError::InvalidField(_)));
    }

    #[tokio::test]
    async fn add_prints_the_new_id_and_show_finds_it() {
        let repo = BookRepository::new(MemoryBookStore::new());
        let id = run(&repo, add_dune()).await.trim().to_string();

        let shown = run(&repo, Command::Show { id: id.clone() }).await;
        assert_eq!(
            shown.trim(),
            format!("ID: {id} | Title: Dune | Author: Frank Herbert | Genre: Sci-Fi | Status: Unread")
        );
    }

    #[tokio::test]
    async fn update_without_flags_reports_no_changes() {
        let repo = BookRepository::new(MemoryBookStore::new());
        let id = run(&repo, add_dune()).await.trim().to_string();

        let out = run(
            &repo,
            Command::Update {
                id,
                title: None,
                author: None,
                genre: None,
                status: None,
            },
        )
        .await;
        assert_eq!(out.trim(), "No changes were made.");
    }

    #[tokio::test]
    async fn list_search_and_delete() {
        let repo = BookRepository::new(MemoryBookStore::new());
        let id = run(&repo, add_dune()).await.trim().to_string();

        assert!(run(&repo, Command::List).await.contains("Title: Dune"));
        let hits = run(
            &repo,
            Command::Search {
                field: "author".into(),
                term: "herbert".into(),
            },
        )
        .await;
        assert!(hits.contains("SEARCH RESULTS:"));

        assert_eq!(run(&repo, Command::Delete { id: id.clone() }).await.trim(), "Book deleted.");
        assert_eq!(run(&repo, Command::List).await.trim(), "No books recorded.");
        assert_eq!(
            run(&repo, Command::Show { id: id.clone() }).await.trim(),
            format!("No book found with ID {id}.")
        );
    }
}
