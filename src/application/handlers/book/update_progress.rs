//! UpdateProgressHandler - moves a book's reading position.
//!
//! The one place the completed flag follows the page marker: reaching
//! the last page completes the book, moving back un-completes it.

use std::sync::Arc;

use tracing::debug;

use crate::domain::book::{Book, BookError};
use crate::domain::foundation::{BookId, UserId};
use crate::ports::BookRepository;

/// Command to move a book's reading position.
#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    /// The book to update.
    pub book_id: BookId,
    /// The new reading position.
    pub current_page: i32,
}

/// Handler for book progress updates.
pub struct UpdateProgressHandler {
    books: Arc<dyn BookRepository>,
}

impl UpdateProgressHandler {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Move the book to `cmd.current_page`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the book is absent or owned by someone else
    /// - `Validation` if the page is negative or beyond a known count
    pub async fn handle(
        &self,
        user_id: &UserId,
        cmd: UpdateProgressCommand,
    ) -> Result<Book, BookError> {
        let mut book = self
            .books
            .find_owned(&cmd.book_id, user_id)
            .await?
            .ok_or(BookError::NotFound(cmd.book_id))?;

        self.apply(&mut book, cmd.current_page).await?;
        Ok(book)
    }

    /// Apply a new position to an already-loaded book and persist it.
    ///
    /// The session lifecycle calls this directly when a stop reports an
    /// end page, keeping the cross-entity side effect an explicit call
    /// rather than a hidden cascade.
    pub async fn apply(&self, book: &mut Book, current_page: i32) -> Result<(), BookError> {
        book.update_progress(current_page)?;
        self.books.update(book).await?;

        debug!(book = %book.id(), page = current_page, "book progress updated");
        Ok(())
    }
}
