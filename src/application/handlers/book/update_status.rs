//! UpdateStatusHandler - manual override of a book's completed flag.

use std::sync::Arc;

use crate::domain::book::{Book, BookError};
use crate::domain::foundation::{BookId, UserId};
use crate::ports::BookRepository;

/// Command to set a book's completed flag directly.
#[derive(Debug, Clone)]
pub struct UpdateStatusCommand {
    /// The book to update.
    pub book_id: BookId,
    /// New completed state.
    pub completed: bool,
}

/// Handler for manual status overrides.
pub struct UpdateStatusHandler {
    books: Arc<dyn BookRepository>,
}

impl UpdateStatusHandler {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Set the completed flag as requested.
    ///
    /// The next progress update on a book with a known page count takes
    /// the flag back over.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the book is absent or owned by someone else
    pub async fn handle(
        &self,
        user_id: &UserId,
        cmd: UpdateStatusCommand,
    ) -> Result<Book, BookError> {
        let mut book = self
            .books
            .find_owned(&cmd.book_id, user_id)
            .await?
            .ok_or(BookError::NotFound(cmd.book_id))?;

        book.set_completed(cmd.completed);
        self.books.update(&book).await?;

        Ok(book)
    }
}
