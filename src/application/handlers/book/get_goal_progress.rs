//! GetGoalProgressHandler - pages accrued in the current goal window.

use std::sync::Arc;

use crate::domain::book::{goal_progress, BookError};
use crate::domain::foundation::{BookId, UserId};
use crate::ports::{BookRepository, ReadingSessionRepository};

/// Query handler joining a book with its session history to compute
/// goal progress for the current period.
pub struct GetGoalProgressHandler {
    books: Arc<dyn BookRepository>,
    sessions: Arc<dyn ReadingSessionRepository>,
}

impl GetGoalProgressHandler {
    pub fn new(
        books: Arc<dyn BookRepository>,
        sessions: Arc<dyn ReadingSessionRepository>,
    ) -> Self {
        Self { books, sessions }
    }

    /// Pages read toward the book's goal in the current period, or
    /// `None` when no goal is set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the book is absent or owned by someone else
    pub async fn handle(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<i32>, BookError> {
        let book = self
            .books
            .find_owned(book_id, user_id)
            .await?
            .ok_or(BookError::NotFound(*book_id))?;

        // Skip the history query entirely for goalless books.
        if book.reading_goal().is_none() {
            return Ok(None);
        }

        let sessions = self
            .sessions
            .find_by_owner_and_book(user_id, book_id)
            .await?;

        Ok(goal_progress(&book, &sessions))
    }
}
