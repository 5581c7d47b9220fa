//! SetReadingGoalHandler - attaches a periodic page goal to a book.

use std::sync::Arc;

use tracing::debug;

use crate::domain::book::{Book, BookError, GoalPeriod, ReadingGoal};
use crate::domain::foundation::{BookId, UserId};
use crate::ports::BookRepository;

/// Command to set or replace a book's reading goal.
#[derive(Debug, Clone)]
pub struct SetReadingGoalCommand {
    /// The book to set the goal on.
    pub book_id: BookId,
    /// Goal cadence.
    pub period: GoalPeriod,
    /// Pages to read per period; must be at least 1.
    pub target_pages: i32,
}

/// Handler for reading-goal updates.
pub struct SetReadingGoalHandler {
    books: Arc<dyn BookRepository>,
}

impl SetReadingGoalHandler {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Attach the goal described by `cmd` to the book.
    ///
    /// # Errors
    ///
    /// - `Validation` if the page target is below 1
    /// - `NotFound` if the book is absent or owned by someone else
    pub async fn handle(
        &self,
        user_id: &UserId,
        cmd: SetReadingGoalCommand,
    ) -> Result<Book, BookError> {
        let goal = ReadingGoal::new(cmd.period, cmd.target_pages)?;

        let mut book = self
            .books
            .find_owned(&cmd.book_id, user_id)
            .await?
            .ok_or(BookError::NotFound(cmd.book_id))?;

        book.set_reading_goal(goal);
        self.books.update(&book).await?;

        debug!(book = %book.id(), period = %cmd.period, pages = cmd.target_pages, "reading goal set");
        Ok(book)
    }
}
