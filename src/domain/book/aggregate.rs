//! Book aggregate entity.
//!
//! Books belong to one user. The core only mutates the reading-progress
//! surface of a book (current page, completed flag, reading goal); the
//! remaining catalogue data is managed by the library collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookId, DomainError, ErrorCode, UserId};

use super::ReadingGoal;

/// Book aggregate - one title in a user's library.
///
/// # Invariants
///
/// - `current_page` is never negative and never exceeds a known
///   `page_count`
/// - when `page_count` is known, `completed` mirrors
///   `current_page >= page_count` after every progress update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for this book.
    id: BookId,

    /// User who owns this book.
    user_id: UserId,

    /// Book title.
    title: String,

    /// Total pages, when known.
    page_count: Option<i32>,

    /// Last recorded reading position.
    current_page: i32,

    /// Whether the user has finished the book.
    completed: bool,

    /// Optional periodic page goal.
    reading_goal: Option<ReadingGoal>,
}

impl Book {
    /// Create a new book at page zero.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty
    /// - `OutOfRange` if a page count is given and is below 1
    pub fn new(
        id: BookId,
        user_id: UserId,
        title: String,
        page_count: Option<i32>,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if let Some(count) = page_count {
            if count < 1 {
                return Err(DomainError::new(
                    ErrorCode::OutOfRange,
                    "Page count must be at least 1",
                ));
            }
        }

        Ok(Self {
            id,
            user_id,
            title,
            page_count,
            current_page: 0,
            completed: false,
            reading_goal: None,
        })
    }

    /// Reconstitute a book from persistence (no validation).
    ///
    /// Legacy rows may lack a reading position or completed flag; both
    /// normalize to their zero values.
    pub fn reconstitute(
        id: BookId,
        user_id: UserId,
        title: String,
        page_count: Option<i32>,
        current_page: Option<i32>,
        completed: Option<bool>,
        reading_goal: Option<ReadingGoal>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            page_count,
            current_page: current_page.unwrap_or(0),
            completed: completed.unwrap_or(false),
            reading_goal,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the book ID.
    pub fn id(&self) -> &BookId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the book title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the total page count, when known.
    pub fn page_count(&self) -> Option<i32> {
        self.page_count
    }

    /// Returns the last recorded reading position.
    pub fn current_page(&self) -> i32 {
        self.current_page
    }

    /// Returns whether the book is marked finished.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the reading goal, if one is set.
    pub fn reading_goal(&self) -> Option<&ReadingGoal> {
        self.reading_goal.as_ref()
    }

    /// Checks if the given user owns this book.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the reading position to `current_page`.
    ///
    /// When the total page count is known the completed flag follows the
    /// position in both directions: reaching the last page completes the
    /// book, and moving the marker back un-completes it. Without a known
    /// page count the flag is left untouched.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `current_page` is negative
    /// - `OutOfRange` if `current_page` exceeds a known page count
    pub fn update_progress(&mut self, current_page: i32) -> Result<(), DomainError> {
        if current_page < 0 {
            return Err(DomainError::new(
                ErrorCode::OutOfRange,
                "Current page cannot be negative",
            ));
        }
        if let Some(total) = self.page_count {
            if current_page > total {
                return Err(DomainError::new(
                    ErrorCode::OutOfRange,
                    "Current page cannot exceed total page count",
                ));
            }
        }

        self.current_page = current_page;

        if let Some(total) = self.page_count {
            self.completed = current_page >= total;
        }

        Ok(())
    }

    /// Manually override the completed flag.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Attach or replace the reading goal.
    pub fn set_reading_goal(&mut self, goal: ReadingGoal) {
        self.reading_goal = Some(goal);
    }
}
