//! Session store port.
//!
//! Defines the contract for persisting and retrieving ReadingSession
//! records. Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **User-scoped**: every query filters by the owning user
//! - **Open-session lookup**: the lifecycle manager leans on
//!   [`ReadingSessionRepository::find_open`] returning the most recently
//!   started open session, so stores that could hold several must order
//!   by start time descending

use async_trait::async_trait;

use crate::domain::foundation::{BookId, DomainError, UserId};
use crate::domain::session::ReadingSession;

/// Store contract for [`ReadingSession`] records.
#[async_trait]
pub trait ReadingSessionRepository: Send + Sync {
    /// The owner's open (Active or Paused) session, most recent start
    /// winning ties.
    ///
    /// Returns `None` when nothing is open.
    async fn find_open(&self, owner: &UserId) -> Result<Option<ReadingSession>, DomainError>;

    /// All sessions the owner has recorded for one book, oldest first.
    async fn find_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<Vec<ReadingSession>, DomainError>;

    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &ReadingSession) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &ReadingSession) -> Result<(), DomainError>;

    /// Remove every session the owner has for the book.
    ///
    /// Invoked by the book collaborator before it deletes a book.
    async fn delete_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<(), DomainError>;
}
