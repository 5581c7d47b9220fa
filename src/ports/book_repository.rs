//! Book store port.
//!
//! Defines the contract for retrieving and mutating Book records.
//! Implementations handle the actual database operations.

use async_trait::async_trait;

use crate::domain::book::Book;
use crate::domain::foundation::{BookId, DomainError, UserId};

/// Store contract for [`Book`] records.
///
/// Lookups are always owner-filtered: a book that exists but belongs to
/// another user reads as absent, so ownership never leaks through this
/// port.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find a book by id, visible only to its owner.
    ///
    /// Returns `None` if the book does not exist or is owned by someone
    /// else.
    async fn find_owned(&self, id: &BookId, owner: &UserId) -> Result<Option<Book>, DomainError>;

    /// Persist changes to an existing book.
    ///
    /// # Errors
    ///
    /// - `BookNotFound` if the book doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, book: &Book) -> Result<(), DomainError>;
}
