//! In-memory book store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::book::Book;
use crate::domain::foundation::{BookId, DomainError, ErrorCode, UserId};
use crate::ports::BookRepository;

/// In-memory [`BookRepository`] backed by a HashMap.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<HashMap<BookId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book, replacing any record with the same id.
    pub async fn insert(&self, book: Book) {
        self.books.write().await.insert(*book.id(), book);
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_owned(&self, id: &BookId, owner: &UserId) -> Result<Option<Book>, DomainError> {
        Ok(self
            .books
            .read()
            .await
            .get(id)
            .filter(|book| book.is_owned_by(owner))
            .cloned())
    }

    async fn update(&self, book: &Book) -> Result<(), DomainError> {
        let mut books = self.books.write().await;
        match books.get_mut(book.id()) {
            Some(existing) => {
                *existing = book.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::BookNotFound,
                format!("Book not found: {}", book.id()),
            )),
        }
    }
}
