//! Shared mock repositories for book handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::book::Book;
use crate::domain::foundation::{BookId, DomainError, UserId};
use crate::domain::session::ReadingSession;
use crate::ports::{BookRepository, ReadingSessionRepository};

pub(crate) struct MockBookRepository {
    books: Mutex<Vec<Book>>,
    updated_books: Mutex<Vec<Book>>,
}

impl MockBookRepository {
    pub(crate) fn new() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            updated_books: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_book(book: Book) -> Self {
        let repo = Self::new();
        repo.books.lock().unwrap().push(book);
        repo
    }

    pub(crate) fn updated_books(&self) -> Vec<Book> {
        self.updated_books.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookRepository for MockBookRepository {
    async fn find_owned(&self, id: &BookId, owner: &UserId) -> Result<Option<Book>, DomainError> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id() == id && b.is_owned_by(owner))
            .cloned())
    }

    async fn update(&self, book: &Book) -> Result<(), DomainError> {
        let mut books = self.books.lock().unwrap();
        if let Some(existing) = books.iter_mut().find(|b| b.id() == book.id()) {
            *existing = book.clone();
        }
        self.updated_books.lock().unwrap().push(book.clone());
        Ok(())
    }
}

pub(crate) struct MockSessionRepository {
    sessions: Mutex<Vec<ReadingSession>>,
}

impl MockSessionRepository {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_sessions(sessions: Vec<ReadingSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
        }
    }
}

#[async_trait]
impl ReadingSessionRepository for MockSessionRepository {
    async fn find_open(&self, owner: &UserId) -> Result<Option<ReadingSession>, DomainError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id() == owner && s.is_open())
            .max_by_key(|s| *s.start_time())
            .cloned())
    }

    async fn find_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<Vec<ReadingSession>, DomainError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id() == owner && s.book_id() == book)
            .cloned()
            .collect())
    }

    async fn save(&self, session: &ReadingSession) -> Result<(), DomainError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn update(&self, session: &ReadingSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(existing) = sessions.iter_mut().find(|s| s.id() == session.id()) {
            *existing = session.clone();
        }
        Ok(())
    }

    async fn delete_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<(), DomainError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| !(s.user_id() == owner && s.book_id() == book));
        Ok(())
    }
}
