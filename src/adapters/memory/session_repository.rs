//! In-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{BookId, DomainError, ErrorCode, SessionId, UserId};
use crate::domain::session::ReadingSession;
use crate::ports::ReadingSessionRepository;

/// In-memory [`ReadingSessionRepository`] backed by a HashMap.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, ReadingSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session, replacing any record with the same id.
    pub async fn insert(&self, session: ReadingSession) {
        self.sessions.write().await.insert(*session.id(), session);
    }
}

#[async_trait]
impl ReadingSessionRepository for InMemorySessionRepository {
    async fn find_open(&self, owner: &UserId) -> Result<Option<ReadingSession>, DomainError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id() == owner && s.is_open())
            .max_by_key(|s| *s.start_time())
            .cloned())
    }

    async fn find_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<Vec<ReadingSession>, DomainError> {
        let mut sessions: Vec<ReadingSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id() == owner && s.book_id() == book)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| *s.start_time());
        Ok(sessions)
    }

    async fn save(&self, session: &ReadingSession) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &ReadingSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.id()) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )),
        }
    }

    async fn delete_by_owner_and_book(
        &self,
        owner: &UserId,
        book: &BookId,
    ) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .retain(|_, s| !(s.user_id() == owner && s.book_id() == book));
        Ok(())
    }
}
