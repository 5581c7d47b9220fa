//! SessionLifecycleHandler - the reading-session state machine.
//!
//! Enforces the single-open-session rule: each user has at most one
//! Active or Paused session at any time, across all books. Starting a
//! session on a different book implicitly completes the open one first,
//! so the invariant holds with a single open-session lookup.
//!
//! Every mutating operation runs inside its owner's critical section
//! (see `UserLocks`) and captures the wall clock once, so the instant
//! written to the record always matches the instant used for pause-gap
//! arithmetic within that operation.

use std::sync::Arc;

use tracing::debug;

use crate::application::handlers::book::UpdateProgressHandler;
use crate::domain::foundation::{BookId, SessionId, SessionStatus, Timestamp, UserId};
use crate::domain::session::{ReadingSession, SessionError};
use crate::ports::{BookRepository, ReadingSessionRepository};

use super::user_locks::UserLocks;

/// Command to start (or reuse) a reading session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    /// The book to read.
    pub book_id: BookId,
}

/// Command to stop the caller's open session.
#[derive(Debug, Clone, Default)]
pub struct StopSessionCommand {
    /// Wall-clock end; the server clock is used when absent.
    pub end_time: Option<Timestamp>,
    /// Page reached; when absent no progress is recorded and the book
    /// keeps its position.
    pub end_page: Option<i32>,
}

/// Command to discount idle time from the active session.
#[derive(Debug, Clone)]
pub struct ExcludeTimeCommand {
    /// Milliseconds to discount; must not be negative.
    pub millis: i64,
}

/// Handler for the reading-session lifecycle.
pub struct SessionLifecycleHandler {
    sessions: Arc<dyn ReadingSessionRepository>,
    books: Arc<dyn BookRepository>,
    progress: Arc<UpdateProgressHandler>,
    locks: UserLocks,
}

impl SessionLifecycleHandler {
    pub fn new(
        sessions: Arc<dyn ReadingSessionRepository>,
        books: Arc<dyn BookRepository>,
        progress: Arc<UpdateProgressHandler>,
    ) -> Self {
        Self {
            sessions,
            books,
            progress,
            locks: UserLocks::new(),
        }
    }

    /// Start reading `cmd.book_id`.
    ///
    /// Reuses an open session on the same book (resuming it when
    /// paused); an open session on a different book is completed first
    /// with no page update.
    ///
    /// # Errors
    ///
    /// - `BookNotFound` if the book is absent or owned by someone else
    pub async fn start(
        &self,
        user_id: &UserId,
        cmd: StartSessionCommand,
    ) -> Result<ReadingSession, SessionError> {
        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;
        self.start_locked(user_id, cmd).await
    }

    async fn start_locked(
        &self,
        user_id: &UserId,
        cmd: StartSessionCommand,
    ) -> Result<ReadingSession, SessionError> {
        let now = Timestamp::now();

        if let Some(open) = self.sessions.find_open(user_id).await? {
            if open.book_id() == &cmd.book_id {
                return match open.status() {
                    SessionStatus::Paused => self.resume_locked(user_id, now).await,
                    _ => Ok(open),
                };
            }

            // Switching books ends the previous attempt, with no page update.
            debug!(session = %open.id(), "auto-stopping open session before book switch");
            self.stop_locked(
                user_id,
                StopSessionCommand {
                    end_time: Some(now),
                    end_page: None,
                },
                now,
            )
            .await?;
        }

        let book = self
            .books
            .find_owned(&cmd.book_id, user_id)
            .await?
            .ok_or(SessionError::BookNotFound(cmd.book_id))?;

        let session = ReadingSession::start(SessionId::new(), user_id.clone(), *book.id(), now);
        self.sessions.save(&session).await?;

        debug!(session = %session.id(), book = %book.id(), "reading session started");
        Ok(session)
    }

    /// Stop the open session, completing it.
    ///
    /// When an end page is reported, the pages attributed to the session
    /// are derived from the book's position before this stop, and the
    /// book is moved to the reported page.
    ///
    /// # Errors
    ///
    /// - `NoOpenSession` if nothing is open
    /// - `Validation` if the reported page falls outside the book
    pub async fn stop(
        &self,
        user_id: &UserId,
        cmd: StopSessionCommand,
    ) -> Result<ReadingSession, SessionError> {
        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;
        let now = Timestamp::now();
        self.stop_locked(user_id, cmd, now).await
    }

    async fn stop_locked(
        &self,
        user_id: &UserId,
        cmd: StopSessionCommand,
        now: Timestamp,
    ) -> Result<ReadingSession, SessionError> {
        let mut session = self
            .sessions
            .find_open(user_id)
            .await?
            .ok_or(SessionError::NoOpenSession)?;

        let end_time = cmd.end_time.unwrap_or(now);

        match cmd.end_page {
            Some(end_page) => {
                let mut book = self
                    .books
                    .find_owned(session.book_id(), user_id)
                    .await?
                    .ok_or(SessionError::BookNotFound(*session.book_id()))?;

                // Pages are attributed against the position recorded
                // before this stop moves it.
                session.complete(end_time, Some(end_page), book.current_page())?;
                self.progress.apply(&mut book, end_page).await?;
            }
            None => {
                session.complete(end_time, None, 0)?;
            }
        }

        self.sessions.update(&session).await?;

        debug!(session = %session.id(), "reading session completed");
        Ok(session)
    }

    /// Pause the active session.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless an Active session exists
    pub async fn pause(&self, user_id: &UserId) -> Result<ReadingSession, SessionError> {
        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;
        let now = Timestamp::now();

        let mut session = self
            .sessions
            .find_open(user_id)
            .await?
            .ok_or_else(|| SessionError::invalid_state("No active session found to pause"))?;

        session.pause(now)?;
        self.sessions.update(&session).await?;

        debug!(session = %session.id(), "reading session paused");
        Ok(session)
    }

    /// Resume the paused session, folding the pause into the accumulator.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless a Paused session exists
    pub async fn resume(&self, user_id: &UserId) -> Result<ReadingSession, SessionError> {
        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;
        let now = Timestamp::now();
        self.resume_locked(user_id, now).await
    }

    async fn resume_locked(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<ReadingSession, SessionError> {
        let mut session = self
            .sessions
            .find_open(user_id)
            .await?
            .ok_or_else(|| SessionError::invalid_state("No paused session found to resume"))?;

        session.resume(now)?;
        self.sessions.update(&session).await?;

        debug!(session = %session.id(), "reading session resumed");
        Ok(session)
    }

    /// Discount idle time from the active session without pausing it.
    ///
    /// # Errors
    ///
    /// - `Validation` if `millis` is negative
    /// - `InvalidState` unless an Active session exists
    pub async fn exclude_time(
        &self,
        user_id: &UserId,
        cmd: ExcludeTimeCommand,
    ) -> Result<ReadingSession, SessionError> {
        if cmd.millis < 0 {
            return Err(SessionError::validation(
                "millis",
                "Excluded time must not be negative",
            ));
        }

        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .sessions
            .find_open(user_id)
            .await?
            .ok_or_else(|| SessionError::invalid_state("No active session found"))?;

        session.exclude_time(cmd.millis)?;
        self.sessions.update(&session).await?;

        Ok(session)
    }

    /// The caller's open session, if any.
    pub async fn active_session(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReadingSession>, SessionError> {
        Ok(self.sessions.find_open(user_id).await?)
    }

    /// All sessions the caller has recorded for one book.
    ///
    /// # Errors
    ///
    /// - `BookNotFound` if the book is absent or owned by someone else
    pub async fn sessions_for_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Vec<ReadingSession>, SessionError> {
        self.books
            .find_owned(book_id, user_id)
            .await?
            .ok_or(SessionError::BookNotFound(*book_id))?;

        Ok(self
            .sessions
            .find_by_owner_and_book(user_id, book_id)
            .await?)
    }

    /// Remove every session the caller has for the book.
    ///
    /// Not a user-facing operation: the book collaborator calls this
    /// before deleting a book so no session outlives its book.
    pub async fn delete_for_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<(), SessionError> {
        let lock = self.locks.for_user(user_id).await;
        let _guard = lock.lock().await;

        self.sessions
            .delete_by_owner_and_book(user_id, book_id)
            .await?;
        Ok(())
    }
}
