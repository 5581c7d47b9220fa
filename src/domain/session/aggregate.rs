//! ReadingSession aggregate entity.
//!
//! A session is one timed reading attempt on one book. It opens Active,
//! may bounce between Active and Paused, and ends Completed - a terminal
//! state after which the record never changes.
//!
//! # Time accounting
//!
//! Pauses never shift `start_time`. Instead every paused stretch is
//! folded into the `paused_millis` accumulator when the session leaves
//! the Paused state, so elapsed active time is always
//! `(end_time - start_time) - paused_millis`. Negative gaps (clock skew,
//! out-of-order calls) contribute nothing and are never subtracted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookId, DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId,
};

/// Reading session aggregate - one timed attempt on one book.
///
/// # Invariants
///
/// - `paused_at` is set iff `status` is Paused
/// - `paused_millis` only grows
/// - `end_time`, `end_page`, `pages_read` stay empty until completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSession {
    /// Unique identifier for this session.
    id: SessionId,

    /// User who owns this session.
    user_id: UserId,

    /// Book being read.
    book_id: BookId,

    /// Current lifecycle status.
    status: SessionStatus,

    /// When the session started.
    start_time: Timestamp,

    /// When the session completed.
    end_time: Option<Timestamp>,

    /// Page reached when the session stopped.
    end_page: Option<i32>,

    /// Pages attributed to this session, derived at stop time.
    pages_read: Option<i32>,

    /// Accumulated paused duration. Legacy rows may store nothing.
    paused_millis: Option<i64>,

    /// When the current pause began.
    paused_at: Option<Timestamp>,
}

impl ReadingSession {
    /// Open a new active session at `started_at`.
    pub fn start(id: SessionId, user_id: UserId, book_id: BookId, started_at: Timestamp) -> Self {
        Self {
            id,
            user_id,
            book_id,
            status: SessionStatus::Active,
            start_time: started_at,
            end_time: None,
            end_page: None,
            pages_read: None,
            paused_millis: Some(0),
            paused_at: None,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        user_id: UserId,
        book_id: BookId,
        status: SessionStatus,
        start_time: Timestamp,
        end_time: Option<Timestamp>,
        end_page: Option<i32>,
        pages_read: Option<i32>,
        paused_millis: Option<i64>,
        paused_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            status,
            start_time,
            end_time,
            end_page,
            pages_read,
            paused_millis,
            paused_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the book this session reads.
    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    /// Returns the current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns when the session started.
    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    /// Returns when the session completed.
    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    /// Returns the page reached when the session stopped.
    pub fn end_page(&self) -> Option<i32> {
        self.end_page
    }

    /// Returns the pages attributed to this session.
    pub fn pages_read(&self) -> Option<i32> {
        self.pages_read
    }

    /// Total paused duration; rows predating pause tracking read as zero.
    pub fn paused_millis(&self) -> i64 {
        self.paused_millis.unwrap_or(0)
    }

    /// Returns when the current pause began.
    pub fn paused_at(&self) -> Option<&Timestamp> {
        self.paused_at.as_ref()
    }

    /// Returns true while the session is Active or Paused.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Elapsed active reading time for a completed session.
    pub fn active_millis(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end.millis_since(&self.start_time) - self.paused_millis()).max(0))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Pause the session at `now`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is Active
    pub fn pause(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.status != SessionStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "No active session found to pause",
            ));
        }

        self.status = SessionStatus::Paused;
        self.paused_at = Some(now);
        Ok(())
    }

    /// Resume the session at `now`, folding the pause into the accumulator.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is Paused
    pub fn resume(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.status != SessionStatus::Paused {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "No paused session found to resume",
            ));
        }

        self.fold_paused_gap(now);
        self.status = SessionStatus::Active;
        Ok(())
    }

    /// Discount idle time without pausing.
    ///
    /// The sign of `millis` is validated at the command boundary; the
    /// clamp keeps the accumulator monotonic regardless.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is Active
    pub fn exclude_time(&mut self, millis: i64) -> Result<(), DomainError> {
        if self.status != SessionStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "No active session found",
            ));
        }

        self.paused_millis = Some(self.paused_millis() + millis.max(0));
        Ok(())
    }

    /// Complete the session at `end_time`, making the record final.
    ///
    /// A pending pause is folded into `paused_millis` first. When an end
    /// page is reported, the pages attributed to this session are the
    /// delta from `book_current_page`, floored at zero so corrections
    /// moving the marker backwards never count negative.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is already completed
    pub fn complete(
        &mut self,
        end_time: Timestamp,
        end_page: Option<i32>,
        book_current_page: i32,
    ) -> Result<(), DomainError> {
        if !self.status.is_open() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session is already completed",
            ));
        }

        if self.status == SessionStatus::Paused {
            self.fold_paused_gap(end_time);
        }
        self.paused_at = None;

        self.end_time = Some(end_time);
        self.end_page = end_page;
        self.pages_read = end_page.map(|page| (page - book_current_page).max(0));
        self.status = SessionStatus::Completed;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold the gap since `paused_at` into the accumulator and clear it.
    ///
    /// A non-positive gap leaves the accumulator untouched.
    fn fold_paused_gap(&mut self, until: Timestamp) {
        if let Some(paused_at) = self.paused_at.take() {
            let gap = until.millis_since(&paused_at);
            if gap > 0 {
                self.paused_millis = Some(self.paused_millis() + gap);
            }
        }
    }
}
