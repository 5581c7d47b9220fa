//! Per-user critical sections for lifecycle operations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::UserId;

/// Hands out one async mutex per user.
///
/// The single-open-session rule is enforced by read-then-decide logic,
/// not a storage constraint, so every mutating lifecycle call must hold
/// its owner's lock for the whole read-decide-write sequence. Distinct
/// owners proceed independently.
#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `user_id`, creating it on first use.
    pub(crate) async fn for_user(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(user_id.clone()).or_default().clone()
    }
}
