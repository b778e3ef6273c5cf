use anyhow::Result;
use async_trait::async_trait;

use crate::db::Database;
use crate::models::{NewInterview, PersistedInterview, UserId};

/// Persistence collaborator for interview rows.
///
/// Append-only: there is no update or delete. Implementations own their
/// concurrency and durability; callers never retry.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Store one row and return it as stored.
    async fn insert(&self, row: NewInterview) -> Result<PersistedInterview>;

    /// Every row whose `user_id` equals `user_id`, in store order.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<PersistedInterview>>;
}

#[async_trait]
impl InterviewStore for Database {
    async fn insert(&self, row: NewInterview) -> Result<PersistedInterview> {
        self.insert_interview(&row).await
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<PersistedInterview>> {
        self.list_interviews_for_user(user_id).await
    }
}
