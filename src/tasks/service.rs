//! Ownership-scoped task operations.
//!
//! Every operation takes the authenticated [`Principal`] and scopes the store
//! call to it. A task owned by someone else is reported exactly like a task
//! that does not exist.

use std::sync::Arc;

use tracing::debug;

use super::models::{Task, TaskChanges, TaskDraft};
use super::repo::TaskStore;
use crate::identity::{AuthError, Principal};

#[derive(Clone)]
pub struct OwnedTasks {
    store: Arc<dyn TaskStore>,
}

impl OwnedTasks {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns [`AuthError::Persistence`] if the store fails.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Task>, AuthError> {
        Ok(self.store.list_by_owner(principal.id).await?)
    }

    /// Create a task owned by `principal`.
    ///
    /// # Errors
    /// Returns [`AuthError::Persistence`] if the store fails.
    pub async fn create(&self, principal: &Principal, draft: TaskDraft) -> Result<Task, AuthError> {
        let task = self.store.create(draft.owned_by(principal.id)).await?;
        debug!(task_id = task.id, owner_id = principal.id, "task created");
        Ok(task)
    }

    /// # Errors
    /// Returns [`AuthError::NotFoundOrNotOwned`] when `changes` is empty or
    /// no task `id` owned by `principal` exists.
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        changes: TaskChanges,
    ) -> Result<Task, AuthError> {
        if changes.is_empty() {
            return Err(AuthError::NotFoundOrNotOwned);
        }
        self.store
            .update_if_owned(id, principal.id, &changes)
            .await?
            .ok_or(AuthError::NotFoundOrNotOwned)
    }

    /// # Errors
    /// Returns [`AuthError::NotFoundOrNotOwned`] when no task `id` owned by
    /// `principal` exists.
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), AuthError> {
        if self.store.delete_if_owned(id, principal.id).await? {
            debug!(task_id = id, owner_id = principal.id, "task deleted");
            Ok(())
        } else {
            Err(AuthError::NotFoundOrNotOwned)
        }
    }
}

impl std::fmt::Debug for OwnedTasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedTasks").finish_non_exhaustive()
    }
}
