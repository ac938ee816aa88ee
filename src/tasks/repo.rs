//! Task store. Every statement that names a task id also names its owner.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{Instrument, info_span};

use super::models::{NewTask, Task, TaskChanges};
use crate::storage::StoreError;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Newest first: `created_at DESC`, ties broken by `id DESC`.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    async fn create(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Apply `changes` to the task only if `owner_id` owns it, refreshing
    /// `updated_at`. `None` when no such owned task exists.
    async fn update_if_owned(
        &self,
        id: i64,
        owner_id: i64,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError>;

    /// `true` when an owned task was removed.
    async fn delete_if_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone, Debug)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let query = r"
            SELECT id, title, description, status, priority, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query_as::<_, Task>(query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;
        Ok(rows)
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let query = r"
            INSERT INTO tasks (title, description, status, priority, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, priority, user_id, created_at, updated_at
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query_as::<_, Task>(query)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(task.owner_id)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(StoreError::from_write)
    }

    async fn update_if_owned(
        &self,
        id: i64,
        owner_id: i64,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let query = r"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = CASE WHEN $7 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, description, status, priority, user_id, created_at, updated_at
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query_as::<_, Task>(query)
            .bind(id)
            .bind(owner_id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_ref().and_then(Option::as_deref))
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.description.is_some())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row)
    }

    async fn delete_if_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let query = "DELETE FROM tasks WHERE id = $1 AND user_id = $2";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
