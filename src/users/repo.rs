//! Credential store: keyed lookups and inserts over user records.

use async_trait::async_trait;
use sqlx::{Connection, PgPool};
use tracing::{Instrument, info_span};

use super::models::{NewUser, UserRecord};
use crate::storage::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user. A taken email yields [`StoreError::Duplicate`].
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Reachability check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = "SELECT id, email, name, password_hash, created_at FROM users";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("{SELECT_USER} WHERE email = $1");
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query_as::<_, UserRecord>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("{SELECT_USER} WHERE id = $1");
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query_as::<_, UserRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let query = r"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query_as::<_, UserRecord>(query)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(StoreError::from_write)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }
}
