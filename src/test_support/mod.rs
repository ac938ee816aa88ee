//! In-memory stores and app wiring for handler and service tests.

#![allow(clippy::unwrap_used)]

pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::api::{self, AuthConfig, AuthState};
use crate::identity::{PasswordHashConfig, TokenAuthority, token::DEFAULT_TOKEN_TTL_SECONDS};
use crate::storage::StoreError;
use crate::tasks::{NewTask, OwnedTasks, Task, TaskChanges, TaskStore};
use crate::users::{NewUser, UserRecord, UserStore};

pub const TEST_SECRET: &str = "test-signing-secret-with-at-least-32-bytes";

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// Cheap Argon2 parameters so tests stay fast.
pub fn auth_config() -> AuthConfig {
    AuthConfig::new(SecretString::from(TEST_SECRET)).with_password_hash(
        PasswordHashConfig::default()
            .with_memory_kib(1024)
            .with_iterations(1)
            .with_parallelism(1),
    )
}

pub fn token_authority() -> TokenAuthority {
    TokenAuthority::new(
        &SecretString::from(TEST_SECRET),
        std::time::Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS),
    )
    .unwrap()
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserRecord>>,
    unavailable: bool,
}

impl MemoryUserStore {
    /// A store whose `ping` always fails.
    pub fn unavailable() -> Self {
        Self {
            users: Mutex::default(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let id = i64::try_from(users.len()).unwrap() + 1;
        let record = UserRecord {
            id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: epoch(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct TaskState {
    tasks: Vec<Task>,
    next_id: i64,
    ticks: i64,
}

impl TaskState {
    /// Logical clock, one second per mutation.
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        epoch() + Duration::seconds(self.ticks)
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    state: Mutex<TaskState>,
}

impl MemoryTaskStore {
    pub fn get(&self, id: i64) -> Option<Task> {
        let state = self.state.lock().unwrap();
        state.tasks.iter().find(|task| task.id == id).cloned()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.user_id == owner_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        state.next_id += 1;
        let task = Task {
            id: state.next_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            user_id: task.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_if_owned(
        &self,
        id: i64,
        owner_id: i64,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.user_id == owner_id)
        else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            task.description.clone_from(description);
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        task.updated_at = now;
        Ok(Some(task.clone()))
    }

    async fn delete_if_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state
            .tasks
            .retain(|task| !(task.id == id && task.user_id == owner_id));
        Ok(state.tasks.len() != before)
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub tasks: Arc<MemoryTaskStore>,
}

pub fn test_app() -> TestApp {
    test_app_with(MemoryUserStore::default())
}

pub fn test_app_with(users: MemoryUserStore) -> TestApp {
    let users = Arc::new(users);
    let tasks = Arc::new(MemoryTaskStore::default());
    let auth_state = Arc::new(AuthState::new(&auth_config()).unwrap());
    let router = api::app(
        auth_state,
        users.clone(),
        OwnedTasks::new(tasks.clone()),
        None,
    );
    TestApp {
        router,
        users,
        tasks,
    }
}

/// Drive one request through `router` and decode the JSON body (or `Null`).
pub async fn send(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response: Response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
