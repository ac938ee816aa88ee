//! Task endpoints.
//!
//! Every handler takes the authenticated [`Principal`](crate::identity::Principal)
//! and delegates to [`OwnedTasks`](crate::tasks::OwnedTasks), which scopes each
//! store call to the caller. A task owned by someone else answers `404`, the
//! same as a task that does not exist; this API never returns `403`.

pub(crate) mod collection;
pub(crate) mod item;
pub(crate) mod types;
