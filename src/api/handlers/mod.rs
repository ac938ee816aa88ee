//! API handlers for tasko.
//!
//! `auth` owns registration, login and the bearer-token gate; `tasks` owns
//! the ownership-scoped task CRUD; `health` reports build and database status.

pub mod auth;
pub mod health;
pub mod tasks;
