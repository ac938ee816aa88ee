//! # Tasko (multi-user task tracker)
//!
//! `tasko` is a JSON API where users register, sign in, and manage their own
//! task records. Presentation lives elsewhere; this crate owns identity and
//! access control plus the thin CRUD surface around it.
//!
//! ## Identity
//!
//! Passwords are stored as salted Argon2id verifiers (PHC strings) and are
//! never echoed back. A successful register or login mints a stateless
//! `HS256` bearer token carrying the user id, email and display name, valid
//! for a fixed window (7 days by default). There is no server-side session
//! table and no revocation: tokens simply expire.
//!
//! The signing secret is a required startup value. There is no fallback
//! secret; the process refuses to start without one.
//!
//! ## Authorization
//!
//! Every task route takes a [`identity::Principal`] resolved from the
//! `Authorization: Bearer <token>` header. Task reads and writes are keyed by
//! `(task_id, owner_id)` together, and a task owned by someone else is
//! reported as `404 Not Found`, exactly like a task that does not exist.

pub mod api;
pub mod cli;
pub mod identity;
pub mod storage;
pub mod tasks;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
