pub mod models;
pub mod repo;

pub use models::{NewUser, UserProfile, UserRecord};
pub use repo::{PgUserStore, UserStore};
