//! Identity core: password verifiers, bearer tokens, the authenticated
//! principal, and the error taxonomy shared by every auth-facing operation.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{PasswordError, PasswordHashConfig, PasswordHasher};
pub use token::{Claims, TokenAuthority, TokenConfigError, TokenError, now_unix_seconds};

/// The authenticated caller of a request.
///
/// Resolved from verified token claims by the bearer extractor in
/// `api::handlers::auth::principal`; task handlers take it as an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}
