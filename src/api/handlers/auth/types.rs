//! Request/response types for the auth endpoints.
//!
//! Request fields are optional at the serde level so that missing and empty
//! values can be reported together as `Missing fields: ...`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::AuthError;
use crate::users::UserProfile;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Register input after presence checks.
pub(crate) struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub(crate) fn required(self) -> Result<Registration, AuthError> {
        let mut missing = Vec::new();
        let email = present(self.email, "email", &mut missing);
        let password = present(self.password, "password", &mut missing);
        let name = present(self.name, "name", &mut missing);
        match (email, password, name) {
            (Some(email), Some(password), Some(name)) => Ok(Registration {
                email,
                password,
                name,
            }),
            _ => Err(AuthError::MissingFields(missing)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub(crate) fn required(self) -> Result<Credentials, AuthError> {
        let mut missing = Vec::new();
        let email = present(self.email, "email", &mut missing);
        let password = present(self.password, "password", &mut missing);
        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(AuthError::MissingFields(missing)),
        }
    }
}

/// Empty strings count as missing.
pub(crate) fn present(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            missing.push(field);
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
