//! Auth state and configuration.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use tokio::task;

use crate::identity::{
    AuthError, PasswordHashConfig, PasswordHasher, TokenAuthority, now_unix_seconds,
    token::DEFAULT_TOKEN_TTL_SECONDS,
};
use crate::users::UserRecord;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_secret: SecretString,
    token_ttl_seconds: u64,
    password_hash: PasswordHashConfig,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            password_hash: PasswordHashConfig::default(),
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: u64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_password_hash(mut self, config: PasswordHashConfig) -> Self {
        self.password_hash = config;
        self
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> u64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn password_hash(&self) -> PasswordHashConfig {
        self.password_hash
    }
}

/// Shared, immutable auth machinery handed to handlers via `Extension`.
#[derive(Clone, Debug)]
pub struct AuthState {
    tokens: TokenAuthority,
    passwords: PasswordHasher,
}

impl AuthState {
    /// Build the token authority and password hasher, refusing weak settings.
    ///
    /// # Errors
    /// Returns an error if the secret is too short, the TTL is zero, or the
    /// password hash parameters are rejected.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let tokens = TokenAuthority::new(
            &config.token_secret,
            Duration::from_secs(config.token_ttl_seconds),
        )
        .context("Invalid token configuration")?;
        let passwords =
            PasswordHasher::new(config.password_hash).context("Invalid password hash settings")?;
        Ok(Self { tokens, passwords })
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    /// Hash on the blocking pool; Argon2 would otherwise stall the runtime.
    pub(crate) async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.passwords.clone();
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AuthError::Internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| AuthError::Internal(err.to_string()))
    }

    /// Check `password` against `verifier`. With no verifier (unknown email) a
    /// dummy verification still runs and the result is always `false`.
    pub(crate) async fn verify_password(
        &self,
        password: String,
        verifier: Option<String>,
    ) -> Result<bool, AuthError> {
        let hasher = self.passwords.clone();
        task::spawn_blocking(move || match verifier {
            Some(verifier) => hasher.verify(&password, &verifier),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|err| AuthError::Internal(format!("password verification task failed: {err}")))
    }

    pub(crate) fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        self.tokens
            .issue(user.id, &user.email, &user.name, now_unix_seconds())
            .map_err(|err| AuthError::Internal(format!("failed to issue token: {err}")))
    }
}
