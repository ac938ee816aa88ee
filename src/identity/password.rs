//! Password verifiers.
//!
//! Verifiers are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
//! The salt and cost parameters travel inside the verifier, so raising the
//! work factor only affects new hashes; existing verifiers keep validating
//! with the parameters they were created with.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ITERATIONS: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;

// Hashed once at startup and checked against when the email is unknown.
const DUMMY_PASSWORD: &str = "tasko-dummy-password";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid password hash parameters: {0}")]
    Params(argon2::Error),
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Argon2id work factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHashConfig {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl PasswordHashConfig {
    #[must_use]
    pub fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[must_use]
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }
}

/// Produces and checks password verifiers.
///
/// Holds no mutable state; cloning is cheap and clones can be moved onto the
/// blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_verifier: String,
}

impl PasswordHasher {
    /// Validate the work factor and precompute the dummy verifier.
    ///
    /// # Errors
    /// Returns an error if Argon2 rejects the parameters.
    pub fn new(config: PasswordHashConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(PasswordError::Params)?;

        let mut hasher = Self {
            params,
            dummy_verifier: String::new(),
        };
        hasher.dummy_verifier = hasher.hash(DUMMY_PASSWORD)?;

        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error only if Argon2 fails internally; the parameters were
    /// validated in [`PasswordHasher::new`].
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::Hash)
    }

    /// Check a plaintext password against a stored verifier.
    ///
    /// Malformed or foreign verifiers yield `false`.
    #[must_use]
    pub fn verify(&self, plaintext: &str, verifier: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(verifier) else {
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burn the same amount of work as a real verification. Always false.
    #[must_use]
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_verifier);
        false
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish_non_exhaustive()
    }
}
