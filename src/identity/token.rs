//! Bearer token issuance and verification.
//!
//! Tokens are compact `HS256` JWS strings: `header.claims.signature`, each
//! segment base64url without padding. Verification order matters:
//!
//! 1. Shape and header (`alg` must be `HS256`), otherwise `Malformed`.
//! 2. HMAC over `header.claims`, compared in constant time, otherwise
//!    `InvalidSignature`. Claims are not decoded before this step.
//! 3. Claims JSON, otherwise `Malformed`.
//! 4. `exp < now` is `Expired`. A token is still valid at `exp == now`.
//!
//! `now` is always passed in; the verifying node's clock is authoritative and
//! no skew allowance is applied.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;
use std::{
    fmt,
    time::{Duration, SystemTime},
};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;
/// Default validity window: 7 days.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

const TOKEN_ALG: &str = "HS256";
const TOKEN_TYP: &str = "JWT";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("token signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    SecretTooShort,
    #[error("token TTL must be greater than zero")]
    InvalidTtl,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Identity claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Principal (user) id.
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenAuthority {
    mac: HmacSha256,
    ttl_seconds: i64,
}

impl TokenAuthority {
    /// Key the authority with `secret`.
    ///
    /// # Errors
    /// Returns an error if the secret is shorter than [`MIN_SECRET_BYTES`] or
    /// the TTL is zero.
    pub fn new(secret: &SecretString, ttl: Duration) -> Result<Self, TokenConfigError> {
        let key = secret.expose_secret().as_bytes();
        if key.len() < MIN_SECRET_BYTES {
            return Err(TokenConfigError::SecretTooShort);
        }

        let ttl_seconds = i64::try_from(ttl.as_secs()).map_err(|_| TokenConfigError::InvalidTtl)?;
        if ttl_seconds == 0 {
            return Err(TokenConfigError::InvalidTtl);
        }

        // HMAC accepts keys of any length, so this cannot fail after the check above.
        let mac = HmacSha256::new_from_slice(key).map_err(|_| TokenConfigError::SecretTooShort)?;

        Ok(Self { mac, ttl_seconds })
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Mint a token for the given identity, valid from `now` for the TTL.
    ///
    /// # Errors
    /// Returns an error if the header or claims fail to serialize.
    pub fn issue(
        &self,
        subject_id: i64,
        email: &str,
        name: &str,
        now: i64,
    ) -> Result<String, serde_json::Error> {
        let header = TokenHeader {
            alg: TOKEN_ALG.to_string(),
            typ: TOKEN_TYP.to_string(),
        };
        let claims = Claims {
            sub: subject_id,
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };

        let signing_input = format!("{}.{}", b64e_json(&header)?, b64e_json(&claims)?);
        let signature = self.sign(&signing_input);

        Ok(format!(
            "{signing_input}.{}",
            Base64UrlUnpadded::encode_string(&signature)
        ))
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// # Errors
    /// See the module docs for the order in which failures are reported.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != TOKEN_ALG {
            return Err(TokenError::Malformed);
        }

        // Anything wrong inside the signature segment is a signature failure.
        let signature =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| TokenError::InvalidSignature)?;

        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: Claims = b64d_json(claims_b64)?;
        if claims.exp < now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, signing_input: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("key", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// Unix seconds used for `iat`/`exp`.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
