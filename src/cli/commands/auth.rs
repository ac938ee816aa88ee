use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::identity::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM};

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_PASSWORD_HASH_MEMORY_KIB: &str = "password-hash-memory-kib";
pub const ARG_PASSWORD_HASH_ITERATIONS: &str = "password-hash-iterations";
pub const ARG_PASSWORD_HASH_PARALLELISM: &str = "password-hash-parallelism";

#[derive(Debug)]
pub struct Options {
    pub token_secret: SecretString,
    pub token_ttl_seconds: u64,
    pub password_hash_memory_kib: u32,
    pub password_hash_iterations: u32,
    pub password_hash_parallelism: u32,
}

impl Options {
    /// # Errors
    /// Returns an error if the token secret is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let token_secret = matches
            .get_one::<String>(ARG_TOKEN_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --token-secret")?;

        Ok(Self {
            token_secret,
            token_ttl_seconds: matches
                .get_one::<u64>(ARG_TOKEN_TTL_SECONDS)
                .copied()
                .unwrap_or(crate::identity::token::DEFAULT_TOKEN_TTL_SECONDS),
            password_hash_memory_kib: matches
                .get_one::<u32>(ARG_PASSWORD_HASH_MEMORY_KIB)
                .copied()
                .unwrap_or(DEFAULT_MEMORY_KIB),
            password_hash_iterations: matches
                .get_one::<u32>(ARG_PASSWORD_HASH_ITERATIONS)
                .copied()
                .unwrap_or(DEFAULT_ITERATIONS),
            password_hash_parallelism: matches
                .get_one::<u32>(ARG_PASSWORD_HASH_PARALLELISM)
                .copied()
                .unwrap_or(DEFAULT_PARALLELISM),
        })
    }
}

pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    with_password_hash_args(command)
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("Secret used to sign bearer tokens (at least 32 bytes)")
                .env("TASKO_TOKEN_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Bearer token validity window in seconds")
                .env("TASKO_TOKEN_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn with_password_hash_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PASSWORD_HASH_MEMORY_KIB)
                .long(ARG_PASSWORD_HASH_MEMORY_KIB)
                .help("Argon2id memory cost in KiB")
                .env("TASKO_PASSWORD_HASH_MEMORY_KIB")
                .default_value("19456")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PASSWORD_HASH_ITERATIONS)
                .long(ARG_PASSWORD_HASH_ITERATIONS)
                .help("Argon2id iteration count")
                .env("TASKO_PASSWORD_HASH_ITERATIONS")
                .default_value("2")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PASSWORD_HASH_PARALLELISM)
                .long(ARG_PASSWORD_HASH_PARALLELISM)
                .help("Argon2id degree of parallelism")
                .env("TASKO_PASSWORD_HASH_PARALLELISM")
                .default_value("1")
                .value_parser(clap::value_parser!(u32)),
        )
}
