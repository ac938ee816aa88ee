//! Command-line argument dispatch.
//!
//! Maps parsed CLI arguments to the action to run, currently always the API
//! server with its full configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_CORS_ORIGIN, auth};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let cors_origin = matches.get_one::<String>(ARG_CORS_ORIGIN).cloned();

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        cors_origin,
        token_secret: auth_opts.token_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        password_hash_memory_kib: auth_opts.password_hash_memory_kib,
        password_hash_iterations: auth_opts.password_hash_iterations,
        password_hash_parallelism: auth_opts.password_hash_parallelism,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_carries_configuration() {
        temp_env::with_vars(
            [
                ("TASKO_DSN", Some("postgres://user@localhost:5432/tasko")),
                (
                    "TASKO_TOKEN_SECRET",
                    Some("0123456789abcdef0123456789abcdef"),
                ),
                ("TASKO_PORT", None),
                ("TASKO_CORS_ORIGIN", None),
                ("TASKO_TOKEN_TTL_SECONDS", Some("60")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["tasko"]);
                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.dsn, "postgres://user@localhost:5432/tasko");
                    assert_eq!(args.cors_origin, None);
                    assert_eq!(args.token_ttl_seconds, 60);
                    // The secret never shows up in Debug output.
                    assert!(!format!("{args:?}").contains("0123456789abcdef"));
                }
            },
        );
    }
}
