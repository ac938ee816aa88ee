use crate::{
    api::{self, AuthConfig},
    identity::PasswordHashConfig,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub cors_origin: Option<String>,
    pub token_secret: SecretString,
    pub token_ttl_seconds: u64,
    pub password_hash_memory_kib: u32,
    pub password_hash_iterations: u32,
    pub password_hash_parallelism: u32,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.token_secret.clone())
            .with_token_ttl_seconds(self.token_ttl_seconds)
            .with_password_hash(
                PasswordHashConfig::default()
                    .with_memory_kib(self.password_hash_memory_kib)
                    .with_iterations(self.password_hash_iterations)
                    .with_parallelism(self.password_hash_parallelism),
            )
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the auth settings are rejected, the database is
/// unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    api::new(
        args.port,
        &args.dsn,
        &args.auth_config(),
        args.cors_origin.as_deref(),
    )
    .await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_dsn(&args.dsn)),
        (
            "cors_origin",
            args.cors_origin
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
        ("token_ttl_seconds", args.token_ttl_seconds.to_string()),
        (
            "password_hash",
            format!(
                "argon2id m={} t={} p={}",
                args.password_hash_memory_kib,
                args.password_hash_iterations,
                args.password_hash_parallelism
            ),
        ),
    ];
    log_entries("Startup configuration", &entries);
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\n{title}:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
