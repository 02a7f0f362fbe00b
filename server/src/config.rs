use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use gatehouse_yard::UpstreamConfig;

/// Process configuration, read from the environment exactly once at
/// startup and passed explicitly from `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream: UpstreamConfig,
    /// Usage-event webhook; telemetry is disabled when unset.
    pub webhook_url: Option<String>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Fail fast: a gateway without credentials can only emit auth
        // failures, which reads as an upstream outage to operators.
        let password = required("YARD_PASSWORD")?;
        let client_secret = required("YARD_CLIENT_SECRET")?;

        let auth_host = env_or("YARD_AUTH_HOST", "yard-auth.local");
        let api_host = env_or("YARD_API_HOST", "yard-api.local");

        let mut upstream = UpstreamConfig::new(auth_host, api_host, password, client_secret);
        if let Ok(base) = env::var("YARD_USERNAME_BASE") {
            upstream = upstream.with_username_base(base);
        }
        if let Ok(client_id) = env::var("YARD_CLIENT_ID") {
            upstream = upstream.with_client_id(client_id);
        }
        if flag("YARD_ACCEPT_INVALID_CERTS") {
            upstream = upstream.with_accept_invalid_certs(true);
        }

        let port = env_or("GATEHOUSE_PORT", "3000")
            .parse()
            .context("GATEHOUSE_PORT is not a valid port number")?;

        let webhook_url = env::var("USAGE_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty());

        Ok(Self {
            port,
            upstream,
            webhook_url,
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
        })
    }
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{key} must be set"),
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
