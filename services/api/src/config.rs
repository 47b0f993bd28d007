use std::path::PathBuf;

use anyhow::Context as _;

use crate::domain::types::RecipeLimits;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `API_PORT`.
    pub api_port: u16,
    /// Directory uploaded recipe images are written under (default `./media`).
    /// Env var: `MEDIA_ROOT`.
    pub media_root: PathBuf,
    /// Minimum cooking time and ingredient amount. Env vars:
    /// `MIN_COOKING_TIME`, `MIN_AMOUNT` (both default 1). The schema checks
    /// both columns are at least 1, so lower values are rejected.
    pub limits: RecipeLimits,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let defaults = RecipeLimits::default();
        Ok(Self {
            database_url,
            api_port: parse_var("API_PORT", 3114)?,
            media_root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./media")),
            limits: RecipeLimits {
                min_cooking_time: at_least_one(
                    "MIN_COOKING_TIME",
                    parse_var("MIN_COOKING_TIME", defaults.min_cooking_time)?,
                )?,
                min_amount: at_least_one(
                    "MIN_AMOUNT",
                    parse_var("MIN_AMOUNT", defaults.min_amount)?,
                )?,
            },
        })
    }
}

/// Read an optional env var, falling back to `default` when unset.
/// A set but unparsable value is an error rather than silently ignored.
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn at_least_one(name: &str, value: i32) -> anyhow::Result<i32> {
    if value < 1 {
        anyhow::bail!("{name} must be at least 1, got {value}");
    }
    Ok(value)
}
