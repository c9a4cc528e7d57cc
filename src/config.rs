// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::services::chat_session::DEFAULT_CLOSE_DELAY;
use crate::services::completion::CompletionConfig;
use crate::services::gate::SessionGate;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_ttl: Duration,
    pub close_delay: Duration,
    pub completion: CompletionConfig,
    pub gate: SessionGate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            session_ttl: Duration::from_secs(3600),
            close_delay: DEFAULT_CLOSE_DELAY,
            completion: CompletionConfig::default(),
            gate: SessionGate::default(),
        }
    }
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("DIY_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = get("DIY_SESSION_TTL_SECS") {
            config.session_ttl = Duration::from_secs(parse_number(&secs, "DIY_SESSION_TTL_SECS")?);
        }
        if let Some(ms) = get("DIY_CLOSE_DELAY_MS") {
            config.close_delay = Duration::from_millis(parse_number(&ms, "DIY_CLOSE_DELAY_MS")?);
        }
        if let Some(list) = get("DIY_ALLOW_LIST") {
            config.gate = SessionGate::parse(&list).context("invalid DIY_ALLOW_LIST")?;
        }

        let completion = &mut config.completion;
        completion.api_key = get("OPENROUTER_API_KEY");
        if let Some(endpoint) = get("OPENROUTER_ENDPOINT") {
            completion.endpoint = endpoint;
        }
        if let Some(model) = get("OPENROUTER_MODEL") {
            completion.model = model;
        }
        if let Some(origin) = get("DIY_SITE_ORIGIN") {
            completion.site_origin = origin;
        }
        if let Some(title) = get("DIY_APP_TITLE") {
            completion.app_title = title;
        }

        Ok(config)
    }
}

fn parse_number<T>(raw: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a number, got {raw:?}"))
}
