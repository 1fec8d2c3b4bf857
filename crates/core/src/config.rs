use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// How the host answers the delivery capability question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Delivery is allowed up front.
    Granted,
    /// Delivery is refused; matches are computed but never sent.
    Denied,
    /// Ask the user once before the first delivery.
    Prompt,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" | "grant" | "on" => Ok(DeliveryMode::Granted),
            "denied" | "deny" | "off" => Ok(DeliveryMode::Denied),
            "prompt" | "ask" => Ok(DeliveryMode::Prompt),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryMode::Granted => "granted",
            DeliveryMode::Denied => "denied",
            DeliveryMode::Prompt => "prompt",
        };
        f.write_str(s)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// List endpoint of the event store (`GET` returns `{"events": [...]}`).
    pub events_url: Option<String>,
    /// Local JSON file used instead of the store.
    pub events_file: Option<PathBuf>,
    /// Time between scheduler ticks.
    pub tick_interval: Duration,
    /// Webhook receiving alerts; alerts are logged when unset.
    pub webhook_url: Option<String>,
    /// HTTP method for the webhook; `POST` when unset.
    pub webhook_method: Option<String>,
    /// Extra webhook headers, from `Name: value` pairs separated by commas.
    pub webhook_headers: Vec<(String, String)>,
    pub delivery: DeliveryMode,
    /// Request timeout for the store and the webhook.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            events_url: None,
            events_file: None,
            tick_interval: Duration::from_secs(3_600),
            webhook_url: None,
            webhook_method: None,
            webhook_headers: Vec::new(),
            delivery: DeliveryMode::Granted,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_opt)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Numeric keys that fail to parse fall back to their defaults; an
    /// unrecognized delivery mode or a header without `:` is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let delivery = match lookup("DATEBOOK_DELIVERY") {
            Some(raw) => raw.parse().map_err(|value| ConfigError::InvalidValue {
                key: "DATEBOOK_DELIVERY",
                value,
            })?,
            None => defaults.delivery,
        };

        let webhook_headers = match lookup("DATEBOOK_WEBHOOK_HEADERS") {
            Some(raw) => parse_headers(&raw).ok_or(ConfigError::InvalidValue {
                key: "DATEBOOK_WEBHOOK_HEADERS",
                value: raw,
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            events_url: lookup("DATEBOOK_EVENTS_URL"),
            events_file: lookup("DATEBOOK_EVENTS_FILE").map(PathBuf::from),
            tick_interval: secs("DATEBOOK_TICK_SECS", defaults.tick_interval),
            webhook_url: lookup("DATEBOOK_WEBHOOK_URL"),
            webhook_method: lookup("DATEBOOK_WEBHOOK_METHOD"),
            webhook_headers,
            delivery,
            http_timeout: secs("DATEBOOK_HTTP_TIMEOUT_SECS", defaults.http_timeout),
        })
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  events:   url={}, file={}",
            self.events_url.as_deref().map(redact_url).unwrap_or_else(|| "(none)".into()),
            self.events_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".into())
        );
        tracing::info!("  tick:     every {}s", self.tick_interval.as_secs());
        tracing::info!(
            "  delivery: mode={}, webhook={}",
            self.delivery,
            self.webhook_url.as_deref().map(redact_url).unwrap_or_else(|| "(log)".into())
        );
        if self.webhook_url.is_some() {
            let names: Vec<&str> = self.webhook_headers.iter().map(|(k, _)| k.as_str()).collect();
            tracing::info!(
                "  webhook:  method={}, headers=[{}]",
                self.webhook_method.as_deref().unwrap_or("POST"),
                names.join(", ")
            );
        }
    }
}

/// Parse `Name: value, Other: value`. Returns `None` if a pair lacks `:`
/// or has an empty name.
fn parse_headers(raw: &str) -> Option<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Keep scheme and host only: webhook URLs often embed tokens.
fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split(['/', '?']).next().unwrap_or(rest);
            let host = host.rsplit('@').next().unwrap_or(host);
            format!("{scheme}://{host}/…")
        }
        None => "(invalid url)".to_string(),
    }
}
