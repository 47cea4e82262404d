use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiftError};

/// Allowed range for generated link token lengths
pub const LINK_TOKEN_LEN_RANGE: std::ops::RangeInclusive<usize> = 6..=8;

/// Runtime configuration shared by the issuer, checkout sessions and the app shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiftConfig {
    /// Prefix of every shareable link, e.g. "https://rift.pay"
    #[serde(default = "default_link_host")]
    pub link_host: String,

    /// Number of alphanumeric characters in a link token
    #[serde(default = "default_link_token_len")]
    pub link_token_len: usize,

    /// Simulated settlement wait between Processing and Complete
    #[serde(default = "default_settlement_delay_ms")]
    pub settlement_delay_ms: u64,

    /// How long a copied link keeps its "Copied" badge
    #[serde(default = "default_copied_indicator_ms")]
    pub copied_indicator_ms: u64,

    /// Wait between pressing "Generate" and handing off to checkout
    #[serde(default = "default_generation_delay_ms")]
    pub generation_delay_ms: u64,

    /// Currency label used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_link_host() -> String {
    "https://rift.pay".to_string()
}

fn default_link_token_len() -> usize {
    6
}

fn default_settlement_delay_ms() -> u64 {
    2000
}

fn default_copied_indicator_ms() -> u64 {
    2000
}

fn default_generation_delay_ms() -> u64 {
    500
}

fn default_currency() -> String {
    "USDC".to_string()
}

impl Default for RiftConfig {
    fn default() -> Self {
        Self {
            link_host: default_link_host(),
            link_token_len: default_link_token_len(),
            settlement_delay_ms: default_settlement_delay_ms(),
            copied_indicator_ms: default_copied_indicator_ms(),
            generation_delay_ms: default_generation_delay_ms(),
            currency: default_currency(),
        }
    }
}

impl RiftConfig {
    /// Load defaults, then overlay any `RIFT_*` environment variables
    ///
    /// Recognised variables: `RIFT_LINK_HOST`, `RIFT_LINK_TOKEN_LEN`,
    /// `RIFT_SETTLEMENT_DELAY_MS`, `RIFT_COPIED_INDICATOR_MS`,
    /// `RIFT_GENERATION_DELAY_MS`, `RIFT_CURRENCY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RiftConfig::from_env`] but reading from an arbitrary source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("RIFT_LINK_HOST") {
            config = config.with_link_host(host);
        }
        if let Some(len) = lookup("RIFT_LINK_TOKEN_LEN") {
            config.link_token_len = parse_var("RIFT_LINK_TOKEN_LEN", &len)?;
        }
        if let Some(ms) = lookup("RIFT_SETTLEMENT_DELAY_MS") {
            config.settlement_delay_ms = parse_var("RIFT_SETTLEMENT_DELAY_MS", &ms)?;
        }
        if let Some(ms) = lookup("RIFT_COPIED_INDICATOR_MS") {
            config.copied_indicator_ms = parse_var("RIFT_COPIED_INDICATOR_MS", &ms)?;
        }
        if let Some(ms) = lookup("RIFT_GENERATION_DELAY_MS") {
            config.generation_delay_ms = parse_var("RIFT_GENERATION_DELAY_MS", &ms)?;
        }
        if let Some(currency) = lookup("RIFT_CURRENCY") {
            config.currency = currency;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce valid links
    pub fn validate(&self) -> Result<()> {
        if self.link_host.trim().is_empty() {
            return Err(RiftError::Config("link host must not be empty".into()));
        }
        if !LINK_TOKEN_LEN_RANGE.contains(&self.link_token_len) {
            return Err(RiftError::Config(format!(
                "link token length {} outside {}..={}",
                self.link_token_len,
                LINK_TOKEN_LEN_RANGE.start(),
                LINK_TOKEN_LEN_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Set the link host. A trailing `/` is dropped.
    pub fn with_link_host(mut self, host: impl Into<String>) -> Self {
        self.link_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_link_token_len(mut self, len: usize) -> Self {
        self.link_token_len = len;
        self
    }

    pub fn with_settlement_delay(mut self, delay: Duration) -> Self {
        self.settlement_delay_ms = saturating_millis(delay);
        self
    }

    pub fn with_copied_indicator(mut self, window: Duration) -> Self {
        self.copied_indicator_ms = saturating_millis(window);
        self
    }

    pub fn with_generation_delay(mut self, delay: Duration) -> Self {
        self.generation_delay_ms = saturating_millis(delay);
        self
    }

    pub fn settlement_delay(&self) -> Duration {
        Duration::from_millis(self.settlement_delay_ms)
    }

    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RiftError::Config(format!("{key}: cannot parse '{value}'")))
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
