use anyhow::{Context, Result, anyhow};
use nonzero_ext::nonzero;
use std::env;
use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.crossref.org/works";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    /// Contact address for Crossref's polite pool.
    pub mailto: Option<String>,
    pub timeout: Duration,
    pub requests_per_second: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            mailto: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            requests_per_second: nonzero!(5u32),
        }
    }
}

impl Config {
    /// Reads configuration from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = lookup("CROSSREF_API_BASE") {
            config.api_base = parse_api_base(&base)?;
        }

        config.mailto = lookup("CROSSREF_MAILTO").filter(|m| !m.trim().is_empty());

        if let Some(secs) = lookup("DOI_RENAME_TIMEOUT_SECS") {
            let secs: NonZeroU64 = secs
                .trim()
                .parse()
                .with_context(|| format!("DOI_RENAME_TIMEOUT_SECS must be a positive number of seconds, got {:?}", secs))?;
            config.timeout = Duration::from_secs(secs.get());
        }

        if let Some(rate) = lookup("DOI_RENAME_RATE_LIMIT") {
            config.requests_per_second = rate
                .trim()
                .parse()
                .with_context(|| format!("DOI_RENAME_RATE_LIMIT must be a positive integer, got {:?}", rate))?;
        }

        Ok(config)
    }

    /// Applies command line overrides on top of the environment.
    pub fn with_overrides(mut self, api_base: Option<&str>, mailto: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        if let Some(base) = api_base {
            self.api_base = parse_api_base(base)?;
        }
        if let Some(email) = mailto {
            self.mailto = Some(email.to_string());
        }
        if let Some(secs) = timeout_secs {
            let secs = NonZeroU64::new(secs).ok_or_else(|| anyhow!("--timeout must be a positive number of seconds"))?;
            self.timeout = Duration::from_secs(secs.get());
        }
        Ok(self)
    }
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid Crossref API base URL: {}", raw))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("Crossref API base must be an http(s) URL: {}", raw));
    }
    Ok(url)
}
