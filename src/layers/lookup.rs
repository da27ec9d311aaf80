use anyhow::{Result, anyhow};
use governor::{Quota, RateLimiter};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, direct::NotKeyed};
use reqwest::Client;
use std::sync::Arc;
use crate::config::Config;
use crate::layers::BibliographicRecord;
use crate::layers::input::encode_doi_path;

const CSL_JSON_TRANSFORM: &str = "transform/application/vnd.citationstyles.csl+json";

pub struct CrossrefClient {
    client: Client,
    api_base: String,
    mailto: Option<String>,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl CrossrefClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = match &config.mailto {
            Some(email) => format!("{}/{} (mailto:{})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), email),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.as_str().trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(config.requests_per_second))),
        })
    }

    pub fn work_url(&self, doi: &str) -> String {
        format!("{}/{}/{}", self.api_base, encode_doi_path(doi), CSL_JSON_TRANSFORM)
    }

    /// Fetches the CSL-JSON record for a DOI.
    ///
    /// Any non-success status or a body that does not decode into a record is an error.
    pub async fn fetch(&self, doi: &str) -> Result<BibliographicRecord> {
        self.limiter.until_ready().await;

        let url = self.work_url(doi);
        let mut request = self.client.get(&url);
        if let Some(email) = &self.mailto {
            request = request.query(&[("mailto", email)]);
        }

        tracing::info!("Querying Crossref: {}", url);
        match request.send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    return Err(anyhow!("Crossref API error: {}", resp.status()));
                }
                let record: BibliographicRecord = resp.json().await?;
                tracing::debug!("Crossref record for {}: {:?}", doi, record);
                Ok(record)
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }
}
