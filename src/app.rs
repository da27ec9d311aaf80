use anyhow::Result;
use serde::Serialize;
use crate::config::Config;
use crate::error::FetchError;
use crate::layers::NormalizedMetadata;
use crate::layers::filename::build_filename;
use crate::layers::input::parse_doi;
use crate::layers::lookup::CrossrefClient;
use crate::layers::normalize::Normalizer;

/// Everything a successful lookup produces.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub doi: String,
    #[serde(flatten)]
    pub metadata: NormalizedMetadata,
    pub filename: String,
}

pub struct App {
    client: CrossrefClient,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: CrossrefClient::new(config)?,
        })
    }

    /// Parse input, fetch the record, normalize it and derive the filename.
    pub async fn lookup(&self, raw_doi: &str) -> Result<Lookup, FetchError> {
        let doi = parse_doi(raw_doi).ok_or(FetchError::EmptyInput)?;

        let record = match self.client.fetch(&doi).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Lookup for {} failed: {:#}", doi, e);
                return Err(FetchError::LookupFailed { doi });
            }
        };

        let metadata = Normalizer::normalize(&record);
        let filename = build_filename(&metadata);
        tracing::debug!("Derived filename for {}: {}", doi, filename);

        Ok(Lookup { doi, metadata, filename })
    }
}
