use serde::{Deserialize, Serialize};

/// CSL-JSON work record as served by Crossref's transform endpoint.
///
/// Only the fields needed for a filename are kept; everything else is ignored.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct BibliographicRecord {
    pub issued: Option<Issued>,
    pub container_title_short: Option<TextField>,
    pub short_container_title: Option<TextField>,
    pub author: Option<Vec<Author>>,
    pub title: Option<TextField>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Issued {
    // Entries are numbers in practice but strings and nulls show up too.
    pub date_parts: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Author {
    pub family: Option<String>,
}

/// Crossref is inconsistent about whether titles are strings or lists of strings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextField {
    Single(String),
    // Entries after the first are never read, so nulls there are tolerated.
    Many(Vec<Option<String>>),
}

impl TextField {
    /// The string itself, or the first list entry. Empty text counts as missing.
    pub fn first(&self) -> Option<&str> {
        let text = match self {
            TextField::Single(s) => Some(s.as_str()),
            TextField::Many(items) => items.first().and_then(|s| s.as_deref()),
        };
        text.filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMetadata {
    pub year: Option<String>,
    pub journal: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
}

pub mod input;
pub mod lookup;
pub mod normalize;
pub mod filename;
