use thiserror::Error;

/// The only two outcomes a user ever sees when a lookup does not produce a filename.
///
/// Transport errors, non-success statuses and undecodable payloads all collapse
/// into `LookupFailed`; the underlying cause is logged, not surfaced.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FetchError {
    #[error("Please enter a DOI.")]
    EmptyInput,

    #[error("Metadata not found for DOI {doi}.")]
    LookupFailed { doi: String },
}
