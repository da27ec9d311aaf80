// DOI input handling: accept what people actually paste.

const RESOLVER_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
];

/// Extracts the bare DOI from user input.
///
/// Surrounding whitespace, a `doi:` label or a resolver URL are removed.
/// Returns `None` when nothing is left.
pub fn parse_doi(raw: &str) -> Option<String> {
    let mut doi = raw.trim();

    for prefix in RESOLVER_PREFIXES {
        let matches = doi
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            doi = doi[prefix.len()..].trim();
            break;
        }
    }

    if doi.is_empty() {
        None
    } else {
        Some(doi.to_string())
    }
}

/// Percent-encodes each `/`-separated segment of a DOI for use in a URL path.
pub fn encode_doi_path(doi: &str) -> String {
    doi.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
