use once_cell::sync::Lazy;
use regex::Regex;
use crate::layers::{BibliographicRecord, NormalizedMetadata};

pub const TITLE_MAX_CHARS: usize = 100;

static SUB_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?sub>").expect("static regex"));

pub struct Normalizer;

impl Normalizer {
    pub fn normalize(record: &BibliographicRecord) -> NormalizedMetadata {
        NormalizedMetadata {
            year: Self::extract_year(record),
            journal: Self::extract_journal(record),
            author: Self::extract_author(record),
            title: Self::extract_title(record),
        }
    }

    /// First element of the first `issued.date-parts` entry, if it is a plain number.
    pub fn extract_year(record: &BibliographicRecord) -> Option<String> {
        let first = record
            .issued
            .as_ref()?
            .date_parts
            .as_ref()?
            .first()?
            .first()?;

        match first {
            serde_json::Value::Number(n) => n.as_u64().map(|y| y.to_string()),
            serde_json::Value::String(s) => {
                let s = s.trim();
                (!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())).then(|| s.to_string())
            }
            _ => None,
        }
    }

    /// Short journal title. Whitespace is kept as-is, punctuation is dropped.
    pub fn extract_journal(record: &BibliographicRecord) -> Option<String> {
        let journal = record
            .container_title_short
            .as_ref()
            .and_then(|t| t.first())
            .or_else(|| record.short_container_title.as_ref().and_then(|t| t.first()))?;

        non_empty(strip_punctuation(journal))
    }

    /// Family name of the first listed author.
    pub fn extract_author(record: &BibliographicRecord) -> Option<String> {
        let family = record.author.as_ref()?.first()?.family.as_deref()?;
        non_empty(strip_punctuation(family))
    }

    pub fn extract_title(record: &BibliographicRecord) -> Option<String> {
        let title = record.title.as_ref()?.first()?;
        non_empty(clean_title(title))
    }
}

/// Keeps letters, digits and whitespace.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

fn clean_title(title: &str) -> String {
    let without_tags = SUB_TAG.replace_all(title, "");

    let kept: String = without_tags
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    // Cutting at the limit can leave a trailing space behind.
    collapsed
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Author, Issued, TextField};
    use serde_json::json;

    fn record_from(value: serde_json::Value) -> BibliographicRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reference_record() {
        let record = record_from(json!({
            "issued": { "date-parts": [[2021]] },
            "container-title-short": "Anal. Methods",
            "author": [{ "family": "Smith" }, { "family": "Jones" }],
            "title": "Study of <sub>X</sub> Compounds"
        }));

        let metadata = Normalizer::normalize(&record);
        assert_eq!(
            metadata,
            NormalizedMetadata {
                year: Some("2021".to_string()),
                journal: Some("Anal Methods".to_string()),
                author: Some("Smith".to_string()),
                title: Some("Study of X Compounds".to_string()),
            }
        );
    }

    #[test]
    fn test_year_missing_or_empty() {
        assert_eq!(Normalizer::extract_year(&BibliographicRecord::default()), None);

        for value in [
            json!({ "issued": {} }),
            json!({ "issued": { "date-parts": [] } }),
            json!({ "issued": { "date-parts": [[]] } }),
            json!({ "issued": { "date-parts": [[null]] } }),
            json!({ "issued": null }),
        ] {
            assert_eq!(Normalizer::extract_year(&record_from(value.clone())), None, "{value}");
        }
    }

    #[test]
    fn test_year_takes_first_part_of_first_date() {
        let record = record_from(json!({ "issued": { "date-parts": [[2023, 5, 4], [1999]] } }));
        assert_eq!(Normalizer::extract_year(&record).as_deref(), Some("2023"));
    }

    #[test]
    fn test_year_accepts_string_parts() {
        let record = record_from(json!({ "issued": { "date-parts": [["2019", "02"]] } }));
        assert_eq!(Normalizer::extract_year(&record).as_deref(), Some("2019"));
    }

    #[test]
    fn test_year_rejects_non_numeric_values() {
        for value in [
            json!({ "issued": { "date-parts": [["2019/2020"]] } }),
            json!({ "issued": { "date-parts": [["../.."]] } }),
            json!({ "issued": { "date-parts": [["spring 2020"]] } }),
            json!({ "issued": { "date-parts": [[-2020]] } }),
            json!({ "issued": { "date-parts": [[2020.5]] } }),
        ] {
            assert_eq!(Normalizer::extract_year(&record_from(value.clone())), None, "{value}");
        }
    }

    #[test]
    fn test_journal_prefers_container_title_short() {
        let record = BibliographicRecord {
            container_title_short: Some(TextField::Single("J. Am. Chem. Soc.".to_string())),
            short_container_title: Some(TextField::Many(vec![Some("Other".to_string())])),
            ..Default::default()
        };
        assert_eq!(Normalizer::extract_journal(&record).as_deref(), Some("J Am Chem Soc"));
    }

    #[test]
    fn test_journal_falls_back_to_short_container_title_list() {
        let record = record_from(json!({
            "container-title-short": [],
            "short-container-title": ["Nat. Chem.", "Ignored"]
        }));
        assert_eq!(Normalizer::extract_journal(&record).as_deref(), Some("Nat Chem"));
    }

    #[test]
    fn test_journal_strips_punctuation_only() {
        let record = record_from(json!({ "container-title-short": "Phys. Rev. B: Condens.-Matter (Lett.)" }));
        let journal = Normalizer::extract_journal(&record).unwrap();
        assert_eq!(journal, "Phys Rev B CondensMatter Lett");
        assert!(journal.chars().all(|c| c.is_alphanumeric() || c.is_whitespace()));
    }

    #[test]
    fn test_journal_all_punctuation_is_missing() {
        let record = record_from(json!({ "container-title-short": "..." }));
        assert_eq!(Normalizer::extract_journal(&record), None);
    }

    #[test]
    fn test_author_is_first_listed() {
        let record = BibliographicRecord {
            author: Some(vec![
                Author { family: Some("O'Brien-Smith".to_string()) },
                Author { family: Some("Jones".to_string()) },
            ]),
            ..Default::default()
        };
        assert_eq!(Normalizer::extract_author(&record).as_deref(), Some("OBrienSmith"));
    }

    #[test]
    fn test_author_missing() {
        assert_eq!(Normalizer::extract_author(&BibliographicRecord::default()), None);
        assert_eq!(Normalizer::extract_author(&record_from(json!({ "author": [] }))), None);
        assert_eq!(
            Normalizer::extract_author(&record_from(json!({ "author": [{ "given": "Ada" }] }))),
            None
        );
    }

    #[test]
    fn test_author_and_journal_are_trimmed() {
        let record = record_from(json!({
            "author": [{ "family": " Smith " }],
            "container-title-short": "Anal. Methods. "
        }));
        assert_eq!(Normalizer::extract_author(&record).as_deref(), Some("Smith"));
        assert_eq!(Normalizer::extract_journal(&record).as_deref(), Some("Anal Methods"));
    }

    #[test]
    fn test_author_keeps_non_ascii_letters() {
        let record = record_from(json!({ "author": [{ "family": "Müller" }] }));
        assert_eq!(Normalizer::extract_author(&record).as_deref(), Some("Müller"));
    }

    #[test]
    fn test_title_from_list() {
        let record = record_from(json!({ "title": ["  Hello,   World!  "] }));
        assert_eq!(Normalizer::extract_title(&record).as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_title_list_with_null_entries() {
        let record = record_from(json!({ "title": ["Primary title", null] }));
        assert_eq!(Normalizer::extract_title(&record).as_deref(), Some("Primary title"));

        let record = record_from(json!({ "title": [null, "Second"] }));
        assert_eq!(Normalizer::extract_title(&record), None);
    }

    #[test]
    fn test_title_removes_sub_tags() {
        let record = record_from(json!({ "title": "CO<sub>2</sub> capture by H<SUB>2</SUB>O" }));
        let title = Normalizer::extract_title(&record).unwrap();
        assert_eq!(title, "CO2 capture by H2O");
        assert!(!title.contains("sub"));
    }

    #[test]
    fn test_title_only_ascii_alphanumerics_and_single_spaces() {
        let record = record_from(json!({
            "title": "\t Café — α-helix\n\nfolding: a   (re)view \u{a0}"
        }));
        let title = Normalizer::extract_title(&record).unwrap();
        assert_eq!(title, "Caf helix folding a review");
        assert!(title.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
        assert!(!title.contains("  "));
        assert_eq!(title, title.trim());
    }

    #[test]
    fn test_title_truncated_without_trailing_space() {
        // Character 100 lands on a space.
        let long = format!("{} tail of the title", "a".repeat(99));
        let record = record_from(json!({ "title": long }));
        let title = Normalizer::extract_title(&record).unwrap();
        assert_eq!(title, "a".repeat(99));

        let record = record_from(json!({ "title": format!("<sub>{}</sub>", "b".repeat(300)) }));
        assert_eq!(Normalizer::extract_title(&record).unwrap().len(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_title_empty_or_missing() {
        assert_eq!(Normalizer::extract_title(&BibliographicRecord::default()), None);
        assert_eq!(Normalizer::extract_title(&record_from(json!({ "title": [] }))), None);
        assert_eq!(Normalizer::extract_title(&record_from(json!({ "title": "" }))), None);
        assert_eq!(Normalizer::extract_title(&record_from(json!({ "title": "<sub></sub> ?!" }))), None);
    }

    #[test]
    fn test_issued_struct_default() {
        let record = BibliographicRecord {
            issued: Some(Issued::default()),
            ..Default::default()
        };
        assert_eq!(Normalizer::normalize(&record), NormalizedMetadata::default());
    }
}
