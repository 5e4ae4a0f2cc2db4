// LeadSweep - core/filter.rs
//
// Keyword exclusion over the organization column.
// Matching is case-insensitive substring containment, not word-aware:
// "cro" also hits inside "Macro" or "Microbiome".
// Core layer: pure logic, no I/O.

use crate::core::table::Table;
use crate::util::error::ConfigError;
use std::collections::{BTreeSet, HashSet};

/// Lowercased, trimmed, non-empty exclusion keywords.
///
/// Kept in a `BTreeSet` so iteration (and therefore which keyword is
/// reported as the match) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionKeywords {
    keywords: BTreeSet<String>,
}

impl ExclusionKeywords {
    /// Parse comma-separated free text.
    pub fn parse(text: &str) -> Self {
        Self::from_list(text.split(','))
    }

    /// Build from individual keywords. Blank entries are dropped; a blank
    /// keyword would otherwise match every organization.
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = items
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// First keyword (in sorted order) contained in `organization`.
    pub fn matched_keyword(&self, organization: &str) -> Option<&str> {
        let lower = organization.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Whether a record with this organization value is excluded.
    /// A null organization is never excluded.
    pub fn is_excluded(&self, organization: Option<&str>) -> bool {
        organization.is_some_and(|name| self.matched_keyword(name).is_some())
    }
}

/// Result of running the exclusion filter over a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionOutcome {
    /// Indices of kept rows, in input order.
    pub retained: Vec<usize>,

    /// Indices of excluded rows, in input order.
    pub excluded: Vec<usize>,

    /// Distinct excluded organization names, first-seen order.
    pub excluded_organizations: Vec<String>,
}

impl ExclusionOutcome {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Split the rows of `table` into retained and excluded by matching
/// `keywords` against `organization_column`.
///
/// Returns indices into `table.rows()` rather than copies, so the caller
/// binds only the retained rows.
///
/// Fails before looking at any row if the column is not in the header.
pub fn apply_exclusions(
    table: &Table,
    organization_column: &str,
    keywords: &ExclusionKeywords,
) -> Result<ExclusionOutcome, ConfigError> {
    let column = table
        .column_index(organization_column)
        .ok_or_else(|| ConfigError::UnknownColumn {
            role: "Company",
            column: organization_column.to_string(),
        })?;

    let mut outcome = ExclusionOutcome::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for row in 0..table.row_count() {
        let organization = table.cell(row, column);
        match organization.and_then(|name| keywords.matched_keyword(name).map(|k| (name, k))) {
            Some((name, keyword)) => {
                tracing::debug!(row, keyword, "Row excluded by keyword");
                outcome.excluded.push(row);
                if seen.insert(name) {
                    outcome.excluded_organizations.push(name.to_string());
                }
            }
            None => outcome.retained.push(row),
        }
    }

    tracing::info!(
        keywords = keywords.len(),
        excluded = outcome.excluded.len(),
        retained = outcome.retained.len(),
        distinct_organizations = outcome.excluded_organizations.len(),
        "Exclusion filter applied"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::TableOptions;
    use crate::util::constants;

    fn companies(names: &[&str]) -> Table {
        let mut content = String::from("Company,Country\n");
        for name in names {
            content.push_str(name);
            content.push_str(",Japan\n");
        }
        Table::from_csv_str(&content, &TableOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_trims_lowercases_and_drops_blanks() {
        let kw = ExclusionKeywords::parse(" CRO ,, Fund,  ,cro");
        let list: Vec<&str> = kw.iter().collect();
        assert_eq!(list, vec!["cro", "fund"]);
    }

    #[test]
    fn test_default_keywords_parse() {
        let kw = ExclusionKeywords::parse(constants::DEFAULT_EXCLUSION_KEYWORDS);
        assert_eq!(kw.len(), 12);
        assert!(kw.iter().any(|k| k == "clinical research organization"));
        assert!(kw.iter().all(|k| !k.is_empty()));
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let kw = ExclusionKeywords::parse("cro");
        assert!(kw.is_excluded(Some("Acme CRO Labs")));
        assert!(kw.is_excluded(Some("acme cro labs")));
        assert!(!kw.is_excluded(Some("Acme Biotech")));
    }

    #[test]
    fn test_substring_match_is_not_word_aware() {
        let kw = ExclusionKeywords::parse("CRO");
        assert!(kw.is_excluded(Some("Macro Pharma")));
    }

    #[test]
    fn test_null_organization_never_excluded() {
        let kw = ExclusionKeywords::parse("a,e,i,o,u");
        assert!(!kw.is_excluded(None));
    }

    #[test]
    fn test_blank_keywords_exclude_nothing() {
        let kw = ExclusionKeywords::parse(" , ,,");
        assert!(kw.is_empty());
        let table = companies(&["Acme", "Beta Fund", "Gamma"]);
        let outcome = apply_exclusions(&table, "Company", &kw).unwrap();
        assert_eq!(outcome.retained, vec![0, 1, 2]);
        assert_eq!(outcome.excluded_count(), 0);
    }

    #[test]
    fn test_apply_exclusions_preserves_order_and_dedupes_names() {
        let table = companies(&["Acme CRO", "Beta Bio", "", "Acme CRO", "Delta Fund", "Echo"]);
        let kw = ExclusionKeywords::parse("cro, fund");
        let outcome = apply_exclusions(&table, "Company", &kw).unwrap();
        assert_eq!(outcome.retained, vec![1, 2, 5]);
        assert_eq!(outcome.excluded, vec![0, 3, 4]);
        assert_eq!(outcome.excluded_count(), 3);
        assert_eq!(
            outcome.excluded_organizations,
            vec!["Acme CRO".to_string(), "Delta Fund".to_string()]
        );
    }

    #[test]
    fn test_unknown_organization_column_fails() {
        let table = companies(&["Acme"]);
        let err = apply_exclusions(&table, "Organisation", &ExclusionKeywords::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn { .. }));
    }
}
