//! Filter criteria and pagination parameters for collection queries

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A single filter criterion value
///
/// Blank strings count as absent and are never sent to the transport.
/// Date ranges expand to two query parameters, `{key}_from` and `{key}_to`,
/// in RFC 3339 form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl FilterValue {
    /// Whether this value counts as absent for query-building purposes
    pub fn is_blank(&self) -> bool {
        matches!(self, FilterValue::String(s) if s.trim().is_empty())
    }

    fn append_query(&self, key: &str, pairs: &mut Vec<(String, String)>) {
        match self {
            FilterValue::String(s) => pairs.push((key.to_string(), s.clone())),
            FilterValue::Integer(i) => pairs.push((key.to_string(), i.to_string())),
            FilterValue::Float(v) => pairs.push((key.to_string(), v.to_string())),
            FilterValue::Boolean(b) => pairs.push((key.to_string(), b.to_string())),
            FilterValue::DateRange { from, to } => {
                pairs.push((
                    format!("{key}_from"),
                    from.to_rfc3339_opts(SecondsFormat::Secs, true),
                ));
                pairs.push((
                    format!("{key}_to"),
                    to.to_rfc3339_opts(SecondsFormat::Secs, true),
                ));
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Integer(i)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Boolean(b)
    }
}

/// The complete set of criteria controlling which subset of a collection is
/// fetched: an ordered criteria map plus the page number and page size.
///
/// Criteria keep insertion order (IndexMap) so query strings are
/// deterministic. The page number is reset to 1 whenever [`Filter::apply`]
/// changes anything other than the page itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    criteria: IndexMap<String, FilterValue>,
    page: usize,
    per_page: usize,
}

impl Filter {
    /// Create an empty filter at page 1 with the given page size
    pub fn new(per_page: usize) -> Self {
        Self {
            criteria: IndexMap::new(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Builder-style criterion insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.criteria.insert(key.into(), value.into());
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.criteria.get(key)
    }

    /// Iterate the criteria in insertion order
    pub fn criteria(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Shallow-merge a patch into this filter.
    ///
    /// Returns true when any field other than the page number changed; the
    /// caller is expected to reset the page to 1 in that case.
    pub fn apply(&mut self, patch: &FilterPatch) -> bool {
        let mut changed = false;
        for (key, value) in &patch.entries {
            match value {
                Some(v) => {
                    if self.criteria.get(key) != Some(v) {
                        self.criteria.insert(key.clone(), v.clone());
                        changed = true;
                    }
                }
                None => {
                    if self.criteria.shift_remove(key).is_some() {
                        changed = true;
                    }
                }
            }
        }
        if let Some(per_page) = patch.per_page {
            let per_page = per_page.max(1);
            if per_page != self.per_page {
                self.per_page = per_page;
                changed = true;
            }
        }
        changed
    }

    /// Build the query parameters for the transport.
    ///
    /// Blank values are dropped; blank keys are rejected before dispatch.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ValidationError> {
        let mut pairs = Vec::new();
        for (key, value) in &self.criteria {
            if key.trim().is_empty() {
                return Err(ValidationError::BlankFilterKey);
            }
            if value.is_blank() {
                continue;
            }
            value.append_query(key, &mut pairs);
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("per_page".to_string(), self.per_page.to_string()));
        Ok(pairs)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// A partial filter update: criteria to set or clear, plus an optional page
/// size change. Built fluently and consumed by the controller.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    entries: Vec<(String, Option<FilterValue>)>,
    per_page: Option<usize>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a criterion
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// Remove a criterion
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.entries.push((key.into(), None));
        self
    }

    /// Change the page size
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filter_defaults() {
        let filter = Filter::default();
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_apply_reports_criteria_change() {
        let mut filter = Filter::new(20);
        let changed = filter.apply(&FilterPatch::new().set("status", "pending"));
        assert!(changed);
        assert_eq!(
            filter.get("status"),
            Some(&FilterValue::String("pending".to_string()))
        );
    }

    #[test]
    fn test_apply_same_value_is_not_a_change() {
        let mut filter = Filter::new(20).with("status", "pending");
        let changed = filter.apply(&FilterPatch::new().set("status", "pending"));
        assert!(!changed);
    }

    #[test]
    fn test_apply_clear_missing_key_is_not_a_change() {
        let mut filter = Filter::new(20);
        let changed = filter.apply(&FilterPatch::new().clear("status"));
        assert!(!changed);
    }

    #[test]
    fn test_apply_per_page_is_a_change() {
        let mut filter = Filter::new(20);
        assert!(filter.apply(&FilterPatch::new().per_page(50)));
        assert_eq!(filter.per_page(), 50);
        assert!(!filter.apply(&FilterPatch::new().per_page(50)));
    }

    #[test]
    fn test_query_pairs_skip_blank_values() {
        let filter = Filter::new(10)
            .with("status", "pending")
            .with("search", "   ");
        let pairs = filter.query_pairs().unwrap();
        assert_eq!(
            pairs,
            vec![
                ("status".to_string(), "pending".to_string()),
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_reject_blank_keys() {
        let filter = Filter::new(10).with("  ", "x");
        assert_eq!(
            filter.query_pairs().unwrap_err(),
            ValidationError::BlankFilterKey
        );
    }

    #[test]
    fn test_query_pairs_are_ordered() {
        let filter = Filter::new(10)
            .with("company", "acme")
            .with("status", "pending")
            .with("active", true);
        let keys: Vec<String> = filter
            .query_pairs()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["company", "status", "active", "page", "per_page"]);
    }

    #[test]
    fn test_date_range_expands_to_two_pairs() {
        let from = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        let filter = Filter::new(10).with("scheduled", FilterValue::DateRange { from, to });
        let pairs = filter.query_pairs().unwrap();
        assert_eq!(pairs[0].0, "scheduled_from");
        assert_eq!(pairs[0].1, "2026-03-01T00:00:00Z");
        assert_eq!(pairs[1].0, "scheduled_to");
        assert_eq!(pairs[1].1, "2026-03-31T23:59:59Z");
    }
}
