//! Filter predicate over the normalized dataset.

use crate::models::{Record, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Regions, categories and years chosen by the user.
///
/// Membership is not validated against the dataset; a value that matches
/// nothing simply filters everything out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub years: YearRange,
}

impl FilterSelection {
    pub fn new<R, C>(regions: R, categories: C, years: YearRange) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        self.regions.contains(&record.region)
            && self.categories.contains(&record.category)
            && self.years.contains(record.year())
    }
}

/// Keep the records matching `selection`, in their original order.
///
/// Pure and idempotent: filtering the output again with the same selection
/// returns it unchanged. An empty result is valid.
pub fn apply_filter(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
