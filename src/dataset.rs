//! The normalized, immutable dataset and the filter domains derived from it.

use crate::error::LoadError;
use crate::filter::FilterSelection;
use crate::models::{Record, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Smallest and largest year observed in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn is_single_year(&self) -> bool {
        self.min == self.max
    }

    /// Full interval. Collapses to `[Y, Y]` when only one year exists.
    pub fn full_range(&self) -> YearRange {
        if self.is_single_year() {
            YearRange::single(self.min)
        } else {
            YearRange::new(self.min, self.max)
        }
    }
}

/// Distinct values a caller may offer as filter choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub years: YearBounds,
}

/// Cleaned sales records. Never mutated after construction; every record has a
/// date, a product, a category and a numeric quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    regions: Vec<String>,
    categories: Vec<String>,
    years: YearBounds,
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

impl Dataset {
    /// Wrap already-normalized records. An empty set is [`LoadError::Empty`].
    pub fn new(records: Vec<Record>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        let regions = distinct(records.iter().map(|r| r.region.as_str()));
        let categories = distinct(records.iter().map(|r| r.category.as_str()));
        let (min, max) = records
            .iter()
            .map(Record::year)
            .fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Ok(Self {
            records,
            regions,
            categories,
            years: YearBounds { min, max },
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn year_bounds(&self) -> YearBounds {
        self.years
    }

    pub fn domains(&self) -> Domains {
        Domains {
            regions: self.regions.clone(),
            categories: self.categories.clone(),
            years: self.years,
        }
    }

    /// Everything selected: all regions, all categories, the full year range.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::new(
            self.regions.iter().cloned(),
            self.categories.iter().cloned(),
            self.years.full_range(),
        )
    }
}
