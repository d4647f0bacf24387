use crate::aggregate::{AggregateResult, DEFAULT_TOP_N, aggregate_top};
use crate::dataset::{Dataset, Domains};
use crate::filter::{FilterSelection, apply_filter};
use crate::models::{Record, YearRange};
use log::{debug, warn};

/// Interactive exploration state: the dataset loaded once, plus the current
/// filter selection. Derived tables are recomputed on every request.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    selection: FilterSelection,
    top_n: usize,
}

impl Session {
    /// Start a session with everything selected.
    pub fn new(dataset: Dataset) -> Self {
        let selection = dataset.default_selection();
        Self {
            dataset,
            selection,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn domains(&self) -> Domains {
        self.dataset.domains()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn select_regions<I>(&mut self, regions: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.selection.regions = regions.into_iter().map(Into::into).collect();
    }

    pub fn select_categories<I>(&mut self, categories: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.selection.categories = categories.into_iter().map(Into::into).collect();
    }

    /// Set the year interval. A single-year dataset always keeps `[Y, Y]`.
    pub fn select_years(&mut self, years: YearRange) {
        let bounds = self.dataset.year_bounds();
        self.selection.years = if bounds.is_single_year() {
            bounds.full_range()
        } else {
            YearRange::new(years.start, years.end)
        };
    }

    /// Back to the default (everything selected).
    pub fn reset(&mut self) {
        self.selection = self.dataset.default_selection();
    }

    pub fn filtered(&self) -> Vec<Record> {
        let out = apply_filter(self.dataset.records(), &self.selection);
        debug!(
            "selection kept {} of {} records",
            out.len(),
            self.dataset.len()
        );
        out
    }

    pub fn aggregate(&self) -> AggregateResult {
        let filtered = self.filtered();
        if filtered.is_empty() {
            warn!("current selection matches no records");
        }
        aggregate_top(&filtered, self.top_n)
    }
}
