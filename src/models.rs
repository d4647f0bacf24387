use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Placeholder for a missing product, category, or region.
pub const UNKNOWN: &str = "Unknown";

/// Column headers every source file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "produit",
    "categorie",
    "region",
    "quantité",
    "prix_total",
    "date",
];

/// Inclusive year interval used for filtering, e.g. `2020..=2023`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build an interval, swapping the bounds if they come in reverse order.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Degenerate interval covering exactly one year.
    pub fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn is_single_year(&self) -> bool {
        self.start == self.end
    }
}

/// One row of the source file before cleaning. Every field is optional text
/// because repairs and type conversion happen in `loader::normalize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "produit")]
    pub product: Option<String>,
    #[serde(rename = "categorie")]
    pub category: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "quantité")]
    pub quantity: Option<String>,
    #[serde(rename = "prix_total")]
    pub total_price: Option<String>,
    pub date: Option<String>,
}

/// A cleaned sale transaction (one row = one sale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub product: String,
    pub category: String,
    pub region: String,
    pub quantity: f64,
    /// `None` when the source cell was blank or not a number.
    pub total_price: Option<f64>,
    pub date: NaiveDate,
}

impl Record {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Price as it enters sums; a missing price counts as 0.
    pub fn price(&self) -> f64 {
        self.total_price.unwrap_or(0.0)
    }
}

/// A grouping key with its summed `total_price`, as found in ranking lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked {
    pub key: String,
    pub total: f64,
}

/// Sales summed over one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub total: f64,
}
