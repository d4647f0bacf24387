//! Aggregate tables derived from a filtered set of records.
//!
//! Everything here is a pure reduction: the result is rebuilt from scratch on
//! each call, nothing is cached.

use crate::models::{Ranked, Record, TimePoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Length of the product ranking returned by [`aggregate`].
pub const DEFAULT_TOP_N: usize = 5;

/// Region x category cross-tabulation of summed `total_price`.
///
/// Rows and columns are the distinct regions and categories present in the
/// input, sorted lexicographically. Combinations without sales hold 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.cells[r][c])
    }

    pub fn row_total(&self, row: &str) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        Some(self.cells[r].iter().fold(0.0, |acc, v| acc + v))
    }

    pub fn column_total(&self, column: &str) -> Option<f64> {
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.cells.iter().fold(0.0, |acc, row| acc + row[c]))
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().fold(0.0, |acc, v| acc + v)
    }
}

/// KPIs, rankings, time series and pivot for one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub record_count: usize,
    pub total_sales: f64,
    pub total_quantity: f64,
    /// Mean of the known `total_price` values; `None` when there are none.
    pub average_price: Option<f64>,
    pub top_products: Vec<Ranked>,
    pub sales_by_category: Vec<Ranked>,
    pub sales_by_region: Vec<Ranked>,
    pub sales_over_time: Vec<TimePoint>,
    pub region_category_pivot: PivotTable,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Sum `total_price` per key and rank descending.
///
/// Keys are accumulated in first-seen order and the sort is stable, so equal
/// totals keep the order in which their keys first appeared.
pub fn rank_by<F>(records: &[Record], key: F) -> Vec<Ranked>
where
    F: Fn(&Record) -> &str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<Ranked> = Vec::new();
    for r in records {
        let k = key(r);
        let i = *index.entry(k).or_insert_with(|| {
            out.push(Ranked {
                key: k.to_string(),
                total: 0.0,
            });
            out.len() - 1
        });
        out[i].total += r.price();
    }
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}

/// Sales per exact date, chronologically ascending.
pub fn sales_over_time(records: &[Record]) -> Vec<TimePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records {
        *by_date.entry(r.date).or_default() += r.price();
    }
    by_date
        .into_iter()
        .map(|(date, total)| TimePoint { date, total })
        .collect()
}

/// Region x category pivot of summed `total_price`, zero-filled.
pub fn pivot_region_category(records: &[Record]) -> PivotTable {
    let rows: Vec<String> = records
        .iter()
        .map(|r| r.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<String> = records
        .iter()
        .map(|r| r.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells = vec![vec![0.0; columns.len()]; rows.len()];
    for r in records {
        // Both keys were collected from `records` above.
        if let (Ok(ri), Ok(ci)) = (
            rows.binary_search(&r.region),
            columns.binary_search(&r.category),
        ) {
            cells[ri][ci] += r.price();
        }
    }
    PivotTable {
        rows,
        columns,
        cells,
    }
}

/// Compute every aggregate with the default top-N of [`DEFAULT_TOP_N`].
pub fn aggregate(records: &[Record]) -> AggregateResult {
    aggregate_top(records, DEFAULT_TOP_N)
}

/// Compute every aggregate, keeping at most `top_n` products in the ranking.
pub fn aggregate_top(records: &[Record], top_n: usize) -> AggregateResult {
    let record_count = records.len();
    // `sum()` of no floats is -0.0; start folds at +0.0 instead.
    let total_sales = records.iter().fold(0.0, |acc, r| acc + r.price());
    let total_quantity = records.iter().fold(0.0, |acc, r| acc + r.quantity);
    let priced = records.iter().filter(|r| r.total_price.is_some()).count();
    let average_price = if priced > 0 {
        Some(total_sales / priced as f64)
    } else {
        None
    };

    let mut top_products = rank_by(records, |r| r.product.as_str());
    top_products.truncate(top_n);

    AggregateResult {
        record_count,
        total_sales,
        total_quantity,
        average_price,
        top_products,
        sales_by_category: rank_by(records, |r| r.category.as_str()),
        sales_by_region: rank_by(records, |r| r.region.as_str()),
        sales_over_time: sales_over_time(records),
        region_category_pivot: pivot_region_category(records),
    }
}
