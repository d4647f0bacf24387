//! Reading and cleaning the raw sales source.
//!
//! Loading happens in two stages, similar to a tidy-data pipeline:
//! 1. [`read_raw`] decodes CSV rows into [`RawRecord`]s (all text, all optional).
//! 2. [`normalize`] repairs missing labels and quantities, parses dates leniently
//!    and drops every row left without a date.
//!
//! Structural problems (unreadable file, missing column, nothing usable) are
//! fatal and surface as [`LoadError`]. Everything else is repaired or dropped
//! and only shows up in the returned [`LoadReport`].

use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::models::{RawRecord, Record, REQUIRED_COLUMNS, UNKNOWN};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// What happened to the rows while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_malformed: usize,
    pub dropped_missing_date: usize,
    pub dropped_bad_date: usize,
    /// Kept rows whose price is blank or not a number.
    pub missing_price: usize,
    pub filled_product: usize,
    pub filled_category: usize,
    pub filled_region: usize,
    pub filled_quantity: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.dropped_malformed
            + self.dropped_missing_date
            + self.dropped_bad_date
    }
}

/// Parse a date leniently. Unrecognized input yields `None`, never an error.
///
/// Timestamps are accepted and truncated to their calendar date. Slash dates
/// with the year last are read month-first (`02/01/2023` is February 1st).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Decode CSV rows from any reader.
///
/// Returns the decoded rows plus the number of rows the CSV layer could not
/// decode (e.g. wrong field count), which are skipped.
pub fn read_raw<R: Read>(reader: R) -> Result<(Vec<RawRecord>, usize), LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut rows = Vec::new();
    let mut malformed = 0usize;
    for (idx, result) in rdr.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!("skipping undecodable row {}: {}", idx + 1, e);
                malformed += 1;
            }
        }
    }
    Ok((rows, malformed))
}

/// Repair and filter raw rows into a [`Dataset`].
///
/// Missing product, category and region become [`UNKNOWN`], missing quantity
/// becomes 0, and a blank or non-numeric price is kept as missing. Dates are
/// parsed first; rows whose date is missing or failed to parse are then
/// removed. Fill counters only cover rows that are kept.
pub fn normalize(raw: &[RawRecord]) -> Result<(Dataset, LoadReport), LoadError> {
    let mut report = LoadReport {
        total_rows: raw.len(),
        ..Default::default()
    };
    if raw.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut records = Vec::with_capacity(raw.len());
    for (idx, row) in raw.iter().enumerate() {
        let date = match non_blank(&row.date) {
            None => {
                report.dropped_missing_date += 1;
                continue;
            }
            Some(s) => match parse_date(s) {
                Some(d) => d,
                None => {
                    debug!("row {}: unparseable date {:?}, dropped", idx + 1, s);
                    report.dropped_bad_date += 1;
                    continue;
                }
            },
        };

        let product = non_blank(&row.product).unwrap_or_else(|| {
            report.filled_product += 1;
            UNKNOWN
        });
        let category = non_blank(&row.category).unwrap_or_else(|| {
            report.filled_category += 1;
            UNKNOWN
        });
        let region = non_blank(&row.region).unwrap_or_else(|| {
            report.filled_region += 1;
            UNKNOWN
        });
        let quantity = non_blank(&row.quantity)
            .and_then(parse_number)
            .unwrap_or_else(|| {
                report.filled_quantity += 1;
                0.0
            });
        let total_price = non_blank(&row.total_price).and_then(parse_number);
        if total_price.is_none() {
            debug!("row {}: missing or invalid price, kept without price", idx + 1);
            report.missing_price += 1;
        }

        records.push(Record {
            product: product.to_string(),
            category: category.to_string(),
            region: region.to_string(),
            quantity,
            total_price,
            date,
        });
    }

    report.kept_rows = records.len();
    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok((Dataset::new(records)?, report))
}

/// Read and normalize sales data from a CSV reader.
pub fn load_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport), LoadError> {
    let (raw, malformed) = read_raw(reader)?;
    if raw.is_empty() {
        return Err(LoadError::Empty);
    }
    let (dataset, mut report) = normalize(&raw)?;
    report.total_rows += malformed;
    report.dropped_malformed = malformed;
    info!(
        "loaded {} of {} rows ({} dropped)",
        report.kept_rows,
        report.total_rows,
        report.dropped()
    );
    Ok((dataset, report))
}

/// Read and normalize sales data from a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<(Dataset, LoadReport), LoadError> {
    let path = path.as_ref();
    debug!("opening {}", path.display());
    load_reader(File::open(path)?)
}
