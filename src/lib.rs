//! sales_explorer
//!
//! A small Rust library for exploring sales transaction data: load a CSV
//! export, filter it by region, category and year, and derive the aggregate
//! tables a dashboard needs. Pairs with the `sales` CLI.
//!
//! ### Features
//! - Lenient loading: missing labels become "Unknown", missing quantities 0,
//!   rows with missing or unparseable dates are dropped
//! - Filter domains (distinct regions, categories, year bounds) for building pickers
//! - KPIs, top-N products, sales per category/region, a daily time series and a
//!   region x category pivot
//! - Text report and CSV/JSON export
//!
//! ### Example
//! ```no_run
//! use sales_explorer::{Session, YearRange, loader, report};
//!
//! let (dataset, _report) = loader::load_csv("ventes_data.csv")?;
//! let mut session = Session::new(dataset);
//! session.select_regions(["North"]);
//! session.select_years(YearRange::new(2023, 2024));
//! let result = session.aggregate();
//! println!("{}", report::render(&result, "en"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod report;
pub mod session;
pub mod storage;

pub use aggregate::{AggregateResult, PivotTable, aggregate};
pub use dataset::{Dataset, Domains, YearBounds};
pub use error::LoadError;
pub use filter::{FilterSelection, apply_filter};
pub use loader::{LoadReport, normalize};
pub use models::{Ranked, RawRecord, Record, TimePoint, YearRange};
pub use session::Session;
