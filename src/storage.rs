use crate::aggregate::AggregateResult;
use crate::models::{REQUIRED_COLUMNS, Record};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula with `'`.
fn sanitize_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save records as CSV using the source column names, so the file can be loaded again.
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    wtr.write_record(REQUIRED_COLUMNS)?;
    for r in records {
        wtr.serialize((
            sanitize_cell(&r.product),
            sanitize_cell(&r.category),
            sanitize_cell(&r.region),
            r.quantity,
            r.total_price,
            r.date.format("%Y-%m-%d").to_string(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the aggregate bundle as pretty JSON. An undefined average is written as `null`.
pub fn save_json<P: AsRef<Path>>(result: &AggregateResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let s = serde_json::to_string_pretty(result)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
