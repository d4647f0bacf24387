use thiserror::Error;

/// Fatal problems while reading the sales source. Per-row data quality issues
/// never end up here; the loader repairs or drops those rows instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read data source: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse data source as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("data source is missing required column `{0}`")]
    MissingColumn(String),
    #[error("data source contains no usable rows")]
    Empty,
}
