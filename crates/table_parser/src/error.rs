use thiserror::Error;

/// Structural and vocabulary failures while normalizing a scraped table.
/// All of these are recoverable per player/season; the batch never aborts.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("no table found in markup")]
    MissingTable,

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("unknown rundle code: {0:?}")]
    UnknownRundle(String),

    #[error("unknown result code: {0:?}")]
    UnknownResult(String),

    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("unexpected table shape: {0}")]
    UnexpectedShape(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
