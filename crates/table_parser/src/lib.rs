//! HTML table extraction and normalization for league profile pages.
//!
//! One generic parser (`Table::from_html`) plus declarative per-page-type
//! column transforms (`TableSpec`), instead of a separate ad-hoc pipeline
//! per page. League-specific vocabulary (categories, rundles, result codes)
//! and the three stats-table normalizers live in `league`.

mod error;
mod flatfile;
pub mod league;
mod spec;
mod table;

pub use error::TableError;
pub use flatfile::{read_table, write_table};
pub use spec::TableSpec;
pub use table::Table;
