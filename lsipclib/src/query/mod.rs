//! Query stage: which columns to show and which rows to build.
//!
//! - **columns**: the column catalog and per-resource legality ranges
//! - **selector**: resolving the column selection for a run
//! - **report**: building rows from data-source records

pub mod columns;
pub mod report;
pub mod selector;

pub use columns::{lookup, Category, ColumnDesc, ColumnFlags, ColumnId, LegalRange, MAX_COLUMNS};
pub use report::{Report, ReportBuilder, Row};
pub use selector::{
    default_columns, parse_column_list, select_columns, ColumnList, SUMMARY_COLUMNS,
};
