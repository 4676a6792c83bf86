//! Output: present a finished report in one of the supported layouts.
//!
//! This is the last stage of the pipeline. It never computes values; every
//! cell arrives as a string (or unset) from the report builder.
//!
//! - **Table / raw / colon / nul**: column-oriented text, see [`table`]
//! - **Export / newline**: shell assignments
//! - **Pretty**: `Label: value` detail of a single object, see [`pretty`]
//! - **JSON**: one object per row, see [`json`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use lsipclib::output::{render, OutputMode, RenderOptions};
//!
//! let text = render(&report, &RenderOptions::new(OutputMode::Raw))?;
//! ```

pub mod json;
pub mod pretty;
pub mod table;

pub use table::{render, OutputMode, RenderOptions};
