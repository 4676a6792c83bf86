//! Laying out a finished report in one of the column-oriented modes.
//!
//! The data flow is:
//! 1. Records (from the data source)
//! 2. Report (columns plus rows of optional cells)
//! 3. Text in the requested output mode
//!
//! Nothing here computes cell values; it only arranges them.

use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Segment};
use tabled::settings::{Alignment, Modify, Padding, Style, Width};
use tabled::Table;

use super::{json, pretty};
use crate::query::columns::ColumnId;
use crate::query::report::{Report, Row};
use crate::Result;

/// Output layouts. At most one may be requested per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Aligned columns with a header line
    #[default]
    Table,
    /// Raw layout separated by `:`
    Colon,
    /// `NAME="value"` pairs
    Export,
    /// `NAME="value"` pairs, one per line
    Newline,
    /// Unaligned, escaped cells separated by a space
    Raw,
    /// Raw layout with NUL terminated lines
    Nul,
    /// `Label: value` listing of a single object
    Pretty,
}

/// Presentation switches layered on top of the output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    pub mode: OutputMode,
    /// Structured JSON instead of a text layout
    pub json: bool,
    pub noheadings: bool,
    pub notruncate: bool,
    /// Terminal width; `None` disables truncation
    pub term_width: Option<usize>,
}

impl RenderOptions {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Builder: JSON output
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Builder: suppress the header line
    pub fn noheadings(mut self, noheadings: bool) -> Self {
        self.noheadings = noheadings;
        self
    }

    /// Builder: never truncate cells
    pub fn notruncate(mut self, notruncate: bool) -> Self {
        self.notruncate = notruncate;
        self
    }

    /// Builder: terminal width used for truncation
    pub fn term_width(mut self, width: Option<usize>) -> Self {
        self.term_width = width;
        self
    }
}

/// Render a report as text.
pub fn render(report: &Report, options: &RenderOptions) -> Result<String> {
    if options.json {
        return json::render_json(report);
    }

    let out = match options.mode {
        OutputMode::Table => render_aligned(report, options),
        OutputMode::Raw => render_raw(report, options, " ", "\n", &[]),
        OutputMode::Colon => render_raw(report, options, ":", "\n", &[':']),
        OutputMode::Nul => render_raw(report, options, " ", "\0", &[]),
        OutputMode::Export => render_export(report, " "),
        OutputMode::Newline => render_export(report, "\n"),
        OutputMode::Pretty => pretty::render_pretty(report),
    };
    Ok(out)
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

/// Widest cell of a column, header included.
fn column_width(report: &Report, index: usize) -> usize {
    report
        .rows
        .iter()
        .map(|row| row.get(index).map(width_of).unwrap_or(0))
        .chain(report.columns.get(index).map(|c| width_of(c.name())))
        .max()
        .unwrap_or(0)
}

/// Shrink truncatable columns, never below their header, until `table`
/// fits `term_width`.
fn fit_to_width(table: &mut Table, report: &Report, term_width: usize) {
    let mut excess = table.total_width().saturating_sub(term_width);

    for (index, column) in report.columns.iter().enumerate().rev() {
        if excess == 0 {
            break;
        }
        if !column.desc().flags.trunc {
            continue;
        }
        let width = column_width(report, index);
        let target = width.saturating_sub(excess).max(width_of(column.name()));
        excess -= width - target;
        table.with(Modify::new(Columns::single(index)).with(Width::truncate(target)));
    }
}

fn render_aligned(report: &Report, options: &RenderOptions) -> String {
    let mut builder = Builder::default();
    if !options.noheadings {
        builder.set_header(report.columns.iter().map(|c| c.name()));
    }
    for row in &report.rows {
        let cells = (0..report.columns.len()).map(|index| row.get(index).unwrap_or(""));
        builder.push_record(cells);
    }
    if options.noheadings && report.rows.is_empty() {
        return String::new();
    }

    let mut table = builder.build();
    table
        .with(Style::blank())
        .with(Modify::new(Segment::all()).with(Padding::zero()));
    for (index, column) in report.columns.iter().enumerate() {
        if column.desc().flags.right {
            table.with(Modify::new(Columns::single(index)).with(Alignment::right()));
        }
    }
    if let (false, Some(term_width)) = (options.notruncate, options.term_width) {
        fit_to_width(&mut table, report, term_width);
    }

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Escape whitespace, control characters, backslashes and `extra`.
fn escape_raw(s: &str, extra: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() && (c.is_ascii_whitespace() || c.is_ascii_control() || c == '\\')
            || extra.contains(&c)
        {
            out.push_str(&format!("\\x{:02x}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

fn render_raw(
    report: &Report,
    options: &RenderOptions,
    separator: &str,
    terminator: &str,
    extra: &[char],
) -> String {
    let mut out = String::new();
    if !options.noheadings {
        let header: Vec<String> = report
            .columns
            .iter()
            .map(|c| escape_raw(c.name(), extra))
            .collect();
        out.push_str(&header.join(separator));
        out.push_str(terminator);
    }
    for row in &report.rows {
        let cells: Vec<String> = (0..report.columns.len())
            .map(|index| escape_raw(row.get(index).unwrap_or(""), extra))
            .collect();
        out.push_str(&cells.join(separator));
        out.push_str(terminator);
    }
    out
}

/// Quote a value so a shell can `eval` the assignment.
fn escape_export(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Variable name for a column: anything but alphanumerics becomes `_`.
fn export_name(column: ColumnId) -> String {
    column
        .name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn render_export(report: &Report, separator: &str) -> String {
    let mut out = String::new();
    for row in &report.rows {
        let pairs: Vec<String> = report
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                format!(
                    "{}={}",
                    export_name(*column),
                    escape_export(row.get(index).unwrap_or(""))
                )
            })
            .collect();
        out.push_str(&pairs.join(separator));
        out.push('\n');
    }
    out
}
