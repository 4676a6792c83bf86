//! JSON emission: one object per row, keys in column order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::data::SemElement;
use crate::query::columns::ColumnId;
use crate::query::report::{Report, Row};
use crate::Result;

/// Top-level document: `{"ipc": [...]}`.
#[derive(Serialize)]
struct JsonDocument<'a> {
    ipc: Vec<JsonRow<'a>>,
}

struct JsonRow<'a> {
    columns: &'a [ColumnId],
    row: &'a Row,
}

#[derive(Serialize)]
struct JsonSemaphore {
    semnum: usize,
    value: i32,
    ncount: i32,
    zcount: i32,
    pid: i32,
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extra = usize::from(self.row.semaphores.is_some());
        let mut map = serializer.serialize_map(Some(self.columns.len() + extra))?;
        for (index, column) in self.columns.iter().enumerate() {
            map.serialize_entry(&column.name().to_lowercase(), &self.row.get(index))?;
        }
        if let Some(elements) = &self.row.semaphores {
            map.serialize_entry("semaphores", &semaphores(elements))?;
        }
        map.end()
    }
}

fn semaphores(elements: &[SemElement]) -> Vec<JsonSemaphore> {
    elements
        .iter()
        .enumerate()
        .map(|(semnum, e)| JsonSemaphore {
            semnum,
            value: e.value,
            ncount: e.ncount,
            zcount: e.zcount,
            pid: e.pid,
        })
        .collect()
}

pub fn render_json(report: &Report) -> Result<String> {
    let document = JsonDocument {
        ipc: report
            .rows
            .iter()
            .map(|row| JsonRow {
                columns: &report.columns,
                row,
            })
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&document)?;
    out.push('\n');
    Ok(out)
}
