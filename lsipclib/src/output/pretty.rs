//! Single-object detail listing used by `--id`.

use crate::data::SemElement;
use crate::query::report::Report;

const LABEL_WIDTH: usize = 35;

/// One `Label: value` line per set cell, then the semaphore table if any.
pub fn render_pretty(report: &Report) -> String {
    let mut out = String::new();
    for (n, row) in report.rows.iter().enumerate() {
        if n > 0 {
            out.push('\n');
        }
        for (index, column) in report.columns.iter().enumerate() {
            let Some(value) = row.get(index) else {
                continue;
            };
            let label = column.desc().pretty_name;
            let pad = LABEL_WIDTH.saturating_sub(label.chars().count()).max(1);
            out.push_str(&format!("{}:{}{}\n", label, " ".repeat(pad), value));
        }
        if let Some(elements) = &row.semaphores {
            out.push_str(&semaphore_table(elements));
        }
    }
    out
}

/// The per-semaphore table appended to a detailed semaphore set.
pub fn semaphore_table(elements: &[SemElement]) -> String {
    let mut out = format!(
        "{:<10} {:<10} {:<10} {:<10} {:<10}\n",
        "semnum", "value", "ncount", "zcount", "pid"
    );
    for (semnum, e) in elements.iter().enumerate() {
        out.push_str(&format!(
            "{:<10} {:<10} {:<10} {:<10} {:<10}\n",
            semnum, e.value, e.ncount, e.zcount, e.pid
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::columns::ColumnId;
    use crate::query::report::Row;

    #[test]
    fn test_pretty_skips_unset_cells() {
        let report = Report {
            columns: vec![ColumnId::Key, ColumnId::Id, ColumnId::Attach],
            rows: vec![Row {
                cells: vec![Some("0x00000000".into()), Some("5".into()), None],
                semaphores: None,
            }],
            warnings: Vec::new(),
        };
        let out = render_pretty(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Key:{}0x00000000", " ".repeat(32)));
        assert_eq!(lines[1], format!("ID:{}5", " ".repeat(33)));
    }

    #[test]
    fn test_pretty_appends_semaphores() {
        let report = Report {
            columns: vec![ColumnId::Nsems],
            rows: vec![Row {
                cells: vec![Some("2".into())],
                semaphores: Some(vec![
                    SemElement {
                        value: 1,
                        ncount: 0,
                        zcount: 0,
                        pid: 42,
                    },
                    SemElement {
                        value: 0,
                        ncount: 3,
                        zcount: 1,
                        pid: 0,
                    },
                ]),
            }],
            warnings: Vec::new(),
        };
        let out = render_pretty(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Semaphores:"));
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            ["semnum", "value", "ncount", "zcount", "pid"]
        );
        assert_eq!(lines[2], "0          1          0          0          42        ");
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            ["1", "0", "3", "1", "0"]
        );
    }

    #[test]
    fn test_pretty_separates_objects() {
        let row = |id: &str| Row {
            cells: vec![Some(id.to_string())],
            semaphores: None,
        };
        let report = Report {
            columns: vec![ColumnId::Id],
            rows: vec![row("1"), row("2")],
            warnings: Vec::new(),
        };
        assert_eq!(
            render_pretty(&report),
            format!("ID:{0}1\n\nID:{0}2\n", " ".repeat(33))
        );
    }

    #[test]
    fn test_empty_semaphore_table_has_header() {
        assert_eq!(semaphore_table(&[]).lines().count(), 1);
    }
}
