//! Choosing the ordered list of columns for a run.

use log::debug;

use super::columns::{ColumnId, LegalRange, MAX_COLUMNS};
use crate::error::IpcError;
use crate::options::{ReportOptions, Resource};

/// Columns of the `--global` summary, in display order.
pub const SUMMARY_COLUMNS: [ColumnId; 4] = [
    ColumnId::Resource,
    ColumnId::Desc,
    ColumnId::Used,
    ColumnId::Limit,
];

/// Ordered, bounded column selection. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnList {
    columns: Vec<ColumnId>,
}

impl ColumnList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: ColumnId) -> Result<(), IpcError> {
        if self.columns.len() >= MAX_COLUMNS {
            return Err(IpcError::TooManyColumns { limit: MAX_COLUMNS });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn as_slice(&self) -> &[ColumnId] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.columns.iter().copied()
    }
}

impl From<ColumnList> for Vec<ColumnId> {
    fn from(list: ColumnList) -> Self {
        list.columns
    }
}

/// Parse a comma-separated list of column names.
pub fn parse_column_list(list: &str, range: LegalRange) -> Result<ColumnList, IpcError> {
    let list = list.strip_prefix('=').unwrap_or(list);
    if list.trim().is_empty() {
        return Err(IpcError::EmptyColumnList);
    }

    let mut columns = ColumnList::new();
    for name in list.split(',') {
        columns.push(range.resolve(name.trim())?)?;
    }
    Ok(columns)
}

/// Default columns of the per-object list view.
pub fn default_columns(
    resource: Option<Resource>,
    show_creator: bool,
    show_time: bool,
) -> Result<ColumnList, IpcError> {
    use ColumnId::{
        Attach, Cgid, Command, Cpid, Ctime, Cuid, Detach, Gid, Id, Key, Lpid, Lrpid, Lspid, Msgs,
        Nattch, Nsems, Otime, Owner, Perms, Recv, Send, Size, Status, Uid, UsedBytes,
    };

    let mut columns = ColumnList::new();
    let mut add = |ids: &[ColumnId]| -> Result<(), IpcError> {
        for id in ids {
            columns.push(*id)?;
        }
        Ok(())
    };

    add(&[Key, Id, Perms, Owner])?;
    if show_creator {
        add(&[Cuid, Cgid, Uid, Gid])?;
    }

    match resource {
        Some(Resource::Msg) => {
            add(&[UsedBytes, Msgs])?;
            if show_time {
                add(&[Send, Recv, Ctime])?;
            }
            add(&[Lspid, Lrpid])?;
        }
        Some(Resource::Shm) => {
            add(&[Size, Nattch, Status])?;
            if show_time {
                add(&[Attach, Detach])?;
            }
            add(&[Ctime, Cpid, Lpid, Command])?;
        }
        Some(Resource::Sem) => {
            add(&[Nsems])?;
            if show_time {
                add(&[Otime, Ctime])?;
            }
        }
        None => {}
    }
    Ok(columns)
}

/// Resolve the column selection for a run.
pub fn select_columns(options: &ReportOptions) -> Result<ColumnList, IpcError> {
    let resources = options.effective_resources()?;
    let range = LegalRange::for_run(resources.single(), options.global);

    let columns = if options.global && options.columns.is_none() {
        let mut columns = ColumnList::new();
        for column in SUMMARY_COLUMNS {
            columns.push(column)?;
        }
        columns
    } else if let Some(list) = &options.columns {
        parse_column_list(list, range)?
    } else if options.is_detail() {
        let mut columns = ColumnList::new();
        for column in ColumnId::ALL {
            columns.push(column)?;
        }
        columns
    } else {
        default_columns(resources.single(), options.show_creator, options.show_time)?
    };

    debug!(
        "selected columns: {}",
        columns
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(columns)
}
