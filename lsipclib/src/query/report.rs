//! Report builders: one row per IPC object, or per limit in global mode.
//!
//! Each builder queries the data source once, turns every record into a
//! [`Row`] of optional cells (one per selected column) and drops the records
//! before returning.

use log::debug;
use serde::{Deserialize, Serialize};

use super::columns::ColumnId;
use super::selector::select_columns;
use crate::data::records::{IpcPerm, MsgRecord, SemElement, SemRecord, ShmRecord};
use crate::data::source::{IpcSelector, IpcSource, ProcessLookup};
use crate::format::{
    format_bytes, format_key, format_perms, format_shm_status, Clock, SystemClock, TimeFormatter,
};
use crate::identity::{IdentityCache, IdentityResolver};
use crate::options::{ReportOptions, Resource};
use crate::Result;

/// One output line. Unset cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Option<String>>,
    /// Per-semaphore state, attached when a single semaphore set is detailed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semaphores: Option<Vec<SemElement>>,
}

impl Row {
    fn with_width(width: usize) -> Self {
        Self {
            cells: vec![None; width],
            semaphores: None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.get(index).is_some()
    }
}

/// The finished grid: selected columns, rows and non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub columns: Vec<ColumnId>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Fields shared by every object kind.
fn perm_cell(
    column: ColumnId,
    perm: &IpcPerm,
    names: &mut IdentityCache,
    numeric_perms: bool,
) -> Option<String> {
    match column {
        ColumnId::Key => Some(format_key(perm.key)),
        ColumnId::Id => Some(perm.id.to_string()),
        ColumnId::Owner | ColumnId::Uid => Some(names.user(perm.uid)),
        ColumnId::Gid => Some(names.group(perm.gid)),
        ColumnId::Cuid => Some(names.creator_user(perm.cuid)),
        ColumnId::Cgid => Some(names.creator_group(perm.cgid)),
        ColumnId::Perms => Some(format_perms(perm.mode, numeric_perms)),
        _ => None,
    }
}

/// Builds reports from a data source.
pub struct ReportBuilder<'a> {
    source: &'a dyn IpcSource,
    processes: &'a dyn ProcessLookup,
    identities: &'a dyn IdentityResolver,
    clock: Box<dyn Clock>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        source: &'a dyn IpcSource,
        processes: &'a dyn ProcessLookup,
        identities: &'a dyn IdentityResolver,
    ) -> Self {
        Self {
            source,
            processes,
            identities,
            clock: Box::new(SystemClock),
        }
    }

    /// Builder: replace the wall clock
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Select columns and build rows for every requested resource.
    pub fn build(self, options: &ReportOptions) -> Result<Report> {
        let resources = options.effective_resources()?;
        let columns: Vec<ColumnId> = select_columns(options)?.into();
        let selector = IpcSelector::from_id(options.id);

        let mut run = Run {
            source: self.source,
            processes: self.processes,
            identities: self.identities,
            times: TimeFormatter::new(options.time_mode, self.clock),
            options,
            report: Report {
                columns,
                rows: Vec::new(),
                warnings: Vec::new(),
            },
        };

        for resource in resources.iter() {
            if options.global {
                run.global(resource)?;
            } else {
                match resource {
                    Resource::Msg => run.msg(selector)?,
                    Resource::Shm => run.shm(selector)?,
                    Resource::Sem => run.sem(selector)?,
                }
            }
        }
        Ok(run.report)
    }
}

/// State of one `build` call.
struct Run<'a, 'o> {
    source: &'a dyn IpcSource,
    processes: &'a dyn ProcessLookup,
    identities: &'a dyn IdentityResolver,
    times: TimeFormatter,
    options: &'o ReportOptions,
    report: Report,
}

impl Run<'_, '_> {
    fn not_found(&mut self, selector: IpcSelector) {
        if let Some(id) = selector.id() {
            self.report.warnings.push(format!("id {id} not found"));
        }
    }

    fn time(&self, secs: i64) -> Option<String> {
        self.times.format(secs)
    }

    fn msg(&mut self, selector: IpcSelector) -> Result<()> {
        let queues: Vec<MsgRecord> = self.source.msg_info(selector)?;
        debug!("{} message queue(s)", queues.len());
        if queues.is_empty() {
            self.not_found(selector);
            return Ok(());
        }

        let mut names = IdentityCache::new(self.identities);
        for queue in &queues {
            let mut row = Row::with_width(self.report.columns.len());
            for (index, column) in self.report.columns.iter().enumerate() {
                row.cells[index] = match column {
                    ColumnId::Ctime => self.time(queue.ctime),
                    ColumnId::UsedBytes => Some(queue.cbytes.to_string()),
                    ColumnId::Msgs => Some(queue.qnum.to_string()),
                    ColumnId::Send => self.time(queue.stime),
                    ColumnId::Recv => self.time(queue.rtime),
                    ColumnId::Lspid => Some(queue.lspid.to_string()),
                    ColumnId::Lrpid => Some(queue.lrpid.to_string()),
                    other => perm_cell(*other, &queue.perm, &mut names, self.options.numeric_perms),
                };
            }
            self.report.rows.push(row);
        }
        Ok(())
    }

    fn shm(&mut self, selector: IpcSelector) -> Result<()> {
        let segments: Vec<ShmRecord> = self.source.shm_info(selector)?;
        debug!("{} shared memory segment(s)", segments.len());
        if segments.is_empty() {
            self.not_found(selector);
            return Ok(());
        }

        let mut names = IdentityCache::new(self.identities);
        for segment in &segments {
            let mut row = Row::with_width(self.report.columns.len());
            for (index, column) in self.report.columns.iter().enumerate() {
                row.cells[index] = match column {
                    ColumnId::Ctime => self.time(segment.ctime),
                    ColumnId::Size => Some(format_bytes(segment.segsz, self.options.bytes)),
                    ColumnId::Nattch => Some(segment.nattch.to_string()),
                    ColumnId::Status => Some(format_shm_status(segment.perm.mode)),
                    ColumnId::Attach => self.time(segment.atime),
                    ColumnId::Detach => self.time(segment.dtime),
                    ColumnId::Command => Some(self.processes.command(segment.cpid)),
                    ColumnId::Cpid => Some(segment.cpid.to_string()),
                    ColumnId::Lpid => Some(segment.lpid.to_string()),
                    other => {
                        perm_cell(*other, &segment.perm, &mut names, self.options.numeric_perms)
                    }
                };
            }
            self.report.rows.push(row);
        }
        Ok(())
    }

    fn sem(&mut self, selector: IpcSelector) -> Result<()> {
        let sets: Vec<SemRecord> = self.source.sem_info(selector)?;
        debug!("{} semaphore set(s)", sets.len());
        if sets.is_empty() {
            self.not_found(selector);
            return Ok(());
        }

        let mut names = IdentityCache::new(self.identities);
        for set in sets {
            let mut row = Row::with_width(self.report.columns.len());
            for (index, column) in self.report.columns.iter().enumerate() {
                row.cells[index] = match column {
                    ColumnId::Ctime => self.time(set.ctime),
                    ColumnId::Nsems => Some(set.nsems.to_string()),
                    ColumnId::Otime => self.time(set.otime),
                    other => perm_cell(*other, &set.perm, &mut names, self.options.numeric_perms),
                };
            }
            if let IpcSelector::Id(_) = selector {
                row.semaphores = Some(set.elements);
            }
            self.report.rows.push(row);
        }
        Ok(())
    }

    fn global(&mut self, resource: Resource) -> Result<()> {
        match resource {
            Resource::Msg => {
                let limits = self.source.msg_limits()?;
                let queues = self.source.msg_info(IpcSelector::All)?.len() as u64;
                self.global_row("MSGMNI", "Number of message queues", queues, limits.msgmni);
                self.global_row("MSGMAX", "Max size of message (bytes)", 0, limits.msgmax);
                self.global_row(
                    "MSGMNB",
                    "Default max size of queue (bytes)",
                    0,
                    limits.msgmnb,
                );
            }
            Resource::Shm => {
                let limits = self.source.shm_limits()?;
                let segments = self.source.shm_info(IpcSelector::All)?;
                let total_bytes: u64 = segments.iter().map(|s| s.segsz).sum();
                let pages = total_bytes / self.source.page_size().max(1);
                self.global_row(
                    "SHMMNI",
                    "Shared memory segments",
                    segments.len() as u64,
                    limits.shmmni,
                );
                self.global_row("SHMALL", "Shared memory pages", pages, limits.shmall);
            }
            Resource::Sem => {
                let limits = self.source.sem_limits()?;
                let sets = self.source.sem_info(IpcSelector::All)?;
                let semaphores: u64 = sets.iter().map(|s| s.nsems).sum();
                self.global_row(
                    "SEMMNS",
                    "Total number of semaphores",
                    semaphores,
                    limits.semmns,
                );
                self.global_row(
                    "SEMMNI",
                    "Number of Semaphore IDs",
                    sets.len() as u64,
                    limits.semmni,
                );
            }
        }
        Ok(())
    }

    fn global_row(&mut self, resource: &str, description: &str, used: u64, limit: u64) {
        let mut row = Row::with_width(self.report.columns.len());
        for (index, column) in self.report.columns.iter().enumerate() {
            row.cells[index] = match column {
                ColumnId::Resource => Some(resource.to_string()),
                ColumnId::Desc => Some(description.to_string()),
                ColumnId::Used => Some(used.to_string()),
                ColumnId::Limit => Some(limit.to_string()),
                _ => None,
            };
        }
        self.report.rows.push(row);
    }
}
