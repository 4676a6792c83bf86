//! # lsipclib
//!
//! A library for reporting System V IPC objects (shared memory segments,
//! message queues and semaphore sets) as a table of named columns.
//!
//! ## Overview
//!
//! The library runs a small pipeline:
//!
//! - **Data**: raw per-object records and system limits, read from
//!   `/proc/sysvipc` and `/proc/sys/kernel` behind the [`IpcSource`] trait
//! - **Query**: the column registry, column selection with per-resource
//!   legality, and the report builder that turns records into rows
//! - **Output**: table, raw, colon, nul, export, newline, pretty and JSON
//!   layouts of a finished [`Report`]
//!
//! ## Features
//!
//! - **One column namespace** shared by all resource families, with generic,
//!   per-family and summary-only columns
//! - **Global view**: system-wide usage against kernel limits
//! - **Cached identity lookup**: user and group names resolved once per run
//! - **Pure data types**: a report is plain data until an output layout is
//!   chosen
//!
//! ## Example
//!
//! ```rust
//! use lsipclib::{
//!     render, OutputMode, ProcIpcSource, ProcfsProcessLookup, RenderOptions, ReportBuilder,
//!     ReportOptions, Resource, SystemIdentity,
//! };
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // A fake proc root with a single message queue
//! let root = tempdir().unwrap();
//! fs::create_dir(root.path().join("sysvipc")).unwrap();
//! fs::write(
//!     root.path().join("sysvipc/msg"),
//!     "key msqid perms cbytes qnum lspid lrpid uid gid cuid cgid stime rtime ctime\n\
//!      42 7 600 0 0 0 0 0 0 0 0 0 0 1690000000\n",
//! )
//! .unwrap();
//!
//! let source = ProcIpcSource::new(root.path());
//! let processes = ProcfsProcessLookup::new(root.path());
//! let options = ReportOptions::new().resource(Resource::Msg).columns("ID,MSGS");
//! let report = ReportBuilder::new(&source, &processes, &SystemIdentity)
//!     .build(&options)
//!     .unwrap();
//! assert_eq!(report.rows.len(), 1);
//!
//! let text = render(&report, &RenderOptions::new(OutputMode::Raw)).unwrap();
//! assert_eq!(text, "ID MSGS\n7 0\n");
//! ```

pub mod data;
pub mod error;
pub mod format;
pub mod identity;
pub mod options;
pub mod output;
pub mod query;

pub use data::{
    IpcPerm, IpcSelector, IpcSource, MsgLimits, MsgRecord, ProcIpcSource, ProcessLookup,
    ProcfsProcessLookup, SemElement, SemLimits, SemRecord, ShmLimits, ShmRecord,
    DEFAULT_PROC_ROOT,
};
pub use error::IpcError;
pub use format::{Clock, FixedClock, SystemClock, TimeFormatter};
pub use identity::{IdentityCache, IdentityResolver, SystemIdentity};
pub use options::{ReportOptions, Resource, Resources, TimeMode};
pub use output::{render, OutputMode, RenderOptions};
pub use query::{
    lookup, select_columns, Category, ColumnDesc, ColumnId, LegalRange, Report, ReportBuilder,
    Row, MAX_COLUMNS,
};

/// Result type for lsipclib operations
pub type Result<T> = std::result::Result<T, IpcError>;
