//! Data layer: raw IPC snapshots and the sources that produce them.
//!
//! - **records**: kernel-reported per-object records and limits
//! - **source**: the `IpcSource` and `ProcessLookup` collaborator traits
//! - **sysvipc**: the `/proc` implementation of both

pub mod records;
pub mod source;
pub mod sysvipc;

pub use records::{
    IpcPerm, MsgLimits, MsgRecord, SemElement, SemLimits, SemRecord, ShmLimits, ShmRecord,
};
pub use source::{IpcSelector, IpcSource, ProcessLookup};
pub use sysvipc::{ProcIpcSource, ProcfsProcessLookup, DEFAULT_PROC_ROOT};
