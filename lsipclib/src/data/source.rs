//! Collaborator interfaces the report builders query.

use super::records::{MsgLimits, MsgRecord, SemLimits, SemRecord, ShmLimits, ShmRecord};
use crate::Result;

/// Which objects a query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpcSelector {
    /// Every live object of the family
    #[default]
    All,
    /// Only the object with this identifier
    Id(i32),
}

impl IpcSelector {
    /// Map a command-line id to a selector; negative ids mean "all".
    pub fn from_id(id: Option<i32>) -> Self {
        match id {
            Some(id) if id >= 0 => IpcSelector::Id(id),
            _ => IpcSelector::All,
        }
    }

    pub fn matches(&self, id: i32) -> bool {
        match self {
            IpcSelector::All => true,
            IpcSelector::Id(wanted) => *wanted == id,
        }
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            IpcSelector::All => None,
            IpcSelector::Id(id) => Some(*id),
        }
    }
}

/// Source of System V IPC snapshots.
///
/// Returned records are owned by the caller and released when dropped.
pub trait IpcSource {
    fn shm_info(&self, selector: IpcSelector) -> Result<Vec<ShmRecord>>;
    fn msg_info(&self, selector: IpcSelector) -> Result<Vec<MsgRecord>>;
    /// For [`IpcSelector::Id`] queries the per-semaphore elements are filled in.
    fn sem_info(&self, selector: IpcSelector) -> Result<Vec<SemRecord>>;

    fn shm_limits(&self) -> Result<ShmLimits>;
    fn msg_limits(&self) -> Result<MsgLimits>;
    fn sem_limits(&self) -> Result<SemLimits>;

    /// Page size used to convert byte totals into pages.
    fn page_size(&self) -> u64;
}

/// Resolves a pid to the command line of that process.
pub trait ProcessLookup {
    /// Never fails: a vanished process yields an empty string.
    fn command(&self, pid: u32) -> String;
}
