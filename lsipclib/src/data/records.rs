//! Raw per-object records and system limits as reported by the kernel.
//!
//! These are snapshots: nothing here is refreshed after the data source
//! returns it.

use serde::{Deserialize, Serialize};

/// Shared memory segment marked for destruction
pub const SHM_DEST: u32 = 0o1000;
/// Shared memory segment locked in memory
pub const SHM_LOCKED: u32 = 0o2000;
/// Shared memory segment backed by huge pages
pub const SHM_HUGETLB: u32 = 0o4000;
/// Shared memory segment without swap reservation
pub const SHM_NORESERVE: u32 = 0o10000;

/// Permission block shared by every IPC object kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpcPerm {
    pub key: i32,
    pub id: i32,
    /// Full mode word, including the kernel's status bits
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub cuid: u32,
    pub cgid: u32,
}

/// One shared memory segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShmRecord {
    pub perm: IpcPerm,
    /// Segment size in bytes
    pub segsz: u64,
    pub nattch: u64,
    pub cpid: u32,
    pub lpid: u32,
    pub atime: i64,
    pub dtime: i64,
    pub ctime: i64,
}

/// One message queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRecord {
    pub perm: IpcPerm,
    /// Bytes currently queued
    pub cbytes: u64,
    /// Messages currently queued
    pub qnum: u64,
    pub lspid: u32,
    pub lrpid: u32,
    pub stime: i64,
    pub rtime: i64,
    pub ctime: i64,
}

/// State of a single semaphore inside a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemElement {
    pub value: i32,
    /// Processes waiting for the value to increase
    pub ncount: i32,
    /// Processes waiting for the value to become zero
    pub zcount: i32,
    /// Last process that operated on this semaphore
    pub pid: i32,
}

/// One semaphore set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemRecord {
    pub perm: IpcPerm,
    pub nsems: u64,
    pub otime: i64,
    pub ctime: i64,
    /// Per-semaphore state; only filled for single-object queries
    pub elements: Vec<SemElement>,
}

/// Kernel limits for shared memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShmLimits {
    /// Max total shared memory, in pages
    pub shmall: u64,
    /// Max segment size, in bytes
    pub shmmax: u64,
    /// Max number of segments
    pub shmmni: u64,
}

/// Kernel limits for message queues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgLimits {
    pub msgmni: u64,
    pub msgmax: u64,
    pub msgmnb: u64,
}

/// Kernel limits for semaphores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemLimits {
    /// Max semaphores per set
    pub semmsl: u64,
    /// Max semaphores system wide
    pub semmns: u64,
    /// Max operations per semop call
    pub semopm: u64,
    /// Max number of sets
    pub semmni: u64,
}
