//! `/proc` backed implementation of the data-source collaborators.
//!
//! The kernel publishes every live IPC object as one line of
//! `/proc/sysvipc/{shm,msg,sem}` and the limits as single values under
//! `/proc/sys/kernel`. Per-semaphore state has no procfs representation and is
//! probed with `semctl(2)`.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use procfs::process::Process;

use super::records::{
    IpcPerm, MsgLimits, MsgRecord, SemElement, SemLimits, SemRecord, ShmLimits, ShmRecord,
};
use super::source::{IpcSelector, IpcSource, ProcessLookup};
use crate::error::IpcError;
use crate::Result;

/// Default procfs mount point
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Reads IPC state from a procfs tree.
#[derive(Debug, Clone)]
pub struct ProcIpcSource {
    root: PathBuf,
}

impl Default for ProcIpcSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcIpcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sysvipc(&self, name: &str) -> PathBuf {
        self.root.join("sysvipc").join(name)
    }

    fn kernel(&self, name: &str) -> PathBuf {
        self.root.join("sys").join("kernel").join(name)
    }

    /// Read a sysvipc table, keeping the lines `parse` accepts.
    fn read_table<T>(
        &self,
        name: &str,
        selector: IpcSelector,
        parse: impl Fn(&Fields) -> std::result::Result<T, String>,
        id_of: impl Fn(&T) -> i32,
    ) -> Result<Vec<T>> {
        let path = self.sysvipc(name);
        debug!("reading {}", path.display());

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            // no sysvipc support compiled into the kernel
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(IpcError::ProcRead { path, source }),
        };

        let mut lines = content.lines();
        let header: Vec<&str> = match lines.next() {
            Some(line) => line.split_whitespace().collect(),
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (index, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 2;
            let fields = match Fields::new(&header, line) {
                Some(fields) => fields,
                None => {
                    warn!(
                        "{}:{}: expected {} fields, skipping",
                        path.display(),
                        line_no,
                        header.len()
                    );
                    continue;
                }
            };
            match parse(&fields) {
                Ok(record) if selector.matches(id_of(&record)) => records.push(record),
                Ok(_) => {}
                Err(message) => {
                    let err = IpcError::ProcParse {
                        path: path.clone(),
                        line: line_no,
                        message,
                    };
                    warn!("{err}, skipping");
                }
            }
        }
        Ok(records)
    }

    fn read_value(&self, name: &str) -> Result<u64> {
        let path = self.kernel(name);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| IpcError::ProcRead {
                path: path.clone(),
                source,
            })?;
        parse_u64(content.trim()).map_err(|message| IpcError::ProcParse {
            path,
            line: 1,
            message,
        })
    }
}

impl IpcSource for ProcIpcSource {
    fn shm_info(&self, selector: IpcSelector) -> Result<Vec<ShmRecord>> {
        self.read_table(
            "shm",
            selector,
            |f| {
                Ok(ShmRecord {
                    perm: f.perm("shmid")?,
                    segsz: f.u64("size")?,
                    nattch: f.u64("nattch")?,
                    cpid: f.u32("cpid")?,
                    lpid: f.u32("lpid")?,
                    atime: f.i64("atime")?,
                    dtime: f.i64("dtime")?,
                    ctime: f.i64("ctime")?,
                })
            },
            |r| r.perm.id,
        )
    }

    fn msg_info(&self, selector: IpcSelector) -> Result<Vec<MsgRecord>> {
        self.read_table(
            "msg",
            selector,
            |f| {
                Ok(MsgRecord {
                    perm: f.perm("msqid")?,
                    cbytes: f.u64("cbytes")?,
                    qnum: f.u64("qnum")?,
                    lspid: f.u32("lspid")?,
                    lrpid: f.u32("lrpid")?,
                    stime: f.i64("stime")?,
                    rtime: f.i64("rtime")?,
                    ctime: f.i64("ctime")?,
                })
            },
            |r| r.perm.id,
        )
    }

    fn sem_info(&self, selector: IpcSelector) -> Result<Vec<SemRecord>> {
        let mut records = self.read_table(
            "sem",
            selector,
            |f| {
                Ok(SemRecord {
                    perm: f.perm("semid")?,
                    nsems: f.u64("nsems")?,
                    otime: f.i64("otime")?,
                    ctime: f.i64("ctime")?,
                    elements: Vec::new(),
                })
            },
            |r| r.perm.id,
        )?;

        if let IpcSelector::Id(_) = selector {
            for record in &mut records {
                match sem_elements(record.perm.id, record.nsems) {
                    Ok(elements) => record.elements = elements,
                    Err(e) => warn!("semctl on semaphore set {} failed: {e}", record.perm.id),
                }
            }
        }
        Ok(records)
    }

    fn shm_limits(&self) -> Result<ShmLimits> {
        Ok(ShmLimits {
            shmall: self.read_value("shmall")?,
            shmmax: self.read_value("shmmax")?,
            shmmni: self.read_value("shmmni")?,
        })
    }

    fn msg_limits(&self) -> Result<MsgLimits> {
        Ok(MsgLimits {
            msgmni: self.read_value("msgmni")?,
            msgmax: self.read_value("msgmax")?,
            msgmnb: self.read_value("msgmnb")?,
        })
    }

    fn sem_limits(&self) -> Result<SemLimits> {
        let path = self.kernel("sem");
        let content = std::fs::read_to_string(&path).map_err(|source| IpcError::ProcRead {
            path: path.clone(),
            source,
        })?;
        let values = content
            .split_whitespace()
            .map(parse_u64)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| IpcError::ProcParse {
                path: path.clone(),
                line: 1,
                message,
            })?;

        match values.as_slice() {
            [semmsl, semmns, semopm, semmni] => Ok(SemLimits {
                semmsl: *semmsl,
                semmns: *semmns,
                semopm: *semopm,
                semmni: *semmni,
            }),
            _ => Err(IpcError::ProcParse {
                path,
                line: 1,
                message: format!("expected 4 values, found {}", values.len()),
            }),
        }
    }

    fn page_size(&self) -> u64 {
        procfs::page_size()
    }
}

/// One data line of a sysvipc table, addressable by header name.
struct Fields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    fn new(header: &[&'a str], line: &'a str) -> Option<Self> {
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != header.len() {
            return None;
        }
        Some(Self {
            values: header.iter().copied().zip(values).collect(),
        })
    }

    fn raw(&self, name: &str) -> std::result::Result<&'a str, String> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| format!("missing field '{name}'"))
    }

    fn u64(&self, name: &str) -> std::result::Result<u64, String> {
        parse_u64(self.raw(name)?)
    }

    fn u32(&self, name: &str) -> std::result::Result<u32, String> {
        let raw = self.raw(name)?;
        raw.parse()
            .map_err(|_| format!("invalid value '{raw}' for '{name}'"))
    }

    fn i64(&self, name: &str) -> std::result::Result<i64, String> {
        let raw = self.raw(name)?;
        raw.parse()
            .map_err(|_| format!("invalid value '{raw}' for '{name}'"))
    }

    fn perm(&self, id_field: &str) -> std::result::Result<IpcPerm, String> {
        let perms = self.raw("perms")?;
        Ok(IpcPerm {
            // printed signed, but keys are really 32-bit patterns
            key: self.i64("key")? as i32,
            id: self.i64(id_field)? as i32,
            mode: u32::from_str_radix(perms, 8)
                .map_err(|_| format!("invalid permissions '{perms}'"))?,
            uid: self.u32("uid")?,
            gid: self.u32("gid")?,
            cuid: self.u32("cuid")?,
            cgid: self.u32("cgid")?,
        })
    }
}

fn parse_u64(raw: &str) -> std::result::Result<u64, String> {
    raw.parse().map_err(|_| format!("invalid number '{raw}'"))
}

/// Probe every semaphore of a set.
fn sem_elements(semid: i32, nsems: u64) -> std::io::Result<Vec<SemElement>> {
    let probe = |semnum: libc::c_int, cmd: libc::c_int| -> std::io::Result<i32> {
        // SAFETY: GETVAL, GETNCNT, GETZCNT and GETPID read a value and take no
        // fourth argument.
        let rc = unsafe { libc::semctl(semid, semnum, cmd) };
        if rc < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(rc)
        }
    };

    let count = libc::c_int::try_from(nsems).unwrap_or(libc::c_int::MAX);
    (0..count)
        .map(|semnum| {
            Ok(SemElement {
                value: probe(semnum, libc::GETVAL)?,
                ncount: probe(semnum, libc::GETNCNT)?,
                zcount: probe(semnum, libc::GETZCNT)?,
                pid: probe(semnum, libc::GETPID)?,
            })
        })
        .collect()
}

/// Looks up creator commands in a procfs tree.
#[derive(Debug, Clone)]
pub struct ProcfsProcessLookup {
    root: PathBuf,
}

impl Default for ProcfsProcessLookup {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcfsProcessLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProcessLookup for ProcfsProcessLookup {
    fn command(&self, pid: u32) -> String {
        if pid == 0 {
            return String::new();
        }
        let Ok(process) = Process::new_with_root(self.root.join(pid.to_string())) else {
            return String::new();
        };
        match process.cmdline() {
            Ok(args) if !args.is_empty() => args.join(" "),
            // kernel threads have no command line
            _ => process
                .stat()
                .map(|stat| format!("[{}]", stat.comm))
                .unwrap_or_default(),
        }
    }
}
