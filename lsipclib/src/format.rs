//! Cell formatters: permissions, sizes, timestamps and shm status.

use std::cell::OnceCell;

use chrono::{DateTime, Datelike, Local};
use humansize::{format_size, FormatSizeOptions, BINARY};

use crate::data::records::{SHM_DEST, SHM_HUGETLB, SHM_LOCKED, SHM_NORESERVE};
use crate::options::TimeMode;

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stopped at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Formats kernel timestamps relative to a lazily captured "now".
pub struct TimeFormatter {
    mode: TimeMode,
    clock: Box<dyn Clock>,
    now: OnceCell<DateTime<Local>>,
}

impl TimeFormatter {
    pub fn new(mode: TimeMode, clock: Box<dyn Clock>) -> Self {
        Self {
            mode,
            clock,
            now: OnceCell::new(),
        }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    fn now(&self) -> &DateTime<Local> {
        self.now.get_or_init(|| self.clock.now())
    }

    /// Format seconds since the epoch. Zero means "never" and yields no cell.
    pub fn format(&self, secs: i64) -> Option<String> {
        if secs == 0 {
            return None;
        }
        let time = DateTime::from_timestamp(secs, 0)?.with_timezone(&Local);

        let formatted = match self.mode {
            TimeMode::Short => {
                let now = self.now();
                if time.date_naive() == now.date_naive() {
                    time.format("%H:%M")
                } else if time.year() == now.year() {
                    time.format("%b%d")
                } else {
                    time.format("%Y-%b%d")
                }
            }
            TimeMode::Full => time.format("%a %b %e %H:%M:%S %Y"),
            TimeMode::Iso => time.format("%Y-%m-%dT%H:%M:%S%z"),
        };
        Some(formatted.to_string())
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(TimeMode::default(), Box::new(SystemClock))
    }
}

/// Permission bits as octal (`0640`) or `ls` style (`-rw-r-----`).
pub fn format_perms(mode: u32, numeric: bool) -> String {
    let mode = mode & 0o777;
    if numeric {
        if mode == 0 {
            "0".to_string()
        } else {
            format!("0{:o}", mode)
        }
    } else {
        let mut out = String::with_capacity(10);
        out.push('-');
        for shift in [6, 3, 0] {
            let bits = (mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

/// Size in bytes, or scaled with a one-letter binary suffix (`4K`, `1.5M`).
pub fn format_bytes(bytes: u64, in_bytes: bool) -> String {
    if in_bytes {
        return bytes.to_string();
    }
    let options = FormatSizeOptions::from(BINARY)
        .decimal_places(1)
        .space_after_value(false);
    let human = format_size(bytes, options);
    let Some(scaled) = human.strip_suffix("iB") else {
        return human;
    };
    // values rounded up to a whole unit come back as "1024.0"
    let unit_at = scaled.len().saturating_sub(1);
    let (value, unit) = scaled.split_at(unit_at);
    format!("{}{}", value.strip_suffix(".0").unwrap_or(value), unit)
}

/// Comma-separated shared memory status flags.
pub fn format_shm_status(mode: u32) -> String {
    [
        (SHM_DEST, "dest"),
        (SHM_LOCKED, "locked"),
        (SHM_HUGETLB, "hugetlb"),
        (SHM_NORESERVE, "noreserve"),
    ]
    .iter()
    .filter(|(bit, _)| mode & bit != 0)
    .map(|(_, name)| *name)
    .collect::<Vec<_>>()
    .join(",")
}

/// IPC key as a zero-padded hex number.
pub fn format_key(key: i32) -> String {
    format!("0x{:08x}", key)
}
