//! The column catalog.
//!
//! Every output column has exactly one [`ColumnId`]. Columns are grouped by
//! [`Category`]: generic columns apply to every IPC family, the others only to
//! their own family or to the `--global` summary.

use serde::{Deserialize, Serialize};

use crate::error::IpcError;
use crate::options::Resource;

/// Column family a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Generic,
    Msg,
    Shm,
    Sem,
    Summary,
}

impl Category {
    /// Heading used when listing the columns of this family.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Generic => "Generic columns",
            Category::Msg => "Message queues columns (--queues)",
            Category::Shm => "Shared memory columns (--shmems)",
            Category::Sem => "Semaphores columns (--semaphores)",
            Category::Summary => "Summary columns (--global)",
        }
    }
}

impl From<Resource> for Category {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Msg => Category::Msg,
            Resource::Shm => Category::Shm,
            Resource::Sem => Category::Sem,
        }
    }
}

/// Rendering hints attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnFlags {
    /// Right-align cells
    pub right: bool,
    /// May be shortened to fit the terminal
    pub trunc: bool,
    /// Ignore unusually wide cells when sizing the column
    pub no_extremes: bool,
}

impl ColumnFlags {
    const NONE: ColumnFlags = ColumnFlags {
        right: false,
        trunc: false,
        no_extremes: false,
    };
    const RIGHT: ColumnFlags = ColumnFlags {
        right: true,
        ..Self::NONE
    };
    const TRUNC: ColumnFlags = ColumnFlags {
        trunc: true,
        ..Self::NONE
    };
    const NOEXTREMES: ColumnFlags = ColumnFlags {
        no_extremes: true,
        ..Self::NONE
    };
}

/// Static description of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDesc {
    /// Name used on the command line and in headers
    pub name: &'static str,
    /// One-line help text
    pub help: &'static str,
    /// Label used by the single-object detail view
    pub pretty_name: &'static str,
    /// Width hint; `0.0` means no preference
    pub whint: f64,
    pub flags: ColumnFlags,
}

const fn desc(
    name: &'static str,
    help: &'static str,
    pretty_name: &'static str,
    whint: f64,
    flags: ColumnFlags,
) -> ColumnDesc {
    ColumnDesc {
        name,
        help,
        pretty_name,
        whint,
        flags,
    }
}

/// Identity of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    // generic
    Key,
    Id,
    Owner,
    Perms,
    Cuid,
    Cgid,
    Uid,
    Gid,
    Ctime,
    // message queues
    UsedBytes,
    Msgs,
    Send,
    Recv,
    Lspid,
    Lrpid,
    // shared memory
    Size,
    Nattch,
    Status,
    Attach,
    Detach,
    Command,
    Cpid,
    Lpid,
    // semaphores
    Nsems,
    Otime,
    // summary
    Resource,
    Desc,
    Used,
    Limit,
}

impl ColumnId {
    /// Every column, in catalog order.
    pub const ALL: [ColumnId; 29] = [
        ColumnId::Key,
        ColumnId::Id,
        ColumnId::Owner,
        ColumnId::Perms,
        ColumnId::Cuid,
        ColumnId::Cgid,
        ColumnId::Uid,
        ColumnId::Gid,
        ColumnId::Ctime,
        ColumnId::UsedBytes,
        ColumnId::Msgs,
        ColumnId::Send,
        ColumnId::Recv,
        ColumnId::Lspid,
        ColumnId::Lrpid,
        ColumnId::Size,
        ColumnId::Nattch,
        ColumnId::Status,
        ColumnId::Attach,
        ColumnId::Detach,
        ColumnId::Command,
        ColumnId::Cpid,
        ColumnId::Lpid,
        ColumnId::Nsems,
        ColumnId::Otime,
        ColumnId::Resource,
        ColumnId::Desc,
        ColumnId::Used,
        ColumnId::Limit,
    ];

    pub fn category(&self) -> Category {
        use ColumnId::*;
        match self {
            Key | Id | Owner | Perms | Cuid | Cgid | Uid | Gid | Ctime => Category::Generic,
            UsedBytes | Msgs | Send | Recv | Lspid | Lrpid => Category::Msg,
            Size | Nattch | Status | Attach | Detach | Command | Cpid | Lpid => Category::Shm,
            Nsems | Otime => Category::Sem,
            Resource | Desc | Used | Limit => Category::Summary,
        }
    }

    pub fn is_generic(&self) -> bool {
        self.category() == Category::Generic
    }

    pub fn desc(&self) -> &'static ColumnDesc {
        use ColumnId::*;
        const R: ColumnFlags = ColumnFlags::RIGHT;
        const N: ColumnFlags = ColumnFlags::NONE;

        static KEY: ColumnDesc = desc("KEY", "Resource key", "Key", 1.0, N);
        static ID: ColumnDesc = desc("ID", "Resource ID", "ID", 1.0, N);
        static OWNER: ColumnDesc = desc("OWNER", "Owner", "Owner", 1.0, R);
        static PERMS: ColumnDesc = desc("PERMS", "Permissions", "Permissions", 1.0, R);
        static CUID: ColumnDesc = desc("CUID", "Creator UID", "CUID", 1.0, R);
        static CGID: ColumnDesc = desc("CGID", "Creator GID", "CGID", 1.0, R);
        static UID: ColumnDesc = desc("UID", "User ID", "UID", 1.0, R);
        static GID: ColumnDesc = desc("GID", "Group ID", "GID", 1.0, R);
        static CTIME: ColumnDesc = desc("CTIME", "Time of the last change", "Last change", 1.0, R);

        static USEDBYTES: ColumnDesc = desc("USEDBYTES", "Bytes used", "Bytes used", 1.0, R);
        static MSGS: ColumnDesc = desc("MSGS", "Number of messages", "Messages", 1.0, N);
        static SEND: ColumnDesc = desc("SEND", "Time of last msg sent", "Msg sent", 1.0, R);
        static RECV: ColumnDesc =
            desc("RECV", "Time of last msg received", "Msg received", 1.0, R);
        static LSPID: ColumnDesc =
            desc("LSPID", "PID of the last msg sender", "Msg sender", 1.0, R);
        static LRPID: ColumnDesc =
            desc("LRPID", "PID of the last msg receiver", "Msg receiver", 1.0, R);

        static SIZE: ColumnDesc = desc("SIZE", "Segment size", "Segment size", 1.0, R);
        static NATTCH: ColumnDesc = desc(
            "NATTCH",
            "Number of attached processes",
            "Attached processes",
            1.0,
            R,
        );
        static STATUS: ColumnDesc =
            desc("STATUS", "Status", "Status", 1.0, ColumnFlags::NOEXTREMES);
        static ATTACH: ColumnDesc = desc("ATTACH", "Attach time", "Attach time", 1.0, R);
        static DETACH: ColumnDesc = desc("DETACH", "Detach time", "Detach time", 1.0, R);
        static COMMAND: ColumnDesc = desc(
            "COMMAND",
            "Creator command line",
            "Creator command",
            0.0,
            ColumnFlags::TRUNC,
        );
        static CPID: ColumnDesc = desc("CPID", "PID of the creator", "Creator PID", 1.0, R);
        static LPID: ColumnDesc = desc("LPID", "PID of last user", "Last user PID", 1.0, R);

        static NSEMS: ColumnDesc = desc("NSEMS", "Number of semaphores", "Semaphores", 1.0, R);
        static OTIME: ColumnDesc =
            desc("OTIME", "Time of the last operation", "Last operation", 1.0, R);

        static RESOURCE: ColumnDesc = desc("RESOURCE", "Resource name", "Resource", 1.0, N);
        static DESC: ColumnDesc =
            desc("DESCRIPTION", "Resource description", "Description", 1.0, N);
        static USED: ColumnDesc = desc("USED", "Currently used", "Used", 1.0, R);
        static LIMIT: ColumnDesc = desc("LIMIT", "System-wide limit", "Limit", 1.0, R);

        match self {
            Key => &KEY,
            Id => &ID,
            Owner => &OWNER,
            Perms => &PERMS,
            Cuid => &CUID,
            Cgid => &CGID,
            Uid => &UID,
            Gid => &GID,
            Ctime => &CTIME,
            UsedBytes => &USEDBYTES,
            Msgs => &MSGS,
            Send => &SEND,
            Recv => &RECV,
            Lspid => &LSPID,
            Lrpid => &LRPID,
            Size => &SIZE,
            Nattch => &NATTCH,
            Status => &STATUS,
            Attach => &ATTACH,
            Detach => &DETACH,
            Command => &COMMAND,
            Cpid => &CPID,
            Lpid => &LPID,
            Nsems => &NSEMS,
            Otime => &OTIME,
            Resource => &RESOURCE,
            Desc => &DESC,
            Used => &USED,
            Limit => &LIMIT,
        }
    }

    pub fn name(&self) -> &'static str {
        self.desc().name
    }

    /// Columns of one family, in catalog order.
    pub fn in_category(category: Category) -> impl Iterator<Item = ColumnId> {
        Self::ALL
            .into_iter()
            .filter(move |column| column.category() == category)
    }
}

/// Upper bound on the length of a column selection.
pub const MAX_COLUMNS: usize = ColumnId::ALL.len() * 2;

/// The set of resource-specific columns that may be requested.
///
/// Generic columns are always legal; any other column only when its
/// category is the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalRange {
    active: Category,
}

impl LegalRange {
    pub fn new(active: Category) -> Self {
        Self { active }
    }

    /// Range for a run: the summary columns in global mode, otherwise the
    /// columns of the requested family.
    pub fn for_run(resource: Option<Resource>, global: bool) -> Self {
        match (global, resource) {
            (false, Some(resource)) => Self::new(resource.into()),
            _ => Self::new(Category::Summary),
        }
    }

    pub fn active(&self) -> Category {
        self.active
    }

    pub fn contains(&self, column: ColumnId) -> bool {
        column.is_generic() || column.category() == self.active
    }

    /// Resolve a column name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Result<ColumnId, IpcError> {
        let column = lookup(name).ok_or_else(|| IpcError::UnknownColumn(name.to_string()))?;
        if self.contains(column) {
            Ok(column)
        } else {
            Err(IpcError::ColumnNotApplicable(name.to_string()))
        }
    }
}

/// Find a column by name regardless of legality.
pub fn lookup(name: &str) -> Option<ColumnId> {
    ColumnId::ALL
        .into_iter()
        .find(|column| column.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGES: [Category; 4] = [
        Category::Msg,
        Category::Shm,
        Category::Sem,
        Category::Summary,
    ];

    #[test]
    fn test_catalog_names_are_unique() {
        for (i, a) in ColumnId::ALL.iter().enumerate() {
            for b in &ColumnId::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        for column in ColumnId::ALL {
            let name = column.name();
            assert_eq!(lookup(name), Some(column));
            assert_eq!(lookup(&name.to_lowercase()), Some(column));
            assert_eq!(lookup(&name.to_lowercase()), lookup(name));
        }
        assert_eq!(lookup("Description"), Some(ColumnId::Desc));
    }

    #[test]
    fn test_lookup_requires_exact_match() {
        assert_eq!(lookup("KE"), None);
        assert_eq!(lookup("KEYS"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_unknown_column() {
        let range = LegalRange::new(Category::Shm);
        let err = range.resolve("BOGUS").unwrap_err();
        assert!(matches!(err, IpcError::UnknownColumn(n) if n == "BOGUS"));
        assert_eq!(
            range.resolve("nope").unwrap_err().to_string(),
            "unknown column: nope"
        );
    }

    #[test]
    fn test_generic_columns_legal_everywhere() {
        for active in RANGES {
            let range = LegalRange::new(active);
            for column in ColumnId::in_category(Category::Generic) {
                assert_eq!(range.resolve(column.name()).unwrap(), column);
            }
        }
    }

    #[test]
    fn test_specific_columns_outside_range() {
        for active in RANGES {
            let range = LegalRange::new(active);
            for column in ColumnId::ALL {
                let result = range.resolve(column.name());
                if column.is_generic() || column.category() == active {
                    assert_eq!(result.unwrap(), column);
                } else {
                    assert!(matches!(result, Err(IpcError::ColumnNotApplicable(_))));
                }
            }
        }
    }

    #[test]
    fn test_not_applicable_message() {
        let range = LegalRange::new(Category::Msg);
        assert_eq!(
            range.resolve("size").unwrap_err().to_string(),
            "column size does not apply to the specified IPC"
        );
    }

    #[test]
    fn test_range_for_run() {
        assert_eq!(
            LegalRange::for_run(Some(Resource::Sem), false).active(),
            Category::Sem
        );
        assert_eq!(
            LegalRange::for_run(Some(Resource::Sem), true).active(),
            Category::Summary
        );
        assert_eq!(LegalRange::for_run(None, true).active(), Category::Summary);
    }

    #[test]
    fn test_category_partition() {
        assert_eq!(ColumnId::in_category(Category::Generic).count(), 9);
        assert_eq!(ColumnId::in_category(Category::Msg).count(), 6);
        assert_eq!(ColumnId::in_category(Category::Shm).count(), 8);
        assert_eq!(ColumnId::in_category(Category::Sem).count(), 2);
        assert_eq!(ColumnId::in_category(Category::Summary).count(), 4);
        assert_eq!(MAX_COLUMNS, 58);
    }

    #[test]
    fn test_flags() {
        assert!(ColumnId::Command.desc().flags.trunc);
        assert_eq!(ColumnId::Command.desc().whint, 0.0);
        assert!(ColumnId::Status.desc().flags.no_extremes);
        assert!(ColumnId::Size.desc().flags.right);
        assert!(!ColumnId::Key.desc().flags.right);
    }
}
