//! Input options for building IPC reports.
//!
//! This module contains the configuration types that control which
//! resources are reported and how their fields are formatted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::IpcError;

/// How timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeMode {
    /// `HH:MM` today, `MonDD` this year, `YYYY-MonDD` otherwise
    #[default]
    Short,
    /// Classic `asctime` layout
    Full,
    /// `YYYY-MM-DDTHH:MM:SS+HHMM`
    Iso,
}

impl FromStr for TimeMode {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(TimeMode::Short),
            "full" => Ok(TimeMode::Full),
            "iso" => Ok(TimeMode::Iso),
            _ => Err(IpcError::UnknownTimeFormat(s.to_string())),
        }
    }
}

/// One System V IPC object family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Message queues
    Msg,
    /// Shared memory segments
    Shm,
    /// Semaphore sets
    Sem,
}

/// Which resource families were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    pub msg: bool,
    pub shm: bool,
    pub sem: bool,
}

impl Resources {
    /// All three families
    pub fn all() -> Self {
        Self {
            msg: true,
            shm: true,
            sem: true,
        }
    }

    /// No family
    pub fn none() -> Self {
        Self::default()
    }

    /// Only the given family
    pub fn only(resource: Resource) -> Self {
        Self::none().with(resource)
    }

    /// Builder: add a family
    pub fn with(mut self, resource: Resource) -> Self {
        match resource {
            Resource::Msg => self.msg = true,
            Resource::Shm => self.shm = true,
            Resource::Sem => self.sem = true,
        }
        self
    }

    pub fn count(&self) -> usize {
        [self.msg, self.shm, self.sem].iter().filter(|b| **b).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Selected families in processing order: queues, segments, semaphores.
    pub fn iter(&self) -> impl Iterator<Item = Resource> {
        [
            (self.msg, Resource::Msg),
            (self.shm, Resource::Shm),
            (self.sem, Resource::Sem),
        ]
        .into_iter()
        .filter_map(|(on, resource)| on.then_some(resource))
    }

    /// The single requested family, if exactly one was requested.
    pub fn single(&self) -> Option<Resource> {
        if self.count() == 1 {
            self.iter().next()
        } else {
            None
        }
    }
}

/// Options for building a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Requested resource families
    pub resources: Resources,
    /// System-wide usage instead of per-object rows
    pub global: bool,
    /// Single object to detail; negative ids mean every object
    pub id: Option<i32>,
    /// Comma-separated column names overriding the defaults
    pub columns: Option<String>,
    /// Add creator and owner id columns to the defaults
    pub show_creator: bool,
    /// Add time columns to the defaults
    pub show_time: bool,
    /// Sizes in bytes instead of human readable units
    pub bytes: bool,
    /// Octal permissions instead of `ls` style
    pub numeric_perms: bool,
    /// Timestamp layout
    pub time_mode: TimeMode,
}

impl ReportOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a resource family
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources = self.resources.with(resource);
        self
    }

    /// Builder: set all resource families at once
    pub fn resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    /// Builder: enable global mode
    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Builder: detail a single object
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder: explicit column list
    pub fn columns(mut self, list: impl Into<String>) -> Self {
        self.columns = Some(list.into());
        self
    }

    /// Builder: show creator columns
    pub fn show_creator(mut self, show: bool) -> Self {
        self.show_creator = show;
        self
    }

    /// Builder: show time columns
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Builder: sizes in bytes
    pub fn bytes(mut self, bytes: bool) -> Self {
        self.bytes = bytes;
        self
    }

    /// Builder: numeric permissions
    pub fn numeric_perms(mut self, numeric: bool) -> Self {
        self.numeric_perms = numeric;
        self
    }

    /// Builder: timestamp layout
    pub fn time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    /// Whether the single-object detail view was requested
    pub fn is_detail(&self) -> bool {
        self.id.is_some()
    }

    /// Resource families to process, with global mode implying all of them
    /// when none was named.
    pub fn effective_resources(&self) -> Result<Resources, IpcError> {
        if self.resources.is_empty() {
            if self.global {
                Ok(Resources::all())
            } else {
                Err(IpcError::NoResourceSelected)
            }
        } else {
            Ok(self.resources)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_mode_from_str() {
        assert_eq!("short".parse::<TimeMode>().unwrap(), TimeMode::Short);
        assert_eq!("full".parse::<TimeMode>().unwrap(), TimeMode::Full);
        assert_eq!("iso".parse::<TimeMode>().unwrap(), TimeMode::Iso);
        assert!(matches!(
            "ISO".parse::<TimeMode>(),
            Err(IpcError::UnknownTimeFormat(v)) if v == "ISO"
        ));
    }

    #[test]
    fn test_resources_order() {
        let all: Vec<Resource> = Resources::all().iter().collect();
        assert_eq!(all, vec![Resource::Msg, Resource::Shm, Resource::Sem]);
        assert_eq!(Resources::only(Resource::Sem).single(), Some(Resource::Sem));
        assert_eq!(Resources::all().single(), None);
    }

    #[test]
    fn test_global_implies_all_resources() {
        let options = ReportOptions::new().global(true);
        assert_eq!(options.effective_resources().unwrap(), Resources::all());
    }

    #[test]
    fn test_global_keeps_named_resources() {
        let options = ReportOptions::new().global(true).resource(Resource::Shm);
        assert_eq!(
            options.effective_resources().unwrap(),
            Resources::only(Resource::Shm)
        );
    }

    #[test]
    fn test_no_resource_is_error() {
        let err = ReportOptions::new().effective_resources().unwrap_err();
        assert!(matches!(err, IpcError::NoResourceSelected));
    }
}
