//! DTOs describing what the dashboard shows after an operation.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::dashboard::CallStats;
use crate::domain::entry::Entry;
use crate::pagination::Paginated;

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message produced by a dashboard operation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// One page of the filtered entry table.
#[derive(Debug, Serialize)]
pub struct EntryPage {
    pub entries: Paginated<Entry>,
    /// Number of entries matching the filter across all pages.
    pub total_matching: usize,
    /// Only present for admins.
    pub stats: Option<CallStats>,
    pub selection_mode: bool,
    pub selected: usize,
}
