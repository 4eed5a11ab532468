//! Call-tracking counters shown on the admin summary cards.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::entry::Entry;
use crate::domain::types::{EntryStatus, TypeConstraintError};

/// Summary card the user can click to narrow the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SummaryCategory {
    /// Every lead; overrides the status dropdown.
    Total,
    /// "Interested".
    Hot,
    /// "Maybe".
    Warm,
    /// "Not Interested".
    Cold,
}

impl SummaryCategory {
    /// Status the card stands for, `None` for [`SummaryCategory::Total`].
    pub fn status(self) -> Option<EntryStatus> {
        match self {
            SummaryCategory::Total => None,
            SummaryCategory::Hot => Some(EntryStatus::Interested),
            SummaryCategory::Warm => Some(EntryStatus::Maybe),
            SummaryCategory::Cold => Some(EntryStatus::NotInterested),
        }
    }
}

impl FromStr for SummaryCategory {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "total" => Ok(SummaryCategory::Total),
            "hot" | "interested" => Ok(SummaryCategory::Hot),
            "warm" | "maybe" => Ok(SummaryCategory::Warm),
            "cold" | "not interested" => Ok(SummaryCategory::Cold),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "summary category {other}"
            ))),
        }
    }
}

impl Display for SummaryCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SummaryCategory::Total => "Total Leads",
            SummaryCategory::Hot => "Hot Calls",
            SummaryCategory::Warm => "Warm Calls",
            SummaryCategory::Cold => "Cold Calls",
        };
        f.write_str(label)
    }
}

/// Counts of leads per call temperature.
///
/// `total` is the unclassified bucket: entries whose status is unset or not
/// one of the three known values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CallStats {
    pub cold: usize,
    pub warm: usize,
    pub hot: usize,
    pub total: usize,
}

impl CallStats {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut stats = entries
            .iter()
            .fold(CallStats::default(), |mut stats, entry| {
                match entry.status {
                    EntryStatus::NotInterested => stats.cold += 1,
                    EntryStatus::Maybe => stats.warm += 1,
                    EntryStatus::Interested => stats.hot += 1,
                    _ => {}
                }
                stats
            });
        stats.total = entries.len() - (stats.cold + stats.warm + stats.hot);
        stats
    }

    /// Count shown on the card for `category`.
    pub fn count(&self, category: SummaryCategory) -> usize {
        match category {
            SummaryCategory::Total => self.total,
            SummaryCategory::Hot => self.hot,
            SummaryCategory::Warm => self.warm,
            SummaryCategory::Cold => self.cold,
        }
    }
}
