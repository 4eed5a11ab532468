//! Multi-criteria filtering of the entry list.
//!
//! Filtering is a pure function of the entry list and a [`FilterState`]; the
//! [`FilterCache`] memoises the result on the store revision and the state so
//! that repeated renders do not rescan thousands of rows.

use chrono::{DateTime, NaiveDate, Utc};

use crate::dashboard::store::EntryStore;
use crate::dashboard::summary::SummaryCategory;
use crate::domain::entry::Entry;
use crate::domain::types::EntryStatus;

/// Inclusive range of calendar days (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they were given out of order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.start <= day && day <= self.end
    }
}

/// Everything that narrows the dashboard table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Debounced search text.
    pub search_term: String,
    /// Status dropdown selection.
    pub status: Option<EntryStatus>,
    /// Summary card selection layered over the dropdown.
    pub shortcut: Option<SummaryCategory>,
    pub state: String,
    pub city: String,
    pub date_range: Option<DateRange>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: None,
            shortcut: Some(SummaryCategory::Total),
            state: String::new(),
            city: String::new(),
            date_range: None,
        }
    }
}

impl FilterState {
    /// Picking a status from the dropdown drops the summary shortcut.
    pub fn select_status(&mut self, status: Option<EntryStatus>) {
        self.status = status.filter(|status| !status.is_unset());
        self.shortcut = None;
    }

    /// Clicking a summary card sets both the shortcut and the dropdown.
    pub fn select_category(&mut self, category: SummaryCategory) {
        self.shortcut = Some(category);
        self.status = category.status();
    }

    /// Choosing a state resets the city, which belongs to the previous state.
    pub fn select_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
        self.city.clear();
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `entry` satisfies every active predicate.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.matches_search(entry)
            && self.matches_status(entry)
            && matches_exact(&self.state, &entry.state)
            && matches_exact(&self.city, &entry.city)
            && self
                .date_range
                .is_none_or(|range| range.contains(&entry.created_at))
    }

    fn matches_search(&self, entry: &Entry) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        entry.customer_name.to_lowercase().contains(&needle)
            || entry.address.to_lowercase().contains(&needle)
            || entry.mobile_number.contains(&self.search_term)
    }

    fn matches_status(&self, entry: &Entry) -> bool {
        if self.shortcut == Some(SummaryCategory::Total) {
            return true;
        }
        self.status
            .as_ref()
            .is_none_or(|status| &entry.status == status)
    }
}

fn matches_exact(filter: &str, value: &str) -> bool {
    filter.is_empty() || filter == value
}

/// Returns the entries matching `filter`, preserving their order.
pub fn filter_entries<'a>(entries: &'a [Entry], filter: &FilterState) -> Vec<&'a Entry> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}

/// Memoised filter result keyed on `(store revision, filter state)`.
#[derive(Debug, Default)]
pub struct FilterCache {
    key: Option<(u64, FilterState)>,
    indices: Vec<usize>,
    recomputations: usize,
}

impl FilterCache {
    /// Positions in `store` of the rows matching `filter`.
    pub fn indices(&mut self, store: &EntryStore, filter: &FilterState) -> &[usize] {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(revision, cached)| *revision == store.revision() && cached == filter);

        if !fresh {
            self.indices = store
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, entry)| filter.matches(entry))
                .map(|(index, _)| index)
                .collect();
            self.key = Some((store.revision(), filter.clone()));
            self.recomputations += 1;
        }

        &self.indices
    }

    /// Matching rows in store order.
    pub fn view<'a>(&mut self, store: &'a EntryStore, filter: &FilterState) -> Vec<&'a Entry> {
        let entries = store.entries();
        self.indices(store, filter)
            .iter()
            .filter_map(|index| entries.get(*index))
            .collect()
    }

    /// How many times the filter actually ran.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
