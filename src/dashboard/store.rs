//! In-memory list of entries backing the dashboard table.

use std::collections::HashSet;

use crate::domain::entry::Entry;
use crate::domain::types::EntryId;

/// Authoritative client-side copy of the server's entry list.
///
/// Every mutation bumps [`EntryStore::revision`] so derived views can be
/// memoised on it.
#[derive(Clone, Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    revision: u64,
}

impl EntryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            revision: 0,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole list with a freshly fetched one.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.touch();
    }

    /// Inserts a newly created entry at the top of the list.
    pub fn prepend(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
        self.touch();
    }

    /// Appends entries at the end of the list.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Entry>,
    {
        self.entries.extend(entries);
        self.touch();
    }

    /// Swaps the stored record with the same id for `entry`.
    ///
    /// Returns `false` when no record with that id is known.
    pub fn replace(&mut self, entry: Entry) -> bool {
        match self.entries.iter_mut().find(|known| known.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Drops every entry whose id is listed, returning how many were removed.
    pub fn remove_ids(&mut self, ids: &[EntryId]) -> usize {
        let doomed: HashSet<&EntryId> = ids.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|entry| !doomed.contains(&entry.id));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
