//! Multi-row selection for bulk copy and bulk delete.
//!
//! Selection is armed by a double-click (admins only), after which single
//! clicks toggle rows until the selection is reset. Transitions consume the
//! current state and return the next one.

use std::collections::HashSet;

use crate::domain::types::EntryId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Selection mode is off.
    #[default]
    Idle,
    /// Entered by a double-click; exactly the double-clicked row is selected.
    Armed(EntryId),
    /// Selection mode after the first toggle. May be empty.
    Active(Vec<EntryId>),
}

impl Selection {
    pub fn is_selection_mode(&self) -> bool {
        !matches!(self, Selection::Idle)
    }

    /// Selected ids in the order they were picked.
    pub fn selected(&self) -> &[EntryId] {
        match self {
            Selection::Idle => &[],
            Selection::Armed(id) => std::slice::from_ref(id),
            Selection::Active(ids) => ids,
        }
    }

    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected().contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().is_empty()
    }

    /// Arms selection on `id`. Only admins may arm, and only once.
    #[must_use]
    pub fn double_click(self, id: &EntryId, is_admin: bool) -> Self {
        match self {
            Selection::Idle if is_admin => Selection::Armed(id.clone()),
            other => other,
        }
    }

    /// Toggles `id` while in selection mode.
    #[must_use]
    pub fn click(self, id: &EntryId, is_admin: bool) -> Self {
        if !is_admin {
            return self;
        }
        match self {
            Selection::Idle => Selection::Idle,
            Selection::Armed(armed) => Selection::Active(toggle(vec![armed], id)),
            Selection::Active(ids) => Selection::Active(toggle(ids, id)),
        }
    }

    /// Replaces the selection with the currently visible rows.
    #[must_use]
    pub fn select_all<'a, I>(self, visible: I, is_admin: bool) -> Self
    where
        I: IntoIterator<Item = &'a EntryId>,
    {
        if !is_admin || !self.is_selection_mode() {
            return self;
        }
        Selection::Active(visible.into_iter().cloned().collect())
    }

    /// Leaves selection mode and clears the selected ids.
    #[must_use]
    pub fn reset(self) -> Self {
        Selection::Idle
    }

    /// Drops ids that were deleted, staying in selection mode.
    #[must_use]
    pub fn forget(self, deleted: &[EntryId]) -> Self {
        let deleted: HashSet<&EntryId> = deleted.iter().collect();
        self.retain(|id| !deleted.contains(id))
    }

    /// Keeps only the ids for which `known` holds, e.g. after a refresh.
    #[must_use]
    pub fn retain<F>(self, known: F) -> Self
    where
        F: Fn(&EntryId) -> bool,
    {
        match self {
            Selection::Idle => Selection::Idle,
            Selection::Armed(id) if known(&id) => Selection::Armed(id),
            Selection::Armed(_) => Selection::Active(Vec::new()),
            Selection::Active(ids) => {
                Selection::Active(ids.into_iter().filter(|id| known(id)).collect())
            }
        }
    }
}

fn toggle(mut ids: Vec<EntryId>, id: &EntryId) -> Vec<EntryId> {
    match ids.iter().position(|known| known == id) {
        Some(position) => {
            ids.remove(position);
        }
        None => ids.push(id.clone()),
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> EntryId {
        EntryId::new(value).unwrap()
    }

    #[test]
    fn double_click_arms_for_admin_only() {
        let idle = Selection::default();
        assert_eq!(idle.clone().double_click(&id("a"), false), Selection::Idle);

        let armed = idle.double_click(&id("a"), true);
        assert_eq!(armed, Selection::Armed(id("a")));
        assert!(armed.is_selection_mode());
        assert_eq!(armed.selected(), &[id("a")]);
    }

    #[test]
    fn double_click_does_not_rearm() {
        let armed = Selection::Idle.double_click(&id("a"), true);
        assert_eq!(
            armed.clone().double_click(&id("b"), true),
            Selection::Armed(id("a"))
        );

        let active = armed.click(&id("b"), true);
        assert_eq!(active.clone().double_click(&id("c"), true), active);
    }

    #[test]
    fn click_toggles_only_in_selection_mode() {
        assert_eq!(Selection::Idle.click(&id("a"), true), Selection::Idle);

        let selection = Selection::Idle
            .double_click(&id("a"), true)
            .click(&id("b"), true)
            .click(&id("c"), true)
            .click(&id("a"), true);

        assert_eq!(selection.selected(), &[id("b"), id("c")]);

        let emptied = selection.click(&id("b"), true).click(&id("c"), true);
        assert!(emptied.is_selection_mode());
        assert!(emptied.is_empty());
    }

    #[test]
    fn click_by_non_admin_is_ignored() {
        let armed = Selection::Idle.double_click(&id("a"), true);
        assert_eq!(armed.clone().click(&id("b"), false), armed);
    }

    #[test]
    fn select_all_uses_visible_rows() {
        let visible = [id("b"), id("d")];

        assert_eq!(
            Selection::Idle.select_all(visible.iter(), true),
            Selection::Idle
        );

        let selection = Selection::Idle
            .double_click(&id("a"), true)
            .select_all(visible.iter(), true);
        assert_eq!(selection.selected(), &visible);
    }

    #[test]
    fn forget_removes_deleted_ids() {
        let selection = Selection::Idle
            .double_click(&id("a"), true)
            .click(&id("b"), true)
            .forget(&[id("a")]);
        assert_eq!(selection, Selection::Active(vec![id("b")]));

        let armed = Selection::Idle.double_click(&id("a"), true).forget(&[id("a")]);
        assert_eq!(armed, Selection::Active(Vec::new()));
    }

    #[test]
    fn reset_returns_to_idle() {
        let selection = Selection::Idle.double_click(&id("a"), true).reset();
        assert_eq!(selection, Selection::Idle);
        assert!(!selection.is_selection_mode());
    }
}
