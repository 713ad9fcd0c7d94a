//! Row selection for the list controller.

use std::collections::BTreeSet;

/// Identifiers currently checked in a list.
///
/// The list controller keeps this a subset of the ids on the page it was built
/// from: it is cleared when the page changes and pruned when a refresh returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<Id: Ord> {
    ids: BTreeSet<Id>,
}

impl<Id: Ord> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `id` and returns whether it is now selected.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn set(&mut self, id: Id, selected: bool) {
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Replaces the selection with exactly `ids`.
    pub fn select_exactly(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.ids = ids.into_iter().collect();
    }

    /// Drops every id not in `allowed`.
    pub fn retain_within<'a>(&mut self, allowed: impl IntoIterator<Item = &'a Id>)
    where
        Id: 'a,
    {
        let allowed: BTreeSet<&Id> = allowed.into_iter().collect();
        self.ids.retain(|id| allowed.contains(id));
    }

    pub fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a Id>)
    where
        Id: 'a,
    {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(3u32));
        assert!(selection.contains(&3));
        assert!(!selection.toggle(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_within_prunes_foreign_ids() {
        let mut selection = SelectionSet::new();
        selection.select_exactly([1u32, 2, 5]);
        selection.retain_within(&[2, 5, 9]);
        assert_eq!(selection.iter().copied().collect::<Vec<_>>(), vec![2, 5]);

        selection.remove_all(&[5]);
        assert_eq!(selection.len(), 1);
    }
}
