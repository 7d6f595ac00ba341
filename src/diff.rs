use std::{collections::HashSet, hash::Hash};


/// Differences between two snapshots of a list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListDiff {
    /// Positions in the old snapshot of elements absent from the new one, ascending.
    pub removed: Vec<usize>,
    /// Positions in the new snapshot of elements absent from the old one, ascending.
    pub inserted: Vec<usize>,
    /// `true` if the elements present in both snapshots changed their relative order.
    pub reordered: bool,
}
impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && !self.reordered
    }
}

/// Compares two snapshots by element equality.
///
/// Each snapshot must not contain the same element twice. If it does, the result is
/// unspecified.
pub fn diff<T: Eq + Hash>(old: &[T], new: &[T]) -> ListDiff {
    if old == new {
        return ListDiff::default();
    }
    let old_set: HashSet<&T> = old.iter().collect();
    let new_set: HashSet<&T> = new.iter().collect();
    let removed = old
        .iter()
        .enumerate()
        .filter(|(_, value)| !new_set.contains(value))
        .map(|(index, _)| index)
        .collect();
    let inserted = new
        .iter()
        .enumerate()
        .filter(|(_, value)| !old_set.contains(value))
        .map(|(index, _)| index)
        .collect();
    let kept_old = old.iter().filter(|value| new_set.contains(value));
    let kept_new = new.iter().filter(|value| old_set.contains(value));
    ListDiff {
        removed,
        inserted,
        reordered: !kept_old.eq(kept_new),
    }
}
