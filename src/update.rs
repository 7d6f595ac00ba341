use std::{hash::Hash, iter::once};

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::{diff, BinderConfig};

#[cfg(test)]
mod tests;

/// Animation used for inserted or deleted rows.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RowAnimation {
    /// Lets the list surface choose.
    #[default]
    Automatic,
    Fade,
    Right,
    Left,
    Top,
    Bottom,
    Middle,
    None,
}

/// One step of a visual update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum RowOp {
    #[display("reload")]
    Reload,
    #[display("delete {position} ({animation})")]
    Delete {
        position: usize,
        animation: RowAnimation,
    },
    #[display("insert {position} ({animation})")]
    Insert {
        position: usize,
        animation: RowAnimation,
    },
}

/// Row deletions and insertions applied as one atomic visual transaction.
///
/// Deletions refer to positions before the change and are applied first.
/// Insertions refer to positions after the change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowBatch {
    pub deletions: Vec<usize>,
    pub delete_animation: RowAnimation,
    pub insertions: Vec<usize>,
    pub insert_animation: RowAnimation,
    pub rows_before: usize,
    pub rows_after: usize,
}
impl RowBatch {
    pub fn operations(&self) -> impl Iterator<Item = RowOp> + '_ {
        let deletes = self.deletions.iter().map(|&position| RowOp::Delete {
            position,
            animation: self.delete_animation,
        });
        let inserts = self.insertions.iter().map(|&position| RowOp::Insert {
            position,
            animation: self.insert_animation,
        });
        deletes.chain(inserts)
    }

    /// Returns `true` if the batch turns `rows_before` rows into `rows_after` rows
    /// and every position is in range.
    pub fn is_consistent(&self) -> bool {
        self.rows_before + self.insertions.len() == self.rows_after + self.deletions.len()
            && self.deletions.iter().all(|&p| p < self.rows_before)
            && self.insertions.iter().all(|&p| p < self.rows_after)
    }
}

/// The visual update issued for one observed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListUpdate {
    /// Nothing visible changed.
    None,
    /// The whole list is reloaded without animation.
    Reload,
    Batch(RowBatch),
}
impl ListUpdate {
    pub fn operations(&self) -> impl Iterator<Item = RowOp> + '_ {
        use iter_n::iter3::*;
        match self {
            ListUpdate::None => [].into_iter0(),
            ListUpdate::Reload => once(RowOp::Reload).into_iter1(),
            ListUpdate::Batch(batch) => batch.operations().into_iter2(),
        }
    }
}

/// Decides how a list showing `old` is brought to `new`.
///
/// `old` is `None` for the first observed value, which is always a reload.
/// A change in the relative order of elements kept by both snapshots is also a reload,
/// since moves are not animated.
pub fn plan_update<T: Eq + Hash>(old: Option<&[T]>, new: &[T], config: &BinderConfig) -> ListUpdate {
    let Some(old) = old else {
        return ListUpdate::Reload;
    };
    let d = diff(old, new);
    if d.is_empty() {
        return ListUpdate::None;
    }
    if !config.animate_changes || d.reordered {
        return ListUpdate::Reload;
    }
    ListUpdate::Batch(RowBatch {
        deletions: d.removed,
        delete_animation: config.delete_animation,
        insertions: d.inserted,
        insert_animation: config.insert_animation,
        rows_before: old.len(),
        rows_after: new.len(),
    })
}
