use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::RowBatch;


/// Presentation style of a list surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    #[default]
    Plain,
    Grouped,
    InsetGrouped,
}

/// A view that renders the rows of a [`ListBinder`](crate::ListBinder).
///
/// All calls happen on the thread that owns the binder.
pub trait ListSurface: 'static {
    fn with_style(style: ListStyle) -> Self
    where
        Self: Sized;

    fn style(&self) -> ListStyle;

    /// Discards all rows and shows `row_count` rows without animation.
    fn reload_data(&mut self, row_count: usize);

    /// Applies `batch` as a single transaction: all deletions, then all insertions.
    /// No intermediate state may be rendered.
    fn apply_batch(&mut self, batch: &RowBatch);
}

/// A surface that renders nothing and records what it was asked to do.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    style: ListStyle,
    rows: usize,
    reloads: usize,
    batches: Vec<RowBatch>,
    inconsistent_batches: usize,
}
impl HeadlessSurface {
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn reload_count(&self) -> usize {
        self.reloads
    }
    pub fn batches(&self) -> &[RowBatch] {
        &self.batches
    }
    pub fn inconsistent_batches(&self) -> usize {
        self.inconsistent_batches
    }
}
impl ListSurface for HeadlessSurface {
    fn with_style(style: ListStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }
    fn style(&self) -> ListStyle {
        self.style
    }
    fn reload_data(&mut self, row_count: usize) {
        self.rows = row_count;
        self.reloads += 1;
    }
    fn apply_batch(&mut self, batch: &RowBatch) {
        if batch.rows_before != self.rows || !batch.is_consistent() {
            tracing::error!(
                rows = self.rows,
                rows_before = batch.rows_before,
                rows_after = batch.rows_after,
                deleted = batch.deletions.len(),
                inserted = batch.insertions.len(),
                "inconsistent row batch"
            );
            self.inconsistent_batches += 1;
        }
        self.rows = batch.rows_after;
        self.batches.push(batch.clone());
    }
}
