//! Binds a list view to an observed list and keeps its rows in sync.
//!
//! A [`ListBinder`] observes a [`ListState`] through a [`KeyPath`], diffs each new snapshot
//! against the previous one, and drives a [`ListSurface`] with either a full reload or a
//! single batch of row deletions followed by row insertions.

mod binder;
mod cell;
mod config;
mod core;
mod diff;
mod error;
mod event;
mod state;
mod subscription;
mod surface;
mod update;

pub use binder::*;
pub use cell::*;
pub use config::*;
pub use crate::core::Runtime;
pub use diff::*;
pub use error::*;
pub use event::*;
pub use state::*;
pub use subscription::*;
pub use surface::*;
pub use update::*;
