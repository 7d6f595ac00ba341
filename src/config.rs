use serde::{Deserialize, Serialize};

use crate::RowAnimation;


/// Settings read each time a [`ListBinder`](crate::ListBinder) issues a visual update.
///
/// Missing fields take their default values when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// If `false`, every change reloads the whole list instead of animating rows.
    pub animate_changes: bool,
    pub insert_animation: RowAnimation,
    pub delete_animation: RowAnimation,
}
impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            animate_changes: true,
            insert_animation: RowAnimation::Automatic,
            delete_animation: RowAnimation::Automatic,
        }
    }
}
