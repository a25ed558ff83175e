//! Drag-and-drop nesting counter
//!
//! Browsers fire `enter` on a child element before `leave` on its parent, so
//! a plain boolean flickers while the pointer crosses nested elements. The
//! counter tracks nesting depth instead; the drop target is active exactly
//! while it is positive.

use tracing::{debug, instrument};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DragTracker {
    level: usize,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self), fields(level = self.level))]
    pub fn on_enter(&mut self) {
        self.level += 1;
        if self.level == 1 {
            debug!("drop target active");
        }
    }

    /// Unbalanced leaves saturate at zero.
    #[instrument(level = "trace", skip(self), fields(level = self.level))]
    pub fn on_leave(&mut self) {
        if self.level == 0 {
            return;
        }
        self.level -= 1;
        if self.level == 0 {
            debug!("drop target inactive");
        }
    }

    /// Dragover only marks the target as droppable; the level is unchanged.
    pub fn on_over(&self) {}

    #[instrument(level = "trace", skip(self), fields(level = self.level))]
    pub fn on_drop(&mut self) {
        self.level = 0;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.level > 0
    }
}
