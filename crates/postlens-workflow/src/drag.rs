//! Drag-state tracking over a drop zone and its descendants.
//!
//! Every nested child fires its own enter/leave pair, so a plain boolean
//! flickers off whenever the pointer crosses into a child. Counting the net
//! number of enters avoids that.

use tracing::debug;

/// Net count of drag-enter minus drag-leave events, clamped at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragCounter {
    depth: u32,
}

impl DragCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a drag is now in progress.
    pub fn on_enter(&mut self) -> bool {
        self.depth = self.depth.saturating_add(1);
        self.is_dragging()
    }

    /// Returns whether a drag is still in progress.
    ///
    /// A leave without a matching enter (missed event) leaves the count at zero.
    pub fn on_leave(&mut self) -> bool {
        match self.depth.checked_sub(1) {
            Some(depth) => self.depth = depth,
            None => debug!("Drag leave without a matching enter; ignoring"),
        }
        self.is_dragging()
    }

    pub fn on_drop(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn is_dragging(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}
