use crate::host::{Region, Viewport};

/// Decides when the indicator strip has to be scrolled in or out of view.
///
/// The strip is the first element of the host, so collapsing it means
/// scrolling the host down by exactly one strip height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityReconciler {
    resting_y: i32,
    height: i32,
}

impl VisibilityReconciler {
    pub fn new(resting_y: i32, height: i32) -> Self {
        Self { resting_y, height }
    }

    /// Some rows of the strip are on screen at `current_y`
    pub fn is_exposed(&self, current_y: i32) -> bool {
        current_y > self.resting_y - self.height && current_y <= self.resting_y
    }

    /// The strip sits exactly one height above its resting position
    pub fn is_collapsed(&self, current_y: i32) -> bool {
        current_y == self.resting_y - self.height
    }

    /// Scroll request that collapses a (partly) exposed strip
    pub fn hide(&self, current_y: i32, viewport: Viewport) -> Option<Region> {
        self.is_exposed(current_y).then(|| Region {
            x: 0,
            y: self.height,
            width: viewport.width,
            height: viewport.height,
        })
    }

    /// Scroll request that reveals a collapsed strip
    pub fn show(&self, current_y: i32, viewport: Viewport) -> Option<Region> {
        self.is_collapsed(current_y).then(|| Region {
            x: 0,
            y: 0,
            width: viewport.width,
            height: viewport.height,
        })
    }
}
