//! Scrollable list that hosts the refresh indicator
//!
//! Content rows are the indicator strip followed by the items. A mouse drag
//! moves the content with the pointer and may pull it past the top (elastic
//! overscroll); releasing springs it back into range.

use pulldown_core::{Region, RenderLoop, ScrollHost, Viewport};
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor_row: u16,
    anchor_offset: i32,
}

#[derive(Debug, Clone)]
pub struct ScrollView {
    area: Rect,
    strip_height: u16,
    items: Vec<String>,
    /// Rows scrolled past the top; negative while overscrolled
    offset: i32,
    drag: Option<Drag>,
    animating: bool,
}

impl ScrollView {
    pub fn new(strip_height: u16, items: Vec<String>) -> Self {
        Self {
            area: Rect::default(),
            strip_height: strip_height.max(1),
            items,
            offset: 0,
            drag: None,
            animating: false,
        }
    }

    /// Record the viewport assigned by the last layout pass
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        if self.drag.is_none() {
            self.offset = self.offset.clamp(0, self.max_offset());
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_laid_out(&self) -> bool {
        self.area.height > 0
    }

    pub fn strip_height(&self) -> u16 {
        self.strip_height
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn push_front(&mut self, item: impl Into<String>) {
        self.items.insert(0, item.into());
    }

    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the indicator asked for per-frame ticks
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn content_height(&self) -> i32 {
        self.strip_height as i32 + self.items.len() as i32
    }

    /// Largest offset; the strip can always be scrolled out of view, even
    /// when the items alone fit in the viewport
    pub fn max_offset(&self) -> i32 {
        (self.content_height() - self.area.height as i32).max(self.strip_height as i32)
    }

    /// Scroll by `delta` rows (positive = down); ignored while dragging
    pub fn scroll_by(&mut self, delta: i32) {
        if self.drag.is_none() {
            self.offset = (self.offset + delta).clamp(0, self.max_offset());
        }
    }

    /// Start a drag if `(column, row)` lies inside the view
    pub fn begin_drag(&mut self, column: u16, row: u16) -> bool {
        let inside = column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height;
        if inside {
            self.drag = Some(Drag {
                anchor_row: row,
                anchor_offset: self.offset,
            });
        }
        inside
    }

    /// Follow the pointer to `row`; returns false when no drag is active.
    ///
    /// Overscroll past the top is limited to one viewport height.
    pub fn drag_to(&mut self, row: u16) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let moved = row as i32 - drag.anchor_row as i32;
        let min = -(self.area.height as i32);
        self.offset = (drag.anchor_offset - moved).clamp(min, self.max_offset());
        true
    }

    /// Finish a drag and spring back into range; returns false when no drag was active
    pub fn end_drag(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.offset = self.offset.clamp(0, self.max_offset());
        true
    }

    /// Screen row of content row `index`, if it is inside the viewport
    pub fn screen_row(&self, index: i32) -> Option<u16> {
        let y = self.area.y as i32 + index - self.offset;
        (y >= self.area.y as i32 && y < (self.area.y + self.area.height) as i32)
            .then_some(y as u16)
    }
}

impl ScrollHost for ScrollView {
    fn is_vertically_scrollable(&self) -> bool {
        true
    }

    fn indicator_index(&self) -> usize {
        0
    }

    fn indicator_y(&self) -> i32 {
        self.area.y as i32 - self.offset
    }

    fn indicator_height(&self) -> i32 {
        self.strip_height as i32
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.area.width,
            height: self.area.height,
        }
    }

    fn scroll_region_to_visible(&mut self, region: Region) {
        self.offset = region.y.clamp(0, self.max_offset());
    }
}

impl RenderLoop for ScrollView {
    fn register_animated(&mut self) {
        self.animating = true;
    }

    fn deregister_animated(&mut self) {
        self.animating = false;
    }
}
