mod indicator;
mod list;
mod status_bar;

pub use indicator::IndicatorWidget;
pub use list::ListWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split the screen into the list area and the one-row status bar
pub fn main_layout(size: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);
    (chunks[0], chunks[1])
}
