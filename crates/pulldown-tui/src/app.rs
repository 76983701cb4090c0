use std::time::Instant;

use anyhow::Result;
use pulldown_core::{AppConfig, PullDownRefresh, ScrollHost};
use ratatui::layout::Rect;

use crate::event::{PointerEvent, RefreshResult};
use crate::input::Action;
use crate::scroll_view::ScrollView;
use crate::theme::Theme;

/// Main application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    /// List hosting the refresh indicator
    pub view: ScrollView,
    pub refresher: PullDownRefresh,
    /// Status message to display
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Completed refreshes
    pub refresh_count: u32,
    attached: bool,
}

impl App {
    /// Build the application; fails when the indicator images cannot be loaded
    pub fn new(config: AppConfig, theme: Theme) -> Result<Self> {
        let refresher = PullDownRefresh::new(&config.refresh)?;
        let view = ScrollView::new(config.ui.indicator_rows, config.demo.items.clone());

        Ok(Self {
            config,
            theme,
            view,
            refresher,
            status_message: None,
            should_quit: false,
            refresh_count: 0,
            attached: false,
        })
    }

    /// Apply this frame's layout. The first pass with a non-empty area
    /// attaches the indicator and fixes its resting position.
    pub fn layout(&mut self, list_area: Rect) -> Result<()> {
        self.view.set_area(list_area);
        if !self.attached && self.view.is_laid_out() {
            self.refresher.attach(&mut self.view)?;
            self.attached = true;
        }
        Ok(())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press { column, row } => {
                self.view.begin_drag(column, row);
            }
            PointerEvent::Drag { row } => {
                if self.view.drag_to(row) {
                    let y = self.view.indicator_y();
                    self.refresher.on_drag(&mut self.view, y);
                }
            }
            PointerEvent::Release => {
                if self.view.end_drag() {
                    self.refresher.on_release(&mut self.view);
                }
            }
            PointerEvent::WheelUp => self.view.scroll_by(-1),
            PointerEvent::WheelDown => self.view.scroll_by(1),
        }
    }

    /// Apply a key action; returns true when it started a refresh that
    /// needs background work
    pub fn handle_action(&mut self, action: Action) -> bool {
        let page = (self.view.area().height as i32).max(1);
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.view.scroll_by(1),
            Action::ScrollUp => self.view.scroll_by(-1),
            Action::ScrollPageDown => self.view.scroll_by(page),
            Action::ScrollPageUp => self.view.scroll_by(-page),
            Action::JumpToTop => self.view.scroll_by(-self.view.offset()),
            Action::BeginRefresh => {
                if !self.refresher.is_refreshing() {
                    self.refresher.begin_refreshing(&mut self.view);
                    self.set_status("Refreshing...");
                    return true;
                }
            }
            Action::EndRefresh => {
                if self.refresher.is_refreshing() {
                    self.refresher.end_refreshing(&mut self.view);
                    self.set_status("Refresh cancelled");
                }
            }
            Action::None => {}
        }
        false
    }

    /// Apply the outcome of a finished refresh
    pub fn handle_refresh_result(&mut self, result: RefreshResult) {
        if !self.refresher.is_refreshing() {
            tracing::debug!("refresh result arrived after the refresh was ended");
            return;
        }
        self.refresher.end_refreshing(&mut self.view);

        self.refresh_count += 1;
        let count = result.new_items.len();
        for item in result.new_items.into_iter().rev() {
            self.view.push_front(item);
        }
        if count > 0 {
            self.set_status(format!("Refreshed: {} new items", count));
        } else {
            self.set_status("Refreshed: no new items");
        }
    }

    /// Advance the indicator animation; returns whether a redraw is needed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.refresher.tick(&mut self.view, now)
    }

    /// Poll at the animation frame rate while something moves
    pub fn needs_fast_update(&self) -> bool {
        self.view.is_animating() || self.view.is_dragging()
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Release the render loop before the terminal is restored
    pub fn shutdown(&mut self) {
        self.refresher.detach(&mut self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_core::GestureState;
    use std::sync::Arc;

    fn app(visible_when_idle: bool) -> App {
        let mut config = AppConfig::default();
        config.refresh.visible_when_idle = visible_when_idle;
        let mut app = App::new(config, Theme::default()).unwrap();
        app.layout(Rect::new(0, 0, 40, 10)).unwrap();
        app
    }

    #[test]
    fn test_first_layout_hides_strip_when_requested() {
        let app = app(false);
        assert_eq!(app.refresher.resting_y(), Some(0));
        assert_eq!(app.view.offset(), 3);
    }

    #[test]
    fn test_pull_gesture_starts_refresh() {
        let mut app = app(true);
        let requested = std::rc::Rc::new(std::cell::Cell::new(false));
        let flag = requested.clone();
        app.refresher.add_refresh_listener(move |_| flag.set(true));

        app.handle_pointer(PointerEvent::Press { column: 1, row: 1 });
        app.handle_pointer(PointerEvent::Drag { row: 6 });
        assert_eq!(app.refresher.state(), GestureState::Pulling);
        assert!(app.needs_fast_update());

        app.handle_pointer(PointerEvent::Release);
        assert!(app.refresher.is_refreshing());
        assert!(requested.get());
        assert_eq!(app.view.offset(), 0);
    }

    #[test]
    fn test_short_pull_on_hidden_strip_collapses_again() {
        let mut app = app(false);
        app.handle_pointer(PointerEvent::Press { column: 1, row: 1 });
        app.handle_pointer(PointerEvent::Drag { row: 3 });
        assert_eq!(app.refresher.state(), GestureState::Idle);

        app.handle_pointer(PointerEvent::Release);
        assert!(!app.refresher.is_refreshing());
        assert_eq!(app.view.offset(), 3);
    }

    #[test]
    fn test_programmatic_refresh_round_trip() {
        let mut app = app(false);
        assert!(app.handle_action(Action::BeginRefresh));
        assert!(!app.handle_action(Action::BeginRefresh));
        assert_eq!(app.view.offset(), 0);

        app.handle_refresh_result(RefreshResult {
            new_items: vec!["fresh".to_string()],
        });
        assert!(!app.refresher.is_refreshing());
        assert_eq!(app.view.items()[0], "fresh");
        assert_eq!(app.view.offset(), 3);
        assert_eq!(app.refresh_count, 1);
    }

    #[test]
    fn test_late_result_is_ignored() {
        let mut app = app(true);
        app.handle_action(Action::BeginRefresh);
        app.handle_action(Action::EndRefresh);
        app.handle_refresh_result(RefreshResult {
            new_items: vec!["late".to_string()],
        });
        assert_eq!(app.refresh_count, 0);
        assert_eq!(app.status_message.as_deref(), Some("Refresh cancelled"));
        assert!(!app.view.items().iter().any(|item| item == "late"));
    }

    #[test]
    fn test_tall_viewport_still_hides_strip() {
        let mut config = AppConfig::default();
        config.refresh.visible_when_idle = false;
        let mut app = App::new(config, Theme::default()).unwrap();
        app.layout(Rect::new(0, 0, 80, 30)).unwrap();
        assert_eq!(app.view.offset(), 3);

        app.handle_pointer(PointerEvent::Press { column: 1, row: 5 });
        app.handle_pointer(PointerEvent::Drag { row: 6 });
        assert_eq!(app.refresher.state(), GestureState::Idle);

        app.handle_pointer(PointerEvent::Release);
        assert!(!app.refresher.is_refreshing());
        assert_eq!(app.view.offset(), 3);
    }

    #[test]
    fn test_new_phase_starts_on_its_first_frame() {
        let mut app = app(true);
        app.handle_pointer(PointerEvent::Press { column: 1, row: 1 });
        app.handle_pointer(PointerEvent::Drag { row: 6 });
        assert_eq!(app.refresher.state(), GestureState::Pulling);

        let first = app.refresher.sprites().backward.frame(0).clone();
        assert!(Arc::ptr_eq(app.refresher.current_frame(), &first));

        assert!(app.tick(Instant::now()));
        assert!(!Arc::ptr_eq(app.refresher.current_frame(), &first));
    }
}
