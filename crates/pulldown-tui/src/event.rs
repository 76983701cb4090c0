use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    animation_tick: Duration,
}

/// Pointer input relevant to the pull gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { column: u16, row: u16 },
    Drag { row: u16 },
    Release,
    WheelUp,
    WheelDown,
}

impl PointerEvent {
    /// Translate a crossterm mouse event; only the left button is tracked
    pub fn from_mouse(mouse: MouseEvent) -> Option<Self> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Press {
                column: mouse.column,
                row: mouse.row,
            }),
            MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Drag { row: mouse.row }),
            MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Release),
            MouseEventKind::ScrollUp => Some(PointerEvent::WheelUp),
            MouseEventKind::ScrollDown => Some(PointerEvent::WheelDown),
            _ => None,
        }
    }
}

/// Result of a simulated refresh
#[derive(Debug)]
pub struct RefreshResult {
    /// Rows to insert above the current items, in display order
    pub new_items: Vec<String>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick: Duration::from_millis(33),
        }
    }

    /// Handler that polls faster while the indicator animates
    pub fn with_animation_tick(tick_rate_ms: u64, animation_tick: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick,
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll using the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_tick)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(PointerEvent::from_mouse(mouse).map(AppEvent::Pointer)),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse input on the list
    Pointer(PointerEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_left_button_maps_to_gesture() {
        assert_eq!(
            PointerEvent::from_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3)),
            Some(PointerEvent::Press { column: 4, row: 3 })
        );
        assert_eq!(
            PointerEvent::from_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 9)),
            Some(PointerEvent::Drag { row: 9 })
        );
        assert_eq!(
            PointerEvent::from_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 9)),
            Some(PointerEvent::Release)
        );
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        assert_eq!(
            PointerEvent::from_mouse(mouse(MouseEventKind::Drag(MouseButton::Right), 9)),
            None
        );
        assert_eq!(PointerEvent::from_mouse(mouse(MouseEventKind::Moved, 9)), None);
    }
}
