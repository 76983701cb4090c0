//! Capabilities the refresh widget needs from the view that embeds it.
//!
//! The widget never owns its host. Every operation that may scroll the view
//! or (de)register an animation takes the host by `&mut` for the duration of
//! the call, so the widget stays a plain value that can be tested without a
//! terminal.

/// Size of the host's visible viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Region of the host's content, in content coordinates, to bring into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

/// A vertically scrollable container
pub trait ScrollHost {
    /// Whether the host scrolls on the vertical axis at all
    fn is_vertically_scrollable(&self) -> bool;

    /// Position of the indicator among the host's children
    fn indicator_index(&self) -> usize;

    /// Current absolute vertical position of the indicator strip
    fn indicator_y(&self) -> i32;

    /// Height of the indicator strip
    fn indicator_height(&self) -> i32;

    fn viewport(&self) -> Viewport;

    /// Scroll so that `region` becomes visible
    fn scroll_region_to_visible(&mut self, region: Region);
}

/// Per-frame callback registry of the host render loop
pub trait RenderLoop {
    /// Start delivering ticks to the indicator
    fn register_animated(&mut self);

    /// Stop delivering ticks to the indicator
    fn deregister_animated(&mut self);
}

/// Everything the widget needs from its host
pub trait RefreshHost: ScrollHost + RenderLoop {}

impl<T: ScrollHost + RenderLoop> RefreshHost for T {}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory host recording every request the widget makes
    #[derive(Debug)]
    pub struct RecordingHost {
        pub scrollable: bool,
        pub index: usize,
        pub y: i32,
        pub height: i32,
        pub viewport: Viewport,
        pub scrolls: Vec<Region>,
        pub registered: bool,
        pub registrations: usize,
        pub deregistrations: usize,
    }

    impl RecordingHost {
        pub fn new(y: i32, height: i32) -> Self {
            Self {
                scrollable: true,
                index: 0,
                y,
                height,
                viewport: Viewport {
                    width: 40,
                    height: 20,
                },
                scrolls: Vec::new(),
                registered: false,
                registrations: 0,
                deregistrations: 0,
            }
        }
    }

    impl ScrollHost for RecordingHost {
        fn is_vertically_scrollable(&self) -> bool {
            self.scrollable
        }

        fn indicator_index(&self) -> usize {
            self.index
        }

        fn indicator_y(&self) -> i32 {
            self.y
        }

        fn indicator_height(&self) -> i32 {
            self.height
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn scroll_region_to_visible(&mut self, region: Region) {
            self.scrolls.push(region);
        }
    }

    impl RenderLoop for RecordingHost {
        fn register_animated(&mut self) {
            self.registered = true;
            self.registrations += 1;
        }

        fn deregister_animated(&mut self) {
            self.registered = false;
            self.deregistrations += 1;
        }
    }
}
