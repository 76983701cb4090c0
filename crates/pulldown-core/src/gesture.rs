//! Pull gesture state machine
//!
//! Pure logic: the controller only decides which state the gesture is in and
//! reports what changed. Labels, sprites, scrolling and listeners are applied
//! by [`crate::PullDownRefresh`].

use crate::animator::IndicatorPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Resting, not pulled far enough
    #[default]
    Idle,
    /// Pulled past the threshold; releasing now refreshes
    Pulling,
    /// A refresh is in progress; drags and releases are ignored
    Refreshing,
}

impl GestureState {
    /// Indicator phase shown for this state
    pub fn phase(self) -> IndicatorPhase {
        match self {
            GestureState::Idle => IndicatorPhase::Default,
            GestureState::Pulling => IndicatorPhase::Pulling,
            GestureState::Refreshing => IndicatorPhase::Refreshing,
        }
    }
}

/// Result of a pointer release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Nothing to do
    Ignored,
    /// The gesture started a refresh; listeners must be told
    Refresh,
    /// Released short of the threshold; the strip should be collapsed
    Collapse,
}

#[derive(Debug, Clone)]
pub struct PullGestureController {
    state: GestureState,
    triggered: bool,
    resting_y: Option<i32>,
    indicator_height: i32,
    activation_distance: u32,
    visible_when_idle: bool,
}

impl PullGestureController {
    pub fn new(visible_when_idle: bool, activation_distance: u32) -> Self {
        Self {
            state: GestureState::Idle,
            triggered: false,
            resting_y: None,
            indicator_height: 0,
            activation_distance,
            visible_when_idle,
        }
    }

    /// Record the resting position of the indicator.
    ///
    /// Only the first call has an effect; returns whether it did.
    pub fn attach(&mut self, resting_y: i32, indicator_height: i32) -> bool {
        if self.resting_y.is_some() {
            return false;
        }
        self.resting_y = Some(resting_y);
        self.indicator_height = indicator_height;
        true
    }

    pub fn resting_y(&self) -> Option<i32> {
        self.resting_y
    }

    pub fn indicator_height(&self) -> i32 {
        self.indicator_height
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    #[inline]
    pub fn is_refreshing(&self) -> bool {
        self.state == GestureState::Refreshing
    }

    /// Whether the current drag has crossed the threshold
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn visible_when_idle(&self) -> bool {
        self.visible_when_idle
    }

    pub fn activation_distance(&self) -> u32 {
        self.activation_distance
    }

    /// Change the extra pull distance. Negative or oversized values are ignored.
    pub fn set_activation_distance(&mut self, distance: i64) -> bool {
        match u32::try_from(distance) {
            Ok(distance) => {
                self.activation_distance = distance;
                true
            }
            Err(_) => false,
        }
    }

    /// Position the indicator must exceed to arm a refresh, once attached
    pub fn threshold(&self) -> Option<i64> {
        let resting_y = self.resting_y?;
        let mut gap = resting_y as i64 + self.activation_distance as i64;
        if self.visible_when_idle {
            gap += self.indicator_height as i64;
        }
        Some(gap)
    }

    pub fn is_past_threshold(&self, y: i32) -> bool {
        self.threshold().is_some_and(|gap| y as i64 > gap)
    }

    /// Indicator moved to `y` during a drag; returns the new state if it changed
    pub fn on_drag(&mut self, y: i32) -> Option<GestureState> {
        if self.is_refreshing() {
            return None;
        }

        let pulled = self.is_past_threshold(y);
        self.triggered = pulled;

        let next = match (self.state, pulled) {
            (GestureState::Idle, true) => GestureState::Pulling,
            (GestureState::Pulling, false) => GestureState::Idle,
            _ => return None,
        };

        tracing::debug!(y, from = ?self.state, to = ?next, "pull gesture transition");
        self.state = next;
        Some(next)
    }

    pub fn on_release(&mut self) -> Release {
        match self.state {
            GestureState::Refreshing => Release::Ignored,
            GestureState::Pulling => {
                self.state = GestureState::Refreshing;
                self.triggered = false;
                Release::Refresh
            }
            GestureState::Idle => {
                self.triggered = false;
                if self.visible_when_idle {
                    Release::Ignored
                } else {
                    Release::Collapse
                }
            }
        }
    }

    /// Enter Refreshing from outside the gesture; returns whether the state changed
    pub fn begin_programmatic(&mut self) -> bool {
        if self.is_refreshing() {
            return false;
        }
        self.state = GestureState::Refreshing;
        self.triggered = false;
        true
    }

    /// Leave Refreshing; returns whether the state changed
    pub fn end_refresh(&mut self) -> bool {
        if !self.is_refreshing() {
            return false;
        }
        self.state = GestureState::Idle;
        self.triggered = false;
        true
    }
}
