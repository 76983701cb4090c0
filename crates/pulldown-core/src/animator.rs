//! Frame-driven indicator animation
//!
//! The animator is advanced by the host render loop through [`IndicatorAnimator::tick`].
//! It registers itself with the loop whenever its phase changes and
//! deregisters once a one-shot sequence has shown its last frame.

use std::time::{Duration, Instant};

use crate::host::RenderLoop;
use crate::sprite::{Frame, SpriteSet, Sprites};

/// Minimum time between two frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Visual phase of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPhase {
    /// Arrow turning to its resting pose
    #[default]
    Default,
    /// Arrow turning back, release will refresh
    Pulling,
    /// Spinning refresh image
    Refreshing,
}

#[derive(Debug, Clone)]
pub struct IndicatorAnimator {
    sprites: Sprites,
    phase: IndicatorPhase,
    cursor: usize,
    looping: bool,
    last_advance: Option<Instant>,
    interval: Duration,
    registered: bool,
}

impl IndicatorAnimator {
    /// Create an animator resting on the last frame of the idle arrow
    pub fn new(sprites: Sprites) -> Self {
        let cursor = sprites.forward.last_index();
        Self {
            sprites,
            phase: IndicatorPhase::Default,
            cursor,
            looping: false,
            last_advance: None,
            interval: FRAME_INTERVAL,
            registered: false,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn phase(&self) -> IndicatorPhase {
        self.phase
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether the animator currently expects ticks from the render loop
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Raw cursor; only ever grows within a phase
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn frames(&self) -> &SpriteSet {
        self.sprites.for_phase(self.phase)
    }

    /// Cursor wrapped to the active sequence
    pub fn frame_index(&self) -> usize {
        self.cursor % self.frames().len()
    }

    /// Frame to draw now
    pub fn current_frame(&self) -> &Frame {
        self.frames().frame(self.cursor)
    }

    /// Switch to another phase and restart its sequence.
    ///
    /// Returns `false` without touching anything when `phase` is already active.
    pub fn set_phase<R: RenderLoop + ?Sized>(
        &mut self,
        phase: IndicatorPhase,
        host: &mut R,
    ) -> bool {
        if self.phase == phase {
            return false;
        }

        self.phase = phase;
        self.cursor = 0;
        self.looping = phase == IndicatorPhase::Refreshing;
        self.last_advance = None;
        self.register(host);

        tracing::debug!(?phase, looping = self.looping, "indicator phase changed");
        true
    }

    /// Advance the animation; returns whether the indicator needs a redraw.
    ///
    /// A one-shot sequence whose last frame has already been presented
    /// deregisters here instead of advancing.
    pub fn tick<R: RenderLoop + ?Sized>(&mut self, now: Instant, host: &mut R) -> bool {
        if !self.registered {
            return false;
        }

        if !self.looping && self.frame_index() == self.frames().last_index() {
            self.deregister(host);
            return false;
        }

        let due = match self.last_advance {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.interval,
        };

        if due {
            self.cursor = self.cursor.wrapping_add(1);
            self.last_advance = Some(now);
        }
        due
    }

    /// Stop receiving ticks, e.g. when the widget is torn down
    pub fn detach<R: RenderLoop + ?Sized>(&mut self, host: &mut R) {
        self.deregister(host);
    }

    fn register<R: RenderLoop + ?Sized>(&mut self, host: &mut R) {
        if !self.registered {
            host.register_animated();
            self.registered = true;
        }
    }

    fn deregister<R: RenderLoop + ?Sized>(&mut self, host: &mut R) {
        if self.registered {
            host.deregister_animated();
            self.registered = false;
            tracing::debug!(phase = ?self.phase, "indicator animation settled");
        }
    }
}
