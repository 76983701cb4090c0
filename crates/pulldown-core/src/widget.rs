use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::animator::{IndicatorAnimator, IndicatorPhase};
use crate::config::RefreshConfig;
use crate::error::{Error, Result};
use crate::gesture::{GestureState, PullGestureController, Release};
use crate::host::{RefreshHost, RenderLoop};
use crate::sprite::{Frame, Sprites};
use crate::visibility::VisibilityReconciler;

/// Callback invoked when a pull gesture starts a refresh
pub type RefreshListener = Box<dyn FnMut(&PullDownRefresh)>;

/// Handle returned by [`PullDownRefresh::add_refresh_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Labels {
    idle: String,
    pulling: String,
    refreshing: String,
}

impl Labels {
    fn for_state(&self, state: GestureState) -> &str {
        match state {
            GestureState::Idle => &self.idle,
            GestureState::Pulling => &self.pulling,
            GestureState::Refreshing => &self.refreshing,
        }
    }
}

/// Pull-down-to-refresh indicator placed at the top of a scrollable view.
///
/// The host forwards drags, releases and render ticks; the widget keeps the
/// gesture state, label, indicator animation and strip visibility in sync.
/// Listeners run only for refreshes started by the user's gesture, after the
/// widget has already switched to the refreshing state. A listener that
/// panics is logged and skipped.
pub struct PullDownRefresh {
    controller: PullGestureController,
    animator: IndicatorAnimator,
    reconciler: Option<VisibilityReconciler>,
    labels: Labels,
    label: String,
    listeners: Vec<(ListenerId, RefreshListener)>,
    next_listener: u64,
}

impl fmt::Debug for PullDownRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullDownRefresh")
            .field("state", &self.controller.state())
            .field("phase", &self.animator.phase())
            .field("label", &self.label)
            .field("resting_y", &self.controller.resting_y())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PullDownRefresh {
    /// Build the widget, loading custom images named in `config` or the
    /// bundled ones. Unreadable images are an error.
    pub fn new(config: &RefreshConfig) -> Result<Self> {
        let sprites = Sprites::from_config(config)?;
        Ok(Self::with_sprites(config, sprites))
    }

    pub fn with_sprites(config: &RefreshConfig, sprites: Sprites) -> Self {
        let labels = Labels {
            idle: config.idle_label.clone(),
            pulling: config.pulling_label.clone(),
            refreshing: config.refreshing_label.clone(),
        };
        let label = labels.idle.clone();

        Self {
            controller: PullGestureController::new(
                config.visible_when_idle,
                config.activation_distance,
            ),
            animator: IndicatorAnimator::new(sprites).with_interval(config.frame_interval()),
            reconciler: None,
            labels,
            label,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Attach to the host view and capture the resting position.
    ///
    /// The indicator must be the first element of a vertically scrollable
    /// view. Only the first successful attachment records the position.
    pub fn attach<H: RefreshHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if !host.is_vertically_scrollable() {
            return Err(Error::UnsupportedHost);
        }
        let index = host.indicator_index();
        if index != 0 {
            return Err(Error::NotFirstChild(index));
        }

        let resting_y = host.indicator_y();
        let height = host.indicator_height();
        if self.controller.attach(resting_y, height) {
            self.reconciler = Some(VisibilityReconciler::new(resting_y, height));
            tracing::debug!(resting_y, height, "pull-down refresh attached");

            if !self.controller.visible_when_idle() {
                self.hide(host);
            }
        }
        Ok(())
    }

    /// Stop animating; call when the host view goes away
    pub fn detach<R: RenderLoop + ?Sized>(&mut self, host: &mut R) {
        self.animator.detach(host);
    }

    /// The indicator has been dragged to absolute position `y`
    pub fn on_drag<H: RefreshHost + ?Sized>(&mut self, host: &mut H, y: i32) {
        if let Some(state) = self.controller.on_drag(y) {
            self.apply_state(state, host);
        }
    }

    /// The pointer was released
    pub fn on_release<H: RefreshHost + ?Sized>(&mut self, host: &mut H) {
        match self.controller.on_release() {
            Release::Refresh => {
                tracing::info!("refresh requested by pull gesture");
                self.show_refreshing(host);
                self.notify_listeners();
            }
            Release::Collapse => self.hide(host),
            Release::Ignored => {}
        }
    }

    /// Tell the widget a refresh was started by something other than the
    /// gesture, e.g. a timer. Listeners are not notified.
    pub fn begin_refreshing<H: RefreshHost + ?Sized>(&mut self, host: &mut H) {
        if self.controller.begin_programmatic() {
            tracing::info!("refresh started programmatically");
            self.show_refreshing(host);
        }
    }

    /// Return to the idle state once the refresh work has finished
    pub fn end_refreshing<H: RefreshHost + ?Sized>(&mut self, host: &mut H) {
        if self.controller.end_refresh() {
            tracing::info!("refresh finished");
            if !self.controller.visible_when_idle() {
                self.hide(host);
            }
            self.apply_state(GestureState::Idle, host);
        }
    }

    #[inline]
    pub fn is_refreshing(&self) -> bool {
        self.controller.is_refreshing()
    }

    pub fn state(&self) -> GestureState {
        self.controller.state()
    }

    pub fn phase(&self) -> IndicatorPhase {
        self.animator.phase()
    }

    pub fn is_triggered(&self) -> bool {
        self.controller.is_triggered()
    }

    pub fn resting_y(&self) -> Option<i32> {
        self.controller.resting_y()
    }

    pub fn visible_when_idle(&self) -> bool {
        self.controller.visible_when_idle()
    }

    /// Text currently shown next to the indicator
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add_refresh_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&PullDownRefresh) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed
    pub fn remove_refresh_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn set_idle_label(&mut self, text: impl Into<String>) {
        self.labels.idle = text.into();
        self.refresh_label_for(GestureState::Idle);
    }

    pub fn set_pulling_label(&mut self, text: impl Into<String>) {
        self.labels.pulling = text.into();
        self.refresh_label_for(GestureState::Pulling);
    }

    pub fn set_refreshing_label(&mut self, text: impl Into<String>) {
        self.labels.refreshing = text.into();
        self.refresh_label_for(GestureState::Refreshing);
    }

    /// Extra distance required before a release refreshes; negative values are ignored
    pub fn set_activation_distance(&mut self, distance: i64) {
        if !self.controller.set_activation_distance(distance) {
            tracing::debug!(distance, "ignoring invalid activation distance");
        }
    }

    pub fn activation_distance(&self) -> u32 {
        self.controller.activation_distance()
    }

    /// Advance the indicator animation; returns whether a redraw is needed
    pub fn tick<R: RenderLoop + ?Sized>(&mut self, host: &mut R, now: Instant) -> bool {
        self.animator.tick(now, host)
    }

    /// Whether the indicator still wants ticks
    pub fn is_animating(&self) -> bool {
        self.animator.is_registered()
    }

    /// Frame the indicator shows right now
    pub fn current_frame(&self) -> &Frame {
        self.animator.current_frame()
    }

    pub fn sprites(&self) -> &Sprites {
        self.animator.sprites()
    }

    fn refresh_label_for(&mut self, state: GestureState) {
        if self.controller.state() == state {
            self.label = self.labels.for_state(state).to_string();
        }
    }

    fn apply_state<R: RenderLoop + ?Sized>(&mut self, state: GestureState, host: &mut R) {
        self.animator.set_phase(state.phase(), host);
        self.label = self.labels.for_state(state).to_string();
    }

    fn show_refreshing<H: RefreshHost + ?Sized>(&mut self, host: &mut H) {
        if !self.controller.visible_when_idle() {
            self.show(host);
        }
        self.apply_state(GestureState::Refreshing, host);
    }

    fn hide<H: RefreshHost + ?Sized>(&self, host: &mut H) {
        let Some(reconciler) = self.reconciler else {
            return;
        };
        if let Some(region) = reconciler.hide(host.indicator_y(), host.viewport()) {
            tracing::debug!(?region, "collapsing refresh indicator");
            host.scroll_region_to_visible(region);
        }
    }

    fn show<H: RefreshHost + ?Sized>(&self, host: &mut H) {
        let Some(reconciler) = self.reconciler else {
            return;
        };
        if let Some(region) = reconciler.show(host.indicator_y(), host.viewport()) {
            tracing::debug!(?region, "revealing refresh indicator");
            host.scroll_region_to_visible(region);
        }
    }

    fn notify_listeners(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (id, listener) in listeners.iter_mut() {
            let widget: &PullDownRefresh = self;
            if panic::catch_unwind(AssertUnwindSafe(|| listener(widget))).is_err() {
                tracing::error!(?id, "refresh listener panicked");
            }
        }
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn widget(visible_when_idle: bool, activation_distance: u32) -> PullDownRefresh {
        let config = RefreshConfig {
            visible_when_idle,
            activation_distance,
            ..Default::default()
        };
        PullDownRefresh::new(&config).unwrap()
    }

    fn counter(widget: &mut PullDownRefresh) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        widget.add_refresh_listener(move |_| seen.set(seen.get() + 1));
        count
    }

    #[test]
    fn test_scenario_hidden_strip_pull_and_release() {
        let mut widget = widget(false, 20);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        assert_eq!(host.scrolls.len(), 1);
        assert_eq!(host.scrolls[0].y, 30);

        let fired = counter(&mut widget);

        widget.on_drag(&mut host, 100);
        assert_eq!(widget.state(), GestureState::Idle);

        widget.on_drag(&mut host, 151);
        assert_eq!(widget.state(), GestureState::Pulling);
        assert_eq!(widget.label(), "Release to refresh");

        widget.on_release(&mut host);
        assert_eq!(widget.state(), GestureState::Refreshing);
        assert!(widget.is_refreshing());
        assert_eq!(fired.get(), 1);
        assert_eq!(widget.label(), "Refreshing...");
        assert_eq!(widget.phase(), IndicatorPhase::Refreshing);
    }

    #[test]
    fn test_scenario_hidden_strip_short_pull_collapses() {
        let mut widget = widget(false, 20);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        let fired = counter(&mut widget);

        // hidden strip: threshold is resting_y + activation_distance
        widget.on_drag(&mut host, 121);
        assert_eq!(widget.state(), GestureState::Pulling);
        widget.on_drag(&mut host, 120);
        assert_eq!(widget.state(), GestureState::Idle);

        host.scrolls.clear();
        widget.on_release(&mut host);
        assert!(!widget.is_refreshing());
        assert_eq!(fired.get(), 0);
        assert_eq!(host.scrolls.len(), 1);
        assert_eq!(host.scrolls[0].y, 30);
    }

    #[test]
    fn test_scenario_visible_strip() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        assert!(host.scrolls.is_empty());

        widget.on_drag(&mut host, 130);
        assert_eq!(widget.state(), GestureState::Idle);
        widget.on_drag(&mut host, 131);
        assert_eq!(widget.state(), GestureState::Pulling);

        widget.on_release(&mut host);
        assert!(widget.is_refreshing());
        assert!(host.scrolls.is_empty());
    }

    #[test]
    fn test_release_while_idle_never_refreshes() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        let fired = counter(&mut widget);

        widget.on_release(&mut host);
        assert_eq!(widget.state(), GestureState::Idle);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_every_listener_fires_once() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        let first = counter(&mut widget);
        let second = counter(&mut widget);

        widget.on_drag(&mut host, 200);
        widget.on_release(&mut host);
        widget.on_release(&mut host);
        widget.on_drag(&mut host, 300);
        widget.on_release(&mut host);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_listener_sees_committed_state() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();

        let saw_refreshing = Rc::new(Cell::new(false));
        let seen = saw_refreshing.clone();
        widget.add_refresh_listener(move |w| seen.set(w.is_refreshing()));

        widget.on_drag(&mut host, 200);
        widget.on_release(&mut host);
        assert!(saw_refreshing.get());
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();

        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let id = widget.add_refresh_listener(move |_| seen.set(seen.get() + 1));
        assert!(widget.remove_refresh_listener(id));
        assert!(!widget.remove_refresh_listener(id));

        widget.on_drag(&mut host, 200);
        widget.on_release(&mut host);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        widget.add_refresh_listener(|_| panic!("listener failure"));
        let after = counter(&mut widget);

        widget.on_drag(&mut host, 200);
        widget.on_release(&mut host);
        assert!(widget.is_refreshing());
        assert_eq!(after.get(), 1);

        widget.end_refreshing(&mut host);
        widget.on_drag(&mut host, 200);
        widget.on_release(&mut host);
        assert_eq!(after.get(), 2);
    }

    #[test]
    fn test_begin_twice_is_one_transition() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        let fired = counter(&mut widget);

        widget.begin_refreshing(&mut host);
        widget.begin_refreshing(&mut host);
        assert!(widget.is_refreshing());
        assert_eq!(host.registrations, 1);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_end_while_idle_is_noop() {
        let mut widget = widget(false, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        host.scrolls.clear();

        widget.end_refreshing(&mut host);
        assert_eq!(widget.label(), "Pull down to refresh");
        assert_eq!(widget.phase(), IndicatorPhase::Default);
        assert!(host.scrolls.is_empty());
        assert_eq!(host.registrations, 0);
    }

    #[test]
    fn test_begin_end_round_trip() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        let before = (widget.state(), widget.phase(), widget.label().to_string());

        widget.begin_refreshing(&mut host);
        assert_eq!(widget.label(), "Refreshing...");
        widget.end_refreshing(&mut host);

        let after = (widget.state(), widget.phase(), widget.label().to_string());
        assert_eq!(before, after);
        assert!(!widget.is_triggered());
    }

    #[test]
    fn test_programmatic_begin_reveals_collapsed_strip() {
        let mut widget = widget(false, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        host.y = 70;
        host.scrolls.clear();

        widget.begin_refreshing(&mut host);
        assert_eq!(host.scrolls.len(), 1);
        assert_eq!(host.scrolls[0].y, 0);

        host.y = 100;
        widget.end_refreshing(&mut host);
        assert_eq!(host.scrolls.len(), 2);
        assert_eq!(host.scrolls[1].y, 30);
    }

    #[test]
    fn test_refreshing_ignores_drags() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        widget.begin_refreshing(&mut host);

        widget.on_drag(&mut host, 0);
        widget.on_release(&mut host);
        assert!(widget.is_refreshing());
        assert_eq!(widget.phase(), IndicatorPhase::Refreshing);
    }

    #[test]
    fn test_label_setters_respect_phase() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();

        widget.set_pulling_label("Let go");
        widget.set_refreshing_label("Loading");
        assert_eq!(widget.label(), "Pull down to refresh");

        widget.set_idle_label("Drag me");
        assert_eq!(widget.label(), "Drag me");

        widget.on_drag(&mut host, 200);
        assert_eq!(widget.label(), "Let go");

        widget.on_release(&mut host);
        assert_eq!(widget.label(), "Loading");
        widget.set_refreshing_label("Still loading");
        assert_eq!(widget.label(), "Still loading");
    }

    #[test]
    fn test_activation_distance_setter() {
        let mut widget = widget(true, 5);
        widget.set_activation_distance(-10);
        assert_eq!(widget.activation_distance(), 5);
        widget.set_activation_distance(12);
        assert_eq!(widget.activation_distance(), 12);
    }

    #[test]
    fn test_attach_rejects_unscrollable_host() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        host.scrollable = false;
        assert!(matches!(
            widget.attach(&mut host),
            Err(Error::UnsupportedHost)
        ));
        assert_eq!(widget.resting_y(), None);
    }

    #[test]
    fn test_attach_requires_first_position() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        host.index = 2;
        assert!(matches!(
            widget.attach(&mut host),
            Err(Error::NotFirstChild(2))
        ));
    }

    #[test]
    fn test_resting_position_survives_reattach() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        host.y = 40;
        widget.attach(&mut host).unwrap();
        assert_eq!(widget.resting_y(), Some(100));
    }

    #[test]
    fn test_tick_drives_animation_until_settled() {
        let mut widget = widget(true, 0);
        let mut host = RecordingHost::new(100, 30);
        widget.attach(&mut host).unwrap();
        assert!(!widget.is_animating());

        widget.on_drag(&mut host, 200);
        assert!(widget.is_animating());

        let start = Instant::now();
        for i in 1..=5u64 {
            widget.tick(&mut host, start + std::time::Duration::from_millis(60 * i));
        }
        assert!(!widget.is_animating());
        assert!(!host.registered);

        widget.detach(&mut host);
        assert_eq!(host.deregistrations, 1);
    }
}
