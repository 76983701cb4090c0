//! Pull-down-to-refresh for scrollable views.
//!
//! The crate is UI-agnostic: a host view implements [`ScrollHost`] and
//! [`RenderLoop`], forwards drags, releases and frame ticks to a
//! [`PullDownRefresh`], and draws [`PullDownRefresh::current_frame`] next to
//! [`PullDownRefresh::label`].

pub mod animator;
pub mod config;
pub mod error;
pub mod gesture;
pub mod host;
pub mod sprite;
pub mod visibility;
pub mod widget;

pub use animator::{IndicatorAnimator, IndicatorPhase, FRAME_INTERVAL};
pub use config::{AppConfig, DemoConfig, RefreshConfig, ThemeConfig, UiConfig};
pub use error::{Error, Result};
pub use gesture::{GestureState, PullGestureController, Release};
pub use host::{RefreshHost, Region, RenderLoop, ScrollHost, Viewport};
pub use sprite::{Frame, SpriteSet, Sprites};
pub use visibility::VisibilityReconciler;
pub use widget::{ListenerId, PullDownRefresh, RefreshListener};
