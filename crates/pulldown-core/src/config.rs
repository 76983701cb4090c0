use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while the indicator is registered for animation
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Height of the indicator strip in terminal rows
    #[serde(default = "default_indicator_rows")]
    pub indicator_rows: u16,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            indicator_rows: default_indicator_rows(),
            theme: ThemeConfig::default(),
        }
    }
}

impl UiConfig {
    /// Poll timeout used while an animation is registered
    pub fn animation_tick(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name (e.g., "gruvbox-dark", "nord")
    #[serde(default = "default_theme_name")]
    pub name: String,
    /// Optional accent override as a hex string ("#89b482")
    #[serde(default)]
    pub accent: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            accent: None,
        }
    }
}

/// Behaviour and text of the pull-down indicator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Keep the indicator strip on screen while idle
    #[serde(default = "default_true")]
    pub visible_when_idle: bool,
    /// Extra pull distance (rows) required before a release triggers a refresh
    #[serde(default)]
    pub activation_distance: u32,
    #[serde(default = "default_idle_label")]
    pub idle_label: String,
    #[serde(default = "default_pulling_label")]
    pub pulling_label: String,
    #[serde(default = "default_refreshing_label")]
    pub refreshing_label: String,
    /// Minimum time between two indicator frames
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Custom arrow image; the bundled one is used when unset
    #[serde(default)]
    pub arrow_image: Option<PathBuf>,
    /// Custom refresh image; the bundled one is used when unset
    #[serde(default)]
    pub refresh_image: Option<PathBuf>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            visible_when_idle: default_true(),
            activation_distance: 0,
            idle_label: default_idle_label(),
            pulling_label: default_pulling_label(),
            refreshing_label: default_refreshing_label(),
            frame_interval_ms: default_frame_interval(),
            arrow_image: None,
            refresh_image: None,
        }
    }
}

impl RefreshConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Custom arrow image path with `~` expanded
    pub fn arrow_image_path(&self) -> Option<PathBuf> {
        self.arrow_image.as_deref().map(expand_tilde)
    }

    /// Custom refresh image path with `~` expanded
    pub fn refresh_image_path(&self) -> Option<PathBuf> {
        self.refresh_image.as_deref().map(expand_tilde)
    }
}

/// Settings of the bundled demo application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated network delay before a refresh completes
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,
    /// Rows shown below the indicator
    #[serde(default = "default_items")]
    pub items: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay(),
            items: default_items(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pulldown")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    30
}

fn default_indicator_rows() -> u16 {
    3
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_idle_label() -> String {
    "Pull down to refresh".to_string()
}

fn default_pulling_label() -> String {
    "Release to refresh".to_string()
}

fn default_refreshing_label() -> String {
    "Refreshing...".to_string()
}

fn default_frame_interval() -> u64 {
    50
}

fn default_simulated_delay() -> u64 {
    5000
}

fn default_items() -> Vec<String> {
    [
        "J2ME Group",
        "eMob Tech",
        "Java ME",
        "Java",
        "Mobile",
        "Network",
        "LWUIT",
        "Eclipse",
        "Blog",
        "User Interface",
        "Open Source",
        "Smartphone",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pulldown/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pulldown")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pulldown.log")
    }
}
