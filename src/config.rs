use serde::Deserialize;

use crate::error::EngineResult;

/// Engine settings. Every field has a default, so a RON document only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// DOM id of the canvas to draw into. Created when missing.
    pub canvas_id: String,
    /// Fill applied after every clear, before the universe draws.
    pub background_color: String,
    /// Report a zero delta on the first tick after `start`.
    pub clamp_first_delta: bool,
    /// Upper bound on a single frame delta, in seconds.
    pub max_delta: Option<f64>,
    /// Keep the canvas sized to the window's inner size.
    pub fit_to_window: bool,
    /// Frames between debug stat lines; 0 disables them.
    pub stats_log_interval: u64,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_id: "game-canvas".to_string(),
            background_color: "#0a0a2a".to_string(),
            clamp_first_delta: true,
            max_delta: None,
            fit_to_window: true,
            stats_log_interval: 0,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_ron(source: &str) -> EngineResult<Self> {
        Ok(ron::from_str(source)?)
    }
}
