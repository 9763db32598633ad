use serde::{Deserialize, Serialize};

// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Standard decorated window at the configured size.
    #[default]
    Windowed,
    /// Exclusive hardware fullscreen at the closest matching video mode.
    Fullscreen,
    /// Borderless window sized to match the monitor's native resolution.
    Borderless,
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window settings read from the game config.
///
/// `width` and `height` are physical pixels. The world view does not depend
/// on them: the camera always shows its configured viewport, stretched to
/// fill the window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    /// 800 × 600, windowed.
    fn default() -> Self {
        Self {
            title:  "Affirmation Adventures".into(),
            width:  800,
            height: 600,
            mode:   WindowMode::Windowed,
        }
    }
}
