use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Vehicle status lines (gear, steering, brake).
    StatusText,
    /// The mode the operator selected.
    ModeCurrent,
    /// The mission the planner believes it is in.
    ModeDetected,
    /// Range-scan returns.
    ScanPoint,
    Background,
}

impl ThemeToken {
    /// Reference RGB value for renderers that draw true color.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            ThemeToken::StatusText => [255, 255, 255],
            ThemeToken::ModeCurrent => [0, 200, 255],
            ThemeToken::ModeDetected => [255, 255, 0],
            ThemeToken::ScanPoint => [0, 255, 0],
            ThemeToken::Background => [0, 0, 0],
        }
    }
}
