use std::fmt;

use super::frame::Frame;

/// One independent sensor stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Left,
    Right,
    Mid,
    Scan,
}

impl ChannelId {
    /// Camera channels in the order they are read each cycle.
    pub const CAMERAS: [ChannelId; 3] = [ChannelId::Left, ChannelId::Right, ChannelId::Mid];
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelId::Left => "left",
            ChannelId::Right => "right",
            ChannelId::Mid => "mid",
            ChannelId::Scan => "scan",
        };
        f.write_str(name)
    }
}

/// The three camera frames read together in one synchronized cycle.
#[derive(Debug, Clone)]
pub struct FrameBundle {
    /// Monotonic cycle number, starting at 0.
    pub cycle: u64,
    pub left: Frame,
    pub right: Frame,
    pub mid: Frame,
}
