use serde::{Deserialize, Serialize};

/// Driving mission mode, selected by the operator or detected by the planner.
///
/// The numeric index is what operators type on the keyboard (`0`..`5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Default = 0,
    Parking = 1,
    StaticObs = 2,
    MovingObs = 3,
    UTurn = 4,
    CrossWalk = 5,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Default,
        Mode::Parking,
        Mode::StaticObs,
        Mode::MovingObs,
        Mode::UTurn,
        Mode::CrossWalk,
    ];

    pub fn from_index(index: u8) -> Option<Mode> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Short label shown on the status panel.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Default => "Default",
            Mode::Parking => "Parking",
            Mode::StaticObs => "StaticObs",
            Mode::MovingObs => "MovingObs",
            Mode::UTurn => "UTurn",
            Mode::CrossWalk => "CrossWalk",
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mode::from_index(value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_for_every_mode() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_index(mode.index()), Some(mode));
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(Mode::from_index(6), None);
        assert_eq!(Mode::try_from(200), Err(200));
    }
}
