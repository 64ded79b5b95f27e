use serde::{Deserialize, Serialize};

/// Transmission state reported by the vehicle platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gear {
    Forward,
    Neutral,
    Backward,
    /// No gear report received yet.
    #[default]
    Unknown,
}

/// Read-only snapshot of the vehicle platform state.
///
/// Written by the platform collaborator, read by the compositor. A snapshot
/// is replaced as a whole; fields are never updated individually.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    pub gear: Gear,
    /// Vehicle speed in km/h.
    pub speed_kph: f64,
    /// Steering angle in degrees. Positive turns left, negative turns right.
    pub steer_deg: f64,
    pub brake: f64,
    /// Whether the platform is in autonomous (rather than manual) mode.
    pub auto_mode: bool,
    /// Rolling heartbeat counter from the platform.
    pub alive: u8,
}
