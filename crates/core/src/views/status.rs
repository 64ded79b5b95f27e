use rig_monitor_protocol::{Gear, Mode, Point, RenderCommand, Telemetry, ThemeToken};

use super::Panel;
use crate::model::frame::blank;

pub const STATUS_HEIGHT: u32 = 240;
pub const STATUS_WIDTH: u32 = 600;

const FONT_SIZE: f64 = 40.0;
const FONT_THICKNESS: u32 = 3;

const GEAR_SPEED_ORIGIN: (f64, f64) = (0.0, 50.0);
const STEER_ORIGIN: (f64, f64) = (0.0, 110.0);
const BRAKE_ORIGIN: (f64, f64) = (0.0, 170.0);
const CURRENT_MODE_ORIGIN: (f64, f64) = (0.0, 230.0);
const DETECTED_MODE_ORIGIN: (f64, f64) = (300.0, 230.0);

/// Vehicle status and mission modes as text on a blank panel.
pub fn render_status_panel(telemetry: &Telemetry, current: Mode, detected: Mode) -> Panel {
    let mut panel = Panel::new(blank(STATUS_HEIGHT, STATUS_WIDTH));
    let lines = [
        (gear_speed_line(telemetry), GEAR_SPEED_ORIGIN, ThemeToken::StatusText),
        (steer_line(telemetry.steer_deg), STEER_ORIGIN, ThemeToken::StatusText),
        (brake_line(telemetry.brake), BRAKE_ORIGIN, ThemeToken::StatusText),
        (current.label().to_string(), CURRENT_MODE_ORIGIN, ThemeToken::ModeCurrent),
        (detected.label().to_string(), DETECTED_MODE_ORIGIN, ThemeToken::ModeDetected),
    ];
    for (text, (x, y), color) in lines {
        panel.overlays.push(RenderCommand::DrawText {
            position: Point::new(x, y),
            text,
            color,
            font_size: FONT_SIZE,
            thickness: FONT_THICKNESS,
        });
    }
    panel
}

fn gear_label(gear: Gear) -> &'static str {
    match gear {
        Gear::Forward => "Drive    ",
        Gear::Neutral => "Neutral  ",
        Gear::Backward => "Rear    ",
        Gear::Unknown => "",
    }
}

pub fn gear_speed_line(telemetry: &Telemetry) -> String {
    format!("{}{:4.2}kph", gear_label(telemetry.gear), telemetry.speed_kph)
}

pub fn steer_line(steer_deg: f64) -> String {
    let direction = if steer_deg == 0.0 {
        "Straight"
    } else if steer_deg > 0.0 {
        "Left    "
    } else {
        "Right   "
    };
    format!("{direction}{:5.2}deg", steer_deg.abs())
}

pub fn brake_line(brake: f64) -> String {
    format!("Brake{brake:7.2}")
}
