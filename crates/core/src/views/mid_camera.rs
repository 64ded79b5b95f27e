use image::imageops::{self, FilterType};

use super::Panel;
use crate::model::Frame;
use crate::model::frame::blank;

pub const MID_HEIGHT: u32 = 240;
pub const MID_WIDTH: u32 = 400;

/// The mid camera scaled to the panel, or a blank panel when no frame has
/// arrived yet.
pub fn render_mid_camera_panel(frame: Option<&Frame>) -> Panel {
    let pixels = match frame {
        Some(frame) => imageops::resize(frame, MID_WIDTH, MID_HEIGHT, FilterType::Triangle),
        None => blank(MID_HEIGHT, MID_WIDTH),
    };
    Panel::new(pixels)
}
