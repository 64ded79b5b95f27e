pub mod mid_camera;
pub mod planner;
pub mod scan;
pub mod status;

use rig_monitor_protocol::{Point, RenderCommand};

use crate::model::Frame;

/// A sub-image of the canvas plus the overlays drawn on top of it, in the
/// panel's own pixel coordinates.
#[derive(Debug, Clone)]
pub struct Panel {
    pub pixels: Frame,
    pub overlays: Vec<RenderCommand>,
}

impl Panel {
    pub fn new(pixels: Frame) -> Self {
        Self {
            pixels,
            overlays: Vec::new(),
        }
    }

    /// Overlays moved by `(dx, dy)`, for placing the panel inside a larger image.
    pub fn overlays_at(&self, dx: f64, dy: f64) -> impl Iterator<Item = RenderCommand> + '_ {
        self.overlays.iter().map(move |cmd| match cmd {
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                thickness,
            } => RenderCommand::DrawText {
                position: Point::new(position.x + dx, position.y + dy),
                text: text.clone(),
                color: *color,
                font_size: *font_size,
                thickness: *thickness,
            },
        })
    }
}
