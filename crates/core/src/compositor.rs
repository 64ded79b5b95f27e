//! Builds the monitoring canvas from the three panels.
//!
//! ```text
//! +-------------------+-------------+
//! | status  240x600   | mid 240x400 |
//! +-------------------+-------------+
//! | planner 500x1000                |
//! +---------------------------------+
//! ```

use rig_monitor_protocol::RenderCommand;
use tracing::warn;

use crate::model::frame::{blank, hconcat, vconcat};
use crate::model::{Frame, FrameBundle, ShapeMismatch};
use crate::state::SharedState;
use crate::views::Panel;
use crate::views::mid_camera::render_mid_camera_panel;
use crate::views::planner::render_planner_panel;
use crate::views::status::render_status_panel;

pub const CANVAS_HEIGHT: u32 = 740;
pub const CANVAS_WIDTH: u32 = 1000;

/// The composed monitoring image and the text drawn over it.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub pixels: Frame,
    pub overlays: Vec<RenderCommand>,
}

impl Canvas {
    pub fn blank() -> Self {
        Self {
            pixels: blank(CANVAS_HEIGHT, CANVAS_WIDTH),
            overlays: Vec::new(),
        }
    }
}

/// Result of one render cycle.
#[derive(Debug)]
pub enum Composition {
    Composed(Canvas),
    /// Panels did not line up; `fallback` is an all-zero canvas to show
    /// for this cycle instead.
    ShapeMismatch {
        error: ShapeMismatch,
        fallback: Canvas,
    },
}

impl Composition {
    pub fn canvas(&self) -> &Canvas {
        match self {
            Composition::Composed(canvas) => canvas,
            Composition::ShapeMismatch { fallback, .. } => fallback,
        }
    }

    pub fn into_canvas(self) -> Canvas {
        match self {
            Composition::Composed(canvas) => canvas,
            Composition::ShapeMismatch { fallback, .. } => fallback,
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, Composition::Composed(_))
    }
}

#[derive(Debug, Default)]
pub struct MonitoringCompositor {
    mismatches: u64,
}

impl MonitoringCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cycles that fell back to a blank canvas.
    pub fn mismatches(&self) -> u64 {
        self.mismatches
    }

    /// Render one cycle from the latest frames and shared state.
    ///
    /// Never fails: a panel that does not fit yields a blank canvas for this
    /// cycle only.
    pub fn render(&mut self, frames: Option<&FrameBundle>, state: &SharedState) -> Composition {
        let status = render_status_panel(
            &state.telemetry(),
            state.current_mode(),
            state.detected_mission(),
        );
        let mid = render_mid_camera_panel(frames.map(|f| &f.mid));
        let planner = state.planner_output();
        let planner = render_planner_panel(planner.as_deref());

        match planner.and_then(|planner| compose(&status, &mid, &planner)) {
            Ok(canvas) => Composition::Composed(canvas),
            Err(error) => {
                self.mismatches += 1;
                warn!(%error, total = self.mismatches, "canvas shape mismatch, showing blank canvas");
                Composition::ShapeMismatch {
                    error,
                    fallback: Canvas::blank(),
                }
            }
        }
    }
}

/// Status and mid-camera side by side, planner underneath.
pub fn compose(status: &Panel, mid: &Panel, planner: &Panel) -> Result<Canvas, ShapeMismatch> {
    let top = hconcat(&status.pixels, &mid.pixels)?;
    let pixels = vconcat(&top, &planner.pixels)?;

    let status_w = f64::from(status.pixels.width());
    let top_h = f64::from(top.height());
    let overlays = status
        .overlays_at(0.0, 0.0)
        .chain(mid.overlays_at(status_w, 0.0))
        .chain(planner.overlays_at(0.0, top_h))
        .collect();

    Ok(Canvas { pixels, overlays })
}
