use rig_monitor_protocol::LogicalSize;

use super::Panel;
use crate::model::frame::{blank, hconcat, vconcat};
use crate::model::{Axis, ShapeMismatch};
use crate::state::PlannerOutput;

pub const PLANNER_HEIGHT: u32 = 500;
pub const PLANNER_WIDTH: u32 = 1000;

/// Embed the planner's image in the top-left corner of the panel.
///
/// Padding is sized from the planner's declared logical size, not from the
/// buffer itself, so a buffer that disagrees with its declaration fails to
/// line up and is reported as a [`ShapeMismatch`].
pub fn render_planner_panel(output: Option<&PlannerOutput>) -> Result<Panel, ShapeMismatch> {
    let Some(output) = output else {
        return Ok(Panel::new(blank(PLANNER_HEIGHT, PLANNER_WIDTH)));
    };
    let LogicalSize { width, height } = output.used;

    let under_rows = PLANNER_HEIGHT.checked_sub(height).ok_or(ShapeMismatch {
        axis: Axis::Vertical,
        expected: PLANNER_HEIGHT,
        found: height,
    })?;
    let right_cols = PLANNER_WIDTH.checked_sub(width).ok_or(ShapeMismatch {
        axis: Axis::Horizontal,
        expected: PLANNER_WIDTH,
        found: width,
    })?;

    let padded = vconcat(&output.frame, &blank(under_rows, width))?;
    let padded = hconcat(&padded, &blank(PLANNER_HEIGHT, right_cols))?;
    Ok(Panel::new(padded))
}
