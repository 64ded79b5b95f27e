use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::Point;

/// A single, stateless overlay instruction drawn on top of the canvas pixels.
///
/// The compositor emits these alongside the pixel buffer so that text can be
/// rasterized by whichever renderer is displaying the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a text string with its baseline-left corner at `position`,
    /// in canvas pixel coordinates.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        /// Nominal glyph height in pixels.
        font_size: f64,
        /// Stroke thickness in pixels.
        thickness: u32,
    },
}

impl RenderCommand {
    /// Approximate pixel bounds `(left, top, right, bottom)` of the command.
    ///
    /// Glyph advance is estimated from the font size; renderers with real
    /// font metrics may draw slightly narrower text.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match self {
            RenderCommand::DrawText {
                position,
                text,
                font_size,
                ..
            } => {
                let width = text.chars().count() as f64 * font_size * GLYPH_ADVANCE_RATIO;
                (
                    position.x,
                    position.y - font_size,
                    position.x + width,
                    position.y,
                )
            }
        }
    }
}

/// Horizontal advance of one glyph relative to the font size.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bounds_scale_with_length() {
        let cmd = RenderCommand::DrawText {
            position: Point::new(10.0, 50.0),
            text: "abcd".into(),
            color: ThemeToken::StatusText,
            font_size: 20.0,
            thickness: 1,
        };
        let (left, top, right, bottom) = cmd.bounds();
        assert_eq!(left, 10.0);
        assert_eq!(top, 30.0);
        assert_eq!(right, 50.0);
        assert_eq!(bottom, 50.0);
    }

    #[test]
    fn serializes_with_variant_tag() {
        let cmd = RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "Drive".into(),
            color: ThemeToken::ModeCurrent,
            font_size: 10.0,
            thickness: 2,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("DrawText"));
        assert!(json.contains("ModeCurrent"));
    }
}
