use image::RgbImage;
use thiserror::Error;

/// An 8-bit, 3-channel pixel buffer (height × width × 3).
pub type Frame = RgbImage;

/// Bytes per pixel of every [`Frame`].
pub const CHANNEL_DEPTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Side by side; heights must agree.
    Horizontal,
    /// Stacked; widths must agree.
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot concatenate along {axis:?} axis: expected {expected} px, found {found} px")]
pub struct ShapeMismatch {
    pub axis: Axis,
    pub expected: u32,
    pub found: u32,
}

/// All-zero frame of the given size.
pub fn blank(height: u32, width: u32) -> Frame {
    RgbImage::new(width, height)
}

/// `(height, width, depth)` of a frame.
pub fn shape(frame: &Frame) -> (u32, u32, u32) {
    (frame.height(), frame.width(), CHANNEL_DEPTH)
}

pub fn is_all_zero(frame: &Frame) -> bool {
    frame.as_raw().iter().all(|&b| b == 0)
}

/// Place `right` directly after `left`.
pub fn hconcat(left: &Frame, right: &Frame) -> Result<Frame, ShapeMismatch> {
    if left.height() != right.height() {
        return Err(ShapeMismatch {
            axis: Axis::Horizontal,
            expected: left.height(),
            found: right.height(),
        });
    }
    let mut out = RgbImage::new(left.width() + right.width(), left.height());
    image::imageops::replace(&mut out, left, 0, 0);
    image::imageops::replace(&mut out, right, i64::from(left.width()), 0);
    Ok(out)
}

/// Place `bottom` directly below `top`.
pub fn vconcat(top: &Frame, bottom: &Frame) -> Result<Frame, ShapeMismatch> {
    if top.width() != bottom.width() {
        return Err(ShapeMismatch {
            axis: Axis::Vertical,
            expected: top.width(),
            found: bottom.width(),
        });
    }
    let mut out = RgbImage::new(top.width(), top.height() + bottom.height());
    image::imageops::replace(&mut out, top, 0, 0);
    image::imageops::replace(&mut out, bottom, 0, i64::from(top.height()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn filled(height: u32, width: u32, value: u8) -> Frame {
        RgbImage::from_pixel(width, height, Rgb([value; 3]))
    }

    #[test]
    fn hconcat_places_right_after_left() {
        let out = hconcat(&filled(2, 3, 1), &filled(2, 4, 2)).unwrap();
        assert_eq!(shape(&out), (2, 7, 3));
        assert_eq!(out.get_pixel(2, 1), &Rgb([1; 3]));
        assert_eq!(out.get_pixel(3, 0), &Rgb([2; 3]));
    }

    #[test]
    fn vconcat_places_bottom_below_top() {
        let out = vconcat(&filled(2, 3, 1), &filled(5, 3, 2)).unwrap();
        assert_eq!(shape(&out), (7, 3, 3));
        assert_eq!(out.get_pixel(0, 1), &Rgb([1; 3]));
        assert_eq!(out.get_pixel(0, 2), &Rgb([2; 3]));
    }

    #[test]
    fn mismatched_heights_are_reported() {
        let err = hconcat(&filled(2, 3, 0), &filled(4, 3, 0)).unwrap_err();
        assert_eq!(err.axis, Axis::Horizontal);
        assert_eq!(err.expected, 2);
        assert_eq!(err.found, 4);
    }

    #[test]
    fn zero_width_padding_is_allowed() {
        let out = hconcat(&filled(2, 3, 9), &blank(2, 0)).unwrap();
        assert_eq!(shape(&out), (2, 3, 3));
    }
}
