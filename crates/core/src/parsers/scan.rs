use std::ops::Range;

use thiserror::Error;

use crate::model::scan::{ANGLE_STEP_DEG, RangeScan, RangeScanRecord, SAMPLE_COUNT, ScanSample};

/// Token positions holding the 361 distance readings. Fixed by the scanner's
/// telegram layout.
pub const DISTANCE_WINDOW: Range<usize> = 116..477;

/// Returns closer than this are sensor noise.
pub const MIN_DISTANCE_CM: f64 = 2.0;

/// Half-width of the display space the points are projected into.
pub const DEFAULT_RADIUS: i32 = 600;
/// Largest accepted display radius.
pub const MAX_RADIUS: i32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanDecodeError {
    #[error("record truncated: {found} tokens, need at least {required}")]
    Truncated { found: usize, required: usize },
    #[error("token {index} is not hexadecimal: {token:?}")]
    InvalidToken { index: usize, token: String },
}

/// Turns a raw scan record into a projected [`RangeScan`].
#[derive(Debug, Clone, Copy)]
pub struct ScanDecoder {
    radius: i32,
}

impl Default for ScanDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

impl ScanDecoder {
    pub fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// Decode one record.
    ///
    /// Tokens are separated by whitespace and control bytes, so framing bytes
    /// glued to the first or last token never reach the number parser. The
    /// distance window is read as hexadecimal millimeters and converted to
    /// centimeters. Coordinates are not clipped to any canvas.
    pub fn decode(&self, record: &RangeScanRecord) -> Result<RangeScan, ScanDecodeError> {
        let tokens: Vec<&str> = record
            .as_str()
            .split(|c: char| c.is_ascii_whitespace() || c.is_ascii_control())
            .filter(|t| !t.is_empty())
            .collect();
        let truncated = ScanDecodeError::Truncated {
            found: tokens.len(),
            required: DISTANCE_WINDOW.end,
        };
        let Some(window) = tokens.get(DISTANCE_WINDOW) else {
            return Err(truncated);
        };

        let mut samples = Vec::with_capacity(SAMPLE_COUNT);
        for (theta, token) in window.iter().enumerate() {
            let raw = u32::from_str_radix(token, 16).map_err(|_| {
                ScanDecodeError::InvalidToken {
                    index: DISTANCE_WINDOW.start + theta,
                    token: (*token).to_string(),
                }
            })?;
            samples.push(self.project(theta, f64::from(raw) / 10.0));
        }

        RangeScan::from_samples(samples).ok_or(truncated)
    }

    /// Project the reading at angular index `theta` (0.5° steps) to display
    /// coordinates with the sensor at `(radius, radius)` and y growing down.
    pub fn project(&self, theta: usize, distance_cm: f64) -> ScanSample {
        if distance_cm < MIN_DISTANCE_CM {
            return ScanSample::NoReturn;
        }
        let angle = (ANGLE_STEP_DEG * theta as f64).to_radians();
        let x = (distance_cm * angle.cos()).round_ties_even() as i32;
        let y = (distance_cm * angle.sin()).round_ties_even() as i32;
        ScanSample::Point {
            distance_cm,
            x: self.radius.saturating_add(x),
            y: self.radius.saturating_sub(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::RecordReader;
    use std::io::Cursor;

    fn framed(text: String) -> RangeScanRecord {
        let mut reader = RecordReader::new(Cursor::new(text.into_bytes()));
        reader.next_record().unwrap().unwrap()
    }

    fn record_with(distances: &[&str]) -> RangeScanRecord {
        let mut tokens = vec!["0"; DISTANCE_WINDOW.start];
        tokens.extend_from_slice(distances);
        tokens.extend(["0"; 20]);
        RangeScanRecord::new(format!("{}\u{3}", tokens.join(" ")))
    }

    #[test]
    fn uniform_short_returns_lie_on_a_radius_two_semicircle() {
        // hex 19 = 25 mm = 2.5 cm
        let record = record_with(&["19"; SAMPLE_COUNT]);
        let scan = ScanDecoder::default().decode(&record).unwrap();

        assert_eq!(scan.samples().len(), SAMPLE_COUNT);
        assert_eq!(scan.valid_count(), SAMPLE_COUNT);
        for (_, (x, y)) in scan.points() {
            let dx = x - DEFAULT_RADIUS;
            let dy = y - DEFAULT_RADIUS;
            assert_eq!(dx.abs().max(dy.abs()), 2, "point ({x}, {y})");
            assert!(dy <= 0, "point ({x}, {y}) below the sensor");
        }
        assert_eq!(scan.get(0).and_then(ScanSample::coords), Some((602, 600)));
        assert_eq!(scan.get(180).and_then(ScanSample::coords), Some((600, 598)));
        assert_eq!(scan.get(360).and_then(ScanSample::coords), Some((598, 600)));
    }

    #[test]
    fn readings_below_two_centimeters_are_sentinels() {
        let mut distances = vec!["14"; SAMPLE_COUNT]; // 2.0 cm
        distances[5] = "13"; // 1.9 cm
        distances[6] = "0";
        let scan = ScanDecoder::default().decode(&record_with(&distances)).unwrap();

        assert_eq!(scan.get(5), Some(&ScanSample::NoReturn));
        assert_eq!(scan.get(6), Some(&ScanSample::NoReturn));
        assert!(scan.get(4).is_some_and(ScanSample::is_return));
        assert_eq!(scan.valid_count(), SAMPLE_COUNT - 2);
    }

    #[test]
    fn projection_matches_polar_conversion() {
        let decoder = ScanDecoder::new(100);
        // 100 cm at 45° (index 90)
        let ScanSample::Point { distance_cm, x, y } = decoder.project(90, 100.0) else {
            panic!("expected a point");
        };
        assert_eq!(distance_cm, 100.0);
        assert_eq!(x, 171);
        assert_eq!(y, 29);
    }

    #[test]
    fn samples_follow_angle_order() {
        let distances: Vec<String> = (0..SAMPLE_COUNT).map(|i| format!("{:x}", 1000 + i)).collect();
        let refs: Vec<&str> = distances.iter().map(String::as_str).collect();
        let scan = ScanDecoder::default().decode(&record_with(&refs)).unwrap();
        for (theta, sample) in scan.samples().iter().enumerate() {
            let ScanSample::Point { distance_cm, .. } = sample else {
                panic!("expected a point at {theta}");
            };
            assert!((distance_cm - (1000 + theta) as f64 / 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn short_record_is_truncated() {
        let record = RangeScanRecord::new("sRA LMDscandata 1 2 3\u{3}");
        let err = ScanDecoder::default().decode(&record).unwrap_err();
        assert_eq!(
            err,
            ScanDecodeError::Truncated {
                found: 5,
                required: 477
            }
        );
    }

    #[test]
    fn non_hex_token_is_reported_with_its_position() {
        let mut distances = vec!["19"; SAMPLE_COUNT];
        distances[3] = "zz";
        let err = ScanDecoder::default().decode(&record_with(&distances)).unwrap_err();
        assert_eq!(
            err,
            ScanDecodeError::InvalidToken {
                index: 119,
                token: "zz".into()
            }
        );
    }

    #[test]
    fn minimal_record_with_glued_terminator_decodes() {
        let mut tokens = vec!["0"; DISTANCE_WINDOW.start];
        tokens.extend(["19"; SAMPLE_COUNT]);
        let record = framed(format!("{}\u{3}", tokens.join(" ")));
        assert!(record.as_str().ends_with("19\u{3}"));

        let scan = ScanDecoder::default().decode(&record).unwrap();
        assert_eq!(scan.valid_count(), SAMPLE_COUNT);
        assert_eq!(scan.get(360).and_then(ScanSample::coords), Some((598, 600)));
    }

    #[test]
    fn start_byte_glued_to_first_token_is_ignored() {
        let mut tokens = vec!["0"; DISTANCE_WINDOW.start];
        tokens.extend(["19"; SAMPLE_COUNT]);
        let record = framed(format!("\u{2}{}\u{3}", tokens.join(" ")));
        let scan = ScanDecoder::default().decode(&record).unwrap();
        assert_eq!(scan.get(0).and_then(ScanSample::coords), Some((602, 600)));
    }

    #[test]
    fn huge_radius_saturates_instead_of_overflowing() {
        let ScanSample::Point { x, y, .. } = ScanDecoder::new(i32::MAX).project(0, 100.0) else {
            panic!("expected a point");
        };
        assert_eq!(x, i32::MAX);
        assert_eq!(y, i32::MAX);
    }
}
