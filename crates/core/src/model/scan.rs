use serde::Serialize;

/// Number of angular samples in one sweep.
pub const SAMPLE_COUNT: usize = 361;
/// Angular distance between consecutive samples, in degrees.
pub const ANGLE_STEP_DEG: f64 = 0.5;

/// One complete, delimiter-terminated record of the range-scan byte stream,
/// terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeScanRecord(String);

impl RangeScanRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes, which is how far the stream cursor moved to read it.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

/// One angular sample of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanSample {
    /// No usable return (too close to the sensor to be distinguished from noise).
    NoReturn,
    /// A valid return projected to display coordinates.
    Point { distance_cm: f64, x: i32, y: i32 },
}

impl ScanSample {
    pub fn is_return(&self) -> bool {
        matches!(self, ScanSample::Point { .. })
    }

    pub fn coords(&self) -> Option<(i32, i32)> {
        match *self {
            ScanSample::Point { x, y, .. } => Some((x, y)),
            ScanSample::NoReturn => None,
        }
    }
}

/// A 180° sweep of exactly [`SAMPLE_COUNT`] samples in increasing angle order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeScan {
    samples: Vec<ScanSample>,
}

impl RangeScan {
    /// Returns `None` unless exactly [`SAMPLE_COUNT`] samples are given.
    pub fn from_samples(samples: Vec<ScanSample>) -> Option<Self> {
        (samples.len() == SAMPLE_COUNT).then_some(Self { samples })
    }

    pub fn samples(&self) -> &[ScanSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&ScanSample> {
        self.samples.get(index)
    }

    /// Angle of sample `index` in degrees.
    pub fn angle_deg(index: usize) -> f64 {
        index as f64 * ANGLE_STEP_DEG
    }

    /// Display coordinates of every valid return, with its angular index.
    pub fn points(&self) -> impl Iterator<Item = (usize, (i32, i32))> + '_ {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.coords().map(|c| (i, c)))
    }

    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_return()).count()
    }
}
