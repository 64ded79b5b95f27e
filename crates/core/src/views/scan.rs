//! Top-down plot of the latest range scan.
//!
//! The decoder places the sensor at `(radius, radius)`; this panel uses the
//! reference rig's 600 px radius, so the sensor sits at the middle of the
//! bottom edge and the sweep fans out upward. Points outside the panel are
//! dropped here rather than in the decoder.

use std::sync::Arc;

use image::Rgb;
use rig_monitor_protocol::ThemeToken;
use tracing::{debug, warn};

use super::Panel;
use crate::model::frame::blank;
use crate::model::{Frame, RangeScan, RangeScanRecord};
use crate::parsers::{ScanDecodeError, ScanDecoder};

pub const SCAN_HEIGHT: u32 = 600;
pub const SCAN_WIDTH: u32 = 1200;

/// Half-width of the square drawn for each return.
const DOT_HALF_WIDTH: i64 = 2;

/// Plot every valid return of `scan`, clipped to the panel.
pub fn render_scan_panel(scan: &RangeScan) -> Panel {
    let mut pixels = blank(SCAN_HEIGHT, SCAN_WIDTH);
    let color = Rgb(ThemeToken::ScanPoint.rgb());
    for (_, (x, y)) in scan.points() {
        plot_dot(&mut pixels, i64::from(x), i64::from(y), color);
    }
    Panel::new(pixels)
}

fn plot_dot(pixels: &mut Frame, cx: i64, cy: i64, color: Rgb<u8>) {
    let (width, height) = pixels.dimensions();
    for y in cy - DOT_HALF_WIDTH..=cy + DOT_HALF_WIDTH {
        for x in cx - DOT_HALF_WIDTH..=cx + DOT_HALF_WIDTH {
            let (Ok(px), Ok(py)) = (u32::try_from(x), u32::try_from(y)) else {
                continue;
            };
            if px < width && py < height {
                pixels.put_pixel(px, py, color);
            }
        }
    }
}

/// What [`ScanView::refresh`] did with the latest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRefresh {
    /// No record yet, or the same record as last time.
    Unchanged,
    /// A new record was decoded and drawn.
    Redrawn { valid: usize },
    /// A new record failed to decode; the previous plot stays.
    Skipped(ScanDecodeError),
}

/// Decodes each new scan record once and keeps the last good plot.
#[derive(Debug)]
pub struct ScanView {
    decoder: ScanDecoder,
    seen: Option<Arc<RangeScanRecord>>,
    panel: Panel,
    skipped: u64,
}

impl ScanView {
    pub fn new(decoder: ScanDecoder) -> Self {
        Self {
            decoder,
            seen: None,
            panel: Panel::new(blank(SCAN_HEIGHT, SCAN_WIDTH)),
            skipped: 0,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Records that failed to decode so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn refresh(&mut self, record: Option<Arc<RangeScanRecord>>) -> ScanRefresh {
        let Some(record) = record else {
            return ScanRefresh::Unchanged;
        };
        if self.seen.as_ref().is_some_and(|seen| Arc::ptr_eq(seen, &record)) {
            return ScanRefresh::Unchanged;
        }
        let outcome = match self.decoder.decode(&record) {
            Ok(scan) => {
                let valid = scan.valid_count();
                self.panel = render_scan_panel(&scan);
                debug!(valid, "scan plot updated");
                ScanRefresh::Redrawn { valid }
            }
            Err(error) => {
                self.skipped += 1;
                warn!(%error, skipped = self.skipped, "skipping undecodable scan record");
                ScanRefresh::Skipped(error)
            }
        };
        self.seen = Some(record);
        outcome
    }
}
