//! Lock-step playback of the three camera channels and the scan channel.

use std::io::{Read, Seek};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{ChannelId, Frame, FrameBundle, RangeScanRecord};
use crate::parsers::{RecordError, RecordReader};
use crate::sources::{ChannelError, FrameSource};
use crate::state::SharedState;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{channel} channel failed: {source}")]
    Channel {
        channel: ChannelId,
        #[source]
        source: ChannelError,
    },
    #[error("scan channel failed: {0}")]
    Scan(#[from] RecordError),
}

impl SyncError {
    pub fn channel(&self) -> ChannelId {
        match self {
            SyncError::Channel { channel, .. } => *channel,
            SyncError::Scan(_) => ChannelId::Scan,
        }
    }
}

/// Outcome of one synchronized cycle.
#[derive(Debug)]
pub enum Advance {
    /// All three cameras produced a frame. `record` is `None` when the scan
    /// channel has no new complete record this cycle.
    Cycle {
        frames: FrameBundle,
        record: Option<RangeScanRecord>,
    },
    /// A camera channel ran out of frames; playback is over.
    Exhausted(ChannelId),
}

/// Why [`StreamSynchronizer::run`] returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Stopped { cycles: u64 },
    Exhausted { channel: ChannelId, cycles: u64 },
}

pub struct StreamSynchronizer<R> {
    left: Box<dyn FrameSource>,
    right: Box<dyn FrameSource>,
    mid: Box<dyn FrameSource>,
    scan: RecordReader<R>,
    cycle: u64,
    frame_interval: Duration,
}

impl<R: Read + Seek> StreamSynchronizer<R> {
    pub fn new(
        left: Box<dyn FrameSource>,
        right: Box<dyn FrameSource>,
        mid: Box<dyn FrameSource>,
        scan: RecordReader<R>,
    ) -> Self {
        Self {
            left,
            right,
            mid,
            scan,
            cycle: 0,
            frame_interval: Duration::ZERO,
        }
    }

    /// Minimum wall time between cycles in [`run`](Self::run).
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    pub fn scan_cursor(&self) -> u64 {
        self.scan.cursor()
    }

    /// Read one frame from every camera (left, right, mid) and the next scan
    /// record.
    ///
    /// Every camera must deliver; the first one that does not is reported,
    /// either as exhausted or as failed. The scan channel is only read once
    /// all cameras have delivered, so an aborted cycle consumes no scan data.
    pub fn advance(&mut self) -> Result<Advance, SyncError> {
        let Some(left) = read_channel(self.left.as_mut(), ChannelId::Left)? else {
            return Ok(Advance::Exhausted(ChannelId::Left));
        };
        let Some(right) = read_channel(self.right.as_mut(), ChannelId::Right)? else {
            return Ok(Advance::Exhausted(ChannelId::Right));
        };
        let Some(mid) = read_channel(self.mid.as_mut(), ChannelId::Mid)? else {
            return Ok(Advance::Exhausted(ChannelId::Mid));
        };

        let record = self.scan.next_record()?;
        if record.is_none() {
            debug!(cycle = self.cycle, "no complete scan record this cycle");
        }

        let frames = FrameBundle {
            cycle: self.cycle,
            left,
            right,
            mid,
        };
        self.cycle += 1;
        Ok(Advance::Cycle { frames, record })
    }

    /// Advance until a camera is exhausted, a channel fails, or a stop is
    /// requested, publishing each cycle into `state`.
    pub fn run(&mut self, state: &SharedState) -> Result<StreamEnd, SyncError> {
        let end = self.run_cycles(state);
        state.finish_streams();
        end
    }

    fn run_cycles(&mut self, state: &SharedState) -> Result<StreamEnd, SyncError> {
        info!("stream synchronizer started");
        loop {
            if state.stop_requested() {
                info!(cycles = self.cycle, "stream synchronizer stopped");
                return Ok(StreamEnd::Stopped { cycles: self.cycle });
            }
            let started = Instant::now();

            match self.advance() {
                Ok(Advance::Cycle { frames, record }) => {
                    state.publish_frames(frames);
                    if let Some(record) = record {
                        state.publish_scan_record(record);
                    }
                }
                Ok(Advance::Exhausted(channel)) => {
                    info!(%channel, cycles = self.cycle, "stream exhausted");
                    return Ok(StreamEnd::Exhausted {
                        channel,
                        cycles: self.cycle,
                    });
                }
                Err(e) => {
                    warn!(channel = %e.channel(), error = %e, "stream read failed");
                    return Err(e);
                }
            }

            if let Some(rest) = self.frame_interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

fn read_channel(source: &mut dyn FrameSource, channel: ChannelId) -> Result<Option<Frame>, SyncError> {
    source
        .read_frame()
        .map_err(|source| SyncError::Channel { channel, source })
}
