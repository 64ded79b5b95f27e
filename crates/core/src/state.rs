//! Process-wide store shared by the stream, telemetry and planner producers
//! and read by the compositor.
//!
//! Every field group is an immutable snapshot that producers replace whole.
//! Last writer wins and readers may see a slightly stale group; no reader
//! needs two groups to be consistent with each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};
use rig_monitor_protocol::{LogicalSize, Mode, Telemetry};

use crate::model::{Frame, FrameBundle, RangeScanRecord};

/// The planner's rendered image and how much of it is meaningful.
#[derive(Debug, Clone)]
pub struct PlannerOutput {
    pub frame: Frame,
    pub used: LogicalSize,
}

#[derive(Default)]
pub struct SharedState {
    current_mode: AtomicU8,
    detected_mission: AtomicU8,
    stop: AtomicBool,
    streams_finished: AtomicBool,
    scan_record: RwLock<Option<Arc<RangeScanRecord>>>,
    frames: RwLock<Option<Arc<FrameBundle>>>,
    planner: RwLock<Option<Arc<PlannerOutput>>>,
    telemetry: RwLock<Telemetry>,
    readiness: Readiness,
}

impl SharedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current_mode.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_current_mode(&self, mode: Mode) {
        self.current_mode.store(mode.index(), Ordering::Relaxed);
    }

    pub fn detected_mission(&self) -> Mode {
        Mode::from_index(self.detected_mission.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_detected_mission(&self, mode: Mode) {
        self.detected_mission.store(mode.index(), Ordering::Relaxed);
    }

    pub fn telemetry(&self) -> Telemetry {
        *self.telemetry.read()
    }

    pub fn set_telemetry(&self, telemetry: Telemetry) {
        *self.telemetry.write() = telemetry;
    }

    pub fn planner_output(&self) -> Option<Arc<PlannerOutput>> {
        self.planner.read().clone()
    }

    pub fn set_planner_output(&self, frame: Frame, used: LogicalSize) {
        *self.planner.write() = Some(Arc::new(PlannerOutput { frame, used }));
    }

    pub fn scan_record(&self) -> Option<Arc<RangeScanRecord>> {
        self.scan_record.read().clone()
    }

    pub fn publish_scan_record(&self, record: RangeScanRecord) {
        *self.scan_record.write() = Some(Arc::new(record));
        self.check_ready();
    }

    pub fn frames(&self) -> Option<Arc<FrameBundle>> {
        self.frames.read().clone()
    }

    pub fn publish_frames(&self, bundle: FrameBundle) {
        *self.frames.write() = Some(Arc::new(bundle));
        self.check_ready();
    }

    /// Ask every loop to finish at the top of its next iteration.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.readiness.wake();
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Mark that the stream producer has returned and nothing more will be
    /// published. Wakes readiness waiters.
    pub fn finish_streams(&self) {
        self.streams_finished.store(true, Ordering::Release);
        self.readiness.wake();
    }

    pub fn streams_finished(&self) -> bool {
        self.streams_finished.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_set()
    }

    /// Block until frames and a scan record have both been published, a stop
    /// is requested, the streams finish, or `timeout` passes. Returns whether
    /// the state is ready.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        self.readiness
            .wait(timeout, || self.stop_requested() || self.streams_finished())
    }

    fn check_ready(&self) {
        if !self.readiness.is_set()
            && self.frames.read().is_some()
            && self.scan_record.read().is_some()
        {
            self.readiness.set();
        }
    }
}

/// One-shot signal: once set it stays set.
#[derive(Default)]
struct Readiness {
    ready: Mutex<bool>,
    cond: Condvar,
}

impl Readiness {
    fn is_set(&self) -> bool {
        *self.ready.lock()
    }

    fn set(&self) {
        *self.ready.lock() = true;
        self.cond.notify_all();
    }

    fn wake(&self) {
        let _guard = self.ready.lock();
        self.cond.notify_all();
    }

    fn wait(&self, timeout: Duration, cancelled: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut ready = self.ready.lock();
        while !*ready && !cancelled() {
            if self.cond.wait_until(&mut ready, deadline).timed_out() {
                break;
            }
        }
        *ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::frame::blank;
    use std::thread;

    fn bundle() -> FrameBundle {
        FrameBundle {
            cycle: 0,
            left: blank(2, 2),
            right: blank(2, 2),
            mid: blank(2, 2),
        }
    }

    #[test]
    fn starts_in_default_mode_without_data() {
        let state = SharedState::new();
        assert_eq!(state.current_mode(), Mode::Default);
        assert_eq!(state.detected_mission(), Mode::Default);
        assert!(state.frames().is_none());
        assert!(state.planner_output().is_none());
        assert!(!state.is_ready());
    }

    #[test]
    fn ready_only_after_frames_and_scan() {
        let state = SharedState::new();
        state.publish_frames(bundle());
        assert!(!state.is_ready());
        state.publish_scan_record(RangeScanRecord::new("x\u{3}"));
        assert!(state.is_ready());
        assert!(state.wait_ready(Duration::ZERO));
    }

    #[test]
    fn waiter_wakes_when_producer_publishes() {
        let state = SharedState::new();
        let producer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                state.publish_scan_record(RangeScanRecord::new("x\u{3}"));
                state.publish_frames(bundle());
            })
        };
        assert!(state.wait_ready(Duration::from_secs(5)));
        producer.join().unwrap();
    }

    #[test]
    fn stop_releases_waiters_without_readiness() {
        let state = SharedState::new();
        let stopper = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.request_stop())
        };
        assert!(!state.wait_ready(Duration::from_secs(5)));
        stopper.join().unwrap();
        assert!(state.stop_requested());
    }

    #[test]
    fn snapshots_are_replaced_whole() {
        let state = SharedState::new();
        state.set_planner_output(blank(4, 4), LogicalSize::new(4, 4));
        let before = state.planner_output().unwrap();
        state.set_planner_output(blank(8, 8), LogicalSize::new(8, 8));
        assert_eq!(before.used, LogicalSize::new(4, 4));
        assert_eq!(state.planner_output().unwrap().used, LogicalSize::new(8, 8));
    }

    #[test]
    fn finished_streams_release_waiters_without_readiness() {
        let state = SharedState::new();
        state.publish_frames(bundle());
        let producer = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.finish_streams())
        };
        let started = Instant::now();
        assert!(!state.wait_ready(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(5));
        producer.join().unwrap();
        assert!(state.streams_finished());
        assert!(!state.is_ready());
    }
}
