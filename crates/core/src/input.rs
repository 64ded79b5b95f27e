//! Keyboard command handling for the render loop.
//!
//! | key       | effect                                      |
//! |-----------|---------------------------------------------|
//! | `0`       | mode 0, detected mission reset to 0          |
//! | `1`..`5`  | mode N                                      |
//! | space     | stop every loop and close the display       |

use std::io;
use std::time::Duration;

use rig_monitor_protocol::Mode;
use tracing::{debug, info};

use crate::state::SharedState;

/// A keyboard (or anything that behaves like one) polled once per cycle.
pub trait KeySource {
    /// Wait at most `timeout` for one key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>>;
}

/// What the render loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Shutdown,
}

pub struct InputDispatcher<K> {
    keys: K,
    poll_timeout: Duration,
}

impl<K: KeySource> InputDispatcher<K> {
    pub fn new(keys: K, poll_timeout: Duration) -> Self {
        Self { keys, poll_timeout }
    }

    /// Poll for at most one key and apply it to `state`.
    pub fn poll(&mut self, state: &SharedState) -> io::Result<Dispatch> {
        Ok(match self.keys.poll_key(self.poll_timeout)? {
            Some(key) => dispatch_key(key, state),
            None => Dispatch::Continue,
        })
    }
}

/// Apply a single key press to `state`. Unrecognized keys are ignored.
pub fn dispatch_key(key: char, state: &SharedState) -> Dispatch {
    match key {
        ' ' => {
            info!("shutdown requested from keyboard");
            state.request_stop();
            Dispatch::Shutdown
        }
        '0'..='5' => {
            let Some(mode) = key.to_digit(10).and_then(|d| Mode::from_index(d as u8)) else {
                return Dispatch::Continue;
            };
            state.set_current_mode(mode);
            if mode == Mode::Default {
                state.set_detected_mission(Mode::Default);
            }
            debug!(mode = mode.label(), "mode selected");
            Dispatch::Continue
        }
        _ => Dispatch::Continue,
    }
}
