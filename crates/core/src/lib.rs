pub mod compositor;
pub mod config;
pub mod input;
pub mod model;
pub mod parsers;
pub mod sources;
pub mod state;
pub mod sync;
pub mod views;

pub use compositor::{Canvas, Composition, MonitoringCompositor};
pub use config::MonitorConfig;
pub use input::{Dispatch, InputDispatcher, KeySource};
pub use state::SharedState;
pub use sync::{Advance, StreamEnd, StreamSynchronizer, SyncError};
