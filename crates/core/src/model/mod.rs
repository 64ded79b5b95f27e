pub mod bundle;
pub mod frame;
pub mod scan;

pub use bundle::{ChannelId, FrameBundle};
pub use frame::{Axis, Frame, ShapeMismatch};
pub use scan::{RangeScan, RangeScanRecord, ScanSample};
