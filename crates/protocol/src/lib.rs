pub mod commands;
pub mod mode;
pub mod telemetry;
pub mod theme;
pub mod types;

pub use commands::RenderCommand;
pub use mode::Mode;
pub use telemetry::{Gear, Telemetry};
pub use theme::ThemeToken;
pub use types::{LogicalSize, Point};
