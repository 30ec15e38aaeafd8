mod engine;
mod machine;
mod state;

pub use engine::SleepMonitor;
pub use machine::MonitorCore;
pub use state::{MonitorStatus, MonitoringState};
