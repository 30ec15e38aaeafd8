pub mod config;
pub mod store;

pub use config::{Config, MonitorConfig, NotificationsConfig, ScheduleRules};
pub use store::{
    load_schedule_for_monitoring, MemoryScheduleStore, ScheduleStore, SqliteScheduleStore,
    SCHEDULE_KEY,
};

use std::path::PathBuf;

/// Returns `~/.config/sleepwatch[-dev]/` based on SLEEPWATCH_ENV.
///
/// Set SLEEPWATCH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SLEEPWATCH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sleepwatch-dev")
    } else {
        base_dir.join("sleepwatch")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
