pub mod config;
pub mod monitor;
pub mod schedule;
pub mod status;

use sleepwatch_core::error::Result;
use sleepwatch_core::{CoreError, SleepSchedule, SqliteScheduleStore};

pub type CommandResult = Result<()>;

const NO_SCHEDULE: &str = "no sleep schedule configured; run `schedule set`";

/// The stored schedule, or the setup hint as an error.
pub fn require_schedule(store: &SqliteScheduleStore) -> Result<SleepSchedule> {
    sleepwatch_core::load_schedule_for_monitoring(store)
        .ok_or_else(|| CoreError::Custom(NO_SCHEDULE.to_string()))
}
