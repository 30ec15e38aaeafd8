use sleepwatch_core::{Clock, Config, MonitorCore, SqliteScheduleStore, SystemClock};

use super::{require_schedule, CommandResult};

/// One evaluation against the current time. Nothing is dispatched.
pub fn run() -> CommandResult {
    let store = SqliteScheduleStore::open()?;
    let schedule = require_schedule(&store)?;
    let config = Config::load_or_default();

    let now = SystemClock.now();
    let mut core = MonitorCore::new(schedule, &config.monitor);
    core.tick(now);
    println!("{}", serde_json::to_string_pretty(&core.snapshot(now))?);
    Ok(())
}
