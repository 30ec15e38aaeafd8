use chrono::{Local, Offset};
use clap::Subcommand;
use sleepwatch_core::schedule::parse_clock_time;
use sleepwatch_core::{Config, CoreError, ScheduleStore, SleepSchedule, SqliteScheduleStore};

use super::{require_schedule, CommandResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Save a new sleep schedule
    Set {
        /// Name used in reminders
        #[arg(long)]
        name: String,
        /// Bedtime, 24-hour HH:MM
        #[arg(long)]
        sleep: String,
        /// Wake time, 24-hour HH:MM
        #[arg(long)]
        wake: String,
        /// Accept a sleep window longer than schedule.max_sleep_hours
        #[arg(long)]
        force: bool,
    },
    /// Show the stored schedule
    Show,
    /// Remove the stored schedule
    Clear,
}

pub fn run(action: ScheduleAction) -> CommandResult {
    let store = SqliteScheduleStore::open()?;
    match action {
        ScheduleAction::Set {
            name,
            sleep,
            wake,
            force,
        } => {
            let rules = Config::load_or_default().schedule;
            let now = Local::now();
            let schedule = SleepSchedule::from_clock_times(
                &name,
                parse_clock_time(&sleep)?,
                parse_clock_time(&wake)?,
                now.date_naive(),
                now.offset().fix(),
                &rules,
            )?;
            if schedule.is_unusually_long(&rules) && !force {
                return Err(CoreError::Custom(format!(
                    "{:.1} hours is more than the usual {:.1}; pass --force to keep it",
                    schedule.sleep_duration_hours, rules.max_sleep_hours
                )));
            }
            store.save(&schedule)?;
            tracing::info!(
                sleep = %schedule.sleep_display(),
                wake = %schedule.wake_display(),
                "Schedule saved"
            );
            print_schedule(&schedule)?;
        }
        ScheduleAction::Show => {
            let schedule = require_schedule(&store)?;
            print_schedule(&schedule)?;
        }
        ScheduleAction::Clear => {
            store.clear()?;
            println!("schedule cleared");
        }
    }
    Ok(())
}

/// Stored fields plus the 12-hour display strings.
fn print_schedule(schedule: &SleepSchedule) -> CommandResult {
    let mut json = serde_json::to_value(schedule)?;
    if let Some(obj) = json.as_object_mut() {
        obj.insert("sleepDisplay".into(), schedule.sleep_display().into());
        obj.insert("wakeDisplay".into(), schedule.wake_display().into());
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
