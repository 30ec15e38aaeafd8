use std::fmt;

use serde::{Deserialize, Serialize};

/// What the monitor currently tells the user. Display only; nothing
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MonitorStatus {
    /// Before the first tick.
    #[default]
    Monitoring,
    InSleepPeriod,
    /// Within the close window ahead of sleep time.
    MinutesUntilSleep { minutes: u32 },
    /// Within the close window around wake time, outside the sleep period.
    TimeToWake,
    HoursUntilSleep { minutes: u32 },
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Monitoring => f.write_str("Monitoring..."),
            MonitorStatus::InSleepPeriod => f.write_str("⏰ In Sleep Period - Screen OFF!"),
            MonitorStatus::MinutesUntilSleep { minutes } => {
                write!(f, "⏰ {minutes} minutes until sleep time")
            }
            MonitorStatus::TimeToWake => f.write_str("☀️ Time to Wake Up!"),
            MonitorStatus::HoursUntilSleep { minutes } => {
                write!(f, "⏱ {:.1} hours until sleep time", f64::from(*minutes) / 60.0)
            }
        }
    }
}

/// Mutable monitor state. Lives for one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringState {
    /// Current clock time lies in `[sleep, wake)`, wrapping midnight.
    pub is_sleep_period: bool,
    /// Set on the tick the sleep period is entered, cleared on exit.
    pub sleep_reminder_sent: bool,
    /// Set once near wake time, cleared when sleep is (re-)entered.
    pub wake_reminder_sent: bool,
    /// Early-wake reminder already sent this sleep period.
    pub early_wake_sent: bool,
    pub status: MonitorStatus,
}
