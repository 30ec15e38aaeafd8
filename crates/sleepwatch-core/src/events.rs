use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::lifecycle::AppLifecycle;
use crate::monitor::MonitorStatus;
use crate::reminder::{ReminderContext, ReminderKind};

/// Every state change in the monitor produces an Event.
///
/// `ReminderDue` and the screen-check events double as instructions: the
/// engine runtime dispatches the reminder or starts/stops the timer when it
/// sees them. Observers receive the same stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MonitorStarted {
        sleep_minutes: u32,
        wake_minutes: u32,
        at: NaiveDateTime,
    },
    MonitorStopped {
        at: NaiveDateTime,
    },
    SleepPeriodEntered {
        at: NaiveDateTime,
    },
    SleepPeriodExited {
        at: NaiveDateTime,
    },
    ReminderDue {
        kind: ReminderKind,
        context: ReminderContext,
        at: NaiveDateTime,
    },
    StatusChanged {
        status: MonitorStatus,
        message: String,
        at: NaiveDateTime,
    },
    LifecycleChanged {
        from: AppLifecycle,
        to: AppLifecycle,
        at: NaiveDateTime,
    },
    ScreenCheckStarted {
        at: NaiveDateTime,
    },
    ScreenCheckStopped {
        at: NaiveDateTime,
    },
    StateSnapshot {
        is_sleep_period: bool,
        sleep_reminder_sent: bool,
        wake_reminder_sent: bool,
        status: MonitorStatus,
        message: String,
        lifecycle: AppLifecycle,
        at: NaiveDateTime,
    },
}

impl Event {
    /// The reminder kind, if this event asks for one.
    pub fn reminder_kind(&self) -> Option<ReminderKind> {
        match self {
            Event::ReminderDue { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
