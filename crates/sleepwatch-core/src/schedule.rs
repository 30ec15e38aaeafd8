//! The user's sleep/wake schedule.
//!
//! Sleep and wake are stored as full ISO-8601 timestamps, but only their
//! hour and minute (in the stored offset) matter. The derived duration is
//! computed once here and never recomputed by the monitor.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::config::ScheduleRules;
use crate::window::{minutes_of_day, sleep_hours};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSchedule {
    /// Display name used in reminder text. Older records may lack it.
    #[serde(default)]
    pub name: String,
    pub sleep_time: DateTime<FixedOffset>,
    pub wake_time: DateTime<FixedOffset>,
    /// `(wake - sleep) mod 24h`, in hours.
    #[serde(rename = "sleepDuration")]
    pub sleep_duration_hours: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl SleepSchedule {
    /// Build and validate a schedule from two timestamps.
    ///
    /// # Errors
    /// Returns an error if the name is blank or the sleep window is shorter
    /// than `rules.min_sleep_hours`.
    pub fn new(
        name: &str,
        sleep_time: DateTime<FixedOffset>,
        wake_time: DateTime<FixedOffset>,
        rules: &ScheduleRules,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let hours = sleep_hours(minutes_of_day(&sleep_time), minutes_of_day(&wake_time));
        if hours < rules.min_sleep_hours {
            return Err(ValidationError::SleepTooShort {
                hours,
                min_hours: rules.min_sleep_hours,
            });
        }

        Ok(Self {
            name: name.to_string(),
            sleep_time,
            wake_time,
            sleep_duration_hours: hours,
            created_at: Utc::now(),
        })
    }

    /// Build a schedule from two clock times anchored on `date`.
    ///
    /// Wake lands on the following day when it is not after sleep, so the
    /// stored timestamps read naturally.
    pub fn from_clock_times(
        name: &str,
        sleep: NaiveTime,
        wake: NaiveTime,
        date: NaiveDate,
        offset: FixedOffset,
        rules: &ScheduleRules,
    ) -> Result<Self, ValidationError> {
        let wake_date = if wake <= sleep {
            date + Duration::days(1)
        } else {
            date
        };
        let sleep_time = anchor(date, sleep, offset)?;
        let wake_time = anchor(wake_date, wake, offset)?;
        Self::new(name, sleep_time, wake_time, rules)
    }

    pub fn sleep_minutes(&self) -> u32 {
        minutes_of_day(&self.sleep_time)
    }

    pub fn wake_minutes(&self) -> u32 {
        minutes_of_day(&self.wake_time)
    }

    /// Longer than the configured comfortable maximum. Accepted, but the
    /// caller should confirm with the user.
    pub fn is_unusually_long(&self, rules: &ScheduleRules) -> bool {
        self.sleep_duration_hours > rules.max_sleep_hours
    }

    /// Sleep time on a 12-hour clock, e.g. `10:30 PM`.
    pub fn sleep_display(&self) -> String {
        self.sleep_time.format("%I:%M %p").to_string()
    }

    /// Wake time on a 12-hour clock, e.g. `08:00 AM`.
    pub fn wake_display(&self) -> String {
        self.wake_time.format("%I:%M %p").to_string()
    }
}

/// Parse `HH:MM` (24-hour).
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidClockTime(s.to_string()))
}

fn anchor(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| ValidationError::InvalidClockTime(time.format("%H:%M").to_string()))
}
