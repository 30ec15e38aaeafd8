//! Sleep/wake monitor state machine.
//!
//! Like the timers that drive it, this type holds no threads. The caller
//! feeds it wall-clock readings and lifecycle changes and acts on the
//! returned events.
//!
//! ## States
//!
//! ```text
//! Awake-Far -> Awake-Near-Sleep -> Asleep -> Awake-Near-Wake -> Awake-Far
//! ```
//!
//! Only two dedup flags are kept; the states above are derived from the
//! clock on every tick. The sleep-period check always runs first, so the
//! close windows never fire while the clock is inside `[sleep, wake)`.

use chrono::NaiveDateTime;

use super::state::{MonitorStatus, MonitoringState};
use crate::events::Event;
use crate::lifecycle::{AppLifecycle, LifecycleTransition};
use crate::reminder::{ReminderContext, ReminderKind};
use crate::schedule::SleepSchedule;
use crate::storage::MonitorConfig;
use crate::window::{is_time_between, is_time_close, minutes_of_day, minutes_until};

#[derive(Debug, Clone)]
pub struct MonitorCore {
    schedule: SleepSchedule,
    close_window: u32,
    early_wake_reminder: bool,
    state: MonitoringState,
    lifecycle: AppLifecycle,
}

impl MonitorCore {
    /// Starts with fresh state and the app in the foreground.
    pub fn new(schedule: SleepSchedule, config: &MonitorConfig) -> Self {
        Self {
            schedule,
            close_window: config.close_window_minutes,
            early_wake_reminder: config.early_wake_reminder,
            state: MonitoringState::default(),
            lifecycle: AppLifecycle::Active,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &MonitoringState {
        &self.state
    }

    pub fn schedule(&self) -> &SleepSchedule {
        &self.schedule
    }

    pub fn lifecycle(&self) -> AppLifecycle {
        self.lifecycle
    }

    pub fn snapshot(&self, at: NaiveDateTime) -> Event {
        Event::StateSnapshot {
            is_sleep_period: self.state.is_sleep_period,
            sleep_reminder_sent: self.state.sleep_reminder_sent,
            wake_reminder_sent: self.state.wake_reminder_sent,
            status: self.state.status,
            message: self.state.status.to_string(),
            lifecycle: self.lifecycle,
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Drop all flags and assume the foreground, as at the start of a new run.
    pub fn reset(&mut self) {
        self.state = MonitoringState::default();
        self.lifecycle = AppLifecycle::Active;
    }

    /// Re-evaluate against `now`. Stateless apart from the dedup flags, so
    /// skipped ticks need no catch-up.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let current = minutes_of_day(&now);
        let sleep = self.schedule.sleep_minutes();
        let wake = self.schedule.wake_minutes();
        let in_sleep = is_time_between(current, sleep, wake);

        let mut events = Vec::new();
        if in_sleep != self.state.is_sleep_period {
            if in_sleep {
                events.push(Event::SleepPeriodEntered { at: now });
            } else {
                // Screen checks only run inside the sleep period.
                events.push(Event::SleepPeriodExited { at: now });
                events.push(Event::ScreenCheckStopped { at: now });
            }
        }
        self.state.is_sleep_period = in_sleep;

        let status = if in_sleep {
            if !self.state.sleep_reminder_sent {
                events.push(self.reminder_due(ReminderKind::SleepReminder, None, now));
                self.state.sleep_reminder_sent = true;
                self.state.wake_reminder_sent = false;
                self.state.early_wake_sent = false;
            }
            MonitorStatus::InSleepPeriod
        } else {
            self.state.sleep_reminder_sent = false;
            if is_time_close(current, sleep, self.close_window) {
                MonitorStatus::MinutesUntilSleep {
                    minutes: minutes_until(current, sleep),
                }
            } else if is_time_close(current, wake, self.close_window) {
                if !self.state.wake_reminder_sent {
                    events.push(self.reminder_due(ReminderKind::WakeReminder, None, now));
                    self.state.wake_reminder_sent = true;
                }
                MonitorStatus::TimeToWake
            } else {
                MonitorStatus::HoursUntilSleep {
                    minutes: minutes_until(current, sleep),
                }
            }
        };

        if status != self.state.status {
            self.state.status = status;
            events.push(Event::StatusChanged {
                status,
                message: status.to_string(),
                at: now,
            });
        }

        tracing::debug!(
            current,
            sleep,
            wake,
            in_sleep,
            status = %self.state.status,
            "Monitor tick"
        );
        events
    }

    /// React to a foreground/background change.
    pub fn on_lifecycle(&mut self, next: AppLifecycle, now: NaiveDateTime) -> Vec<Event> {
        let previous = self.lifecycle;
        self.lifecycle = next;

        let mut events = Vec::new();
        if previous != next {
            events.push(Event::LifecycleChanged {
                from: previous,
                to: next,
                at: now,
            });
        }

        match LifecycleTransition::between(previous, next) {
            LifecycleTransition::Backgrounded => {
                events.push(Event::ScreenCheckStopped { at: now });
            }
            LifecycleTransition::Foregrounded if self.state.is_sleep_period => {
                tracing::info!("Screen on during sleep period");
                events.push(self.reminder_due(ReminderKind::ScreenOnReminder, None, now));
                if self.early_wake_reminder && !self.state.early_wake_sent {
                    let minutes = minutes_until(minutes_of_day(&now), self.schedule.wake_minutes());
                    let hours = f64::from(minutes) / 60.0;
                    events.push(self.reminder_due(
                        ReminderKind::EarlyWakeReminder,
                        Some(hours),
                        now,
                    ));
                    self.state.early_wake_sent = true;
                }
                events.push(Event::ScreenCheckStarted { at: now });
            }
            LifecycleTransition::Foregrounded | LifecycleTransition::Unchanged => {}
        }
        events
    }

    /// Periodic nag while the screen stays on during the sleep period.
    /// Not deduplicated.
    pub fn on_screen_check(&self, now: NaiveDateTime) -> Vec<Event> {
        if self.lifecycle.is_foreground() && self.state.is_sleep_period {
            vec![self.reminder_due(ReminderKind::ScreenOnReminder, None, now)]
        } else {
            Vec::new()
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reminder_due(
        &self,
        kind: ReminderKind,
        hours_remaining: Option<f64>,
        at: NaiveDateTime,
    ) -> Event {
        Event::ReminderDue {
            kind,
            context: ReminderContext {
                name: self.schedule.name.clone(),
                hours_remaining,
            },
            at,
        }
    }
}
