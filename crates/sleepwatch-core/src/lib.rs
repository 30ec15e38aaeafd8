//! # Sleepwatch Core Library
//!
//! This library provides the core logic for Sleepwatch, a sleep/wake
//! monitoring engine. The CLI binary is a thin layer over the same library:
//! everything it does is available here.
//!
//! ## Architecture
//!
//! - **Window math**: pure minute-of-day arithmetic on a 24-hour circle
//! - **Monitor**: a wall-clock state machine ([`MonitorCore`]) driven by the
//!   caller, wrapped by an async runtime ([`SleepMonitor`]) that owns the timers
//! - **Storage**: SQLite-backed schedule persistence and TOML configuration
//! - **Reminders**: rendering plus fire-and-forget delivery behind a trait
//!
//! ## Key Components
//!
//! - [`SleepMonitor`]: Periodic sleep/wake checks and screen-on reminders
//! - [`SleepSchedule`]: The user's bedtime and wake time
//! - [`ScheduleStore`]: Where the schedule lives between runs
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod monitor;
pub mod reminder;
pub mod schedule;
pub mod storage;
pub mod timer;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DeliveryError, StoreError, ValidationError};
pub use events::Event;
pub use lifecycle::{AppLifecycle, LifecycleTransition};
pub use monitor::{MonitorCore, MonitorStatus, MonitoringState, SleepMonitor};
pub use reminder::{
    LogDelivery, Reminder, ReminderContext, ReminderDelivery, ReminderDispatcher, ReminderKind,
    StdoutDelivery,
};
pub use schedule::SleepSchedule;
pub use storage::{
    load_schedule_for_monitoring, Config, MemoryScheduleStore, ScheduleStore,
    SqliteScheduleStore,
};
pub use timer::IntervalTimer;
