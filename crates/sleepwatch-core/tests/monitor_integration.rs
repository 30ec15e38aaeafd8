//! Integration tests for the sleep monitor runtime.
//!
//! Drives a full `SleepMonitor` on a paused tokio clock with a manual wall
//! clock, a recording delivery and a lifecycle channel, from schedule
//! storage through reminder delivery.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use sleepwatch_core::error::DeliveryError;
use sleepwatch_core::storage::ScheduleRules;
use sleepwatch_core::{
    load_schedule_for_monitoring, AppLifecycle, Config, ManualClock, MemoryScheduleStore,
    MonitorStatus, ReminderDelivery, ScheduleStore, SleepMonitor, SleepSchedule,
    SqliteScheduleStore,
};
use tokio::sync::mpsc;

const SLEEP_TITLE: &str = "🌙 Go to Sleep!";
const WAKE_TITLE: &str = "☀️ Time to Wake Up!";
const SCREEN_TITLE: &str = "📱 Screen is ON!";
const EARLY_TITLE: &str = "⚠️ You Woke Up Early!";

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(String, String)>>,
}

impl Recorder {
    fn titles(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    fn count(&self, title: &str) -> usize {
        self.titles().iter().filter(|t| *t == title).count()
    }
}

#[async_trait]
impl ReminderDelivery for Recorder {
    async fn send(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn night_owl() -> SleepSchedule {
    SleepSchedule::from_clock_times(
        "Ada",
        NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        FixedOffset::east_opt(0).unwrap(),
        &ScheduleRules::default(),
    )
    .unwrap()
}

struct Harness {
    clock: Arc<ManualClock>,
    recorder: Arc<Recorder>,
    monitor: SleepMonitor,
    lifecycle: mpsc::Sender<AppLifecycle>,
}

impl Harness {
    fn start(schedule: SleepSchedule, config: &Config, now: NaiveDateTime) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let recorder = Arc::new(Recorder::default());
        let mut monitor = SleepMonitor::new(schedule, config, clock.clone(), recorder.clone());
        let (lifecycle, rx) = mpsc::channel(8);
        monitor.start(rx);
        Self {
            clock,
            recorder,
            monitor,
            lifecycle,
        }
    }

    /// Move both clocks forward together.
    async fn pass(&self, secs: u64) {
        self.clock.advance(chrono::Duration::seconds(secs as i64));
        tokio::time::sleep(Duration::from_secs(secs)).await;
        settle().await;
    }

    /// Jump the wall clock, then let one check interval run.
    async fn jump_to(&self, now: NaiveDateTime) {
        self.clock.set(now);
        tokio::time::sleep(Duration::from_secs(30)).await;
        settle().await;
    }

    async fn signal(&self, next: AppLifecycle) {
        let _ = self.lifecycle.send(next).await;
        settle().await;
    }
}

async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_night_reminders() {
    let h = Harness::start(night_owl(), &Config::default(), at(22, 0));
    settle().await;

    let state = h.monitor.state();
    assert!(!state.is_sleep_period);
    assert_eq!(state.status, MonitorStatus::HoursUntilSleep { minutes: 30 });
    assert!(h.recorder.titles().is_empty());

    h.jump_to(at(22, 25)).await;
    assert_eq!(
        h.monitor.state().status,
        MonitorStatus::MinutesUntilSleep { minutes: 5 }
    );
    assert!(h.recorder.titles().is_empty());

    h.jump_to(at(22, 30)).await;
    let state = h.monitor.state();
    assert!(state.is_sleep_period);
    assert!(state.sleep_reminder_sent);
    assert_eq!(h.recorder.titles(), vec![SLEEP_TITLE]);

    // A whole night of ticks stays quiet.
    for _ in 0..20 {
        h.pass(30).await;
    }
    h.jump_to(at(3, 0)).await;
    assert_eq!(h.recorder.count(SLEEP_TITLE), 1);

    h.jump_to(at(8, 0)).await;
    let state = h.monitor.state();
    assert!(!state.is_sleep_period);
    assert!(state.wake_reminder_sent);
    assert_eq!(state.status, MonitorStatus::TimeToWake);

    h.jump_to(at(8, 5)).await;
    h.jump_to(at(8, 9)).await;
    assert_eq!(h.recorder.titles(), vec![SLEEP_TITLE, WAKE_TITLE]);

    h.jump_to(at(8, 30)).await;
    assert_eq!(
        h.monitor.state().status,
        MonitorStatus::HoursUntilSleep { minutes: 840 }
    );
}

#[tokio::test(start_paused = true)]
async fn test_sleep_reminder_body_uses_name() {
    let h = Harness::start(night_owl(), &Config::default(), at(23, 0));
    settle().await;

    let sent = h.recorder.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.starts_with("Hey Ada!"));
}

#[tokio::test(start_paused = true)]
async fn test_screen_on_during_sleep_repeats_until_backgrounded() {
    let h = Harness::start(night_owl(), &Config::default(), at(23, 0));
    settle().await;
    assert_eq!(h.recorder.titles(), vec![SLEEP_TITLE]);

    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 1);

    h.pass(120).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 2);
    h.pass(120).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 3);

    h.signal(AppLifecycle::Inactive).await;
    h.pass(600).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 3);

    // Early-wake is opt-in.
    assert_eq!(h.recorder.count(EARLY_TITLE), 0);
    assert_eq!(h.recorder.count(SLEEP_TITLE), 1);
}

#[tokio::test(start_paused = true)]
async fn test_screen_checks_go_quiet_after_wake() {
    let h = Harness::start(night_owl(), &Config::default(), at(7, 50));
    settle().await;

    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 1);

    h.jump_to(at(8, 0)).await;
    assert!(!h.monitor.state().is_sleep_period);
    assert_eq!(h.recorder.count(WAKE_TITLE), 1);

    h.pass(600).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 1);
}

#[tokio::test(start_paused = true)]
async fn test_screen_checks_do_not_resume_next_night_without_foregrounding() {
    let h = Harness::start(night_owl(), &Config::default(), at(7, 50));
    settle().await;
    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;

    h.jump_to(at(8, 5)).await;
    assert!(!h.monitor.state().is_sleep_period);
    assert_eq!(h.recorder.count(SCREEN_TITLE), 1);

    // App stays in the foreground all day into the next sleep period.
    h.jump_to(at(22, 31)).await;
    assert!(h.monitor.state().is_sleep_period);
    h.pass(240).await;
    assert_eq!(h.recorder.count(SCREEN_TITLE), 1);
    assert_eq!(h.recorder.count(SLEEP_TITLE), 2);
}

#[tokio::test(start_paused = true)]
async fn test_foreground_outside_sleep_is_silent() {
    let h = Harness::start(night_owl(), &Config::default(), at(14, 0));
    settle().await;

    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    h.pass(600).await;
    assert!(h.recorder.titles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_early_wake_reminder_when_enabled() {
    let mut config = Config::default();
    config.monitor.early_wake_reminder = true;
    let h = Harness::start(night_owl(), &config, at(2, 0));
    settle().await;

    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;

    assert_eq!(h.recorder.count(EARLY_TITLE), 1);
    assert_eq!(h.recorder.count(SCREEN_TITLE), 2);
    let sent = h.recorder.sent.lock().unwrap().clone();
    let (_, body) = sent.iter().find(|(t, _)| t == EARLY_TITLE).unwrap();
    assert!(body.contains("6.0 hours"));
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent_and_final() {
    let mut h = Harness::start(night_owl(), &Config::default(), at(23, 0));
    settle().await;
    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    let before = h.recorder.titles().len();

    h.monitor.stop();
    h.monitor.stop();
    assert!(!h.monitor.is_running());

    h.pass(600).await;
    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    assert_eq!(h.recorder.titles().len(), before);
}

#[tokio::test(start_paused = true)]
async fn test_restart_resends_sleep_reminder() {
    let mut h = Harness::start(night_owl(), &Config::default(), at(23, 0));
    settle().await;
    h.monitor.stop();

    let (_tx, rx) = mpsc::channel(1);
    h.monitor.start(rx);
    settle().await;
    assert_eq!(h.recorder.count(SLEEP_TITLE), 2);
}

#[tokio::test(start_paused = true)]
async fn test_notifications_disabled_delivers_nothing() {
    let mut config = Config::default();
    config.notifications.enabled = false;
    let h = Harness::start(night_owl(), &config, at(23, 0));
    settle().await;
    h.signal(AppLifecycle::Background).await;
    h.signal(AppLifecycle::Active).await;
    h.pass(300).await;

    assert!(h.monitor.state().sleep_reminder_sent);
    assert!(h.recorder.titles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stored_schedule_drives_monitor() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteScheduleStore::open_at(&dir.path().join("sleepwatch.db")).unwrap();
    assert!(load_schedule_for_monitoring(&store).is_none());

    store.save(&night_owl()).unwrap();
    let schedule = load_schedule_for_monitoring(&store).unwrap();
    assert_eq!(schedule.sleep_minutes(), 22 * 60 + 30);

    let h = Harness::start(schedule, &Config::default(), at(23, 15));
    settle().await;
    assert_eq!(h.recorder.titles(), vec![SLEEP_TITLE]);
}

#[test]
fn test_missing_schedule_means_no_monitoring() {
    let store = MemoryScheduleStore::new();
    assert!(load_schedule_for_monitoring(&store).is_none());
}
