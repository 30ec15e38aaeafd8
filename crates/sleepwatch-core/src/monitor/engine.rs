//! Async runtime around [`MonitorCore`].
//!
//! Owns the main check timer, the screen-check timer and the lifecycle
//! subscription. All state lives behind one mutex that is held for exactly
//! one tick, one lifecycle change or one screen check, never across an
//! `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::machine::MonitorCore;
use super::state::MonitoringState;
use crate::clock::Clock;
use crate::events::Event;
use crate::lifecycle::AppLifecycle;
use crate::reminder::{ReminderDelivery, ReminderDispatcher};
use crate::schedule::SleepSchedule;
use crate::storage::Config;
use crate::timer::IntervalTimer;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct SleepMonitor {
    shared: Arc<Shared>,
    check_interval: Duration,
    main_timer: IntervalTimer,
    lifecycle_task: Option<JoinHandle<()>>,
}

struct Shared {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    dispatcher: ReminderDispatcher,
    events: broadcast::Sender<Event>,
    screen_check_interval: Duration,
}

struct Inner {
    core: MonitorCore,
    running: bool,
    screen_timer: IntervalTimer,
}

impl SleepMonitor {
    /// Build a stopped monitor for `schedule`.
    pub fn new(
        schedule: SleepSchedule,
        config: &Config,
        clock: Arc<dyn Clock>,
        delivery: Arc<dyn ReminderDelivery>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let dispatcher =
            ReminderDispatcher::new(delivery).with_enabled(config.notifications.enabled);
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                core: MonitorCore::new(schedule, &config.monitor),
                running: false,
                screen_timer: IntervalTimer::new(),
            }),
            clock,
            dispatcher,
            events,
            screen_check_interval: config.monitor.screen_check_interval(),
        });
        Self {
            shared,
            check_interval: config.monitor.check_interval(),
            main_timer: IntervalTimer::new(),
            lifecycle_task: None,
        }
    }

    /// Every event the monitor emits from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    pub fn state(&self) -> MonitoringState {
        self.shared.lock().core.state().clone()
    }

    pub fn snapshot(&self) -> Event {
        let now = self.shared.clock.now();
        self.shared.lock().core.snapshot(now)
    }

    /// Start monitoring: evaluate once now, then every check interval, and
    /// follow `lifecycle` until stopped. Must be called within a tokio
    /// runtime. Starting a running monitor does nothing.
    pub fn start(&mut self, lifecycle: mpsc::Receiver<AppLifecycle>) {
        {
            let mut inner = self.shared.lock();
            if inner.running {
                tracing::warn!("Sleep monitor already running");
                return;
            }
            inner.running = true;
            inner.core.reset();

            let now = self.shared.clock.now();
            let schedule = inner.core.schedule();
            let mut events = vec![Event::MonitorStarted {
                sleep_minutes: schedule.sleep_minutes(),
                wake_minutes: schedule.wake_minutes(),
                at: now,
            }];
            events.extend(inner.core.tick(now));
            self.shared.apply(&mut inner, events);
        }
        tracing::info!(
            interval_secs = self.check_interval.as_secs(),
            "Sleep monitor started"
        );

        let weak = Arc::downgrade(&self.shared);
        self.main_timer.start(self.check_interval, move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_tick();
            }
        });

        let weak = Arc::downgrade(&self.shared);
        self.lifecycle_task = Some(tokio::spawn(follow_lifecycle(weak, lifecycle)));
    }

    /// Cancel both timers and the lifecycle subscription. Safe to call any
    /// number of times.
    pub fn stop(&mut self) {
        let was_running = {
            let mut inner = self.shared.lock();
            let was_running = std::mem::replace(&mut inner.running, false);
            inner.screen_timer.cancel();
            was_running
        };
        self.main_timer.cancel();
        if let Some(task) = self.lifecycle_task.take() {
            task.abort();
        }

        if was_running {
            let _ = self.shared.events.send(Event::MonitorStopped {
                at: self.shared.clock.now(),
            });
            tracing::info!("Sleep monitor stopped");
        }
    }
}

impl Drop for SleepMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn follow_lifecycle(shared: Weak<Shared>, mut lifecycle: mpsc::Receiver<AppLifecycle>) {
    while let Some(next) = lifecycle.recv().await {
        let Some(shared) = shared.upgrade() else {
            break;
        };
        shared.on_lifecycle(next);
    }
    tracing::debug!("Lifecycle signal closed");
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_tick(self: &Arc<Self>) {
        let mut inner = self.lock();
        if !inner.running {
            return;
        }
        let events = inner.core.tick(self.clock.now());
        self.apply(&mut inner, events);
    }

    fn on_lifecycle(self: &Arc<Self>, next: AppLifecycle) {
        let mut inner = self.lock();
        if !inner.running {
            return;
        }
        tracing::debug!(%next, previous = %inner.core.lifecycle(), "Lifecycle change");
        let events = inner.core.on_lifecycle(next, self.clock.now());
        self.apply(&mut inner, events);
    }

    fn on_screen_check(self: &Arc<Self>) {
        let mut inner = self.lock();
        if !inner.running {
            return;
        }
        let events = inner.core.on_screen_check(self.clock.now());
        if !events.is_empty() {
            tracing::info!("Screen still on during sleep period");
        }
        self.apply(&mut inner, events);
    }

    /// Carry out what the core asked for, then publish.
    fn apply(self: &Arc<Self>, inner: &mut Inner, events: Vec<Event>) {
        for event in events {
            match &event {
                Event::ReminderDue { kind, context, .. } => {
                    self.dispatcher.dispatch(*kind, context);
                }
                Event::ScreenCheckStarted { .. } => {
                    let weak = Arc::downgrade(self);
                    inner.screen_timer.start(self.screen_check_interval, move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.on_screen_check();
                        }
                    });
                }
                Event::ScreenCheckStopped { .. } => {
                    inner.screen_timer.cancel();
                }
                Event::SleepPeriodEntered { .. } => tracing::info!("Entered sleep period"),
                Event::SleepPeriodExited { .. } => tracing::info!("Left sleep period"),
                _ => {}
            }
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }
}
