//! Reminder kinds, their text, and fire-and-forget delivery.
//!
//! The dispatcher does not dedupe; the monitor decides when to call it.
//! Delivery runs on a spawned task and is never awaited, so a slow or
//! failing backend cannot stall a tick. Failures are logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    SleepReminder,
    WakeReminder,
    ScreenOnReminder,
    EarlyWakeReminder,
}

/// Values interpolated into reminder text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderContext {
    pub name: String,
    /// Hours left until wake time, for the early-wake reminder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<f64>,
}

impl ReminderContext {
    pub fn for_user(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hours_remaining: None,
        }
    }
}

/// A rendered reminder, ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub title: String,
    pub body: String,
}

impl Reminder {
    pub fn render(kind: ReminderKind, ctx: &ReminderContext) -> Self {
        let name = ctx.name.trim();
        let (title, body) = match kind {
            ReminderKind::SleepReminder => (
                "🌙 Go to Sleep!",
                format!(
                    "Hey {}! It's your sleep time. Please turn off the screen and go to bed now.",
                    or_there(name)
                ),
            ),
            ReminderKind::WakeReminder => (
                "☀️ Time to Wake Up!",
                format!("Good morning {}! Time to start your day.", or_there(name)),
            ),
            ReminderKind::ScreenOnReminder => (
                "📱 Screen is ON!",
                if name.is_empty() {
                    "Your screen is on during sleep time. Please turn it off and go to sleep!"
                        .to_string()
                } else {
                    format!(
                        "{name}, your screen is on during sleep time. Please turn it off and go to sleep!"
                    )
                },
            ),
            ReminderKind::EarlyWakeReminder => (
                "⚠️ You Woke Up Early!",
                match ctx.hours_remaining {
                    Some(hours) => format!(
                        "You have {hours:.1} hours left to sleep. Please go back to bed!"
                    ),
                    None => "You still have time left to sleep. Please go back to bed!".to_string(),
                },
            ),
        };
        Self {
            kind,
            title: title.to_string(),
            body,
        }
    }
}

fn or_there(name: &str) -> &str {
    if name.is_empty() {
        "there"
    } else {
        name
    }
}

/// Where reminders end up: an OS notification center, a push service, a log.
#[async_trait]
pub trait ReminderDelivery: Send + Sync {
    async fn send(&self, title: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Delivery that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

#[async_trait]
impl ReminderDelivery for LogDelivery {
    async fn send(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
        tracing::info!(title, body, "Reminder");
        Ok(())
    }
}

/// Delivery that prints one JSON object per reminder on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDelivery;

#[async_trait]
impl ReminderDelivery for StdoutDelivery {
    async fn send(&self, title: &str, body: &str) -> Result<(), DeliveryError> {
        use tokio::io::AsyncWriteExt;

        let mut line = serde_json::to_string(&serde_json::json!({
            "type": "reminder",
            "title": title,
            "body": body,
        }))
        .map_err(|e| DeliveryError::Rejected {
            title: title.to_string(),
            message: e.to_string(),
        })?;
        line.push('\n');

        let mut stdout = tokio::io::stdout();
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Renders reminders and hands them to a [`ReminderDelivery`].
#[derive(Clone)]
pub struct ReminderDispatcher {
    delivery: Arc<dyn ReminderDelivery>,
    enabled: bool,
}

impl ReminderDispatcher {
    pub fn new(delivery: Arc<dyn ReminderDelivery>) -> Self {
        Self {
            delivery,
            enabled: true,
        }
    }

    /// When disabled, reminders are rendered and logged but not delivered.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Render and send a reminder without waiting for delivery.
    ///
    /// Must be called from within a tokio runtime; outside one the reminder
    /// is logged and dropped.
    pub fn dispatch(&self, kind: ReminderKind, ctx: &ReminderContext) -> Reminder {
        let reminder = Reminder::render(kind, ctx);
        if !self.enabled {
            tracing::debug!(?kind, "Notifications disabled; reminder not delivered");
            return reminder;
        }

        tracing::info!(?kind, "Dispatching reminder");
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(?kind, error = %e, "No async runtime; reminder dropped");
                return reminder;
            }
        };

        let delivery = Arc::clone(&self.delivery);
        let outgoing = reminder.clone();
        handle.spawn(async move {
            if let Err(e) = delivery.send(&outgoing.title, &outgoing.body).await {
                tracing::warn!(kind = ?outgoing.kind, error = %e, "Reminder delivery failed");
            }
        });
        reminder
    }
}
