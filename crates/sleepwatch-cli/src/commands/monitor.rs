use std::sync::Arc;

use sleepwatch_core::{
    AppLifecycle, Config, Event, SleepMonitor, SqliteScheduleStore, StdoutDelivery, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};

use super::{require_schedule, CommandResult};

pub fn run() -> CommandResult {
    let store = SqliteScheduleStore::open()?;
    let schedule = require_schedule(&store)?;
    let config = Config::load_or_default();

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let mut monitor = SleepMonitor::new(
            schedule,
            &config,
            Arc::new(SystemClock),
            Arc::new(StdoutDelivery),
        );
        let mut events = monitor.subscribe();
        let (lifecycle_tx, lifecycle_rx) = mpsc::channel(16);
        monitor.start(lifecycle_rx);

        let result = pump(&mut events, &lifecycle_tx).await;
        monitor.stop();
        result
    });
    // A pending stdin read would otherwise hold up runtime shutdown.
    rt.shutdown_background();
    result
}

/// Forward stdin lifecycle lines to the monitor and monitor events to
/// stdout until Ctrl-C or end of input.
async fn pump(
    events: &mut broadcast::Receiver<Event>,
    lifecycle: &mpsc::Sender<AppLifecycle>,
) -> CommandResult {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            biased;

            event = events.recv() => match event {
                // Reminders reach stdout through the delivery.
                Ok(Event::ReminderDue { .. }) => {}
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event output fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<AppLifecycle>() {
                    Ok(next) => {
                        if lifecycle.send(next).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(input = %line.trim(), error = %e, "Ignoring input"),
                }
            }
        }
    }
    Ok(())
}
