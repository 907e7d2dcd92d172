//! Background crossterm event poller
//!
//! Terminal input is read on a tokio task and forwarded over a channel so the
//! main loop can `select!` between input and other work. Forms themselves stay
//! synchronous; only the poller runs on the runtime.

use std::time::Duration;

use crossterm::event;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::event::EventKind;

/// Spawn the event polling task with cancellation support
///
/// # Arguments
/// * `tx` - Channel to send converted events
/// * `poll_timeout` - Timeout for each poll operation
/// * `loop_sleep` - Sleep duration between poll cycles
/// * `cancel_token` - Token to cancel the polling task
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<EventKind>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        let Ok(evt) = event::read() else { continue };
                        let Some(kind) = EventKind::from_crossterm(evt) else { continue };
                        if tx.send(kind).is_err() {
                            debug!("Event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}
