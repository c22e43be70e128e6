use crate::bus::Event;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Lag-tolerant receive API for receivers handed out by the bus.
pub trait EventReceiverExt<T> {
    /// Waits for the next event, returning `None` once the channel is closed.
    ///
    /// A receiver that fell behind skips to the oldest retained event.
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(
                            event = std::any::type_name::<T>(),
                            skipped, "Event receiver lagged; continuing from oldest retained event"
                        );
                    }
                    return Some(event);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(event = std::any::type_name::<T>(), skipped = n, "Event receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
