use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::fetcher::ListingSource;
use crate::notifier::AlertSink;

/// The poll loop. Owns the set of already-alerted shipment ids and drives
/// fetch, diff, and notify on a fixed interval.
pub struct Poller<S, N> {
    source: S,
    sink: N,
    interval: Duration,
    seen_ids: HashSet<String>,
}

impl<S: ListingSource, N: AlertSink> Poller<S, N> {
    pub fn new(source: S, sink: N, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            seen_ids: HashSet::new(),
        }
    }

    /// Run ticks until the shutdown signal fires. No tick failure stops the
    /// loop; errors are logged and the next tick runs on schedule.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            self.tick().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("Poll loop stopping");
                    return;
                }
            }
        }
    }

    /// One tick: fetch the feed and alert on every shipment not seen before.
    /// Returns the number of alerts attempted.
    pub async fn tick(&mut self) -> usize {
        let shipments = match self.source.fetch().await {
            Ok(shipments) => shipments,
            Err(e) => {
                error!("Error fetching shipments: {}", e);
                return 0;
            }
        };
        info!("Fetched {} shipments", shipments.len());

        let mut alerted = 0;
        for shipment in &shipments {
            // A shipment without an id cannot be deduped, so it is never alerted.
            let Some(id) = shipment.id.as_deref() else {
                continue;
            };

            if self.seen_ids.contains(id) {
                info!("Already seen shipment ID {}", id);
                continue;
            }

            info!("New shipment ID {}", id);
            self.sink.notify(shipment).await;
            // Marked seen whether or not delivery succeeded; a shipment is
            // alerted at most once per process lifetime.
            self.seen_ids.insert(id.to_string());
            alerted += 1;
        }

        alerted
    }
}
