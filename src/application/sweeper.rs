//! Background settlement of expired markets.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::application::market::MarketRegistry;

/// Handle to a running sweeper.
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop after its current pass.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Periodically calls [`MarketRegistry::settle_due`].
pub struct SettlementSweeper {
    registry: Arc<MarketRegistry>,
    interval: Duration,
}

impl SettlementSweeper {
    #[must_use]
    pub fn new(registry: Arc<MarketRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Spawn the sweep loop on the current runtime.
    #[must_use]
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let registry = self.registry;
        let period = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Settlement sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let settled = registry.settle_due().await;
                        if settled.is_empty() {
                            debug!("No markets due");
                        } else {
                            info!(count = settled.len(), "Settled expired markets");
                        }
                    }
                }
            }
        });

        SweeperHandle { shutdown_tx }
    }
}
