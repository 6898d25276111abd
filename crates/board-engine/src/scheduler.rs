use crate::{Engine, EntityKind, OpContext};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Drives the rollover sweep: on a fixed interval when enabled, and
/// whenever the task or sprint collections change. The sweep's
/// idempotence keeps event-triggered re-runs harmless.
pub struct RolloverScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RolloverScheduler {
    pub fn spawn(engine: Arc<Engine>, ctx: OpContext) -> Self {
        let sweep_config = engine.config().sweep.clone();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut changes = engine.subscribe_changes();

        let handle = tokio::spawn(async move {
            let mut ticker = sweep_config.enabled.then(|| {
                let mut ticker =
                    tokio::time::interval(Duration::from_secs(sweep_config.interval_secs));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });

            log::info!(
                "rollover scheduler started (enabled={}, interval={}s)",
                sweep_config.enabled,
                sweep_config.interval_secs
            );

            loop {
                tokio::select! {
                    _ = async {
                        match ticker.as_mut() {
                            Some(ticker) => {
                                ticker.tick().await;
                            }
                            None => std::future::pending::<()>().await,
                        }
                    } => {}
                    changed = changes.recv() => {
                        match changed {
                            Ok(event)
                                if matches!(
                                    event.entity,
                                    EntityKind::Task | EntityKind::Sprint
                                ) => {}
                            Ok(_) => continue,
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                log::debug!(
                                    "rollover scheduler lagged {} change event(s)",
                                    skipped
                                );
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    result = shutdown_rx.changed() => {
                        if result.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                if let Err(e) = engine.run_sweep(&ctx, Utc::now()).await {
                    log::warn!("{} scheduled sweep failed: {}", ctx.log_prefix(), e);
                }
            }

            log::info!("rollover scheduler stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal the scheduler loop to exit.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the loop to finish after a shutdown.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}
