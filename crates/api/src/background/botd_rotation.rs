//! Scheduled bean-of-the-day rotation.
//!
//! Picks a new bean of the day on a fixed interval using
//! `tokio::time::interval`. Failures are logged and the job waits for the
//! next tick; nothing is retried early.

use std::sync::Arc;
use std::time::Duration;

use beans_core::catalog::BeanCatalog;
use beans_core::error::CoreError;
use tokio_util::sync::CancellationToken;

/// Run the rotation loop until `cancel` is triggered.
///
/// The first pick happens one full `period` after startup.
pub async fn run(catalog: Arc<BeanCatalog>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = period.as_secs(),
        "Bean of the day rotation job started"
    );

    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Bean of the day rotation job stopping");
                break;
            }
            _ = interval.tick() => {
                match catalog.pick_bean_of_the_day().await {
                    Ok(bean) => {
                        tracing::info!(bean_id = %bean.id, "Rotation: new bean of the day");
                    }
                    Err(CoreError::NoEligibleWinner(reason)) => {
                        tracing::warn!(%reason, "Rotation: no eligible bean, waiting for next run");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rotation: selection failed");
                    }
                }
            }
        }
    }
}
