//! Background worker persisting link events.
//!
//! Events arrive over a bounded channel from the redirect handler. Each one
//! is written through [`AnalyticsStore::record_event`] with exponential
//! backoff; at most `concurrency` writes run at the same time.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::link_event::LinkEvent;
use crate::domain::repositories::AnalyticsStore;
use crate::error::AppError;

const MAX_ATTEMPTS: usize = 3;

/// Runs until the sending side of `rx` is dropped, then waits for in-flight
/// writes to finish.
pub async fn run_event_worker<S>(
    mut rx: mpsc::Receiver<LinkEvent>,
    store: Arc<S>,
    concurrency: usize,
) where
    S: AnalyticsStore + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    tracing::info!(concurrency, "Event worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let store = store.clone();

        tokio::spawn(async move {
            persist_event(store.as_ref(), event).await;
            drop(permit);
        });
    }

    let _ = permits.acquire_many(concurrency as u32).await;
    tracing::info!("Event worker stopped");
}

async fn persist_event<S>(store: &S, event: LinkEvent)
where
    S: AnalyticsStore + ?Sized,
{
    let new_event = event.into_new_event();
    let link_id = new_event.link_id.clone();
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(25)
        .map(jitter)
        .take(MAX_ATTEMPTS - 1);

    let result = RetryIf::spawn(
        strategy,
        || store.record_event(new_event.clone()),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("link_events_persisted_total").increment(1);
        }
        Err(e) => {
            metrics::counter!("link_events_failed_total").increment(1);
            tracing::warn!(link_id = %link_id, error = %e, "Failed to persist link event");
        }
    }
}
