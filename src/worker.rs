//! Message dispatch.
//!
//! Takes raw messages from a channel (fed by whatever trigger the deployment
//! uses) and runs [`RetrieveDetails::handle`] for each, with at most
//! `concurrency` messages in flight.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::handler::RetrieveDetails;

pub struct MessageWorker {
    handler: RetrieveDetails,
    concurrency: usize,
}

impl MessageWorker {
    pub fn new(handler: RetrieveDetails, concurrency: usize) -> Self {
        Self {
            handler,
            concurrency: concurrency.max(1),
        }
    }

    /// Run until the channel closes or shutdown fires, then wait for the
    /// messages already in flight.
    pub async fn run(self, mut messages: mpsc::Receiver<String>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(concurrency = self.concurrency, "Message worker starting");

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight = JoinSet::new();

        loop {
            // Shutdown is checked first, both while waiting for a free slot
            // and while waiting for the next message.
            let permit = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Message worker received shutdown signal, exiting loop");
                    break;
                }
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let raw = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Message worker received shutdown signal, exiting loop");
                    break;
                }
                received = messages.recv() => match received {
                    Some(raw) => raw,
                    None => {
                        tracing::info!("Message channel closed");
                        break;
                    }
                },
            };

            let handler = self.handler.clone();
            in_flight.spawn(async move {
                handler.handle(&raw).await;
                drop(permit);
            });

            while let Some(result) = in_flight.try_join_next() {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Message task panicked");
                }
            }
        }

        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Message task panicked");
            }
        }
        tracing::info!("Message worker stopped");
    }
}
