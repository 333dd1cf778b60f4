//! Per-message entry point.
//!
//! # Data Flow
//! ```text
//! raw queue message
//!     → FlowsMessage::parse
//!     → ReferenceCache::ensure_fresh (may call the API config cache)
//!     → resolve_route (first enabled station of the idPA)
//!     → FlowsRequest (retry + 1)
//!     → FlowProcessor::download_flows
//! ```
//!
//! Every failure stops at this boundary: it is logged together with the
//! message and the message counts as handled. Redelivery is up to the
//! transport.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::apiconfig::FetchError;
use crate::config::FlowsConfig;
use crate::flows::{BoxError, FlowProcessor, FlowsMessage, FlowsRequest, MessageError};
use crate::observability::metrics;
use crate::reference::{ReferenceCache, ReferenceSource, Refresh};
use crate::routing::{resolve_route, ResolveError, ResolvedRoute};

#[derive(Debug, Error)]
pub enum HandleError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("Reference cache refresh failed: {0}")]
    Refresh(#[from] FetchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Flow processing failed: {0}")]
    Downstream(#[source] BoxError),
}

impl HandleError {
    /// Label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HandleError::Message(_) => "invalid_message",
            HandleError::Refresh(_) => "refresh_failed",
            HandleError::Resolve(ResolveError::NotFound(_)) => "station_not_found",
            HandleError::Resolve(ResolveError::SnapshotUnavailable(_)) => "cache_unavailable",
            HandleError::Downstream(_) => "downstream_failed",
        }
    }
}

/// Resolves the station of each message's institution and hands the flows
/// to the download pipeline.
#[derive(Clone)]
pub struct RetrieveDetails {
    cache: Arc<ReferenceCache>,
    source: Arc<dyn ReferenceSource>,
    processor: Arc<dyn FlowProcessor>,
    flows: FlowsConfig,
}

impl RetrieveDetails {
    pub fn new(
        cache: Arc<ReferenceCache>,
        source: Arc<dyn ReferenceSource>,
        processor: Arc<dyn FlowProcessor>,
        flows: FlowsConfig,
    ) -> Self {
        Self {
            cache,
            source,
            processor,
            flows,
        }
    }

    pub fn cache(&self) -> &Arc<ReferenceCache> {
        &self.cache
    }

    /// Handle one raw message. Never fails: errors are logged here.
    pub async fn handle(&self, raw: &str) {
        let span = tracing::info_span!("retrieve_details", invocation_id = %Uuid::new_v4());

        async {
            tracing::info!(message = %raw, "[RetrieveDetails START] processing message");

            match self.process(raw).await {
                Ok(()) => {
                    metrics::record_message("processed");
                    tracing::info!(message = %raw, "[RetrieveDetails END] processed message");
                }
                Err(HandleError::Message(e)) => {
                    metrics::record_message("invalid_message");
                    tracing::error!(error = %e, message = %raw, "[RetrieveDetails Error] invalid message");
                }
                Err(e) => {
                    metrics::record_message(e.kind());
                    tracing::error!(
                        error = %e,
                        kind = e.kind(),
                        message = %raw,
                        "[RetrieveDetails Error] message not processed"
                    );
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Parse, resolve and dispatch one message, returning the first error.
    pub async fn process(&self, raw: &str) -> Result<(), HandleError> {
        let message = FlowsMessage::parse(raw)?;
        let route = self.resolve(&message.id_pa).await?;
        let request = FlowsRequest::new(&self.flows, route, message);

        self.processor
            .download_flows(request)
            .await
            .map_err(HandleError::Downstream)
    }

    /// Refresh the cache if needed, without resolving anything.
    pub async fn warm_up(&self) -> Result<Refresh, FetchError> {
        self.cache.ensure_fresh(self.source.as_ref()).await
    }

    /// Refresh the cache if needed, then resolve the institution's station.
    pub async fn resolve(&self, id_pa: &str) -> Result<ResolvedRoute, HandleError> {
        self.cache.ensure_fresh(self.source.as_ref()).await?;

        tracing::info!(id_pa = %id_pa, "[RetrieveDetails][Config-Cache] resolving station");
        let snapshot = self.cache.snapshot();
        let route = resolve_route(snapshot.as_deref(), id_pa)?;

        tracing::debug!(
            id_pa = %id_pa,
            broker_code = %route.broker_code,
            station_code = %route.station_code,
            "Station resolved"
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{CreditorInstitutionStation, ReferenceSnapshot, Station};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const MESSAGE: &str = r#"{"idPA":"00595780131","flows":[{"identificativoFlusso":"2021-07-26AGID_02-S000000001","dataOraFlusso":1627293600000}], "retry": 0}"#;

    struct StaticSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ReferenceSource for StaticSource {
        async fn fetch(&self) -> Result<ReferenceSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Client {
                    status: 401,
                    url: "http://cache.test/cache".into(),
                });
            }
            Ok(ReferenceSnapshot::new(
                vec![Station {
                    station_code: "mockStationCode".into(),
                    enabled: true,
                    broker_code: "mockBrokerCode".into(),
                    password: "mockPwd".into(),
                }],
                vec![CreditorInstitutionStation {
                    creditor_institution_code: "00595780131".into(),
                    station_code: "mockStationCode".into(),
                }],
            ))
        }
    }

    #[derive(Default)]
    struct RecordingProcessor {
        requests: Mutex<Vec<FlowsRequest>>,
    }

    #[async_trait]
    impl FlowProcessor for RecordingProcessor {
        async fn download_flows(&self, request: FlowsRequest) -> Result<(), BoxError> {
            self.requests.lock().unwrap().push(request);
            Ok(())
        }
    }

    fn handler(fail: bool) -> (RetrieveDetails, Arc<StaticSource>, Arc<RecordingProcessor>) {
        let source = Arc::new(StaticSource {
            calls: AtomicUsize::new(0),
            fail,
        });
        let processor = Arc::new(RecordingProcessor::default());
        let handler = RetrieveDetails::new(
            Arc::new(ReferenceCache::new()),
            source.clone(),
            processor.clone(),
            FlowsConfig::default(),
        );
        (handler, source, processor)
    }

    #[tokio::test]
    async fn test_handle_dispatches_request() {
        let (handler, source, processor) = handler(false);

        handler.handle(MESSAGE).await;

        let requests = processor.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].broker_code, "mockBrokerCode");
        assert_eq!(requests[0].station_code, "mockStationCode");
        assert_eq!(requests[0].password, "mockPwd");
        assert_eq!(requests[0].id_pa, "00595780131");
        assert_eq!(requests[0].retry, 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_reused_across_messages() {
        let (handler, source, processor) = handler(false);

        handler.handle(MESSAGE).await;
        handler.handle(MESSAGE).await;

        assert_eq!(processor.requests.lock().unwrap().len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_message() {
        let (handler, source, processor) = handler(false);

        let err = handler.process("invalidMessage").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_message");

        handler.handle("invalidMessage").await;
        assert!(processor.requests.lock().unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_institution() {
        let (handler, _, processor) = handler(false);
        let message = r#"{"idPA":"X","flows":[{"identificativoFlusso":"F1","dataOraFlusso":0}],"retry":0}"#;

        let err = handler.process(message).await.unwrap_err();
        assert!(matches!(err, HandleError::Resolve(ResolveError::NotFound(ref id)) if id == "X"));
        assert!(processor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure() {
        let (handler, source, processor) = handler(true);

        let err = handler.process(MESSAGE).await.unwrap_err();
        assert_eq!(err.kind(), "refresh_failed");
        assert!(handler.cache().snapshot().is_none());

        handler.handle(MESSAGE).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(processor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_downstream_failure_is_reported() {
        struct FailingProcessor;

        #[async_trait]
        impl FlowProcessor for FailingProcessor {
            async fn download_flows(&self, _request: FlowsRequest) -> Result<(), BoxError> {
                Err("blob storage unavailable".into())
            }
        }

        let handler = RetrieveDetails::new(
            Arc::new(ReferenceCache::new()),
            Arc::new(StaticSource {
                calls: AtomicUsize::new(0),
                fail: false,
            }),
            Arc::new(FailingProcessor),
            FlowsConfig::default(),
        );

        let err = handler.process(MESSAGE).await.unwrap_err();
        assert_eq!(err.kind(), "downstream_failed");
        assert!(err.to_string().contains("blob storage unavailable"));
    }
}
