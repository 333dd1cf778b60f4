//! Flow-processing collaborator.

use async_trait::async_trait;

use crate::flows::request::FlowsRequest;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Downloads the flows listed in a request. Implemented outside this crate
/// by the XML retrieval pipeline.
#[async_trait]
pub trait FlowProcessor: Send + Sync {
    async fn download_flows(&self, request: FlowsRequest) -> Result<(), BoxError>;
}

/// Records the request instead of downloading anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFlowProcessor;

#[async_trait]
impl FlowProcessor for LoggingFlowProcessor {
    async fn download_flows(&self, request: FlowsRequest) -> Result<(), BoxError> {
        let flow_ids: Vec<&str> = request.flows.iter().map(|f| f.id.as_str()).collect();
        tracing::info!(
            id_pa = %request.id_pa,
            broker_code = %request.broker_code,
            station_code = %request.station_code,
            retry = request.retry,
            flows = ?flow_ids,
            "Flow download requested"
        );
        Ok(())
    }
}
