//! Outbound request to the flow-processing collaborator.

use std::fmt;

use crate::config::FlowsConfig;
use crate::flows::message::{Flow, FlowsMessage};
use crate::routing::ResolvedRoute;

/// Everything the download pipeline needs for one message.
#[derive(Clone, PartialEq, Eq)]
pub struct FlowsRequest {
    pub storage_connection_string: String,
    pub broker_code: String,
    pub station_code: String,
    pub password: String,
    pub id_pa: String,
    pub flows: Vec<Flow>,
    /// Already incremented for this processing run.
    pub retry: u32,
    pub xml_blob: String,
    pub queue: String,
    pub table: String,
    pub max_retry_queuing: u32,
    pub queue_retention_sec: u64,
    pub queue_delay_sec: u64,
}

impl FlowsRequest {
    pub fn new(config: &FlowsConfig, route: ResolvedRoute, message: FlowsMessage) -> Self {
        Self {
            storage_connection_string: config.storage_connection_string.clone(),
            broker_code: route.broker_code,
            station_code: route.station_code,
            password: route.password,
            id_pa: message.id_pa,
            flows: message.flows,
            retry: message.retry.saturating_add(1),
            xml_blob: config.xml_blob.clone(),
            queue: config.queue.clone(),
            table: config.table.clone(),
            max_retry_queuing: config.max_retry_queuing,
            queue_retention_sec: config.queue_retention_sec,
            queue_delay_sec: config.queue_delay_sec,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for FlowsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowsRequest")
            .field("broker_code", &self.broker_code)
            .field("station_code", &self.station_code)
            .field("password", &"***")
            .field("id_pa", &self.id_pa)
            .field("flows", &self.flows)
            .field("retry", &self.retry)
            .field("xml_blob", &self.xml_blob)
            .field("queue", &self.queue)
            .field("table", &self.table)
            .field("max_retry_queuing", &self.max_retry_queuing)
            .field("queue_retention_sec", &self.queue_retention_sec)
            .field("queue_delay_sec", &self.queue_delay_sec)
            .finish_non_exhaustive()
    }
}
