//! Inbound queue message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One flow to download, as listed by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(rename = "identificativoFlusso")]
    pub id: String,
    #[serde(rename = "dataOraFlusso")]
    pub timestamp: FlowTimestamp,
}

/// Flow date, either epoch milliseconds or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowTimestamp {
    Millis(i64),
    Text(String),
}

/// `{ "idPA": .., "flows": [..], "retry": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowsMessage {
    #[serde(rename = "idPA")]
    pub id_pa: String,
    pub flows: Vec<Flow>,
    /// Number of times the message has already been processed.
    #[serde(default)]
    pub retry: u32,
}

#[derive(Debug, Error)]
#[error("Invalid Message Queue {0}")]
pub struct MessageError(#[from] serde_json::Error);

impl FlowsMessage {
    pub fn parse(raw: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(raw)?)
    }
}
