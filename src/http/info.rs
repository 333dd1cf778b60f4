//! `GET /info` health endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::reference::ReferenceCache;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    /// Retrieval date of the cached reference data, if any.
    pub cache_retrieved_on: Option<NaiveDate>,
}

pub async fn info(State(cache): State<Arc<ReferenceCache>>) -> Json<InfoResponse> {
    tracing::debug!("Invoked health check endpoint");
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        cache_retrieved_on: cache.retrieved_on(),
    })
}
