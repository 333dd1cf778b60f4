//! Station resolution.
//!
//! # Responsibilities
//! - Collect the stations associated with a creditor institution
//! - Pick the first enabled one, in snapshot order
//!
//! # Design Decisions
//! - First listed wins; there is no ranking among enabled stations
//! - Pure function over an immutable snapshot

use serde::Serialize;
use thiserror::Error;

use crate::reference::types::{ReferenceSnapshot, Station};

/// Broker and station credentials used to download an institution's flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    pub broker_code: String,
    pub station_code: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl From<&Station> for ResolvedRoute {
    fn from(station: &Station) -> Self {
        Self {
            broker_code: station.broker_code.clone(),
            station_code: station.station_code.clone(),
            password: station.password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No enabled station is associated with the institution.
    #[error("No data present in api config database for PA {0}")]
    NotFound(String),

    /// The cache holds no snapshot (never fetched, or the last fetch failed).
    #[error("Reference data not available to resolve PA {0}")]
    SnapshotUnavailable(String),
}

/// First enabled station, in snapshot order, associated with `id_pa`.
pub fn resolve_station<'a>(
    snapshot: &'a ReferenceSnapshot,
    id_pa: &str,
) -> Result<&'a Station, ResolveError> {
    let station_codes: Vec<&str> = snapshot
        .creditor_institution_stations
        .iter()
        .filter(|cis| cis.creditor_institution_code == id_pa)
        .map(|cis| cis.station_code.as_str())
        .filter(|code| !code.is_empty())
        .collect();

    snapshot
        .stations
        .iter()
        .filter(|station| station_codes.contains(&station.station_code.as_str()))
        .find(|station| station.enabled)
        .ok_or_else(|| ResolveError::NotFound(id_pa.to_string()))
}

/// Resolve against an optional snapshot.
pub fn resolve_route(
    snapshot: Option<&ReferenceSnapshot>,
    id_pa: &str,
) -> Result<ResolvedRoute, ResolveError> {
    let snapshot = snapshot.ok_or_else(|| ResolveError::SnapshotUnavailable(id_pa.to_string()))?;
    resolve_station(snapshot, id_pa).map(ResolvedRoute::from)
}
