//! Wire format of the API config cache response.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::reference::types::{CreditorInstitutionStation, ReferenceSnapshot, Station};

/// `{ "stations": {..}, "creditorInstitutionStations": {..} }`.
///
/// Keys are not used; entries keep the order they have in the document.
#[derive(Debug, Deserialize)]
pub struct CacheResponse {
    pub stations: IndexMap<String, Station>,
    #[serde(rename = "creditorInstitutionStations")]
    pub creditor_institution_stations: IndexMap<String, CreditorInstitutionStation>,
}

impl From<CacheResponse> for ReferenceSnapshot {
    fn from(response: CacheResponse) -> Self {
        ReferenceSnapshot::new(
            response.stations.into_values().collect(),
            response.creditor_institution_stations.into_values().collect(),
        )
    }
}

/// Decode a response body into an undated snapshot.
pub fn decode(body: &[u8]) -> Result<ReferenceSnapshot, serde_json::Error> {
    let response: CacheResponse = serde_json::from_slice(body)?;
    Ok(response.into())
}
