//! Reference data held by the cache.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A payment station and the broker credentials used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Empty when the remote row carries no code; such a row never matches.
    #[serde(default, deserialize_with = "null_as_default")]
    pub station_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub broker_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
}

/// Association between a creditor institution and one of its stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorInstitutionStation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub creditor_institution_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub station_code: String,
}

/// Both reference lists as returned by one remote call.
///
/// `retrieved_on` is unset when the snapshot leaves the fetcher and stamped by
/// the cache when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceSnapshot {
    pub stations: Vec<Station>,
    pub creditor_institution_stations: Vec<CreditorInstitutionStation>,
    pub retrieved_on: Option<NaiveDate>,
}

impl ReferenceSnapshot {
    pub fn new(
        stations: Vec<Station>,
        creditor_institution_stations: Vec<CreditorInstitutionStation>,
    ) -> Self {
        Self {
            stations,
            creditor_institution_stations,
            retrieved_on: None,
        }
    }

    pub fn retrieved(mut self, on: NaiveDate) -> Self {
        self.retrieved_on = Some(on);
        self
    }

    /// Compares calendar dates only: a snapshot taken at 23:59 is stale at
    /// 00:00. A snapshot without a retrieval date never goes stale.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.retrieved_on.is_some_and(|on| on < today)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
