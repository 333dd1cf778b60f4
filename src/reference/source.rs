//! Where reference snapshots come from.

use async_trait::async_trait;

use crate::apiconfig::FetchError;
use crate::reference::types::ReferenceSnapshot;

/// A remote (or fake) provider of reference snapshots.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Retrieve both reference lists in one call. The returned snapshot has
    /// no retrieval date.
    async fn fetch(&self) -> Result<ReferenceSnapshot, FetchError>;
}
