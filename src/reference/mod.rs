//! Reference data subsystem.
//!
//! # Data Flow
//! ```text
//! ReferenceSource (remote API config cache)
//!     → cache.rs (single-flight refresh, atomic snapshot swap)
//!     → ReferenceSnapshot (stations + institution/station associations)
//!     → read lock-free by the station resolver
//! ```
//!
//! # Design Decisions
//! - One injectable cache instance per process, no global state
//! - Staleness is a calendar-day boundary, not a rolling TTL
//! - A failed refresh empties the cache instead of keeping the old snapshot

pub mod cache;
pub mod clock;
pub mod source;
pub mod types;

pub use cache::{ReferenceCache, Refresh};
pub use clock::{Clock, ManualClock, SystemClock};
pub use source::ReferenceSource;
pub use types::{CreditorInstitutionStation, ReferenceSnapshot, Station};
