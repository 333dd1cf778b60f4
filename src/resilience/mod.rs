//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Remote fetch attempt:
//!     → reqwest timeouts (connect / read)
//!     → retries.rs (classify the status)
//!     → On 5xx: backoff.rs (next delay, or stop once the budget is spent)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Only server errors are retried
//! - The retry budget is wall-clock time, not an attempt count

pub mod backoff;
pub mod retries;

pub use backoff::{BackoffPolicy, ExponentialBackoff};
pub use retries::StatusClass;
