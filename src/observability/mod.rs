//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cache refresh, remote fetch, message handling
//!     → logging.rs (structured log events, one span per message)
//!     → metrics.rs (counters)
//! ```

pub mod logging;
pub mod metrics;
