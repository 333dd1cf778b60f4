//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → worker stops taking messages, drains in-flight ones
//!             → info server stops accepting → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
