//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! idPA + ReferenceSnapshot
//!     → resolver.rs (associations → candidate stations → first enabled)
//!     → Return: ResolvedRoute or NotFound
//! ```
//!
//! # Design Decisions
//! - Deterministic: same snapshot and idPA always give the same route
//! - First match wins (snapshot order)

pub mod resolver;

pub use resolver::{resolve_route, resolve_station, ResolveError, ResolvedRoute};
