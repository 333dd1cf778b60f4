//! HTTP surface: the info endpoint used for health checks.

pub mod info;
pub mod server;

pub use server::InfoServer;
