//! Remote API config cache access.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{ApiConfigClient, SUBSCRIPTION_KEY_HEADER};
pub use error::FetchError;
