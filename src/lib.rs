//! Reporting details: resolves the enabled payment station (and its broker
//! credentials) of a creditor institution from a daily-refreshed copy of the
//! API config reference data, and hands flow downloads to the processing
//! pipeline.

pub mod apiconfig;
pub mod config;
pub mod flows;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reference;
pub mod resilience;
pub mod routing;
pub mod worker;

pub use apiconfig::{ApiConfigClient, FetchError};
pub use config::ServiceConfig;
pub use handler::{HandleError, RetrieveDetails};
pub use reference::{ReferenceCache, ReferenceSnapshot};
pub use routing::{ResolveError, ResolvedRoute};
