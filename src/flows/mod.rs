//! Flow messages and the hand-off to the download pipeline.

pub mod message;
pub mod processor;
pub mod request;

pub use message::{Flow, FlowTimestamp, FlowsMessage, MessageError};
pub use processor::{BoxError, FlowProcessor, LoggingFlowProcessor};
pub use request::FlowsRequest;
