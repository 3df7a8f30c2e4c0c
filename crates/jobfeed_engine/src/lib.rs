//! Jobfeed engine: async IO layer for the client-side job-interaction
//! cache. Holds the REST gateway, the saved-status cache, and the debounced
//! search pipeline.
mod cache;
mod context;
mod debounce;
mod error;
mod gateway;
mod search;

pub use cache::SavedStatusCache;
pub use context::ClientContext;
pub use debounce::{DebounceTicket, Debouncer};
pub use error::{ApiError, ErrorKind};
pub use gateway::{ApplyOutcome, GatewaySettings, HttpGateway, JobGateway};
pub use search::SearchRunner;
