//! Application bootstrap: the single creation point for the shared
//! cross-view resources. Views receive the context by injection; nothing in
//! this layer is a module-level singleton.

use std::sync::Arc;

use jobfeed_core::{resolve, Resolution, SessionExpired, ViewBus};

use crate::cache::SavedStatusCache;
use crate::error::ApiError;
use crate::gateway::JobGateway;
use crate::search::SearchRunner;

pub struct ClientContext {
    pub gateway: Arc<dyn JobGateway>,
    pub bus: ViewBus,
    pub cache: Arc<SavedStatusCache>,
}

impl ClientContext {
    pub fn new(gateway: Arc<dyn JobGateway>) -> Self {
        let bus = ViewBus::new();
        let cache = Arc::new(SavedStatusCache::new(Arc::clone(&gateway), bus.clone()));
        Self {
            gateway,
            bus,
            cache,
        }
    }

    /// A fresh search pipeline for a view that hosts a search box.
    pub fn search_runner(&self) -> Arc<SearchRunner> {
        SearchRunner::new(Arc::clone(&self.gateway), self.bus.clone())
    }

    /// Resolves the collection a feed view should display: personalized
    /// recommendations when non-empty, otherwise the full directory. The
    /// directory is only fetched when the fallback is actually taken.
    pub async fn load_feed(&self) -> Result<Resolution, ApiError> {
        let recommended = match self.gateway.list_recommended().await {
            Ok(recommended) => recommended,
            Err(err) => {
                if err.is_auth() {
                    self.bus.session_expired.publish(&SessionExpired);
                }
                return Err(err);
            }
        };
        if recommended.is_empty() {
            let directory = match self.gateway.list_all().await {
                Ok(directory) => directory,
                Err(err) => {
                    if err.is_auth() {
                        self.bus.session_expired.publish(&SessionExpired);
                    }
                    return Err(err);
                }
            };
            Ok(resolve(recommended, directory))
        } else {
            Ok(resolve(recommended, Vec::new()))
        }
    }
}
