//! Search runner: executes the pure controller's effects against the
//! debounce scheduler and the gateway, and feeds sequenced responses back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_logging::{client_debug, client_warn};
use jobfeed_core::{
    Category, Job, ResponseDisposition, SearchController, SearchEffect, SearchQuery,
    SessionExpired, ViewBus, DEBOUNCE_WINDOW,
};

use crate::debounce::Debouncer;
use crate::gateway::JobGateway;

pub struct SearchRunner {
    gateway: Arc<dyn JobGateway>,
    bus: ViewBus,
    debouncer: Debouncer,
    state: Mutex<SearchController>,
}

impl SearchRunner {
    pub fn new(gateway: Arc<dyn JobGateway>, bus: ViewBus) -> Arc<Self> {
        Self::with_window(gateway, bus, DEBOUNCE_WINDOW)
    }

    pub fn with_window(
        gateway: Arc<dyn JobGateway>,
        bus: ViewBus,
        window: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            bus,
            debouncer: Debouncer::new(window),
            state: Mutex::new(SearchController::new()),
        })
    }

    /// A keystroke. Blank input clears results synchronously; otherwise the
    /// debounce window is re-armed.
    pub fn on_input(self: &Arc<Self>, term: &str) {
        let effects = self.state.lock().unwrap().input_changed(term);
        self.dispatch(effects);
    }

    /// Explicit submit: fires immediately, bypassing the window.
    pub fn on_submit(self: &Arc<Self>) {
        let effects = self.state.lock().unwrap().submitted();
        self.dispatch(effects);
    }

    /// Category change without a term change: refilters locally, no request.
    pub fn on_category(self: &Arc<Self>, category: Category) {
        let effects = self.state.lock().unwrap().category_changed(category);
        self.dispatch(effects);
    }

    fn dispatch(self: &Arc<Self>, effects: Vec<SearchEffect>) {
        for effect in effects {
            match effect {
                SearchEffect::CancelDebounce => self.debouncer.cancel(),
                SearchEffect::ClearPersistedQuery => {
                    // Controller state is already cleared; nothing external
                    // persists queries in this layer.
                }
                SearchEffect::ArmDebounce => {
                    let ticket = self.debouncer.arm();
                    let runner = Arc::clone(self);
                    tokio::spawn(async move {
                        if ticket.wait().await {
                            let effects = runner.state.lock().unwrap().debounce_elapsed();
                            runner.dispatch(effects);
                        }
                    });
                }
                SearchEffect::Fire {
                    seq,
                    term,
                    category,
                } => {
                    let runner = Arc::clone(self);
                    tokio::spawn(async move {
                        runner.execute_search(seq, term, category).await;
                    });
                }
            }
        }
    }

    async fn execute_search(self: Arc<Self>, seq: u64, term: String, category: Category) {
        match self.gateway.search(&term, category).await {
            Ok(jobs) => {
                let disposition = self.state.lock().unwrap().response(seq, jobs);
                if disposition == ResponseDisposition::Stale {
                    client_debug!("discarded stale search response seq={}", seq);
                }
            }
            Err(err) => {
                // Leave the last successfully rendered result set untouched.
                client_warn!("search seq={} failed: {}", seq, err);
                if err.is_auth() {
                    self.bus.session_expired.publish(&SessionExpired);
                }
            }
        }
    }

    /// Displayed rows: last applied response filtered by the current category.
    pub fn results(&self) -> Vec<Job> {
        self.state.lock().unwrap().results()
    }

    pub fn persisted_query(&self) -> Option<SearchQuery> {
        self.state.lock().unwrap().persisted_query().cloned()
    }
}
