//! In-memory saved-status mirror with optimistic toggles.
//!
//! The cache is constructed once at bootstrap and injected into views; it is
//! confined to a single process and re-fetching ground truth on reload is
//! the recovery story. The server stays the source of truth: the mirror may
//! be transiently stale but converges on the next batch fetch.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use client_logging::{client_debug, client_warn};
use jobfeed_core::{JobId, SavedStatusChanged, SessionExpired, ViewBus};

use crate::error::ApiError;
use crate::gateway::JobGateway;

/// One optimistic toggle: the flip to apply plus the compensating action
/// that restores the exact pre-toggle mirror state on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ToggleCommand {
    job_id: JobId,
    previous: Option<bool>,
    desired: bool,
}

impl ToggleCommand {
    fn apply(&self, values: &mut HashMap<JobId, bool>) {
        values.insert(self.job_id.clone(), self.desired);
    }

    fn rollback(&self, values: &mut HashMap<JobId, bool>) {
        match self.previous {
            Some(value) => {
                values.insert(self.job_id.clone(), value);
            }
            None => {
                values.remove(&self.job_id);
            }
        }
    }
}

pub struct SavedStatusCache {
    gateway: Arc<dyn JobGateway>,
    bus: ViewBus,
    values: Mutex<HashMap<JobId, bool>>,
    /// Per-id fair mutexes serializing concurrent toggles on the same job.
    toggle_gates: Mutex<HashMap<JobId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SavedStatusCache {
    pub fn new(gateway: Arc<dyn JobGateway>, bus: ViewBus) -> Self {
        Self {
            gateway,
            bus,
            values: Mutex::new(HashMap::new()),
            toggle_gates: Mutex::new(HashMap::new()),
        }
    }

    /// Synchronous read of the mirror.
    pub fn get(&self, id: &JobId) -> Option<bool> {
        self.values.lock().unwrap().get(id).copied()
    }

    /// One batched request covering `ids` (deduplicated, display order).
    /// Every requested id is present in the returned map; ids the server
    /// knows nothing about default to `false`. Empty input returns an empty
    /// map without IO.
    pub async fn fetch_batch(&self, ids: &[JobId]) -> Result<HashMap<JobId, bool>, ApiError> {
        let mut seen = HashSet::new();
        let unique: Vec<JobId> = ids
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let fetched = match self.gateway.saved_status_batch(&unique).await {
            Ok(fetched) => fetched,
            Err(err) => {
                if err.is_auth() {
                    self.bus.session_expired.publish(&SessionExpired);
                }
                return Err(err);
            }
        };

        let mut complete = HashMap::with_capacity(unique.len());
        for id in unique {
            let saved = fetched.get(&id).copied().unwrap_or(false);
            complete.insert(id, saved);
        }

        self.values
            .lock()
            .unwrap()
            .extend(complete.iter().map(|(id, saved)| (id.clone(), *saved)));
        Ok(complete)
    }

    /// Flips the mirror immediately, then confirms against the server.
    ///
    /// Toggles for the same id are serialized FIFO: a second toggle queues
    /// behind the first's resolution, so the final mirror value always
    /// corresponds to the most recent user intention and a late response
    /// cannot clobber a newer optimistic state. On success the server value
    /// is stored and a [`SavedStatusChanged`] event is published; on failure
    /// the mirror rolls back to its exact pre-toggle state and no event is
    /// published; the error propagates for the caller to surface.
    pub async fn toggle(&self, id: &JobId) -> Result<bool, ApiError> {
        let gate = {
            let mut gates = self.toggle_gates.lock().unwrap();
            Arc::clone(
                gates
                    .entry(id.clone())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        let _serialized = gate.lock().await;

        let command = {
            let mut values = self.values.lock().unwrap();
            let previous = values.get(id).copied();
            let command = ToggleCommand {
                job_id: id.clone(),
                previous,
                desired: !previous.unwrap_or(false),
            };
            command.apply(&mut values);
            command
        };

        match self.gateway.toggle_saved(id).await {
            Ok(saved) => {
                self.values.lock().unwrap().insert(id.clone(), saved);
                client_debug!("toggle confirmed job_id={} saved={}", id, saved);
                self.bus.saved_status_changed.publish(&SavedStatusChanged {
                    job_id: id.clone(),
                    saved,
                });
                Ok(saved)
            }
            Err(err) => {
                command.rollback(&mut self.values.lock().unwrap());
                client_warn!("toggle rolled back job_id={}: {}", id, err);
                if err.is_auth() {
                    self.bus.session_expired.publish(&SessionExpired);
                }
                Err(err)
            }
        }
    }
}
