#![allow(dead_code)]
//! In-memory `JobGateway` used by the cache and search pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use jobfeed_core::{Category, EmploymentType, Job, JobId};
use jobfeed_engine::{ApiError, ApplyOutcome, ErrorKind, JobGateway};

pub fn job(id: &str, employment_type: EmploymentType) -> Job {
    Job {
        id: id.to_string(),
        title: format!("title {id}"),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        employment_type,
        apply_url: format!("https://jobs.example.com/{id}"),
        summary: String::new(),
        requirements: Vec::new(),
        responsibilities: Vec::new(),
        logo_url: None,
        logo_background: None,
    }
}

#[derive(Default)]
pub struct MockGateway {
    /// Server-side saved flags; toggles flip entries here.
    pub server_saved: Mutex<HashMap<JobId, bool>>,
    pub batch_calls: AtomicUsize,
    pub toggle_calls: AtomicUsize,
    pub list_all_calls: AtomicUsize,
    pub recommended_calls: AtomicUsize,
    /// Every search request observed, in order.
    pub search_calls: Mutex<Vec<(String, Category)>>,
    /// Canned search responses keyed by term.
    pub search_results: Mutex<HashMap<String, Vec<Job>>>,
    /// Per-term artificial latency, to simulate out-of-order responses.
    pub search_delays: Mutex<HashMap<String, Duration>>,
    pub search_failures: Mutex<HashMap<String, ErrorKind>>,
    pub toggle_delay: Mutex<Option<Duration>>,
    pub toggle_failure: Mutex<Option<ErrorKind>>,
    pub batch_failure: Mutex<Option<ErrorKind>>,
    pub list_all_failure: Mutex<Option<ErrorKind>>,
    pub recommended: Mutex<Vec<Job>>,
    pub directory: Mutex<Vec<Job>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_results(&self, term: &str, jobs: Vec<Job>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(term.to_string(), jobs);
    }

    pub fn set_search_delay(&self, term: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(term.to_string(), delay);
    }

    pub fn set_saved(&self, id: &str, saved: bool) {
        self.server_saved
            .lock()
            .unwrap()
            .insert(id.to_string(), saved);
    }
}

#[async_trait::async_trait]
impl JobGateway for MockGateway {
    async fn list_all(&self) -> Result<Vec<Job>, ApiError> {
        self.list_all_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = *self.list_all_failure.lock().unwrap() {
            return Err(ApiError::new(kind, "canned directory failure"));
        }
        Ok(self.directory.lock().unwrap().clone())
    }

    async fn list_recommended(&self) -> Result<Vec<Job>, ApiError> {
        self.recommended_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recommended.lock().unwrap().clone())
    }

    async fn list_applied(&self) -> Result<Vec<Job>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_saved(&self) -> Result<Vec<Job>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_by_id(&self, id: &JobId) -> Result<Job, ApiError> {
        Err(ApiError::new(
            ErrorKind::NotFound,
            format!("no canned job {id}"),
        ))
    }

    async fn search(&self, term: &str, category: Category) -> Result<Vec<Job>, ApiError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((term.to_string(), category));
        let delay = self.search_delays.lock().unwrap().get(term).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(kind) = self.search_failures.lock().unwrap().get(term).copied() {
            return Err(ApiError::new(kind, "canned search failure"));
        }
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(term)
            .cloned()
            .unwrap_or_default())
    }

    async fn applied_status(&self, _id: &JobId) -> Result<bool, ApiError> {
        Ok(false)
    }

    async fn saved_status_batch(&self, ids: &[JobId]) -> Result<HashMap<JobId, bool>, ApiError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = *self.batch_failure.lock().unwrap() {
            return Err(ApiError::new(kind, "canned batch failure"));
        }
        let server = self.server_saved.lock().unwrap();
        // Like the backend, only report ids the server knows about.
        Ok(ids
            .iter()
            .filter_map(|id| server.get(id).map(|saved| (id.clone(), *saved)))
            .collect())
    }

    async fn toggle_saved(&self, id: &JobId) -> Result<bool, ApiError> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.toggle_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(kind) = *self.toggle_failure.lock().unwrap() {
            return Err(ApiError::new(kind, "canned toggle failure"));
        }
        let mut server = self.server_saved.lock().unwrap();
        let entry = server.entry(id.clone()).or_insert(false);
        *entry = !*entry;
        Ok(*entry)
    }

    async fn apply(&self, _id: &JobId) -> Result<ApplyOutcome, ApiError> {
        Ok(ApplyOutcome {
            applied: true,
            external_url: None,
        })
    }
}
