//! Per-view job list state. Each screen (home feed, search results,
//! saved/applied list, detail) fetches and renders its own list lazily and
//! keeps a local saved/applied mirror, updated from bus events without
//! re-fetching.

use std::collections::{HashMap, HashSet};

use crate::events::SavedStatusChanged;
use crate::model::{Job, JobId};

/// One rendered row: the job plus its interaction flags as this view sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub job: Job,
    pub saved: bool,
    pub applied: bool,
}

#[derive(Debug, Clone, Default)]
pub struct JobListView {
    jobs: Vec<Job>,
    saved: HashMap<JobId, bool>,
    applied: HashSet<JobId>,
}

impl JobListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            ..Self::default()
        }
    }

    /// Replaces the displayed list. Interaction flags for jobs no longer
    /// displayed are dropped with the view's interest in them.
    pub fn set_jobs(&mut self, jobs: Vec<Job>) {
        let keep: HashSet<&JobId> = jobs.iter().map(|job| &job.id).collect();
        self.saved.retain(|id, _| keep.contains(id));
        self.applied.retain(|id| keep.contains(id));
        self.jobs = jobs;
    }

    /// Identifiers to hand to a batch status fetch: exactly the displayed
    /// jobs, deduplicated, in display order.
    pub fn job_ids(&self) -> Vec<JobId> {
        let mut seen = HashSet::new();
        self.jobs
            .iter()
            .filter(|job| seen.insert(job.id.clone()))
            .map(|job| job.id.clone())
            .collect()
    }

    /// Merges a batch fetch result into the local saved mirror.
    pub fn apply_saved_statuses(&mut self, statuses: HashMap<JobId, bool>) {
        self.saved.extend(statuses);
    }

    /// Applies a cross-view change event. Returns true when a displayed row
    /// actually changed, so the view knows to re-render.
    pub fn apply_saved_change(&mut self, event: &SavedStatusChanged) -> bool {
        if !self.jobs.iter().any(|job| job.id == event.job_id) {
            return false;
        }
        self.saved.insert(event.job_id.clone(), event.saved) != Some(event.saved)
    }

    /// Removes a row, e.g. a saved-list screen dropping a job on unsave.
    pub fn remove_job(&mut self, id: &JobId) {
        self.jobs.retain(|job| &job.id != id);
        self.saved.remove(id);
        self.applied.remove(id);
    }

    /// One-way transition: applied jobs never un-apply.
    pub fn mark_applied(&mut self, id: &JobId) {
        self.applied.insert(id.clone());
    }

    pub fn is_saved(&self, id: &JobId) -> bool {
        self.saved.get(id).copied().unwrap_or(false)
    }

    pub fn is_applied(&self, id: &JobId) -> bool {
        self.applied.contains(id)
    }

    pub fn rows(&self) -> Vec<JobRow> {
        self.jobs
            .iter()
            .map(|job| JobRow {
                saved: self.is_saved(&job.id),
                applied: self.applied.contains(&job.id),
                job: job.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
