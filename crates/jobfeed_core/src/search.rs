//! Pure search controller: debounce arming, sequence-numbered staleness
//! guard, and client-side category filtering. The controller owns no timer
//! and performs no IO; it returns [`SearchEffect`] values for a runner to
//! execute, which keeps the race-condition logic testable in isolation.

use std::time::Duration;

use crate::model::{Category, Job, SearchQuery};

/// Inactivity window before a typed search fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Effects requested by the controller, executed by the owning runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// (Re)arm the debounce timer; any previously armed timer is superseded.
    ArmDebounce,
    /// Cancel any armed debounce timer.
    CancelDebounce,
    /// Issue a search request tagged with a monotone sequence number.
    Fire {
        seq: u64,
        term: String,
        category: Category,
    },
    /// Drop any query state persisted outside the controller.
    ClearPersistedQuery,
}

/// Whether a search response was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SearchController {
    term: String,
    category: Category,
    next_seq: u64,
    applied_seq: u64,
    /// Raw result set of the last applied response; the displayed rows are
    /// derived from it by filtering with the current category.
    fetched: Vec<Job>,
    /// Queries fired but not yet resolved, keyed by sequence number. The
    /// persisted query is taken from here when a response applies, so it
    /// records what was actually searched rather than whatever the input
    /// box holds at arrival time.
    pending: Vec<(u64, SearchQuery)>,
    persisted: Option<SearchQuery>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A keystroke. Blank input clears displayed results and persisted query
    /// state synchronously; anything else re-arms the debounce timer.
    pub fn input_changed(&mut self, term: &str) -> Vec<SearchEffect> {
        self.term = term.to_string();
        if term.trim().is_empty() {
            self.fetched.clear();
            self.pending.clear();
            self.persisted = None;
            vec![SearchEffect::CancelDebounce, SearchEffect::ClearPersistedQuery]
        } else {
            vec![SearchEffect::ArmDebounce]
        }
    }

    /// Explicit submit: bypasses the debounce window and fires immediately.
    pub fn submitted(&mut self) -> Vec<SearchEffect> {
        if self.term.trim().is_empty() {
            self.fetched.clear();
            self.pending.clear();
            self.persisted = None;
            return vec![SearchEffect::CancelDebounce, SearchEffect::ClearPersistedQuery];
        }
        vec![SearchEffect::CancelDebounce, self.fire()]
    }

    /// The armed debounce window elapsed without further input.
    pub fn debounce_elapsed(&mut self) -> Vec<SearchEffect> {
        if self.term.trim().is_empty() {
            return Vec::new();
        }
        vec![self.fire()]
    }

    /// Category change without a term change: refilter the already-fetched
    /// set client-side. No network, no effect. The new category travels
    /// server-side with the next fire.
    pub fn category_changed(&mut self, category: Category) -> Vec<SearchEffect> {
        self.category = category;
        if let Some(query) = self.persisted.as_mut() {
            query.category = category;
        }
        Vec::new()
    }

    /// Applies a search response iff it is newer than the last applied one.
    /// Late responses for superseded sequences are discarded, so displayed
    /// results are ordered by sequence number rather than arrival time.
    pub fn response(&mut self, seq: u64, jobs: Vec<Job>) -> ResponseDisposition {
        let fired = match self.pending.iter().position(|(pending_seq, _)| *pending_seq == seq) {
            Some(index) => self.pending.remove(index).1,
            // Unknown sequence: the fire was forgotten when the input was
            // cleared, so its response must not resurrect results.
            None => return ResponseDisposition::Stale,
        };
        if seq <= self.applied_seq {
            return ResponseDisposition::Stale;
        }
        self.applied_seq = seq;
        // Superseded fires can no longer apply; drop their bookkeeping.
        self.pending.retain(|(pending_seq, _)| *pending_seq > seq);
        self.fetched = jobs;
        self.persisted = Some(fired);
        ResponseDisposition::Applied
    }

    fn fire(&mut self) -> SearchEffect {
        self.next_seq += 1;
        let query = SearchQuery {
            term: self.term.trim().to_string(),
            category: self.category,
        };
        self.pending.push((self.next_seq, query.clone()));
        SearchEffect::Fire {
            seq: self.next_seq,
            term: query.term,
            category: query.category,
        }
    }

    /// Displayed rows: the last applied response filtered by category.
    pub fn results(&self) -> Vec<Job> {
        self.fetched
            .iter()
            .filter(|job| self.category.matches(job.employment_type))
            .cloned()
            .collect()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn persisted_query(&self) -> Option<&SearchQuery> {
        self.persisted.as_ref()
    }
}
