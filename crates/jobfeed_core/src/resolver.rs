//! Recommendation resolution: personalized list when available, full
//! directory fallback otherwise (cold-start user, no resume on file).

use crate::model::Job;

/// The job collection a view should display, plus whether the directory
/// fallback was taken so the view can message the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub jobs: Vec<Job>,
    pub fell_back: bool,
}

/// A non-empty recommendation list wins unmodified; an empty one falls back
/// to the unfiltered directory.
pub fn resolve(recommended: Vec<Job>, directory: Vec<Job>) -> Resolution {
    if recommended.is_empty() {
        Resolution {
            jobs: directory,
            fell_back: true,
        }
    } else {
        Resolution {
            jobs: recommended,
            fell_back: false,
        }
    }
}

/// Holds the two underlying lists for a mounted view and re-derives the
/// resolution every time either is replaced, not just at mount.
#[derive(Debug, Clone, Default)]
pub struct RecommendationFeed {
    recommended: Vec<Job>,
    directory: Vec<Job>,
}

impl RecommendationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recommended(&mut self, recommended: Vec<Job>) {
        self.recommended = recommended;
    }

    pub fn set_directory(&mut self, directory: Vec<Job>) {
        self.directory = directory;
    }

    pub fn resolution(&self) -> Resolution {
        resolve(self.recommended.clone(), self.directory.clone())
    }
}
