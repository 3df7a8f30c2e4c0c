//! Jobfeed core: pure state and control logic for the client-side
//! job-interaction layer. No IO; the async plumbing lives in
//! `jobfeed_engine`.
mod events;
mod model;
mod resolver;
mod search;
mod view;

pub use events::{
    JobViewClosed, SavedStatusChanged, SessionExpired, Subscription, Topic, ViewBus,
};
pub use model::{Category, EmploymentType, Job, JobId, SearchQuery};
pub use resolver::{resolve, RecommendationFeed, Resolution};
pub use search::{ResponseDisposition, SearchController, SearchEffect, DEBOUNCE_WINDOW};
pub use view::{JobListView, JobRow};
