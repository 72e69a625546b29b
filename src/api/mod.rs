//! REST collaborator: authenticated client, response envelope, typed collections.

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod resource;

pub use client::{ApiClient, ListQuery};
pub use dashboard::{fetch_dashboard, inventory_overview, load_dashboard, DashboardSnapshot, DashboardSummary};
pub use envelope::{Envelope, Page, Pagination};
pub use error::{ApiError, ApiResult};
pub use resource::{fetch_stats, ResourceClient, ResourceStats};
