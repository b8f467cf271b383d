/// Collaborator layer: the remote Academic Scheduler API
pub mod client;
mod error;

pub use client::{ReportKind, SchedulerClient};
pub use error::ApiError;
