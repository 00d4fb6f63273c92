//! Server-side status gate for the correlated blood request.
//!
//! When a directory URL is configured, submissions that reference a closed
//! blood request are rejected. Directory failures never block a submission.

pub mod clients;
pub mod models;
pub mod services;

pub use clients::BloodRequestApiClient;
pub use services::RequestStatusGate;
