//! Donor location submissions.
//!
//! Validates a submitted GPS location (geofence, request status, IP
//! cross-check), mints a unique donor id and stores the record.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/save-location` | No | Submit current location as a donor |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::SubmissionService;
pub use store::PgSubmissionStore;
