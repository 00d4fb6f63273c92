//! IP geolocation cross-check.
//!
//! Looks up the submitter's IP address with an external provider and flags
//! proxies, hosting ranges and (optionally) IP/GPS distance mismatches. Provider
//! failures are never fatal to a submission.

pub mod clients;
pub mod models;
pub mod services;

pub use clients::IpApiClient;
pub use services::IpCheckService;
