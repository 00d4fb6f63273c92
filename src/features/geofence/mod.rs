//! Geofence validation.
//!
//! Pure great-circle distance checks against a single circular area around a
//! fixed reference point. No I/O.

pub mod validator;

pub use validator::{distance_km, GeofenceValidator};
