/// Mean Earth radius used by the haversine formula, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// GEOFENCE DEFAULTS
// =============================================================================

/// Reference point latitude (hospital)
pub const DEFAULT_REFERENCE_LAT: f64 = 22.6023;

/// Reference point longitude (hospital)
pub const DEFAULT_REFERENCE_LON: f64 = 72.8205;

/// Accepted distance from the reference point
pub const DEFAULT_GEOFENCE_RADIUS_KM: f64 = 50.0;

// =============================================================================
// DONOR ID
// =============================================================================

pub const DONOR_ID_PREFIX: &str = "DON";

/// Alphabet for the random part of a donor id
pub const DONOR_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of random characters after the prefix (36^8 keyspace)
pub const DONOR_ID_RANDOM_LEN: usize = 8;
