use crate::core::config::GeofenceConfig;
use crate::shared::constants::EARTH_RADIUS_KM;

/// Great-circle distance between two points in kilometers (haversine on a
/// sphere of radius 6371 km).
pub fn distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let lat_a_rad = lat_a.to_radians();
    let lat_b_rad = lat_b.to_radians();
    let delta_lat = (lat_b - lat_a).to_radians();
    let delta_lon = (lon_b - lon_a).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Circular geofence around a reference point. The boundary is inclusive.
#[derive(Debug, Clone, Copy)]
pub struct GeofenceValidator {
    reference_lat: f64,
    reference_lon: f64,
    radius_km: f64,
}

impl GeofenceValidator {
    pub fn new(config: GeofenceConfig) -> Self {
        Self {
            reference_lat: config.reference_lat,
            reference_lon: config.reference_lon,
            radius_km: config.radius_km,
        }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Distance from the reference point to `(lat, lon)`
    pub fn distance_from_reference(&self, lat: f64, lon: f64) -> f64 {
        distance_km(self.reference_lat, self.reference_lon, lat, lon)
    }

    /// True iff the point lies within `radius_km` of the reference point.
    /// Non-finite coordinates are never inside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if !lat.is_finite() || !lon.is_finite() {
            return false;
        }
        self.distance_from_reference(lat, lon) <= self.radius_km
    }
}

impl Default for GeofenceValidator {
    fn default() -> Self {
        Self::new(GeofenceConfig::default())
    }
}
