use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::constants::{
    DEFAULT_GEOFENCE_RADIUS_KM, DEFAULT_REFERENCE_LAT, DEFAULT_REFERENCE_LON,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub geofence: GeofenceConfig,
    pub ip_check: IpCheckConfig,
    pub donor_id: DonorIdConfig,
    pub request_status: RequestStatusConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Circular acceptance area around the reference point (the hospital).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceConfig {
    pub reference_lat: f64,
    pub reference_lon: f64,
    /// Inclusive radius in kilometers
    pub radius_km: f64,
}

/// IP geolocation cross-check settings
#[derive(Debug, Clone)]
pub struct IpCheckConfig {
    /// When false the lookup is skipped entirely
    pub enabled: bool,
    /// Base URL of the ip-api compatible provider
    pub base_url: String,
    /// Upper bound for a single lookup
    pub timeout: Duration,
    /// Reject when IP location and GPS location are further apart than `mismatch_threshold_km`
    pub enforce_ip_gps_mismatch: bool,
    pub mismatch_threshold_km: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct DonorIdConfig {
    /// Maximum number of candidate ids tried before giving up with a storage error
    pub max_attempts: u32,
}

/// Optional server-side check of the correlated blood request status.
/// Disabled when no API URL is configured.
#[derive(Debug, Clone)]
pub struct RequestStatusConfig {
    pub api_url: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Read an environment variable, falling back to `default`, and parse it.
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid value (got '{}')", key, raw)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            geofence: GeofenceConfig::from_env()?,
            ip_check: IpCheckConfig::from_env()?,
            donor_id: DonorIdConfig::from_env()?,
            request_status: RequestStatusConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative pool defaults
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl GeofenceConfig {
    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            reference_lat: parse_env("GEOFENCE_REFERENCE_LAT", DEFAULT_REFERENCE_LAT)?,
            reference_lon: parse_env("GEOFENCE_REFERENCE_LON", DEFAULT_REFERENCE_LON)?,
            radius_km: parse_env("GEOFENCE_RADIUS_KM", DEFAULT_GEOFENCE_RADIUS_KM)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.reference_lat.is_finite() || !(-90.0..=90.0).contains(&self.reference_lat) {
            return Err("GEOFENCE_REFERENCE_LAT must be between -90 and 90".to_string());
        }
        if !self.reference_lon.is_finite() || !(-180.0..=180.0).contains(&self.reference_lon) {
            return Err("GEOFENCE_REFERENCE_LON must be between -180 and 180".to_string());
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err("GEOFENCE_RADIUS_KM must be a positive number".to_string());
        }
        Ok(())
    }
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            reference_lat: DEFAULT_REFERENCE_LAT,
            reference_lon: DEFAULT_REFERENCE_LON,
            radius_km: DEFAULT_GEOFENCE_RADIUS_KM,
        }
    }
}

impl IpCheckConfig {
    const DEFAULT_BASE_URL: &'static str = "http://ip-api.com";
    const DEFAULT_TIMEOUT_MS: u64 = 5000;
    const DEFAULT_MISMATCH_KM: f64 = 200.0;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("IP_CHECK_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let mismatch_threshold_km = parse_env("IP_CHECK_MISMATCH_KM", Self::DEFAULT_MISMATCH_KM)?;
        if !mismatch_threshold_km.is_finite() || mismatch_threshold_km <= 0.0 {
            return Err("IP_CHECK_MISMATCH_KM must be a positive number".to_string());
        }

        Ok(Self {
            enabled: parse_env("IP_CHECK_ENABLED", true)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(parse_env(
                "IP_CHECK_TIMEOUT_MS",
                Self::DEFAULT_TIMEOUT_MS,
            )?),
            enforce_ip_gps_mismatch: parse_env("IP_CHECK_ENFORCE_MISMATCH", false)?,
            mismatch_threshold_km,
        })
    }
}

impl Default for IpCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            enforce_ip_gps_mismatch: false,
            mismatch_threshold_km: Self::DEFAULT_MISMATCH_KM,
        }
    }
}

impl DonorIdConfig {
    const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    pub fn from_env() -> Result<Self, String> {
        let max_attempts = parse_env("DONOR_ID_MAX_ATTEMPTS", Self::DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err("DONOR_ID_MAX_ATTEMPTS must be at least 1".to_string());
        }
        Ok(Self { max_attempts })
    }
}

impl Default for DonorIdConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RequestStatusConfig {
    const DEFAULT_TIMEOUT_MS: u64 = 3000;

    pub fn from_env() -> Result<Self, String> {
        let api_url = env::var("REQUEST_STATUS_API_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            api_url,
            timeout: Duration::from_millis(parse_env(
                "REQUEST_STATUS_TIMEOUT_MS",
                Self::DEFAULT_TIMEOUT_MS,
            )?),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Donor Locator API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Blood donor location verification API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
