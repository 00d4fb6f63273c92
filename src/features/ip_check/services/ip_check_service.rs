use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::IpCheckConfig;
use crate::core::error::{AppError, Result};
use crate::features::geofence::distance_km;
use crate::features::ip_check::clients::IpGeolocationProvider;
use crate::features::ip_check::models::{IpLookupError, IpVerdict};

/// Best-effort IP cross-check.
///
/// Only a successful lookup can reject a submission. Timeouts, transport errors
/// and unsuccessful provider answers are logged and reported as
/// [`IpVerdict::Unavailable`].
pub struct IpCheckService {
    provider: Option<Arc<dyn IpGeolocationProvider>>,
    timeout: Duration,
    enforce_ip_gps_mismatch: bool,
    mismatch_threshold_km: f64,
}

impl IpCheckService {
    pub fn new(provider: Arc<dyn IpGeolocationProvider>, config: &IpCheckConfig) -> Self {
        Self {
            provider: Some(provider),
            timeout: config.timeout,
            enforce_ip_gps_mismatch: config.enforce_ip_gps_mismatch,
            mismatch_threshold_km: config.mismatch_threshold_km,
        }
    }

    /// A service that never performs lookups (`IP_CHECK_ENABLED=false`)
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
            enforce_ip_gps_mismatch: false,
            mismatch_threshold_km: f64::INFINITY,
        }
    }

    /// Run the cross-check and turn blocking verdicts into `SpoofingSuspected`
    pub async fn verify(&self, ip: Option<IpAddr>, lat: f64, lon: f64) -> Result<IpVerdict> {
        let verdict = self.assess(ip, lat, lon).await;
        if !verdict.is_blocking() {
            return Ok(verdict);
        }

        match verdict {
            IpVerdict::ProxyDetected { proxy, hosting } => {
                tracing::warn!(
                    "IP check flagged submission: ip={:?}, proxy={}, hosting={}",
                    ip,
                    proxy,
                    hosting
                );
                Err(AppError::SpoofingSuspected(
                    "VPN/Proxy detected".to_string(),
                ))
            }
            IpVerdict::Mismatch { distance_km } => {
                tracing::warn!(
                    "IP and GPS mismatch: ip={:?}, distance={:.1}km, threshold={:.1}km",
                    ip,
                    distance_km,
                    self.mismatch_threshold_km
                );
                Err(AppError::SpoofingSuspected("IP and GPS mismatch".to_string()))
            }
            other => Ok(other),
        }
    }

    /// Run the cross-check without applying any rejection
    pub async fn assess(&self, ip: Option<IpAddr>, lat: f64, lon: f64) -> IpVerdict {
        let Some(provider) = &self.provider else {
            return IpVerdict::Skipped("disabled");
        };
        let Some(ip) = ip else {
            tracing::debug!("IP check skipped: no client address");
            return IpVerdict::Skipped("no client address");
        };
        if !is_public(ip) {
            tracing::debug!("IP check skipped: non-routable address {}", ip);
            return IpVerdict::Skipped("non-routable address");
        }

        let lookup = match tokio::time::timeout(self.timeout, provider.lookup(ip)).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                tracing::warn!("IP check failed (non-blocking): ip={}, error={}", ip, e);
                return IpVerdict::Unavailable(e.to_string());
            }
            Err(_) => {
                tracing::warn!(
                    "IP check timed out (non-blocking): ip={}, timeout={}ms",
                    ip,
                    self.timeout.as_millis()
                );
                return IpVerdict::Unavailable(
                    IpLookupError::Timeout(self.timeout.as_millis()).to_string(),
                );
            }
        };

        if lookup.proxy || lookup.hosting {
            return IpVerdict::ProxyDetected {
                proxy: lookup.proxy,
                hosting: lookup.hosting,
            };
        }

        let distance = match (lookup.lat, lookup.lon) {
            (Some(ip_lat), Some(ip_lon)) if ip_lat.is_finite() && ip_lon.is_finite() => {
                Some(distance_km(ip_lat, ip_lon, lat, lon))
            }
            _ => None,
        };

        if let Some(distance_km) = distance {
            tracing::info!("IP check: ip={}, ip_to_gps_distance={:.1}km", ip, distance_km);
            if self.enforce_ip_gps_mismatch && distance_km > self.mismatch_threshold_km {
                return IpVerdict::Mismatch { distance_km };
            }
        }

        IpVerdict::Clean {
            distance_km: distance,
        }
    }
}

/// Addresses a public geolocation provider can say something about
fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            // 0/8, 100.64/10 (CGNAT), 198.18/15 (benchmarking), 240/4 (reserved)
            let reserved = a == 0
                || (a == 100 && (b & 0xc0) == 64)
                || (a == 198 && (b & 0xfe) == 18)
                || a >= 240;
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_multicast()
                || reserved)
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ip_check::models::IpLookup;
    use crate::shared::test_helpers::FakeIpProvider;

    const GPS: (f64, f64) = (22.6023, 72.8205);

    fn public_ip() -> Option<IpAddr> {
        Some("203.0.113.10".parse().unwrap())
    }

    fn service(provider: FakeIpProvider, config: IpCheckConfig) -> IpCheckService {
        IpCheckService::new(Arc::new(provider), &config)
    }

    fn clean_lookup(lat: f64, lon: f64) -> IpLookup {
        IpLookup {
            lat: Some(lat),
            lon: Some(lon),
            proxy: false,
            hosting: false,
        }
    }

    #[tokio::test]
    async fn test_proxy_flag_rejects() {
        let provider = FakeIpProvider::returning(IpLookup {
            proxy: true,
            ..clean_lookup(GPS.0, GPS.1)
        });
        let svc = service(provider, IpCheckConfig::default());

        let result = svc.verify(public_ip(), GPS.0, GPS.1).await;
        assert!(matches!(result, Err(AppError::SpoofingSuspected(_))));
    }

    #[tokio::test]
    async fn test_hosting_flag_rejects() {
        let provider = FakeIpProvider::returning(IpLookup {
            hosting: true,
            ..clean_lookup(GPS.0, GPS.1)
        });
        let svc = service(provider, IpCheckConfig::default());

        let verdict = svc.assess(public_ip(), GPS.0, GPS.1).await;
        assert_eq!(
            verdict,
            IpVerdict::ProxyDetected {
                proxy: false,
                hosting: true
            }
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_not_blocking() {
        let svc = service(FakeIpProvider::failing(), IpCheckConfig::default());

        let verdict = svc.verify(public_ip(), GPS.0, GPS.1).await.unwrap();
        assert!(matches!(verdict, IpVerdict::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_not_blocking() {
        let config = IpCheckConfig {
            timeout: Duration::from_millis(50),
            ..IpCheckConfig::default()
        };
        let svc = service(FakeIpProvider::hanging(), config);

        let started = std::time::Instant::now();
        let verdict = svc.verify(public_ip(), GPS.0, GPS.1).await.unwrap();
        assert!(matches!(verdict, IpVerdict::Unavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_mismatch_only_enforced_when_enabled() {
        // Mumbai is roughly 400 km from the reference point
        let far = clean_lookup(19.0760, 72.8777);

        let lenient = service(FakeIpProvider::returning(far.clone()), IpCheckConfig::default());
        let verdict = lenient.verify(public_ip(), GPS.0, GPS.1).await.unwrap();
        match verdict {
            IpVerdict::Clean {
                distance_km: Some(d),
            } => assert!(d > 200.0),
            other => panic!("unexpected verdict: {:?}", other),
        }

        let strict = service(
            FakeIpProvider::returning(far),
            IpCheckConfig {
                enforce_ip_gps_mismatch: true,
                ..IpCheckConfig::default()
            },
        );
        let result = strict.verify(public_ip(), GPS.0, GPS.1).await;
        assert!(matches!(result, Err(AppError::SpoofingSuspected(_))));
    }

    #[tokio::test]
    async fn test_nearby_ip_passes_strict_mode() {
        let svc = service(
            FakeIpProvider::returning(clean_lookup(22.70, 72.90)),
            IpCheckConfig {
                enforce_ip_gps_mismatch: true,
                ..IpCheckConfig::default()
            },
        );
        let verdict = svc.verify(public_ip(), GPS.0, GPS.1).await.unwrap();
        assert!(matches!(verdict, IpVerdict::Clean { .. }));
    }

    #[tokio::test]
    async fn test_skips_without_lookup() {
        let provider = FakeIpProvider::returning(IpLookup {
            proxy: true,
            ..clean_lookup(GPS.0, GPS.1)
        });
        let calls = provider.calls();
        let svc = service(provider, IpCheckConfig::default());

        assert_eq!(
            svc.assess(None, GPS.0, GPS.1).await,
            IpVerdict::Skipped("no client address")
        );
        assert_eq!(
            svc.assess(Some("10.1.2.3".parse().unwrap()), GPS.0, GPS.1).await,
            IpVerdict::Skipped("non-routable address")
        );
        assert_eq!(
            svc.assess(Some("::1".parse().unwrap()), GPS.0, GPS.1).await,
            IpVerdict::Skipped("non-routable address")
        );
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        let disabled = IpCheckService::disabled();
        assert_eq!(
            disabled.assess(public_ip(), GPS.0, GPS.1).await,
            IpVerdict::Skipped("disabled")
        );
    }

    #[test]
    fn test_is_public() {
        assert!(is_public("203.0.113.10".parse().unwrap()));
        assert!(is_public("8.8.8.8".parse().unwrap()));
        assert!(is_public("2001:4860:4860::8888".parse().unwrap()));
        assert!(!is_public("127.0.0.1".parse().unwrap()));
        assert!(!is_public("192.168.1.5".parse().unwrap()));
        assert!(!is_public("169.254.0.1".parse().unwrap()));
        assert!(!is_public("fd00::1".parse().unwrap()));
        assert!(!is_public("fe80::1".parse().unwrap()));
        assert!(!is_public("::ffff:10.0.0.1".parse().unwrap()));
        assert!(!is_public("100.64.0.1".parse().unwrap()));
        assert!(!is_public("100.127.255.254".parse().unwrap()));
        assert!(is_public("100.128.0.1".parse().unwrap()));
        assert!(!is_public("198.18.0.1".parse().unwrap()));
        assert!(!is_public("198.19.255.1".parse().unwrap()));
        assert!(!is_public("0.1.2.3".parse().unwrap()));
        assert!(!is_public("240.0.0.1".parse().unwrap()));
        assert!(!is_public("255.255.255.255".parse().unwrap()));
        assert!(!is_public("224.0.0.1".parse().unwrap()));
    }
}
