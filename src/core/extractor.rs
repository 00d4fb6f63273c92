use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::InvalidInput(message).into_response()
    }
}

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Best-effort client address.
///
/// Resolution order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the
/// TCP peer address (only present when the server was started with connect info).
/// Never rejects; `None` means no usable address was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl ClientIp {
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(parse_ip);

        let real_ip = || {
            headers
                .get(X_REAL_IP)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_ip)
        };

        Self(forwarded.or_else(real_ip).or(peer.map(|addr| addr.ip())))
    }
}

/// Accepts a bare address or an `addr:port` pair
fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self::resolve(&parts.headers, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let h = headers(&[
            (X_FORWARDED_FOR, "203.0.113.7, 10.0.0.1, 10.0.0.2"),
            (X_REAL_IP, "198.51.100.9"),
        ]);
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();

        let ip = ClientIp::resolve(&h, Some(peer));
        assert_eq!(ip, ClientIp(Some("203.0.113.7".parse().unwrap())));
    }

    #[test]
    fn test_falls_back_to_real_ip_then_peer() {
        let h = headers(&[(X_REAL_IP, "198.51.100.9")]);
        assert_eq!(
            ClientIp::resolve(&h, None),
            ClientIp(Some("198.51.100.9".parse().unwrap()))
        );

        let peer: SocketAddr = "192.0.2.44:5555".parse().unwrap();
        assert_eq!(
            ClientIp::resolve(&HeaderMap::new(), Some(peer)),
            ClientIp(Some("192.0.2.44".parse().unwrap()))
        );
    }

    #[test]
    fn test_garbage_forwarded_for_is_skipped() {
        let h = headers(&[(X_FORWARDED_FOR, "unknown"), (X_REAL_IP, "198.51.100.9")]);
        assert_eq!(
            ClientIp::resolve(&h, None),
            ClientIp(Some("198.51.100.9".parse().unwrap()))
        );
    }

    #[test]
    fn test_forwarded_entry_with_port_and_ipv6() {
        let h = headers(&[(X_FORWARDED_FOR, "203.0.113.7:8080")]);
        assert_eq!(
            ClientIp::resolve(&h, None),
            ClientIp(Some("203.0.113.7".parse().unwrap()))
        );

        let h = headers(&[(X_FORWARDED_FOR, "2001:db8::1")]);
        assert_eq!(
            ClientIp::resolve(&h, None),
            ClientIp(Some("2001:db8::1".parse().unwrap()))
        );
    }

    #[test]
    fn test_nothing_available() {
        assert_eq!(ClientIp::resolve(&HeaderMap::new(), None), ClientIp(None));
    }
}
