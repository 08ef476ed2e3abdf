pub mod headers;
pub mod rate_limiter;

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use time::OffsetDateTime;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

pub use headers::with_security_headers;
pub use rate_limiter::RateLimiter;

/// Client address used for rate limiting. Behind a trusted proxy this is the
/// last `X-Forwarded-For` hop, otherwise the socket peer.
pub fn client_ip(req: &Request, trust_proxy: bool) -> IpAddr {
    let forwarded = trust_proxy
        .then(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.rsplit(',').map(str::trim).find(|s| !s.is_empty()))
                .and_then(|s| s.parse::<IpAddr>().ok())
        })
        .flatten();

    forwarded
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&req, state.config.rate_limit.trust_proxy);
    let now = OffsetDateTime::now_utc().unix_timestamp();

    if !state.limiter.check_and_increment(ip, now) {
        warn!(%ip, "rate limit exceeded");
        return Err(ApiError::RateLimited {
            retry_after: state.limiter.retry_after(ip, now),
        });
    }

    Ok(next.run(req).await)
}

/// Periodically forgets clients whose window has expired.
pub fn spawn_rate_limit_sweeper(limiter: Arc<RateLimiter>) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(limiter.window_secs() as u64);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let now = OffsetDateTime::now_utc().unix_timestamp();
            limiter.cleanup_old_entries(now);
            debug!(tracked = limiter.len(), "rate limit windows swept");
        }
    })
}

/// CORS restricted to the configured origins, with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(xff: Option<&str>, peer: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/health");
        if let Some(v) = xff {
            builder = builder.header("x-forwarded-for", v);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(addr) = peer {
            req.extensions_mut()
                .insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
        }
        req
    }

    #[test]
    fn trusted_proxy_uses_last_forwarded_hop() {
        let req = request(Some("10.0.0.1, 203.0.113.7"), Some("127.0.0.1:4000"));
        assert_eq!(client_ip(&req, true), "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn untrusted_proxy_uses_socket_peer() {
        let req = request(Some("203.0.113.7"), Some("127.0.0.1:4000"));
        assert_eq!(client_ip(&req, false), "127.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn bad_forwarded_header_falls_back_to_peer() {
        let req = request(Some("not-an-ip"), Some("192.0.2.1:80"));
        assert_eq!(client_ip(&req, true), "192.0.2.1".parse::<IpAddr>().unwrap());
        let req = request(None, None);
        assert_eq!(client_ip(&req, true), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
