//! Rate limiting middleware for ticket and escalation creation.
//!
//! A process-wide in-memory map keyed by `clientIP:action`, each entry a
//! `governor` direct rate limiter. Entries are created lazily on first use
//! and never proactively swept — adequate for a single-instance deployment;
//! a horizontally-scaled deployment needs a shared store instead.

use axum::http::HeaderMap;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide rate limiter keyed by `clientIP:action`.
#[derive(Clone)]
pub struct RateLimiter {
    quota: u32,
    window_secs: u64,
    buckets: Arc<RwLock<HashMap<String, Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>>>>,
}

impl RateLimiter {
    pub fn new(quota: u32, window_secs: u64) -> Self {
        Self {
            quota,
            window_secs,
            buckets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check (and consume) one unit of quota for `(ip, action)`. Returns the
    /// retry-after duration in seconds on rejection.
    pub async fn check(&self, ip: IpAddr, action: &str) -> Result<(), u64> {
        let key = format!("{}:{}", ip, action);

        let limiter = {
            let buckets = self.buckets.read().await;
            buckets.get(&key).cloned()
        };

        let limiter = match limiter {
            Some(limiter) => limiter,
            None => {
                let mut buckets = self.buckets.write().await;
                buckets
                    .entry(key)
                    .or_insert_with(|| Arc::new(GovRateLimiter::direct(self.quota_for_window())))
                    .clone()
            }
        };

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(DefaultClock::default().now());
                Err(retry_after.as_secs() + 1)
            }
        }
    }

    fn quota_for_window(&self) -> Quota {
        let quota = NonZeroU32::new(self.quota).unwrap_or(NonZeroU32::new(1).unwrap());
        Quota::with_period(std::time::Duration::from_secs(self.window_secs))
            .unwrap_or_else(|| Quota::per_minute(quota))
            .allow_burst(quota)
    }
}

/// Extract client IP address from request.
///
/// Tries in order:
/// 1. X-Real-IP header (set by reverse proxy)
/// 2. X-Forwarded-For header (first IP in chain)
/// 3. Socket address from connection
///
/// Falls back to 0.0.0.0 if no IP can be determined.
pub fn extract_client_ip(headers: &HeaderMap, socket_addr: Option<SocketAddr>) -> IpAddr {
    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }

    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    if let Some(addr) = socket_addr {
        return addr.ip();
    }

    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_rate_limiter_allows_up_to_quota() {
        let limiter = RateLimiter::new(3, 60);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        for _ in 0..3 {
            assert!(limiter.check(ip, "create_ticket").await.is_ok());
        }
        assert!(limiter.check(ip, "create_ticket").await.is_err());
    }

    #[tokio::test]
    async fn test_rate_limiter_keys_are_independent_per_action() {
        let limiter = RateLimiter::new(1, 60);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(ip, "create_ticket").await.is_ok());
        assert!(limiter.check(ip, "create_escalation").await.is_ok());
        assert!(limiter.check(ip, "create_ticket").await.is_err());
    }

    #[tokio::test]
    async fn test_rate_limiter_keys_are_independent_per_ip() {
        let limiter = RateLimiter::new(1, 60);
        let ip_a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3));
        let ip_b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 4));

        assert!(limiter.check(ip_a, "create_ticket").await.is_ok());
        assert!(limiter.check(ip_b, "create_ticket").await.is_ok());
    }

    #[test]
    fn test_extract_client_ip_from_x_real_ip() {
        use axum::http::HeaderValue;
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("10.0.0.1"));

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_extract_client_ip_from_x_forwarded_for() {
        use axum::http::HeaderValue;
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("203.0.113.50, 70.41.3.18, 150.172.238.178"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(203, 0, 113, 50)));
    }

    #[test]
    fn test_extract_client_ip_x_real_ip_takes_precedence() {
        use axum::http::HeaderValue;
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("10.0.0.1"));
        headers.insert("X-Forwarded-For", HeaderValue::from_static("203.0.113.50"));

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_extract_client_ip_from_socket_addr() {
        let headers = HeaderMap::new();
        let socket_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);

        let ip = extract_client_ip(&headers, Some(socket_addr));
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
    }

    #[test]
    fn test_extract_client_ip_fallback() {
        let headers = HeaderMap::new();
        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_extract_client_ip_invalid_x_real_ip() {
        use axum::http::HeaderValue;
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("not-an-ip"));

        let socket_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), 8080);
        let ip = extract_client_ip(&headers, Some(socket_addr));

        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
    }
}
