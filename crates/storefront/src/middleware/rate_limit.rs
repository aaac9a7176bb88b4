//! Fixed-window rate limiting for cart validation.
//!
//! The limiter is an explicit store injected through [`AppState`](crate::state::AppState)
//! rather than a process-global table. The default implementation keeps one
//! window per client identity in a bounded `moka` cache whose entries expire
//! once their window is over.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use moka::ops::compute::Op;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::config::RateLimitConfig;

// =============================================================================
// Client Identity Extraction (Cloudflare + Fly.io)
// =============================================================================

/// Identity used to key rate limit windows.
///
/// Checks Cloudflare's `CF-Connecting-IP` header first, then the standard
/// proxy headers, then the socket peer address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    /// Identity used when nothing about the caller is known.
    pub const UNKNOWN: &'static str = "unknown";

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the identity from proxy headers, falling back to the peer address.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        let ip = header_ip("cf-connecting-ip")
            .or_else(|| header_ip("x-forwarded-for"))
            .or_else(|| header_ip("x-real-ip"))
            .or_else(|| header_ip("fly-client-ip"))
            .or_else(|| peer.map(|addr| addr.ip()));

        Self(ip.map_or_else(|| Self::UNKNOWN.to_string(), |ip| ip.to_string()))
    }
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_headers(&parts.headers, peer))
    }
}

// =============================================================================
// Rate Limit Store
// =============================================================================

/// Outcome of counting one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request fits in the current window.
    Allowed {
        /// Requests still available in this window.
        remaining: u32,
    },
    /// The window is exhausted.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Keyed request counter.
///
/// Implementations must count atomically per key: concurrent callers for the
/// same key never lose an increment.
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key` at time `now`.
    fn check(&self, key: &str, now: Instant) -> RateDecision;
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    resets_at: Instant,
}

/// Fixed-window limiter backed by a bounded, self-expiring cache.
///
/// A window opens on a client's first request and lasts `window`. The
/// `max_requests + 1`th request inside it is limited. The first request
/// after `resets_at` opens a fresh window.
///
/// The cache uses LRU eviction so a new client's window is always stored.
/// At capacity the least recently seen client loses its window instead.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    windows: Cache<String, WindowState>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let windows = Cache::builder()
            .max_capacity(config.max_keys)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_live(config.window)
            .build();

        Self {
            windows,
            max_requests: config.max_requests,
            window: config.window,
        }
    }

    /// Number of client windows currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> u64 {
        self.windows.run_pending_tasks();
        self.windows.entry_count()
    }
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl RateLimitStore for FixedWindowLimiter {
    fn check(&self, key: &str, now: Instant) -> RateDecision {
        let mut decision = RateDecision::Allowed { remaining: 0 };

        self.windows
            .entry(key.to_string())
            .and_compute_with(|current| {
                let state = current.map(|entry| entry.into_value());
                match state {
                    Some(state) if now <= state.resets_at => {
                        if state.count >= self.max_requests {
                            decision = RateDecision::Limited {
                                retry_after: state.resets_at.saturating_duration_since(now),
                            };
                            return Op::Nop;
                        }
                        let count = state.count + 1;
                        decision = RateDecision::Allowed {
                            remaining: self.max_requests - count,
                        };
                        Op::Put(WindowState { count, ..state })
                    }
                    _ => {
                        decision = RateDecision::Allowed {
                            remaining: self.max_requests.saturating_sub(1),
                        };
                        Op::Put(WindowState {
                            count: 1,
                            resets_at: now + self.window,
                        })
                    }
                }
            });

        decision
    }
}
