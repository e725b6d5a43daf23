// =============================================================================
// Rate-Limit Tracker — monitors Binance request weight to avoid 429s
// =============================================================================
//
// Binance enforces a request-weight budget of 6000 per minute per IP on the
// spot REST API.  We hard-cap ourselves well below it, since other tools on
// the same host may share the budget.
//
// The tracker reads the `X-MBX-USED-WEIGHT-1M` response header after every
// request and keeps an atomic counter that any task may query lock-free.
// =============================================================================

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

/// Hard ceiling at which we refuse to send additional requests.
const WEIGHT_HARD_LIMIT: u32 = 5000;
/// Soft warning threshold.
const WEIGHT_WARN_THRESHOLD: u32 = 4000;

/// Request weight of GET /api/v3/klines for a given `limit`.
pub fn klines_weight(limit: u32) -> u32 {
    match limit {
        0..=100 => 2,
        101..=500 => 5,
        _ => 10,
    }
}

/// Thread-safe request-weight tracker backed by an atomic counter.
pub struct RateLimitTracker {
    used_weight_1m: AtomicU32,
}

impl RateLimitTracker {
    /// Create a new tracker with the counter at zero.
    pub fn new() -> Self {
        Self {
            used_weight_1m: AtomicU32::new(0),
        }
    }

    /// Update the counter from the HTTP response headers returned by Binance.
    pub fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let Some(weight) = headers
            .get("X-MBX-USED-WEIGHT-1M")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
        else {
            return;
        };

        let prev = self.used_weight_1m.swap(weight, Ordering::Relaxed);
        if weight >= WEIGHT_WARN_THRESHOLD && prev < WEIGHT_WARN_THRESHOLD {
            warn!(
                used_weight = weight,
                hard_limit = WEIGHT_HARD_LIMIT,
                "rate-limit weight crossed warning threshold"
            );
        }
        debug!(used_weight_1m = weight, "rate-limit weight updated from header");
    }

    /// Return `true` if we can afford to spend `weight` more request weight
    /// without exceeding the hard limit.
    pub fn can_send_request(&self, weight: u32) -> bool {
        let current = self.used_weight_1m.load(Ordering::Relaxed);
        let allowed = current.saturating_add(weight) <= WEIGHT_HARD_LIMIT;
        if !allowed {
            warn!(
                current_weight = current,
                requested_weight = weight,
                hard_limit = WEIGHT_HARD_LIMIT,
                "request blocked, would exceed rate-limit"
            );
        }
        allowed
    }

    /// Last weight reported by Binance.
    pub fn used_weight(&self) -> u32 {
        self.used_weight_1m.load(Ordering::Relaxed)
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitTracker")
            .field("used_weight_1m", &self.used_weight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn headers(weight: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("X-MBX-USED-WEIGHT-1M", HeaderValue::from_str(weight).unwrap());
        h
    }

    #[test]
    fn header_updates_counter() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("42"));
        assert_eq!(t.used_weight(), 42);
    }

    #[test]
    fn garbage_header_is_ignored() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("17"));
        t.update_from_headers(&headers("lots"));
        assert_eq!(t.used_weight(), 17);
        t.update_from_headers(&HeaderMap::new());
        assert_eq!(t.used_weight(), 17);
    }

    #[test]
    fn blocks_at_hard_limit() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("4998"));
        assert!(t.can_send_request(2));
        assert!(!t.can_send_request(5));
    }

    #[test]
    fn saturated_header_blocks_without_overflow() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers(&u32::MAX.to_string()));
        assert_eq!(t.used_weight(), u32::MAX);
        assert!(!t.can_send_request(2));
    }

    #[test]
    fn klines_weight_steps_with_limit() {
        assert_eq!(klines_weight(100), 2);
        assert_eq!(klines_weight(101), 5);
        assert_eq!(klines_weight(500), 5);
        assert_eq!(klines_weight(1000), 10);
    }
}
