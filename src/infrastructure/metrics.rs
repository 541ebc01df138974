//! Metrics collection for service monitoring
//!
//! Lock-free counters using atomic operations.
//! Updated per request, exported via `/api/metrics`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Service metrics collector
pub struct MetricsCollector {
    /// Requests that reached the service or were rejected at parsing
    total_requests: AtomicU64,
    /// Single-symbol requests
    single_requests: AtomicU64,
    /// Two-symbol requests
    pair_requests: AtomicU64,
    /// Likes that created a new row
    likes_recorded: AtomicU64,
    /// Likes ignored because the pair already existed
    duplicate_likes: AtomicU64,
    /// Rejected queries (HTTP 400)
    client_errors: AtomicU64,
    /// Quote lookup failures
    upstream_errors: AtomicU64,
    /// Storage or identity failures
    internal_errors: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot for API export
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub single_requests: u64,
    pub pair_requests: u64,
    pub likes_recorded: u64,
    pub duplicate_likes: u64,
    pub client_errors: u64,
    pub upstream_errors: u64,
    pub internal_errors: u64,
    pub request_rate: f64, // requests per second
    pub uptime_seconds: u64,
}

impl MetricsCollector {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            single_requests: AtomicU64::new(0),
            pair_requests: AtomicU64::new(0),
            likes_recorded: AtomicU64::new(0),
            duplicate_likes: AtomicU64::new(0),
            client_errors: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
            internal_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn record_single_request(&self) {
        self.single_requests.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pair_request(&self) {
        self.pair_requests.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_like(&self) {
        self.likes_recorded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_duplicate_like(&self) {
        self.duplicate_likes.fetch_add(1, Ordering::Relaxed);
    }

    /// Rejected queries never reach the service, so they count as requests here
    #[inline]
    pub fn record_client_error(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_upstream_error(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_internal_error(&self) {
        self.internal_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);

        let uptime = self.start_time.elapsed().as_secs();
        let rate = if uptime > 0 {
            total as f64 / uptime as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: total,
            single_requests: self.single_requests.load(Ordering::Relaxed),
            pair_requests: self.pair_requests.load(Ordering::Relaxed),
            likes_recorded: self.likes_recorded.load(Ordering::Relaxed),
            duplicate_likes: self.duplicate_likes.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            internal_errors: self.internal_errors.load(Ordering::Relaxed),
            request_rate: rate,
            uptime_seconds: uptime,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
