//! Engine metrics
//!
//! Atomic counters updated on the submission path; `snapshot()` gives a
//! serializable view for operational stats endpoints and logs.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
struct LatencyTracker {
    count: AtomicU64,
    sum_us: AtomicU64,
    max_us: AtomicU64,
}

impl LatencyTracker {
    fn record(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_us.fetch_add(us, Ordering::Relaxed);
        self.max_us.fetch_max(us, Ordering::Relaxed);
    }

    fn avg_us(&self) -> u64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            0
        } else {
            self.sum_us.load(Ordering::Relaxed) / count
        }
    }
}

/// Counters for the matching engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    bids_received: AtomicU64,
    bids_accepted: AtomicU64,
    bids_rejected: AtomicU64,
    auctions_settled: AtomicU64,
    open_auctions: AtomicU64,
    submit_latency: LatencyTracker,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bid_received(&self) {
        self.bids_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bid_accepted(&self) {
        self.bids_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bid_rejected(&self) {
        self.bids_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_auction_settled(&self) {
        self.auctions_settled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auction_opened(&self) {
        self.open_auctions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auction_closed(&self) {
        self.open_auctions.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_submit_latency(&self, duration: Duration) {
        self.submit_latency.record(duration);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bids_received: self.bids_received.load(Ordering::Relaxed),
            bids_accepted: self.bids_accepted.load(Ordering::Relaxed),
            bids_rejected: self.bids_rejected.load(Ordering::Relaxed),
            auctions_settled: self.auctions_settled.load(Ordering::Relaxed),
            open_auctions: self.open_auctions.load(Ordering::Relaxed),
            submit_latency_avg_us: self.submit_latency.avg_us(),
            submit_latency_max_us: self.submit_latency.max_us.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the engine counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub bids_received: u64,
    pub bids_accepted: u64,
    pub bids_rejected: u64,
    pub auctions_settled: u64,
    pub open_auctions: u64,
    pub submit_latency_avg_us: u64,
    pub submit_latency_max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = EngineMetrics::new();
        metrics.record_bid_received();
        metrics.record_bid_received();
        metrics.record_bid_accepted();
        metrics.record_bid_rejected();
        metrics.auction_opened();

        let snap = metrics.snapshot();
        assert_eq!(snap.bids_received, 2);
        assert_eq!(snap.bids_accepted, 1);
        assert_eq!(snap.bids_rejected, 1);
        assert_eq!(snap.open_auctions, 1);
    }

    #[test]
    fn test_latency_average() {
        let metrics = EngineMetrics::new();
        metrics.record_submit_latency(Duration::from_micros(10));
        metrics.record_submit_latency(Duration::from_micros(30));

        let snap = metrics.snapshot();
        assert_eq!(snap.submit_latency_avg_us, 20);
        assert_eq!(snap.submit_latency_max_us, 30);
    }
}
