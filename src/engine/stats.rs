// Engine counters — cache effectiveness and request lifecycle totals.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub challenges_preloaded: u64,
    pub requests_cancelled: u64,
    pub in_flight_requests: usize,
    pub hit_rate: f64,
}

pub struct StatsCollector {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    challenges_preloaded: AtomicU64,
    requests_cancelled: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            challenges_preloaded: AtomicU64::new(0),
            requests_cancelled: AtomicU64::new(0),
        }
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preloaded(&self) {
        self.challenges_preloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.requests_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, in_flight_requests: usize) -> StatsSnapshot {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let served = hits + misses;
        let hit_rate = if served > 0 {
            hits as f64 / served as f64
        } else {
            0.0
        };

        StatsSnapshot {
            cache_hits: hits,
            cache_misses: misses,
            challenges_preloaded: self.challenges_preloaded.load(Ordering::Relaxed),
            requests_cancelled: self.requests_cancelled.load(Ordering::Relaxed),
            in_flight_requests,
            hit_rate,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
