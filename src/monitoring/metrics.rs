/*!
 * Performance Monitor
 * Operation counters, latency histograms and cache hit/miss counters
 *
 * Purely diagnostic: nothing in the VFS reads these values back.
 */

use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::serde::is_zero_u64;
use crate::vfs::types::ErrorKind;

/// Latency buckets in seconds, sized for in-memory operations
const LATENCY_BUCKETS: [f64; 11] = [
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.1, 1.0,
];

/// Histogram data structure
#[derive(Debug, Clone)]
struct Histogram {
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl Histogram {
    fn new() -> Self {
        Self {
            counts: vec![0; LATENCY_BUCKETS.len()],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;

        for (i, &bucket) in LATENCY_BUCKETS.iter().enumerate() {
            if value <= bucket {
                self.counts[i] += 1;
            }
        }
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        let target = (self.count as f64 * p).ceil() as u64;
        for (i, &count) in self.counts.iter().enumerate() {
            if count >= target {
                return LATENCY_BUCKETS[i];
            }
        }
        LATENCY_BUCKETS[LATENCY_BUCKETS.len() - 1]
    }
}

/// Per-operation counters
#[derive(Debug, Default)]
struct OperationCounters {
    calls: u64,
    errors: u64,
}

/// Performance monitor
///
/// # Performance
/// - Cache-line aligned to prevent false sharing of the hot cache counters
#[repr(C, align(64))]
pub struct PerfMonitor {
    operations: DashMap<&'static str, OperationCounters, RandomState>,
    latencies: DashMap<&'static str, Histogram, RandomState>,
    errors: DashMap<ErrorKind, u64, RandomState>,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    start_time: Instant,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            operations: DashMap::with_hasher(RandomState::new()),
            latencies: DashMap::with_hasher(RandomState::new()),
            errors: DashMap::with_hasher(RandomState::new()),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one completed operation
    pub fn record_operation(&self, operation: &'static str, duration: Duration, error: Option<ErrorKind>) {
        {
            let mut counters = self.operations.entry(operation).or_default();
            counters.calls += 1;
            if error.is_some() {
                counters.errors += 1;
            }
        }

        self.latencies
            .entry(operation)
            .or_insert_with(Histogram::new)
            .observe(duration.as_secs_f64());

        if let Some(kind) = error {
            *self.errors.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Start timing an operation; the timer records on finish or drop
    pub fn start(self: &Arc<Self>, operation: &'static str) -> OpTimer {
        OpTimer {
            start: Instant::now(),
            operation,
            monitor: Arc::clone(self),
            error: None,
            recorded: false,
        }
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let operations = self
            .operations
            .iter()
            .map(|entry| {
                let name = *entry.key();
                let counters = entry.value();
                let latency = self
                    .latencies
                    .get(name)
                    .map(|hist| HistogramStats {
                        count: hist.count,
                        sum: hist.sum,
                        avg: if hist.count > 0 {
                            hist.sum / hist.count as f64
                        } else {
                            0.0
                        },
                        p50: hist.percentile(0.50),
                        p95: hist.percentile(0.95),
                        p99: hist.percentile(0.99),
                    })
                    .unwrap_or_default();
                (
                    name.to_string(),
                    OperationStats {
                        calls: counters.calls,
                        errors: counters.errors,
                        latency,
                    },
                )
            })
            .collect();

        let errors = self
            .errors
            .iter()
            .map(|entry| (entry.key().as_str().to_string(), *entry.value()))
            .collect();

        MetricsSnapshot {
            operations,
            errors,
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.operations.clear();
        self.latencies.clear();
        self.errors.clear();
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PerfMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfMonitor")
            .field("operations", &self.operations.len())
            .field("cache_hits", &self.cache_hits.load(Ordering::Relaxed))
            .field("cache_misses", &self.cache_misses.load(Ordering::Relaxed))
            .finish()
    }
}

/// Histogram statistics (seconds)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistogramStats {
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Counters and latency for one operation name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationStats {
    pub calls: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub errors: u64,
    pub latency: HistogramStats,
}

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsSnapshot {
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub operations: HashMap<String, OperationStats>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub errors: HashMap<String, u64>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub uptime_secs: u64,
}

/// Timer for measuring operation duration
pub struct OpTimer {
    start: Instant,
    operation: &'static str,
    monitor: Arc<PerfMonitor>,
    error: Option<ErrorKind>,
    recorded: bool,
}

impl OpTimer {
    /// Stop the timer, recording the outcome
    pub fn finish(mut self, error: Option<ErrorKind>) -> Duration {
        self.error = error;
        self.record()
    }

    fn record(&mut self) -> Duration {
        let duration = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            self.monitor
                .record_operation(self.operation, duration, self.error);
        }
        duration
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        self.record();
    }
}
