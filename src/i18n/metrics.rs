//! Lookup and load metrics.
//!
//! Each provider owns its own counters, so two providers in one process
//! never share numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for translation lookups and loads.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Lookups answered from the table
    hits: AtomicUsize,

    /// Lookups that fell back to echoing the key
    misses: AtomicUsize,

    /// Loads that replaced the table
    loads: AtomicUsize,

    /// Loads that found no manifest entry or produced no keys
    soft_misses: AtomicUsize,

    /// Loads that failed with an I/O or parse error
    load_failures: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_soft_miss(&self) {
        self.soft_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total_lookups = hits + misses;
        let hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            hit_rate,
            loads: self.loads.load(Ordering::Relaxed),
            soft_misses: self.soft_misses.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the lookup counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Lookups answered from the table
    pub hits: usize,
    /// Lookups that fell back to the key
    pub misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,

    /// Loads that replaced the table
    pub loads: usize,
    /// Loads that found no manifest entry or produced no keys
    pub soft_misses: usize,
    /// Loads that failed to read or parse a file
    pub load_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_empty() {
        let report = LookupMetrics::new().report();
        assert_eq!(report.hits, 0);
        assert_eq!(report.misses, 0);
        assert_eq!(report.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let metrics = LookupMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let report = metrics.report();
        assert_eq!(report.hits, 3);
        assert_eq!(report.misses, 1);
        assert!((report.hit_rate - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_load_counters() {
        let metrics = LookupMetrics::new();
        metrics.record_load();
        metrics.record_soft_miss();
        metrics.record_soft_miss();
        metrics.record_load_failure();

        let report = metrics.report();
        assert_eq!(report.loads, 1);
        assert_eq!(report.soft_misses, 2);
        assert_eq!(report.load_failures, 1);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = LookupMetrics::new();
        metrics.record_hit();

        let json = serde_json::to_string(&metrics.report()).expect("Should serialize");
        assert!(json.contains("\"hits\":1"));
        assert!(json.contains("\"hit_rate\":100.0"));
    }
}
