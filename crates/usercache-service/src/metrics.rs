//! Prometheus metrics for lookup monitoring.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for the lookup path.
pub mod names {
    /// Lookups answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "usercache_cache_hits_total";
    /// Lookups that missed the cache.
    pub const CACHE_MISSES_TOTAL: &str = "usercache_cache_misses_total";
    /// Lookups that skipped an unreachable cache.
    pub const CACHE_BYPASSED_TOTAL: &str = "usercache_cache_bypassed_total";
    /// Cached values discarded because they did not decode.
    pub const CACHE_CORRUPT_TOTAL: &str = "usercache_cache_corrupt_entries_total";
    /// Lookups answered from the durable store.
    pub const STORE_HITS_TOTAL: &str = "usercache_store_hits_total";
    /// Lookups for keys present in neither store.
    pub const NOT_FOUND_TOTAL: &str = "usercache_not_found_total";
    /// Failed cache write-backs.
    pub const WRITE_BACK_FAILURES_TOTAL: &str = "usercache_write_back_failures_total";
    /// Failed lookups by error code.
    pub const LOOKUP_ERRORS_TOTAL: &str = "usercache_lookup_errors_total";

    /// Lookup duration in seconds.
    pub const LOOKUP_DURATION_SECONDS: &str = "usercache_lookup_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of lookups answered from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of lookups that missed the cache"
    );
    describe_counter!(
        names::CACHE_BYPASSED_TOTAL,
        "Total number of lookups that bypassed an unavailable cache"
    );
    describe_counter!(
        names::CACHE_CORRUPT_TOTAL,
        "Total number of cached values that failed to decode"
    );
    describe_counter!(
        names::STORE_HITS_TOTAL,
        "Total number of lookups answered from the durable store"
    );
    describe_counter!(
        names::NOT_FOUND_TOTAL,
        "Total number of lookups for unknown names"
    );
    describe_counter!(
        names::WRITE_BACK_FAILURES_TOTAL,
        "Total number of failed cache write-backs"
    );
    describe_counter!(
        names::LOOKUP_ERRORS_TOTAL,
        "Total number of failed lookups by error code"
    );

    describe_histogram!(
        names::LOOKUP_DURATION_SECONDS,
        "Lookup duration in seconds"
    );
}

/// Lookup metrics recorder.
#[derive(Clone)]
pub struct LookupMetrics;

impl LookupMetrics {
    pub fn cache_hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    pub fn cache_miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    pub fn cache_bypassed() {
        counter!(names::CACHE_BYPASSED_TOTAL).increment(1);
    }

    pub fn cache_corrupt() {
        counter!(names::CACHE_CORRUPT_TOTAL).increment(1);
    }

    pub fn store_hit() {
        counter!(names::STORE_HITS_TOTAL).increment(1);
    }

    pub fn not_found() {
        counter!(names::NOT_FOUND_TOTAL).increment(1);
    }

    pub fn write_back_failed() {
        counter!(names::WRITE_BACK_FAILURES_TOTAL).increment(1);
    }

    /// Record a failed lookup.
    pub fn lookup_failed(error_code: &str) {
        counter!(
            names::LOOKUP_ERRORS_TOTAL,
            "code" => error_code.to_string()
        )
        .increment(1);
    }

    /// Record lookup duration, labelled by where the answer came from.
    pub fn lookup_duration(outcome: &'static str, duration: Duration) {
        histogram!(
            names::LOOKUP_DURATION_SECONDS,
            "outcome" => outcome
        )
        .record(duration.as_secs_f64());
    }
}
