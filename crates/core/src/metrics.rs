//! Prometheus metrics for core components.
//!
//! The server crate registers these into its registry via [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Conversion requests by terminal result ("completed" / "failed").
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressa_conversions_total", "Total conversion requests"),
        &["result"],
    )
    .unwrap()
});

/// End-to-end conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pressa_conversion_duration_seconds",
            "Duration of a conversion request",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

/// Font resolutions by outcome ("cache_hit" / "downloaded" / "failed").
pub static FONT_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressa_font_resolutions_total", "Font resolution attempts"),
        &["outcome"],
    )
    .unwrap()
});

/// Non-fatal font installation failures.
pub static FONT_INSTALL_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pressa_font_install_failures_total",
        "Font installations that failed (non-fatal)",
    )
    .unwrap()
});

/// All core metrics, for registration into the server's registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(FONT_RESOLUTIONS.clone()),
        Box::new(FONT_INSTALL_FAILURES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_are_registrable() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }

    #[test]
    fn test_counters_increment() {
        let before = CONVERSIONS_TOTAL.with_label_values(&["completed"]).get();
        CONVERSIONS_TOTAL.with_label_values(&["completed"]).inc();
        assert_eq!(
            CONVERSIONS_TOTAL.with_label_values(&["completed"]).get(),
            before + 1
        );
    }
}
