//! Prometheus metrics for the tiered mint engine.
//!
//! All metrics follow the naming convention: `tm_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., units_minted_total)
//! - **Gauge**: Value that can go up or down (e.g., tier_remaining)
//! - **Histogram**: Distribution of values (e.g., request_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter,
    IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

/// Mint engine collectors.
#[derive(Clone, Debug)]
pub struct MintMetrics {
    /// Units allocated, by entry point
    pub units_minted: IntCounterVec,
    /// Failed requests, by error kind
    pub rejections: IntCounterVec,
    /// Refund transfers paid out
    pub refunds_paid: IntCounter,
    /// Remaining capacity, by tier
    pub tier_remaining: IntGaugeVec,
    /// Transaction latency, by operation
    pub request_duration: HistogramVec,
}

impl MintMetrics {
    fn new() -> Result<Self, TelemetryError> {
        let buckets = exponential_buckets(0.00001, 2.0, 15).map_err(init_error)?;

        Ok(Self {
            units_minted: IntCounterVec::new(
                Opts::new("tm_mint_units_minted_total", "Units allocated"),
                &["path"], // path: public/allow_list/privileged
            )
            .map_err(init_error)?,

            rejections: IntCounterVec::new(
                Opts::new("tm_mint_rejections_total", "Failed mint or admin requests"),
                &["kind"],
            )
            .map_err(init_error)?,

            refunds_paid: IntCounter::new(
                "tm_settlement_refunds_total",
                "Overpayment refunds paid out",
            )
            .map_err(init_error)?,

            tier_remaining: IntGaugeVec::new(
                Opts::new("tm_tier_remaining", "Remaining capacity per tier"),
                &["tier"],
            )
            .map_err(init_error)?,

            request_duration: HistogramVec::new(
                HistogramOpts::new(
                    "tm_mint_request_duration_seconds",
                    "Time spent in one transaction",
                )
                .buckets(buckets),
                &["operation"],
            )
            .map_err(init_error)?,
        })
    }

    fn collectors(&self) -> Vec<Box<dyn prometheus::core::Collector>> {
        vec![
            Box::new(self.units_minted.clone()),
            Box::new(self.rejections.clone()),
            Box::new(self.refunds_paid.clone()),
            Box::new(self.tier_remaining.clone()),
            Box::new(self.request_duration.clone()),
        ]
    }
}

fn init_error(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    static ref METRICS: Result<MintMetrics, TelemetryError> = MintMetrics::new();
}

/// The engine collectors.
///
/// # Errors
///
/// Returns the construction error if the collectors could not be built.
pub fn mint_metrics() -> Result<&'static MintMetrics, TelemetryError> {
    METRICS.as_ref().map_err(Clone::clone)
}

/// Handle for the registered metrics
#[derive(Debug)]
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry.
///
/// # Errors
///
/// Fails if the collectors cannot be built or are already registered.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    for metric in mint_metrics()?.collectors() {
        REGISTRY.register(metric).map_err(init_error)?;
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
///
/// # Errors
///
/// Fails if encoding fails.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).map_err(init_error)?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

// =============================================================================
// RECORDING HELPERS
// =============================================================================

/// Count `units` allocated through `path`.
pub fn record_units_minted(path: &str, units: u64) {
    if let Ok(metrics) = mint_metrics() {
        metrics.units_minted.with_label_values(&[path]).inc_by(units);
    }
}

/// Count one failed request of error `kind`.
pub fn record_rejection(kind: &str) {
    if let Ok(metrics) = mint_metrics() {
        metrics.rejections.with_label_values(&[kind]).inc();
    }
}

/// Count one refund transfer.
pub fn record_refund() {
    if let Ok(metrics) = mint_metrics() {
        metrics.refunds_paid.inc();
    }
}

/// Publish the remaining capacity of `tier`.
pub fn set_tier_remaining(tier: &str, remaining: u64) {
    if let Ok(metrics) = mint_metrics() {
        metrics
            .tier_remaining
            .with_label_values(&[tier])
            .set(i64::try_from(remaining).unwrap_or(i64::MAX));
    }
}

/// Start timing `operation`. Observation happens on drop.
#[must_use]
pub fn start_request_timer(operation: &str) -> Option<HistogramTimer> {
    mint_metrics()
        .ok()
        .map(|metrics| HistogramTimer::new(&metrics.request_duration.with_label_values(&[operation])))
}

/// Timer guard for automatic histogram observation.
#[derive(Debug)]
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    #[must_use]
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
