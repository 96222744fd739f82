//! Prometheus metrics for medinfo-web.
//!
//! HTTP request metrics go through the `metrics` facade (recorded by the
//! service-core middleware); chat relay metrics live in a `prometheus` registry.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static CHAT_RELAY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static CHAT_UPSTREAM_DURATION_SECONDS: OnceLock<Histogram> = OnceLock::new();

/// Install the recorder and register chat metrics. Later calls are no-ops.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;
    let _ = METRICS_HANDLE.set(handle);

    let registry = Registry::new();

    let requests = IntCounterVec::new(
        Opts::new(
            "chat_relay_requests_total",
            "Chat relay requests by outcome",
        ),
        &["outcome"],
    )?;
    let upstream_duration = Histogram::with_opts(
        HistogramOpts::new(
            "chat_upstream_duration_seconds",
            "Latency of chat completion calls",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
    )?;

    registry.register(Box::new(requests.clone()))?;
    registry.register(Box::new(upstream_duration.clone()))?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = CHAT_RELAY_REQUESTS_TOTAL.set(requests);
    let _ = CHAT_UPSTREAM_DURATION_SECONDS.set(upstream_duration);

    Ok(())
}

/// Metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        let mut buffer = Vec::new();
        if TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .is_ok()
        {
            output.push_str(&String::from_utf8_lossy(&buffer));
        }
    }

    output
}

pub fn record_chat_outcome(outcome: &str) {
    if let Some(counter) = CHAT_RELAY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn observe_upstream_duration(elapsed: Duration) {
    if let Some(histogram) = CHAT_UPSTREAM_DURATION_SECONDS.get() {
        histogram.observe(elapsed.as_secs_f64());
    }
}
