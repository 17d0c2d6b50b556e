use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the pipeline series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!(
            "extract_strategy_success_total",
            "Posts produced, by extraction strategy."
        );
        describe_counter!(
            "extract_strategy_failure_total",
            "Failed extraction attempts, by strategy."
        );
        describe_counter!(
            "normalize_path_total",
            "Completion replies normalized, by path (strict/heuristic)."
        );
        describe_counter!(
            "analyze_requests_total",
            "Analysis requests, by outcome."
        );
        describe_histogram!(
            "completion_latency_ms",
            "Completion service round-trip in milliseconds."
        );

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
