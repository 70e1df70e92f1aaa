//! Prometheus-based runtime observability.
//!
//! Mirrors the compiler's diagnostics reporter in spirit: every orchestrator
//! instance owns one `RuntimeMetrics`, registered against its own
//! `prometheus::Registry` so multiple orchestrators in a process don't
//! collide on metric names.

use std::sync::Arc;

use prometheus::{IntCounter, IntGauge, Opts, Registry};

use canvas_domain::error::CanvasError;

#[derive(Clone)]
pub struct RuntimeMetrics {
    pub registry: Arc<Registry>,
    pub items_processed_total: IntCounter,
    pub items_retried_total: IntCounter,
    pub items_parked_total: IntCounter,
    pub checkpoints_emitted_total: IntCounter,
    pub items_dropped_total: IntCounter,
    pub in_flight: IntGauge,
}

impl RuntimeMetrics {
    pub fn new() -> Result<Self, CanvasError> {
        let registry = Registry::new();

        let items_processed_total = IntCounter::with_opts(
            Opts::new("items_processed_total", "Total number of items that completed a step successfully").namespace("canvas_runtime"),
        )
        .map_err(|e| CanvasError::permanent(format!("failed to create items_processed_total metric: {e}")))?;

        let items_retried_total = IntCounter::with_opts(
            Opts::new("items_retried_total", "Total number of transient-failure retry attempts").namespace("canvas_runtime"),
        )
        .map_err(|e| CanvasError::permanent(format!("failed to create items_retried_total metric: {e}")))?;

        let items_parked_total = IntCounter::with_opts(
            Opts::new("items_parked_total", "Total number of items parked after a permanent or exhausted failure").namespace("canvas_runtime"),
        )
        .map_err(|e| CanvasError::permanent(format!("failed to create items_parked_total metric: {e}")))?;

        let checkpoints_emitted_total = IntCounter::with_opts(
            Opts::new("checkpoints_emitted_total", "Total number of terminal checkpoints emitted").namespace("canvas_runtime"),
        )
        .map_err(|e| CanvasError::permanent(format!("failed to create checkpoints_emitted_total metric: {e}")))?;

        let items_dropped_total = IntCounter::with_opts(
            Opts::new("items_dropped_total", "Total number of items dropped by a DROP backpressure boundary").namespace("canvas_runtime"),
        )
        .map_err(|e| CanvasError::permanent(format!("failed to create items_dropped_total metric: {e}")))?;

        let in_flight =
            IntGauge::with_opts(Opts::new("in_flight", "Number of items currently being processed").namespace("canvas_runtime"))
                .map_err(|e| CanvasError::permanent(format!("failed to create in_flight metric: {e}")))?;

        registry.register(Box::new(items_processed_total.clone())).ok();
        registry.register(Box::new(items_retried_total.clone())).ok();
        registry.register(Box::new(items_parked_total.clone())).ok();
        registry.register(Box::new(checkpoints_emitted_total.clone())).ok();
        registry.register(Box::new(items_dropped_total.clone())).ok();
        registry.register(Box::new(in_flight.clone())).ok();

        Ok(Self {
            registry: Arc::new(registry),
            items_processed_total,
            items_retried_total,
            items_parked_total,
            checkpoints_emitted_total,
            items_dropped_total,
            in_flight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = RuntimeMetrics::new().unwrap();
        assert_eq!(metrics.items_processed_total.get(), 0);
        metrics.items_processed_total.inc();
        assert_eq!(metrics.items_processed_total.get(), 1);
    }
}
