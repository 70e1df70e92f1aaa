//! Runtime Orchestrator.
//!
//! Drives the effective order (the output of the compiler's Order Expander,
//! C7) against a sequence of step handlers, applying cardinality-aware
//! batching, per-boundary backpressure, retry/classification, chaos
//! injection (test-only), idempotency, and parking.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;

use canvas_domain::entities::{Checkpoint, PipelineContext};
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::{BackpressurePolicy, Cardinality, OverflowStrategy};

use crate::chaos::{self, ChaosCounters, ChaosGate, ChaosMarker};
use crate::failure::{DefaultClassifier, FailureClassifier, RetryPolicy};
use crate::idempotency::IdempotencyGuard;
use crate::metrics::RuntimeMetrics;
use crate::parking::ParkingLot;
use crate::shutdown::CancellationToken;

/// Default batch bound for MANY_ONE steps absent an explicit configuration.
pub const DEFAULT_BATCH_BOUND: usize = 10_000;

/// An item the orchestrator can carry through the effective order. Runtime
/// callers implement this over their generated wire/DTO types.
pub trait OrchestrableItem: Clone + Send + Sync + 'static {
    /// A deterministic identifier used for idempotency, parking, and chaos
    /// attempt tracking.
    fn external_id(&self) -> String;

    /// The raw payload chaos markers are scanned against. Types that never
    /// participate in chaos testing can leave this as the default.
    fn chaos_payload(&self) -> &str {
        ""
    }
}

/// A single step's execution contract: batch in, batch out. Cardinality is
/// handled by the orchestrator around this call, not inside it.
#[async_trait]
pub trait StepHandler<Item: OrchestrableItem>: Send + Sync {
    async fn invoke(&self, batch: Vec<Item>, ctx: &PipelineContext) -> Result<Vec<Item>, CanvasError>;
}

/// Wraps a [`StepHandler`] with test-only chaos injection.
/// Disabled unless `gate.enabled`; never consults the gate on a hot path
/// when it is off beyond the single boolean check.
pub struct ChaosInjectingHandler<Item: OrchestrableItem> {
    inner: Arc<dyn StepHandler<Item>>,
    gate: ChaosGate,
    counters: Arc<ChaosCounters>,
}

impl<Item: OrchestrableItem> ChaosInjectingHandler<Item> {
    pub fn new(inner: Arc<dyn StepHandler<Item>>, gate: ChaosGate, counters: Arc<ChaosCounters>) -> Self {
        Self { inner, gate, counters }
    }
}

#[async_trait]
impl<Item: OrchestrableItem> StepHandler<Item> for ChaosInjectingHandler<Item> {
    async fn invoke(&self, batch: Vec<Item>, ctx: &PipelineContext) -> Result<Vec<Item>, CanvasError> {
        if !self.gate.enabled {
            return self.inner.invoke(batch, ctx).await;
        }
        for item in &batch {
            let Some(marker) = chaos::parse_marker(item.chaos_payload()) else { continue };
            let doc_id = item.external_id();
            match marker {
                ChaosMarker::Permanent => {
                    return Err(CanvasError::permanent(format!("chaos: permanent failure injected for '{doc_id}'")));
                }
                ChaosMarker::Transient { budget } => {
                    let attempt = self.counters.record_attempt(&doc_id, "transient");
                    if attempt <= budget {
                        return Err(CanvasError::transient(format!("chaos: transient failure {attempt}/{budget} injected for '{doc_id}'")));
                    }
                    self.counters.clear(&doc_id, "transient");
                }
            }
        }
        self.inner.invoke(batch, ctx).await
    }
}

struct StepSlot<Item: OrchestrableItem> {
    cardinality: Cardinality,
    batch_bound: usize,
    handler: Arc<dyn StepHandler<Item>>,
}

/// Assembles the effective order into orchestrator-ready step slots.
pub struct OrchestratorBuilder<Item: OrchestrableItem> {
    steps: Vec<StepSlot<Item>>,
    idempotency_capacity: usize,
    parking_capacity: usize,
    retry_policy: RetryPolicy,
    classifier: Arc<dyn FailureClassifier>,
    chaos_gate: ChaosGate,
    backpressure: BackpressurePolicy,
}

impl<Item: OrchestrableItem> Default for OrchestratorBuilder<Item> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            idempotency_capacity: 10_000,
            parking_capacity: 10_000,
            retry_policy: RetryPolicy::default(),
            classifier: Arc::new(DefaultClassifier),
            chaos_gate: ChaosGate::default(),
            backpressure: BackpressurePolicy::default(),
        }
    }
}

impl<Item: OrchestrableItem> OrchestratorBuilder<Item> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, cardinality: Cardinality, handler: Arc<dyn StepHandler<Item>>) -> Self {
        self.steps.push(StepSlot { cardinality, batch_bound: DEFAULT_BATCH_BOUND, handler });
        self
    }

    pub fn with_step_batch_bound(mut self, cardinality: Cardinality, handler: Arc<dyn StepHandler<Item>>, batch_bound: usize) -> Self {
        self.steps.push(StepSlot { cardinality, batch_bound, handler });
        self
    }

    pub fn idempotency_capacity(mut self, capacity: usize) -> Self {
        self.idempotency_capacity = capacity;
        self
    }

    pub fn parking_capacity(mut self, capacity: usize) -> Self {
        self.parking_capacity = capacity;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn FailureClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn chaos_gate(mut self, gate: ChaosGate) -> Self {
        self.chaos_gate = gate;
        self
    }

    pub fn backpressure(mut self, policy: BackpressurePolicy) -> Self {
        self.backpressure = policy;
        self
    }

    pub fn build(self) -> Result<Orchestrator<Item>, CanvasError> {
        let idempotency = Arc::new(IdempotencyGuard::new(self.idempotency_capacity)?);
        let parking = Arc::new(ParkingLot::new(self.parking_capacity));
        let metrics = Arc::new(RuntimeMetrics::new()?);
        let (checkpoint_tx, _) = broadcast::channel(self.backpressure.capacity.max(1));
        Ok(Orchestrator {
            steps: Arc::new(self.steps),
            idempotency,
            parking,
            classifier: self.classifier,
            retry_policy: self.retry_policy,
            chaos_gate: self.chaos_gate,
            backpressure: self.backpressure,
            checkpoint_tx,
            metrics,
        })
    }
}

/// Drives items through the effective order end to end.
pub struct Orchestrator<Item: OrchestrableItem> {
    steps: Arc<Vec<StepSlot<Item>>>,
    idempotency: Arc<IdempotencyGuard>,
    parking: Arc<ParkingLot>,
    classifier: Arc<dyn FailureClassifier>,
    retry_policy: RetryPolicy,
    chaos_gate: ChaosGate,
    backpressure: BackpressurePolicy,
    checkpoint_tx: broadcast::Sender<Checkpoint>,
    metrics: Arc<RuntimeMetrics>,
}

async fn send_with_backpressure<Item: OrchestrableItem>(tx: &mpsc::Sender<Item>, item: Item, policy: BackpressurePolicy, metrics: &RuntimeMetrics) {
    match policy.strategy {
        OverflowStrategy::Buffer => {
            let _ = tx.send(item).await;
        }
        OverflowStrategy::Drop => {
            if tx.try_send(item).is_err() {
                metrics.items_dropped_total.inc();
                tracing::warn!("dropping item at backpressure boundary: channel full");
            }
        }
    }
}

impl<Item: OrchestrableItem> Orchestrator<Item> {
    pub fn metrics(&self) -> Arc<RuntimeMetrics> {
        self.metrics.clone()
    }

    pub fn parked_snapshot(&self) -> Vec<crate::parking::ParkedItem> {
        self.parking.snapshot()
    }

    /// Invokes `step` on `batch`, retrying transient failures with backoff
    /// and parking on permanent/exhausted failures.
    async fn invoke_with_retry(&self, step: &StepSlot<Item>, batch: Vec<Item>, ctx: &PipelineContext) -> Result<Vec<Item>, CanvasError> {
        let mut attempt = 0u32;
        loop {
            match step.handler.invoke(batch.clone(), ctx).await {
                Ok(outputs) => {
                    self.metrics.items_processed_total.inc_by(batch.len() as u64);
                    return Ok(outputs);
                }
                Err(err) => {
                    let kind = self.classifier.classify(&err);
                    if kind == canvas_domain::error::FailureKind::TransientFailure && !self.retry_policy.exhausted(attempt) {
                        self.metrics.items_retried_total.inc();
                        tokio::time::sleep(self.retry_policy.backoff_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    let now = Utc::now();
                    for item in &batch {
                        self.metrics.items_parked_total.inc();
                        self.parking.park(item.external_id(), kind, err.to_string(), now);
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Threads a single input item through the full effective order,
    /// respecting each step's cardinality.
    ///
    /// A `MANY_ONE` step that would collect zero items is an `InvalidInput`
    /// failure, not a silent empty output (spec §8 boundary behavior: "token
    /// batches are required"); every other cardinality treats an empty
    /// frontier as simply nothing left to do.
    async fn process_through(&self, item: Item, ctx: &PipelineContext, cancel: &CancellationToken) -> Result<Vec<Item>, CanvasError> {
        let mut frontier = vec![item];
        for step in self.steps.iter() {
            if cancel.is_cancelled() {
                return Ok(Vec::new());
            }
            if frontier.is_empty() {
                if step.cardinality == Cardinality::ManyOne {
                    return Err(CanvasError::invalid_input("token batches are required"));
                }
                return Ok(Vec::new());
            }
            frontier = match step.cardinality {
                Cardinality::OneOne | Cardinality::OneMany | Cardinality::ManyMany => {
                    let mut next = Vec::new();
                    for item in frontier {
                        match self.invoke_with_retry(step, vec![item], ctx).await {
                            Ok(outputs) => next.extend(outputs),
                            Err(_) => continue,
                        }
                    }
                    next
                }
                Cardinality::ManyOne => {
                    let mut next = Vec::new();
                    for chunk in frontier.chunks(step.batch_bound.max(1)) {
                        match self.invoke_with_retry(step, chunk.to_vec(), ctx).await {
                            Ok(outputs) => next.extend(outputs),
                            Err(_) => continue,
                        }
                    }
                    next
                }
            };
        }
        Ok(frontier)
    }

    fn emit_checkpoint(&self, invocation_id: uuid::Uuid, item: &Item) {
        let checkpoint = Checkpoint::new(invocation_id, item.external_id(), Utc::now());
        self.metrics.checkpoints_emitted_total.inc();
        // No subscribers is a normal idle state, not an error.
        let _ = self.checkpoint_tx.send(checkpoint);
    }

    /// Runs a single input through the full effective order and returns its
    /// outputs directly, surfacing a failed invocation's classified error
    /// instead
    /// of silently dropping it. [`Self::run`] wraps this for the streaming
    /// public surface.
    pub async fn run_to_completion(self: &Arc<Self>, input: Item, ctx: PipelineContext, cancel: CancellationToken) -> Result<Vec<Item>, CanvasError> {
        self.process_through(input, &ctx, &cancel).await
    }

    /// `run(input) → Stream<Output>`: single-input streaming run (spec
    /// §4.9).
    pub fn run(self: &Arc<Self>, input: Item, ctx: PipelineContext, cancel: CancellationToken) -> impl Stream<Item = Item> {
        let (tx, rx) = mpsc::channel(self.backpressure.capacity);
        let orchestrator = self.clone();
        tokio::spawn(async move {
            let invocation_id = ctx.invocation_id;
            let outputs = match orchestrator.process_through(input, &ctx, &cancel).await {
                Ok(outputs) => outputs,
                Err(err) => {
                    tracing::error!(error = %err, "invocation failed");
                    return;
                }
            };
            for out in outputs {
                if cancel.is_cancelled() {
                    break;
                }
                orchestrator.emit_checkpoint(invocation_id, &out);
                send_with_backpressure(&tx, out, orchestrator.backpressure, &orchestrator.metrics).await;
            }
        });
        ReceiverStream::new(rx)
    }

    /// `ingest(Stream<Input>) → Stream<Output>`: bidirectional streaming.
    /// Each input item runs through the full effective order
    /// independently; idempotency is applied at the ingest boundary.
    pub fn ingest(
        self: &Arc<Self>,
        mut input: impl Stream<Item = Item> + Unpin + Send + 'static,
        ctx: PipelineContext,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Item> {
        let (tx, rx) = mpsc::channel(self.backpressure.capacity);
        let orchestrator = self.clone();
        tokio::spawn(async move {
            let invocation_id = ctx.invocation_id;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    maybe_item = input.next() => {
                        let Some(item) = maybe_item else { break };
                        match orchestrator.idempotency.mark_if_new(&item.external_id()) {
                            Ok(true) => {}
                            Ok(false) => continue,
                            Err(err) => {
                                tracing::warn!(error = %err, "ingest: rejecting item with invalid idempotency key");
                                continue;
                            }
                        }
                        let outputs = match orchestrator.process_through(item, &ctx, &cancel).await {
                            Ok(outputs) => outputs,
                            Err(err) => {
                                tracing::error!(error = %err, "ingest: invocation failed");
                                continue;
                            }
                        };
                        for out in outputs {
                            if cancel.is_cancelled() {
                                return;
                            }
                            orchestrator.emit_checkpoint(invocation_id, &out);
                            send_with_backpressure(&tx, out, orchestrator.backpressure, &orchestrator.metrics).await;
                        }
                    }
                }
            }
        });
        ReceiverStream::new(rx)
    }

    /// `subscribe() → Stream<Checkpoint>`: observe terminal checkpoints.
    pub fn subscribe(&self) -> impl Stream<Item = Checkpoint> {
        let rx = self.checkpoint_tx.subscribe();
        tokio_stream::wrappers::BroadcastStream::new(rx).filter_map(|r| async move { r.ok() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::value_objects::CachePolicy;
    use futures::StreamExt;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct TestItem {
        id: String,
        value: i64,
    }

    impl OrchestrableItem for TestItem {
        fn external_id(&self) -> String {
            self.id.clone()
        }
        fn chaos_payload(&self) -> &str {
            &self.id
        }
    }

    struct DoubleHandler;
    #[async_trait]
    impl StepHandler<TestItem> for DoubleHandler {
        async fn invoke(&self, batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            Ok(batch.into_iter().map(|i| TestItem { id: i.id, value: i.value * 2 }).collect())
        }
    }

    struct FanOutHandler;
    #[async_trait]
    impl StepHandler<TestItem> for FanOutHandler {
        async fn invoke(&self, batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            let mut out = Vec::new();
            for item in batch {
                out.push(TestItem { id: format!("{}-a", item.id), value: item.value });
                out.push(TestItem { id: format!("{}-b", item.id), value: item.value });
            }
            Ok(out)
        }
    }

    struct SumHandler;
    #[async_trait]
    impl StepHandler<TestItem> for SumHandler {
        async fn invoke(&self, batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            let sum: i64 = batch.iter().map(|i| i.value).sum();
            Ok(vec![TestItem { id: "sum".into(), value: sum }])
        }
    }

    fn ctx() -> PipelineContext {
        PipelineContext::new(CachePolicy::Bypass)
    }

    #[tokio::test]
    async fn one_one_step_applies_directly() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(Cardinality::OneOne, Arc::new(DoubleHandler))
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "x".into(), value: 21 };
        let stream = orchestrator.run(item, ctx(), CancellationToken::new());
        let outputs: Vec<_> = stream.collect().await;
        assert_eq!(outputs, vec![TestItem { id: "x".into(), value: 42 }]);
    }

    #[tokio::test]
    async fn one_many_expands_downstream() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(Cardinality::OneMany, Arc::new(FanOutHandler))
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "x".into(), value: 1 };
        let stream = orchestrator.run(item, ctx(), CancellationToken::new());
        let outputs: Vec<_> = stream.collect().await;
        assert_eq!(outputs.len(), 2);
    }

    struct FanOutToNothingHandler;
    #[async_trait]
    impl StepHandler<TestItem> for FanOutToNothingHandler {
        async fn invoke(&self, _batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn many_one_with_zero_collected_items_is_invalid_input() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(Cardinality::OneMany, Arc::new(FanOutToNothingHandler))
                .with_step(Cardinality::ManyOne, Arc::new(SumHandler))
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "x".into(), value: 5 };
        let err = orchestrator.run_to_completion(item, ctx(), CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.classify(), canvas_domain::error::FailureKind::InvalidInput);
        assert!(err.to_string().contains("token batches are required"));
    }

    #[tokio::test]
    async fn many_one_collects_into_single_batch() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(Cardinality::OneMany, Arc::new(FanOutHandler))
                .with_step(Cardinality::ManyOne, Arc::new(SumHandler))
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "x".into(), value: 5 };
        let stream = orchestrator.run(item, ctx(), CancellationToken::new());
        let outputs: Vec<_> = stream.collect().await;
        assert_eq!(outputs, vec![TestItem { id: "sum".into(), value: 10 }]);
    }

    struct AlwaysPermanentHandler;
    #[async_trait]
    impl StepHandler<TestItem> for AlwaysPermanentHandler {
        async fn invoke(&self, _batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            Err(CanvasError::permanent("boom"))
        }
    }

    #[tokio::test]
    async fn permanent_failure_parks_item_and_yields_nothing() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(Cardinality::OneOne, Arc::new(AlwaysPermanentHandler))
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "doomed".into(), value: 1 };
        let stream = orchestrator.run(item, ctx(), CancellationToken::new());
        let outputs: Vec<_> = stream.collect().await;
        assert!(outputs.is_empty());
        assert_eq!(orchestrator.parked_snapshot().len(), 1);
        assert_eq!(orchestrator.parked_snapshot()[0].external_id, "doomed");
    }

    struct TransientThenOkHandler {
        attempts: std::sync::atomic::AtomicU32,
    }
    #[async_trait]
    impl StepHandler<TestItem> for TransientThenOkHandler {
        async fn invoke(&self, batch: Vec<TestItem>, _ctx: &PipelineContext) -> Result<Vec<TestItem>, CanvasError> {
            let n = self.attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n < 2 {
                Err(CanvasError::transient("not yet"))
            } else {
                Ok(batch)
            }
        }
    }

    #[tokio::test]
    async fn transient_failure_retries_then_succeeds() {
        let orchestrator = Arc::new(
            OrchestratorBuilder::<TestItem>::new()
                .with_step(
                    Cardinality::OneOne,
                    Arc::new(TransientThenOkHandler { attempts: std::sync::atomic::AtomicU32::new(0) }),
                )
                .retry_policy(RetryPolicy { min_wait: std::time::Duration::from_millis(1), max_backoff: std::time::Duration::from_millis(2), max_retries: 5 })
                .build()
                .unwrap(),
        );
        let item = TestItem { id: "retry-me".into(), value: 9 };
        let stream = orchestrator.run(item, ctx(), CancellationToken::new());
        let outputs: Vec<_> = stream.collect().await;
        assert_eq!(outputs.len(), 1);
        assert!(orchestrator.parked_snapshot().is_empty());
    }

    #[tokio::test]
    async fn chaos_marker_is_ignored_when_gate_disabled() {
        let inner: Arc<dyn StepHandler<TestItem>> = Arc::new(DoubleHandler);
        let counters = Arc::new(ChaosCounters::new());
        let chaos_handler = ChaosInjectingHandler::new(inner, ChaosGate { enabled: false }, counters);
        let item = TestItem { id: "__FAIL_PERMANENT__".into(), value: 3 };
        let result = chaos_handler.invoke(vec![item], &ctx()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn chaos_marker_triggers_when_gate_enabled() {
        let inner: Arc<dyn StepHandler<TestItem>> = Arc::new(DoubleHandler);
        let counters = Arc::new(ChaosCounters::new());
        let chaos_handler = ChaosInjectingHandler::new(inner, ChaosGate { enabled: true }, counters);
        let item = TestItem { id: "__FAIL_PERMANENT__".into(), value: 3 };
        let result = chaos_handler.invoke(vec![item], &ctx()).await;
        assert!(result.is_err());
    }
}
