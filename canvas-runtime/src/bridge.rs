//! Inter-Pipeline Bridge.
//!
//! Forwards one pipeline's checkpoint stream into another pipeline's
//! ingest endpoint. Deduplicates via the idempotency guard (C10),
//! tolerates unknown envelope shapes, and resumes forwarding after a
//! downstream recovery without buffering beyond the guard itself.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use canvas_domain::entities::Checkpoint;

use crate::idempotency::IdempotencyGuard;
use crate::shutdown::CancellationToken;

/// Extracts the forwarding payload from a checkpoint, or `None` if the
/// checkpoint's shape isn't one this bridge forwards (spec §4.11: "robust
/// to unknown envelope types").
pub trait EnvelopeTranslator<Downstream>: Send + Sync {
    fn translate(&self, checkpoint: &Checkpoint) -> Option<Downstream>;
}

/// Forwards checkpoints from an upstream pipeline's [`subscribe`] stream
/// into a downstream pipeline's ingest sender.
///
/// [`subscribe`]: crate::orchestrator::Orchestrator::subscribe
pub struct InterPipelineBridge<Downstream> {
    idempotency: Arc<IdempotencyGuard>,
    failures: std::sync::atomic::AtomicU64,
    _downstream: std::marker::PhantomData<fn() -> Downstream>,
}

impl<Downstream: Clone + Send + 'static> InterPipelineBridge<Downstream> {
    pub fn new(idempotency: Arc<IdempotencyGuard>) -> Self {
        Self { idempotency, failures: std::sync::atomic::AtomicU64::new(0), _downstream: std::marker::PhantomData }
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Forwards `checkpoints` into `downstream_ingest`, translating each
    /// one with `translator`. At-most-once: a translation or send failure
    /// increments the failure counter and drops the item rather than
    /// buffering it. The returned stream echoes every item
    /// successfully forwarded downstream, for observability.
    pub fn forward(
        self: Arc<Self>,
        mut checkpoints: impl Stream<Item = Checkpoint> + Unpin + Send + 'static,
        downstream_ingest: mpsc::Sender<Downstream>,
        translator: Arc<dyn EnvelopeTranslator<Downstream>>,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Downstream> {
        let (tx, rx) = mpsc::channel(downstream_ingest.max_capacity().max(1));
        let bridge = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    maybe_checkpoint = checkpoints.next() => {
                        let Some(checkpoint) = maybe_checkpoint else { break };
                        let Some(payload) = translator.translate(&checkpoint) else {
                            // Unknown envelope shape: ignore without terminating the stream.
                            continue;
                        };
                        let is_new = bridge.idempotency.mark_if_new(&checkpoint.dedup_key).unwrap_or(false);
                        if !is_new {
                            continue;
                        }
                        if downstream_ingest.send(payload.clone()).await.is_err() {
                            bridge.failures.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                            continue;
                        }
                        if tx.send(payload).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        ReceiverStream::new(rx)
    }
}
