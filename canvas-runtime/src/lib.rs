// /////////////////////////////////////////////////////////////////////////////
// Canvas Reactive Pipeline Framework
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Canvas Runtime
//!
//! The run-time half of the framework: drives compiled pipelines against
//! live step handlers under the four cardinality shapes, with backpressure,
//! failure classification and retry, idempotency, parking, the cache
//! policy engine, and the inter-pipeline bridge.
//!
//! ## Module Structure
//!
//! - [`orchestrator`] — Runtime Orchestrator (C9): `run`/`ingest`/
//!   `subscribe`, cardinality handling, retry/backoff, chaos injection.
//! - [`failure`] — failure classification and the retry/backoff policy.
//! - [`chaos`] — test-only chaos marker parsing and attempt counters.
//! - [`idempotency`] — bounded LRU idempotency guard (C10).
//! - [`parking`] — append-only parking lot for exhausted failures (C10).
//! - [`cache_engine`] — drives C1's cache key registry against a pluggable
//!   [`cache_engine::CacheStore`] per [`canvas_domain::CachePolicy`].
//! - [`bridge`] — Inter-Pipeline Bridge (C11).
//! - [`shutdown`] — cancellation token used to propagate shutdown into
//!   in-flight step tasks.
//! - [`metrics`] — Prometheus counters/gauges for runtime observability.

pub mod bridge;
pub mod cache_engine;
pub mod chaos;
pub mod failure;
pub mod idempotency;
pub mod metrics;
pub mod orchestrator;
pub mod parking;
pub mod shutdown;

pub use failure::{DefaultClassifier, FailureClassifier, RetryPolicy};
pub use idempotency::IdempotencyGuard;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, OrchestrableItem, StepHandler};
pub use parking::ParkingLot;
pub use shutdown::CancellationToken;
