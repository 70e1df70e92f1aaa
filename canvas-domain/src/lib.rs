// /////////////////////////////////////////////////////////////////////////////
// Canvas Reactive Pipeline Framework
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! # Canvas Domain
//!
//! The pure domain model shared by the compiler and the runtime
//! orchestrator. It implements Domain-Driven Design patterns and is
//! independent of any transport, storage, or scheduling concern.
//!
//! ## Module Structure
//!
//! - [`entities`] — `StepModel`, `Aspect`, `RuntimeMapping`,
//!   `PipelineContext`, `CacheEntry`, `Checkpoint`: objects with identity
//!   that persists through the compile/run lifecycle.
//! - [`value_objects`] — immutable, self-validating concepts without
//!   identity: `Cardinality`, `TypeName`, `StepName`, `CacheKey`,
//!   `CachePolicy`, `BackpressurePolicy`.
//! - [`cache`] — the priority-ordered cache key strategy registry (C1).
//! - [`mapper`] — the bijective wire/DTO/domain conversion capability (C2).
//! - [`diagnostics`] — the pluggable INFO/WARN/ERROR reporter used by the
//!   compiler's step catalogue (C3) and phase driver (C6).
//! - [`error`] — the shared error taxonomy.
//!
//! ## Business Rules and Invariants
//!
//! - DELEGATED steps declare both input and output types together or
//!   neither; INTERNAL steps reject explicit mapper declarations
//!   ([`entities::StepModel::new`]).
//! - Enabled STEPS-scope aspects must name at least one target step
//!   ([`entities::Aspect::new`]).
//! - A cache key that lacks its fingerprint is never returned as a partial
//!   key — strategies return `None` instead ([`cache::CacheKeyRegistry`]).

pub mod cache;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod mapper;
pub mod value_objects;

pub use entities::{Aspect, Checkpoint, PipelineContext, RuntimeMapping, StepModel};
pub use error::{CanvasError, CanvasResult, FailureKind};
pub use value_objects::{CacheKey, CachePolicy, Cardinality, TypeName};
