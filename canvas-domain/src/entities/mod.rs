//! Entities: domain objects with identity that persists through their
//! lifecycle.

mod aspect;
mod cache_entry;
mod checkpoint;
mod pipeline_context;
mod runtime_mapping;
mod step_model;

pub use aspect::{Aspect, Position, Scope};
pub use cache_entry::CacheEntry;
pub use checkpoint::Checkpoint;
pub use pipeline_context::{PipelineContext, TraceEnvelope};
pub use runtime_mapping::{Defaults, Layout, RuntimeMapping, Validation};
pub use step_model::{DeploymentRole, ExecutionKind, StepModel, Transport};
