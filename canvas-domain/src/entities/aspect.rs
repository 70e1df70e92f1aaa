use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CanvasError;
use crate::value_objects::StepName;

/// Whether an aspect applies to every step or only a declared subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Steps,
}

/// Where an aspect's synthetic step is inserted relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    BeforeStep,
    AfterStep,
}

/// A declarative cross-cutting concern.
///
/// Aspects never execute themselves; they cause the [Order
/// Expander](crate) to insert synthetic client steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aspect {
    pub name: String,
    pub enabled: bool,
    pub scope: Scope,
    pub position: Position,
    pub ordering_index: i32,
    pub target_steps: Vec<StepName>,
    pub config: HashMap<String, String>,
}

impl Aspect {
    /// Constructs an `Aspect`, enforcing: enabled STEPS-scope aspects must
    /// supply at least one target step.
    pub fn new(
        name: impl Into<String>,
        enabled: bool,
        scope: Scope,
        position: Position,
        ordering_index: i32,
        target_steps: Vec<StepName>,
        config: HashMap<String, String>,
    ) -> Result<Self, CanvasError> {
        let name = name.into();
        if enabled && scope == Scope::Steps && target_steps.is_empty() {
            return Err(CanvasError::invalid_config(format!(
                "aspect '{name}': scope=STEPS requires at least one target step"
            )));
        }
        Ok(Self {
            name,
            enabled,
            scope,
            position,
            ordering_index,
            target_steps,
            config,
        })
    }

    /// Whether this aspect matches the given (normalised) step token,
    /// per spec §4.7: GLOBAL always matches, STEPS matches only when the
    /// token is in the target list.
    pub fn matches(&self, step_token: &StepName) -> bool {
        match self.scope {
            Scope::Global => true,
            Scope::Steps => self.target_steps.contains(step_token),
        }
    }
}
