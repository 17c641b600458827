//! Options that shape how a machine is built and run.

use serde::{Deserialize, Serialize};

use crate::types::OutOfBoundsPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// What a head move off either end of the tape does.
    pub out_of_bounds: OutOfBoundsPolicy,
    /// Reject the program at construction unless every declared state has a rule for
    /// every symbol of the alphabet.
    pub ensure_exhaustive: bool,
    /// Report every step. Only affects callers that print traces, never execution.
    pub verbose: bool,
    /// Upper bound on the number of steps `run` performs. `None` runs until the machine stops.
    pub max_steps: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            out_of_bounds: OutOfBoundsPolicy::Fail,
            ensure_exhaustive: false,
            verbose: true,
            max_steps: None,
        }
    }
}
