//! Execution trace.

use crate::dispatch::Command;
use karel_types::World;
use serde::{Deserialize, Serialize};

/// One executed primitive action and the world right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub action: Command,
    pub world: World,
}

/// The result of running a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub final_world: World,
    pub trace: Vec<TraceEntry>,
    /// Statement lines visited, as counted against the step limit.
    pub steps: u64,
}

impl RunOutcome {
    /// Nothing executed yet.
    pub fn empty(world: World) -> Self {
        Self {
            final_world: world,
            trace: Vec::new(),
            steps: 0,
        }
    }

    /// Action names in execution order.
    pub fn actions(&self) -> Vec<Command> {
        self.trace.iter().map(|e| e.action).collect()
    }
}
