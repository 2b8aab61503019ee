//! Runtime error types for the Karel interpreter.

use crate::trace::RunOutcome;
use karel_types::Pose;
use thiserror::Error;

/// Why a run stopped early. Every variant ends the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The script defines no `main` procedure.
    #[error("main() not found: define it with `def main():`")]
    NoEntryPoint,

    /// A bare call to a name that is not an action, condition or procedure.
    #[error("unknown command: {name}()")]
    UnknownCommand { name: String, line: u32 },

    /// A `while`/`if`/`elif` condition outside the condition vocabulary.
    #[error("unknown condition: {condition}")]
    UnknownCondition { condition: String, line: u32 },

    /// `move()` towards a wall or the grid edge.
    #[error("Karel is blocked at {pose}")]
    MovementBlocked { pose: Pose },

    /// `pick_beeper()` on an empty cell.
    #[error("no beeper to pick up at ({x}, {y})")]
    NoBeeperHere { x: u32, y: u32 },

    /// `put_beeper()` with nothing in the bag.
    #[error("Karel's beeper bag is empty")]
    BagEmpty,

    /// More statements executed than the configured limit, or a `while`
    /// entered with a true condition and nothing to run in its body.
    #[error("{}", step_limit_message(.limit, .empty_loop))]
    StepLimitExceeded { limit: u64, empty_loop: bool },
}

impl RunError {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoEntryPoint => "no_entry_point",
            Self::UnknownCommand { .. } => "unknown_command",
            Self::UnknownCondition { .. } => "unknown_condition",
            Self::MovementBlocked { .. } => "movement_blocked",
            Self::NoBeeperHere { .. } => "no_beeper_here",
            Self::BagEmpty => "bag_empty",
            Self::StepLimitExceeded { .. } => "step_limit_exceeded",
        }
    }
}

fn step_limit_message(limit: &u64, empty_loop: &bool) -> String {
    if *empty_loop {
        "while loop with a true condition has an empty body and would never finish".to_string()
    } else {
        format!("program exceeded the maximum of {limit} steps; is there an infinite loop?")
    }
}

/// A failed run together with everything captured before the failure.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct RunFailure {
    pub error: RunError,
    /// Script line being executed when the run stopped.
    pub line: Option<u32>,
    /// World and trace as they stood just before the failing step.
    pub partial: RunOutcome,
}

/// Result alias for interpreter operations.
pub type RunResult<T> = Result<T, RunError>;
