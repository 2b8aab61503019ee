//! Karel interpreter.
//!
//! Runs a script's `main` procedure against a [`karel_types::World`],
//! recording a snapshot after every primitive action. Execution is
//! synchronous and bounded by a step limit.

pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod trace;

pub use dispatch::{Command, Condition, NO_OP_CALLS};
pub use error::{RunError, RunFailure, RunResult};
pub use interpreter::{run, Interpreter, DEFAULT_STEP_LIMIT};
pub use trace::{RunOutcome, TraceEntry};
