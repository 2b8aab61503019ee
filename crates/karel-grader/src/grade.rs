//! Running a submission and comparing the result with the goal world.

use karel_eval::{Interpreter, RunFailure, RunOutcome, TraceEntry};
use karel_types::World;
use karel_world::{goal_mismatches, parse_world, GoalMismatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overall verdict for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    /// The run finished and the final world matches the goal.
    Solved,
    /// The run finished but the final world differs from the goal.
    GoalNotReached,
    /// The run stopped with an error.
    Failed,
}

/// A run error flattened for display and JSON consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Stable machine name, see `RunError::kind`.
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl From<&RunFailure> for ErrorReport {
    fn from(failure: &RunFailure) -> Self {
        Self {
            kind: failure.error.kind().to_string(),
            message: failure.error.to_string(),
            line: failure.line,
        }
    }
}

/// The result of a single run, successful or not, in one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub steps: u64,
    pub final_world: World,
    pub trace: Vec<TraceEntry>,
    pub error: Option<ErrorReport>,
}

impl RunReport {
    pub fn from_result(result: Result<RunOutcome, RunFailure>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                steps: outcome.steps,
                final_world: outcome.final_world,
                trace: outcome.trace,
                error: None,
            },
            Err(failure) => {
                let error = Some(ErrorReport::from(&failure));
                let partial = failure.partial;
                Self {
                    success: false,
                    steps: partial.steps,
                    final_world: partial.final_world,
                    trace: partial.trace,
                    error,
                }
            }
        }
    }
}

/// Everything the UI needs to give feedback on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReport {
    pub status: GradeStatus,
    pub error: Option<ErrorReport>,
    /// Primitive actions executed, including those before a failure.
    pub actions: usize,
    pub final_world: World,
    pub trace: Vec<TraceEntry>,
    /// Differences between the final world and the goal.
    pub mismatches: Vec<GoalMismatch>,
}

impl GradeReport {
    pub fn is_solved(&self) -> bool {
        self.status == GradeStatus::Solved
    }
}

/// Grades submissions with a configured interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grader {
    interpreter: Interpreter,
}

impl Grader {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    /// Parse both worlds, run `script` once from the initial world and compare with the goal.
    pub fn grade(&self, world_text: &str, goal_text: &str, script: &str) -> GradeReport {
        let initial = parse_world(world_text);
        let goal = parse_world(goal_text);
        self.grade_worlds(&initial, &goal, script)
    }

    pub fn grade_worlds(&self, initial: &World, goal: &World, script: &str) -> GradeReport {
        let run = RunReport::from_result(self.interpreter.run(script, initial));
        let mismatches = goal_mismatches(&run.final_world, goal);

        let status = if !run.success {
            GradeStatus::Failed
        } else if mismatches.is_empty() {
            GradeStatus::Solved
        } else {
            GradeStatus::GoalNotReached
        };
        debug!(?status, mismatches = mismatches.len(), "graded submission");

        GradeReport {
            status,
            error: run.error,
            actions: run.trace.len(),
            final_world: run.final_world,
            trace: run.trace,
            mismatches,
        }
    }
}

/// Grade with the default step limit.
pub fn grade(world_text: &str, goal_text: &str, script: &str) -> GradeReport {
    Grader::default().grade(world_text, goal_text, script)
}
