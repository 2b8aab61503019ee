//! Comparing a finished world against the goal world.
//!
//! Only the agent pose and the beeper layout take part. Walls and the bag
//! are ignored.

use karel_types::{Pose, Position, World};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One way in which a world differs from its goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalMismatch {
    AgentPose { expected: Pose, actual: Pose },
    Beepers { x: u32, y: u32, expected: u32, actual: u32 },
}

impl fmt::Display for GoalMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentPose { expected, actual } => {
                write!(f, "agent should be at {expected}, is at {actual}")
            }
            Self::Beepers {
                x,
                y,
                expected,
                actual,
            } => write!(
                f,
                "cell ({x}, {y}) should hold {expected} beeper(s), holds {actual}"
            ),
        }
    }
}

/// Every difference between `actual` and `goal`, pose first, then cells in `(x, y)` order.
pub fn goal_mismatches(actual: &World, goal: &World) -> Vec<GoalMismatch> {
    let mut mismatches = Vec::new();

    if actual.agent != goal.agent {
        mismatches.push(GoalMismatch::AgentPose {
            expected: goal.agent,
            actual: actual.agent,
        });
    }

    let cells: BTreeSet<Position> = actual
        .beepers()
        .chain(goal.beepers())
        .map(|(pos, _)| pos)
        .collect();
    for pos in cells {
        let expected = goal.beepers_at(pos);
        let found = actual.beepers_at(pos);
        if expected != found {
            mismatches.push(GoalMismatch::Beepers {
                x: pos.x,
                y: pos.y,
                expected,
                actual: found,
            });
        }
    }

    mismatches
}

pub fn goal_reached(actual: &World, goal: &World) -> bool {
    goal_mismatches(actual, goal).is_empty()
}
