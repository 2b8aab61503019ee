//! Karel world text format, wall legality and goal comparison.
//!
//! ```text
//! world text → parse_world → World → (engine) → World → goal_reached(actual, goal)
//! ```

pub mod codec;
pub mod goal;
pub mod oracle;

pub use codec::{format_world, parse_world};
pub use goal::{goal_mismatches, goal_reached, GoalMismatch};
pub use oracle::{is_blocked, is_clear};
