//! Karel grader: checks and runs a learner's submission.
//!
//! ```text
//! script → lint (advisory)
//! world text + goal text + script → run once → compare with goal → GradeReport
//! ```

pub mod grade;
pub mod lint;

pub use grade::{grade, ErrorReport, GradeReport, GradeStatus, Grader, RunReport};
pub use lint::{lint_script, KAREL_VOCABULARY};
