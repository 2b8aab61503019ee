//! Integration tests for grading and lint.

use karel_grader::{grade, lint_script, GradeStatus, Grader, RunReport};
use karel_eval::{run, Interpreter};
use karel_types::{Direction, Pose};
use karel_world::{parse_world, GoalMismatch};

// ══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ══════════════════════════════════════════════════════════════════════════════

const WALLS: &str = "Dimension: (7, 5)
Wall: (3, 2); west
Wall: (3, 2); south
Wall: (3, 3); west
Wall: (3, 4); west
Wall: (3, 5); south
Wall: (4, 2); south
Wall: (4, 5); south
Wall: (5, 2); south
Wall: (5, 5); south
Wall: (6, 2); west
Wall: (6, 4); west
";

const SOLUTION: &str = "\
def main():
    move_to_newspaper()
    pick_beeper()
    return_home()

def move_to_newspaper():
    move()
    move()
    turn_right()
    move()
    turn_left()
    move()

def return_home():
    turn_around()
    move()
    turn_right()
    move()
    turn_left()
    move()
    move()
    turn_around()

def turn_right():
    turn_left()
    turn_left()
    turn_left()

def turn_around():
    turn_left()
    turn_left()
";

fn newspaper_world() -> String {
    format!("{WALLS}Beeper: (6, 3); 1\nKarel: (3, 4); east\n")
}

fn newspaper_goal() -> String {
    format!("{WALLS}Karel: (3, 4); east\n")
}

// ══════════════════════════════════════════════════════════════════════════════
// Grading
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn solution_is_solved() {
    let report = grade(&newspaper_world(), &newspaper_goal(), SOLUTION);
    assert_eq!(report.status, GradeStatus::Solved);
    assert!(report.is_solved());
    assert!(report.error.is_none());
    assert!(report.mismatches.is_empty());
    assert_eq!(report.actions, report.trace.len());
    assert_eq!(report.final_world.agent, Pose::new(3, 4, Direction::East));
}

#[test]
fn stopping_early_is_not_solved() {
    let script = "def main():\n    move()\n    move()\n";
    let report = grade(&newspaper_world(), &newspaper_goal(), script);
    assert_eq!(report.status, GradeStatus::GoalNotReached);
    assert!(report.error.is_none());
    assert_eq!(
        report.mismatches,
        vec![
            GoalMismatch::AgentPose {
                expected: Pose::new(3, 4, Direction::East),
                actual: Pose::new(5, 4, Direction::East),
            },
            GoalMismatch::Beepers {
                x: 6,
                y: 3,
                expected: 0,
                actual: 1,
            },
        ]
    );
}

#[test]
fn failed_run_is_never_solved() {
    // Finishes in the goal pose, then walks into the west wall.
    let script = "def main():\n    turn_left()\n    turn_left()\n    move()\n";
    let world = "Dimension: (2, 1)\nKarel: (1, 1); east";
    let goal = "Dimension: (2, 1)\nKarel: (1, 1); east";
    let report = grade(world, goal, script);
    assert_eq!(report.status, GradeStatus::Failed);
    let error = report.error.as_ref().unwrap();
    assert_eq!(error.kind, "movement_blocked");
    assert_eq!(error.line, Some(4));
    assert_eq!(report.actions, 2);
}

#[test]
fn missing_main_fails_without_actions() {
    let report = grade(&newspaper_world(), &newspaper_goal(), "move()\n");
    assert_eq!(report.status, GradeStatus::Failed);
    assert_eq!(report.error.unwrap().kind, "no_entry_point");
    assert_eq!(report.actions, 0);
    assert_eq!(report.final_world, parse_world(&newspaper_world()));
}

#[test]
fn grader_uses_configured_step_limit() {
    let grader = Grader::new(Interpreter::with_step_limit(5));
    let report = grader.grade(&newspaper_world(), &newspaper_goal(), SOLUTION);
    assert_eq!(report.status, GradeStatus::Failed);
    assert_eq!(report.error.unwrap().kind, "step_limit_exceeded");
}

#[test]
fn report_json_shape() {
    let report = grade(&newspaper_world(), &newspaper_goal(), "def main():\n    move()\n");
    let json = serde_json::to_string(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["status"], "goal_not_reached");
    assert!(parsed["error"].is_null());
    assert_eq!(parsed["actions"], 1);
    assert_eq!(parsed["trace"][0]["action"], "move");
    assert_eq!(parsed["mismatches"][0]["kind"], "agent_pose");
    assert_eq!(parsed["final_world"]["width"], 7);
}

#[test]
fn run_report_from_failure_keeps_partial_trace() {
    let world = parse_world("Dimension: (2, 1)");
    let report = RunReport::from_result(run("def main():\n    move()\n    move()\n", &world));
    assert!(!report.success);
    assert_eq!(report.trace.len(), 1);
    assert_eq!(report.final_world.agent.x, 2);
    let error = report.error.unwrap();
    assert_eq!(error.kind, "movement_blocked");
    assert_eq!(error.message, "Karel is blocked at (2, 1) facing east");
}

#[test]
fn grade_determinism_100_iterations() {
    let first = grade(&newspaper_world(), &newspaper_goal(), SOLUTION);
    for i in 0..100 {
        let again = grade(&newspaper_world(), &newspaper_goal(), SOLUTION);
        assert_eq!(first, again, "Determinism failure at iteration {i}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Lint
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn solution_lints_clean() {
    let d = lint_script(SOLUTION);
    assert!(d.is_clean(), "{:?}", d.iter().map(|x| x.to_string()).collect::<Vec<_>>());
}

#[test]
fn lint_collects_several_findings() {
    let script = "def helper():\nmove\nwhile front_is_clear:\n    turn_left(\n";
    let d = lint_script(script);
    let codes: Vec<u16> = d.errors.iter().map(|x| x.code.0).collect();
    assert_eq!(codes, vec![100, 101, 103]);
    let warned: Vec<Option<u32>> = d.warnings.iter().map(|w| w.line).collect();
    assert_eq!(warned, vec![Some(2), Some(3)]);
}

#[test]
fn lint_caps_stored_diagnostics() {
    let mut script = String::from("def main():\n");
    for _ in 0..30 {
        script.push_str("    move\n");
    }
    let d = lint_script(&script);
    assert_eq!(d.total_warnings, 30);
    assert_eq!(d.warnings.len(), karel_types::MAX_DIAGNOSTICS);
}

#[test]
fn lint_json_shape() {
    let d = lint_script("def main():\n    move\n");
    let parsed: serde_json::Value = serde_json::to_value(&d).unwrap();
    assert_eq!(parsed["total_warnings"], 1);
    assert_eq!(parsed["warnings"][0]["line"], 2);
    assert_eq!(parsed["warnings"][0]["severity"], "warning");
    assert_eq!(parsed["warnings"][0]["suggestion"], "move()");
    assert!(parsed["errors"][0].is_null());
}
