//! Karel engine as a WASM module for browser environments.
//!
//! Every entry point takes and returns plain strings. Results are JSON;
//! failures come back as `{"success": false, "error": "..."}` and never
//! as a panic across the boundary.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run, grade } from 'karel-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(run(script, worldText, 0));
//! // { success: true, steps: 12, final_world: { ... }, trace: [ ... ], error: null }
//! ```

use karel_eval::Interpreter;
use karel_grader::RunReport;
use karel_types::World;
use karel_world::goal_mismatches;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(format!("Serialization error: {e}")))
}

fn error_json(message: impl Into<String>) -> String {
    json!({ "success": false, "error": message.into() }).to_string()
}

fn world_from_json(text: &str, what: &str) -> Result<World, String> {
    serde_json::from_str(text).map_err(|e| error_json(format!("invalid {what} world JSON: {e}")))
}

/// Parse world text leniently into world JSON:
/// ```json
/// { "width": 7, "height": 5, "walls": [{ "x": 3, "y": 2, "direction": "west" }],
///   "beepers": [{ "x": 6, "y": 3, "count": 1 }],
///   "agent": { "x": 3, "y": 4, "facing": "east" }, "bag": 0 }
/// ```
#[wasm_bindgen]
pub fn parse_world(text: &str) -> String {
    to_json(&karel_world::parse_world(text))
}

/// Render world JSON as canonical world text.
///
/// Returns `{"success": true, "text": "Dimension: ..."}`.
#[wasm_bindgen]
pub fn format_world(world_json: &str) -> String {
    match world_from_json(world_json, "input") {
        Ok(world) => json!({ "success": true, "text": karel_world::format_world(&world) }).to_string(),
        Err(e) => e,
    }
}

/// Run `script` against world text. `max_steps` of 0 keeps the default limit.
///
/// Returns a `RunReport`; on failure `success` is `false`, `error` holds
/// `{kind, message, line}` and the trace runs up to the failing action.
#[wasm_bindgen]
pub fn run(script: &str, world_text: &str, max_steps: u32) -> String {
    let interpreter = match max_steps {
        0 => Interpreter::new(),
        n => Interpreter::with_step_limit(u64::from(n)),
    };
    let world = karel_world::parse_world(world_text);
    to_json(&RunReport::from_result(interpreter.run(script, &world)))
}

/// Compare two worlds given as JSON.
///
/// Returns `{"success": true, "reached": bool, "mismatches": [...]}`.
#[wasm_bindgen]
pub fn goal_reached(actual_json: &str, goal_json: &str) -> String {
    let actual = match world_from_json(actual_json, "actual") {
        Ok(w) => w,
        Err(e) => return e,
    };
    let goal = match world_from_json(goal_json, "goal") {
        Ok(w) => w,
        Err(e) => return e,
    };
    let mismatches = goal_mismatches(&actual, &goal);
    json!({
        "success": true,
        "reached": mismatches.is_empty(),
        "mismatches": mismatches,
    })
    .to_string()
}

/// Lint script text without running it.
///
/// Returns `{"errors": [...], "warnings": [...], "total_errors": n, "total_warnings": n}`.
#[wasm_bindgen]
pub fn lint(script: &str) -> String {
    to_json(&karel_grader::lint_script(script))
}

/// Run `script` on the initial world and grade the result against the goal world.
#[wasm_bindgen]
pub fn grade(world_text: &str, goal_text: &str, script: &str) -> String {
    to_json(&karel_grader::grade(world_text, goal_text, script))
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
