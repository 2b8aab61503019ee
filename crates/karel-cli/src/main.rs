use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use karel_eval::{Command as Action, Interpreter, RunFailure, DEFAULT_STEP_LIMIT};
use karel_grader::{lint_script, GradeReport, GradeStatus, Grader, RunReport};
use karel_types::{Diagnostics, World};
use karel_world::{format_world, parse_world};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "karel",
    version,
    about = "Run, check and grade Karel scripts against grid worlds"
)]
struct Cli {
    /// Maximum statement lines a run may execute.
    #[arg(long, global = true, env = "KAREL_MAX_STEPS", default_value_t = DEFAULT_STEP_LIMIT)]
    max_steps: u64,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a script and print every action followed by the final world.
    Run {
        #[arg(long)]
        world: PathBuf,
        #[arg(long)]
        script: PathBuf,
    },
    /// Lint a script without running it.
    Check {
        #[arg(long)]
        script: PathBuf,
    },
    /// Run a script and compare the final world with a goal world.
    Grade {
        #[arg(long)]
        world: PathBuf,
        #[arg(long)]
        goal: PathBuf,
        #[arg(long)]
        script: PathBuf,
    },
    /// Print a world file in canonical form.
    FmtWorld {
        #[arg(long)]
        world: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let interpreter = Interpreter::with_step_limit(cli.max_steps);
    debug!(step_limit = cli.max_steps, json = cli.json, "starting");

    match &cli.command {
        Command::Run { world, script } => run_command(interpreter, world, script, cli.json),
        Command::Check { script } => check_command(script, cli.json),
        Command::Grade {
            world,
            goal,
            script,
        } => grade_command(interpreter, world, goal, script, cli.json),
        Command::FmtWorld { world } => {
            let world = load_world(world)?;
            print!("{}", format_world(&world));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_world(path: &Path) -> Result<World> {
    let world = parse_world(&read_text(path)?);
    info!(path = %path.display(), width = world.width, height = world.height, "loaded world");
    Ok(world)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialise output")
}

// ══════════════════════════════════════════════════════════════════════════════
// Subcommands
// ══════════════════════════════════════════════════════════════════════════════

fn run_command(interpreter: Interpreter, world: &Path, script: &Path, json: bool) -> Result<ExitCode> {
    let world = load_world(world)?;
    let script = read_text(script)?;

    if json {
        let report = RunReport::from_result(interpreter.run(&script, &world));
        println!("{}", to_json(&report)?);
        return Ok(exit_code(report.success));
    }

    let mut index = 0;
    let result = interpreter.run_with_observer(&script, &world, |after, action| {
        index += 1;
        println!("{}", trace_line(index, action, &after));
    });
    match result {
        Ok(outcome) => {
            println!();
            print!("{}", format_world(&outcome.final_world));
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("{}", failure_line(&failure));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn check_command(script: &Path, json: bool) -> Result<ExitCode> {
    let diagnostics = lint_script(&read_text(script)?);
    if json {
        println!("{}", to_json(&diagnostics)?);
    } else {
        print!("{}", render_diagnostics(&diagnostics));
    }
    Ok(exit_code(!diagnostics.has_errors()))
}

fn grade_command(
    interpreter: Interpreter,
    world: &Path,
    goal: &Path,
    script: &Path,
    json: bool,
) -> Result<ExitCode> {
    let world = load_world(world)?;
    let goal = load_world(goal)?;
    let script = read_text(script)?;

    let report = Grader::new(interpreter).grade_worlds(&world, &goal, &script);
    if json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(exit_code(report.is_solved()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Text rendering
// ══════════════════════════════════════════════════════════════════════════════

fn trace_line(index: usize, action: Action, after: &World) -> String {
    format!("{index:>5}  {:<12} {}", action.name(), after.agent)
}

fn failure_line(failure: &RunFailure) -> String {
    let actions = failure.partial.trace.len();
    match failure.line {
        Some(line) => format!("error: line {line}: {} (after {actions} action(s))", failure.error),
        None => format!("error: {} (after {actions} action(s))", failure.error),
    }
}

fn render_diagnostics(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    for d in diagnostics.iter() {
        out.push_str(&d.to_string());
        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!(" (try `{suggestion}`)"));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} error(s), {} warning(s)\n",
        diagnostics.total_errors, diagnostics.total_warnings
    ));
    out
}

fn render_report(report: &GradeReport) -> String {
    let verdict = match report.status {
        GradeStatus::Solved => "solved",
        GradeStatus::GoalNotReached => "goal not reached",
        GradeStatus::Failed => "failed",
    };
    let mut out = format!("{verdict} after {} action(s)\n", report.actions);
    if let Some(error) = &report.error {
        match error.line {
            Some(line) => out.push_str(&format!("  error: line {line}: {}\n", error.message)),
            None => out.push_str(&format!("  error: {}\n", error.message)),
        }
    }
    for mismatch in &report.mismatches {
        out.push_str(&format!("  - {mismatch}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use karel_eval::run;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "karel", "run", "--world", "w.txt", "--script", "s.py", "--max-steps", "50", "--json",
        ])
        .unwrap();
        assert_eq!(cli.max_steps, 50);
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Run { .. }));
    }

    #[test]
    fn test_grade_requires_goal() {
        let err = Cli::try_parse_from(["karel", "grade", "--world", "w", "--script", "s"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_trace_line() {
        let world = parse_world("Dimension: (3, 3)\nKarel: (2, 1); north");
        assert_eq!(
            trace_line(7, Action::Move, &world),
            "    7  move         (2, 1) facing north"
        );
    }

    #[test]
    fn test_failure_line() {
        let failure = run("def main():\n    put_beeper()\n", &World::default()).unwrap_err();
        assert_eq!(
            failure_line(&failure),
            "error: line 2: Karel's beeper bag is empty (after 0 action(s))"
        );
    }

    #[test]
    fn test_failure_line_for_unknown_command() {
        let failure = run("def main():\n    move()\n    jump()\n", &World::new(2, 1)).unwrap_err();
        assert_eq!(
            failure_line(&failure),
            "error: line 3: unknown command: jump() (after 1 action(s))"
        );
    }

    #[test]
    fn test_render_report_unknown_condition() {
        let report = karel_grader::grade(
            "Dimension: (2, 1)",
            "Dimension: (2, 1)",
            "def main():\n    while path_open():\n        move()\n",
        );
        assert_eq!(
            render_report(&report),
            "failed after 0 action(s)\n  error: line 2: unknown condition: path_open\n"
        );
    }

    #[test]
    fn test_render_diagnostics() {
        let text = render_diagnostics(&lint_script("def main():\n    move\n"));
        assert!(text.contains("2: K102 [warning]"));
        assert!(text.contains("(try `move()`)"));
        assert!(text.ends_with("0 error(s), 1 warning(s)\n"));
    }

    #[test]
    fn test_render_report() {
        let report = karel_grader::grade(
            "Dimension: (3, 1)",
            "Dimension: (3, 1)\nKarel: (3, 1); east",
            "def main():\n    move()\n",
        );
        let text = render_report(&report);
        assert!(text.starts_with("goal not reached after 1 action(s)\n"));
        assert!(text.contains("agent should be at (3, 1) facing east, is at (2, 1) facing east"));
    }
}
