//! The statement interpreter.

use crate::dispatch::{Command, Condition, NO_OP_CALLS};
use crate::error::{RunError, RunFailure, RunResult};
use crate::trace::{RunOutcome, TraceEntry};
use karel_parser::{classify, indentation, parse_program, Block, Program, Statement};
use karel_types::World;
use tracing::{debug, trace};

/// Statement lines a single run may visit.
pub const DEFAULT_STEP_LIMIT: u64 = 10_000;

/// Interpreter configuration. Each run gets its own execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpreter {
    step_limit: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_step_limit(DEFAULT_STEP_LIMIT)
    }

    pub fn with_step_limit(step_limit: u64) -> Self {
        Self { step_limit }
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Run `script` from its `main` procedure against a copy of `world`.
    pub fn run(&self, script: &str, world: &World) -> Result<RunOutcome, RunFailure> {
        self.execute(script, world, None)
    }

    /// As [`Interpreter::run`], calling `observer` after every primitive action
    /// with a fresh copy of the world and the action performed.
    pub fn run_with_observer<F>(
        &self,
        script: &str,
        world: &World,
        mut observer: F,
    ) -> Result<RunOutcome, RunFailure>
    where
        F: FnMut(World, Command),
    {
        self.execute(script, world, Some(&mut observer))
    }

    fn execute(
        &self,
        script: &str,
        world: &World,
        observer: Option<&mut dyn FnMut(World, Command)>,
    ) -> Result<RunOutcome, RunFailure> {
        let program = parse_program(script);
        let Some(main) = program.main() else {
            debug!("script has no main procedure");
            return Err(RunFailure {
                error: RunError::NoEntryPoint,
                line: None,
                partial: RunOutcome::empty(world.clone()),
            });
        };
        debug!(
            procedures = program.len(),
            step_limit = self.step_limit,
            "starting run"
        );

        let mut exec = Execution {
            program: &program,
            world: world.clone(),
            trace: Vec::new(),
            steps: 0,
            step_limit: self.step_limit,
            line: None,
            observer,
            frames: Vec::new(),
        };
        let result = exec.run(main.block());
        let line = exec.line;
        let outcome = RunOutcome {
            final_world: exec.world,
            trace: exec.trace,
            steps: exec.steps,
        };

        match result {
            Ok(()) => {
                debug!(
                    steps = outcome.steps,
                    actions = outcome.trace.len(),
                    "run finished"
                );
                Ok(outcome)
            }
            Err(error) => {
                debug!(
                    kind = error.kind(),
                    line,
                    actions = outcome.trace.len(),
                    "run failed"
                );
                Err(RunFailure {
                    error,
                    line,
                    partial: outcome,
                })
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run with the default step limit.
pub fn run(script: &str, world: &World) -> Result<RunOutcome, RunFailure> {
    Interpreter::new().run(script, world)
}

// ══════════════════════════════════════════════════════════════════════
// Execution state
// ══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum FrameKind {
    /// Procedure body or taken `if` branch: runs once.
    Sequence,
    /// `while` body: re-checks its condition after every pass.
    Loop(Condition),
}

/// A block being executed and the index of its next line.
#[derive(Debug, Clone, Copy)]
struct Frame<'p, 's> {
    block: Block<'p, 's>,
    pos: usize,
    kind: FrameKind,
}

impl<'p, 's> Frame<'p, 's> {
    fn new(block: Block<'p, 's>, kind: FrameKind) -> Self {
        Self {
            block,
            pos: 0,
            kind,
        }
    }
}

/// Mutable state of one run. Nested blocks and procedure calls are frames
/// on an explicit stack, so script recursion depth is bounded by the step
/// limit rather than the native stack.
struct Execution<'p, 's, 'o> {
    program: &'p Program<'s>,
    world: World,
    trace: Vec<TraceEntry>,
    steps: u64,
    step_limit: u64,
    line: Option<u32>,
    observer: Option<&'o mut dyn FnMut(World, Command)>,
    frames: Vec<Frame<'p, 's>>,
}

impl<'p, 's> Execution<'p, 's, '_> {
    /// Count one statement line against the limit.
    fn tick(&mut self) -> RunResult<()> {
        self.steps += 1;
        if self.steps > self.step_limit {
            Err(RunError::StepLimitExceeded {
                limit: self.step_limit,
                empty_loop: false,
            })
        } else {
            Ok(())
        }
    }

    fn run(&mut self, entry: Block<'p, 's>) -> RunResult<()> {
        self.frames.push(Frame::new(entry, FrameKind::Sequence));

        while let Some(frame) = self.frames.last_mut() {
            if frame.pos >= frame.block.len() {
                match frame.kind {
                    FrameKind::Loop(condition) if condition.evaluate(&self.world) => frame.pos = 0,
                    _ => {
                        self.frames.pop();
                    }
                }
                continue;
            }

            let block = frame.block;
            let index = frame.pos;
            frame.pos += 1;

            let statement = classify(block.lines[index]);
            if statement == Statement::Skip {
                continue;
            }
            self.line = Some(block.line_number(index));
            self.tick()?;

            match statement {
                Statement::While { condition } => self.enter_while(block, index, condition)?,
                Statement::If { condition } => self.enter_if(block, index, condition)?,
                Statement::Call { name } => self.call(name)?,
                // Stray `elif`/`else` and unrecognised lines do nothing.
                _ => {}
            }
        }

        Ok(())
    }

    /// Move the current frame's cursor.
    fn resume_at(&mut self, pos: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pos = pos;
        }
    }

    fn resolve_condition(&self, text: &str) -> RunResult<Condition> {
        Condition::from_name(text).ok_or_else(|| RunError::UnknownCondition {
            condition: text.to_string(),
            line: self.line.unwrap_or(0),
        })
    }

    fn enter_while(&mut self, block: Block<'p, 's>, header: usize, condition: &str) -> RunResult<()> {
        let condition = self.resolve_condition(condition)?;
        let body = block.nested(header + 1);
        self.resume_at(header + 1 + body.len());

        if !condition.evaluate(&self.world) {
            return Ok(());
        }
        if !has_statements(&body) {
            // Nothing in the body can change the world, so the loop never ends.
            return Err(RunError::StepLimitExceeded {
                limit: self.step_limit,
                empty_loop: true,
            });
        }
        self.frames.push(Frame::new(body, FrameKind::Loop(condition)));
        Ok(())
    }

    /// Pick the first true branch of an `if`/`elif`/`else` chain and skip past the rest.
    fn enter_if(&mut self, block: Block<'p, 's>, header: usize, condition: &str) -> RunResult<()> {
        let indent = indentation(block.lines[header]);
        let body = block.nested(header + 1);
        let mut chosen = self
            .resolve_condition(condition)?
            .evaluate(&self.world)
            .then_some(body);
        let mut next = header + 1 + body.len();

        loop {
            // Comments and blank lines may sit between clauses.
            let mut at = next;
            while block
                .lines
                .get(at)
                .is_some_and(|line| classify(line) == Statement::Skip)
            {
                at += 1;
            }
            let Some(line) = block.lines.get(at) else {
                break;
            };
            let clause = classify(line);
            if indentation(line) != indent || !clause.is_branch_continuation() {
                break;
            }
            self.line = Some(block.line_number(at));
            self.tick()?;

            let body = block.nested(at + 1);
            if chosen.is_none() {
                let taken = match clause {
                    Statement::Elif { condition } => {
                        self.resolve_condition(condition)?.evaluate(&self.world)
                    }
                    _ => true,
                };
                if taken {
                    chosen = Some(body);
                }
            }
            next = at + 1 + body.len();
            if clause == Statement::Else {
                break;
            }
        }

        self.resume_at(next);
        if let Some(body) = chosen {
            self.frames.push(Frame::new(body, FrameKind::Sequence));
        }
        Ok(())
    }

    /// Resolution order: primitive action, user procedure, tolerated no-op, condition.
    fn call(&mut self, name: &str) -> RunResult<()> {
        if let Some(command) = Command::from_name(name) {
            return self.perform(command);
        }
        let program = self.program;
        if let Some(procedure) = program.get(name) {
            self.frames
                .push(Frame::new(procedure.block(), FrameKind::Sequence));
            return Ok(());
        }
        if NO_OP_CALLS.contains(&name) || Condition::from_name(name).is_some() {
            return Ok(());
        }
        Err(RunError::UnknownCommand {
            name: name.to_string(),
            line: self.line.unwrap_or(0),
        })
    }

    fn perform(&mut self, command: Command) -> RunResult<()> {
        command.apply(&mut self.world)?;
        trace!(action = command.name(), pose = %self.world.agent, "action");
        self.trace.push(TraceEntry {
            action: command,
            world: self.world.clone(),
        });
        if let Some(observer) = self.observer.as_deref_mut() {
            observer(self.world.clone(), command);
        }
        Ok(())
    }
}

fn has_statements(block: &Block<'_, '_>) -> bool {
    block
        .lines
        .iter()
        .any(|line| classify(line) != Statement::Skip)
}
