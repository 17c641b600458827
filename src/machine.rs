//! This module defines the `TuringMachine` struct, the execution engine. It owns the tape and
//! the transition table, tracks the current state and head, and applies one rule per step
//! until a halt rule is applied, a step fails, or the caller's step budget runs out.

use tracing::{debug, info, warn};

use crate::analyzer;
use crate::config::MachineConfig;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{
    Action, Halt, MachineError, Outcome, Program, RunResult, Side, State, Step, Symbol,
    Transition,
};

/// Lifecycle of a machine. `Halted` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Running,
    Halted,
    Failed(MachineError),
}

/// What the most recent successful step did, for tracing and display.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// The rule that was applied.
    pub transition: Transition,
    /// The symbol under the head before the step.
    pub read: Symbol,
    /// The symbol left in that cell after the wildcard is resolved.
    pub written: Symbol,
    /// The state after the step.
    pub state: State,
    /// The head position after the step.
    pub head: isize,
}

/// A single-tape machine driven by a [`TransitionTable`].
///
/// Every call to [`TuringMachine::step`] is atomic: a step either applies its rule
/// completely or leaves state, head and tape exactly as they were and moves the
/// machine to [`Status::Failed`].
#[derive(Debug, Clone)]
pub struct TuringMachine {
    state: State,
    head: isize,
    tape: Tape,
    table: TransitionTable,
    status: Status,
    last_step: Option<StepRecord>,
    step_count: usize,
    initial_state: State,
    initial_head: isize,
    initial_tape: Tape,
}

impl TuringMachine {
    /// Creates a machine in the `Running` status.
    ///
    /// Under the extend policy a start position one past either end grows the tape by a
    /// single blank. Any other start position off the tape makes the first step fail
    /// with `EndOfTape`.
    pub fn new(table: TransitionTable, initial_state: &str, head: isize, mut tape: Tape) -> Self {
        tape.reach(head);

        Self {
            state: initial_state.to_string(),
            head,
            initial_tape: tape.clone(),
            tape,
            table,
            status: Status::Running,
            last_step: None,
            step_count: 0,
            initial_state: initial_state.to_string(),
            initial_head: head,
        }
    }

    /// Builds a machine from a loaded program and tape content.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::ValidationError)` if the program fails [`analyzer::analyze`],
    ///   or if its initial index is not on the tape (or one past an end under the extend
    ///   policy).
    /// * `Err(MachineError::DuplicateRule)` if two rules share a key.
    /// * `Err(MachineError::NotExhaustive)` if `config.ensure_exhaustive` is set and some
    ///   state/symbol pair of the program's alphabet has no rule.
    pub fn from_program(
        program: &Program,
        symbols: Vec<Symbol>,
        config: &MachineConfig,
    ) -> Result<Self, MachineError> {
        analyzer::analyze(program)?;
        let table = TransitionTable::build(program.transitions.iter().cloned())?;

        if config.ensure_exhaustive {
            analyzer::ensure_exhaustive(
                &table,
                program.states.as_slice(),
                program.alphabet().as_slice(),
            )?;
        }

        let mut tape = Tape::new(symbols, &program.blank, config.out_of_bounds);
        if !tape.reach(program.initial_index) {
            return Err(MachineError::ValidationError(format!(
                "Invalid head position: {}",
                program.initial_index
            )));
        }

        Ok(Self::new(
            table,
            &program.initial_state,
            program.initial_index,
            tape,
        ))
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied and the machine keeps running.
    /// * `Step::Halt(Halt::Ok)` if a halt rule was applied.
    /// * `Step::Halt(Halt::Err(_))` if no rule matched or the head would leave the tape.
    ///
    /// Once the machine is halted or failed, further calls return the same result
    /// without touching anything.
    pub fn step(&mut self) -> Step {
        match &self.status {
            Status::Halted => return Step::Halt(Halt::Ok),
            Status::Failed(error) => return Step::Halt(Halt::Err(error.clone())),
            Status::Running => {}
        }

        match self.apply() {
            Ok(step) => step,
            Err(error) => {
                warn!(%error, state = %self.state, head = self.head, "machine failed");
                self.status = Status::Failed(error.clone());
                Step::Halt(Halt::Err(error))
            }
        }
    }

    fn apply(&mut self) -> Result<Step, MachineError> {
        let symbol = match self.tape.read(self.head) {
            Ok(symbol) => symbol.clone(),
            Err(_) if self.head < self.tape.first_index() => {
                return Err(self.end_of_tape(Side::Left))
            }
            Err(_) => return Err(self.end_of_tape(Side::Right)),
        };

        let transition = self.table.lookup(&self.state, &symbol)?.clone();
        let written = transition.resolve_write(&symbol).to_string();
        let direction = transition.action.direction();

        // Nothing is mutated until the move is known to stay on the tape.
        if let Some(direction) = direction {
            self.tape
                .target(self.head, direction)
                .map_err(|side| self.end_of_tape(side))?;
        }

        self.tape.write(self.head, &written)?;
        self.state = transition.end_state.clone();
        if let Some(direction) = direction {
            self.head = self.tape.move_head(self.head, direction)?;
        }
        self.step_count += 1;

        debug!(
            step = self.step_count,
            from = %transition.start_state,
            to = %transition.end_state,
            read = ?symbol,
            write = ?written,
            action = %transition.action,
            head = self.head,
            "applied transition"
        );

        let halted = transition.action == Action::Halt;
        self.last_step = Some(StepRecord {
            transition,
            read: symbol,
            written,
            state: self.state.clone(),
            head: self.head,
        });

        if halted {
            info!(state = %self.state, steps = self.step_count, "machine halted");
            self.status = Status::Halted;
            Ok(Step::Halt(Halt::Ok))
        } else {
            Ok(Step::Continue)
        }
    }

    fn end_of_tape(&self, side: Side) -> MachineError {
        MachineError::EndOfTape {
            side,
            state: self.state.clone(),
            index: self.head,
        }
    }

    /// Runs the machine until it halts, fails, or `max_steps` steps have been taken.
    pub fn run(&mut self, max_steps: Option<usize>) -> RunResult {
        self.run_with(max_steps, |_| {})
    }

    /// Same as [`TuringMachine::run`], calling `observer` after every applied rule.
    pub fn run_with<F>(&mut self, max_steps: Option<usize>, mut observer: F) -> RunResult
    where
        F: FnMut(&TuringMachine),
    {
        let mut taken = 0;

        let outcome = loop {
            if self.status == Status::Running && max_steps.is_some_and(|max| taken >= max) {
                break Outcome::StepLimitReached;
            }

            let was_running = self.is_running();
            match self.step() {
                Step::Continue => observer(self),
                Step::Halt(Halt::Ok) => {
                    if was_running {
                        observer(self);
                    }
                    break Outcome::Halted;
                }
                Step::Halt(Halt::Err(error)) => break Outcome::Failed(error),
            }
            taken += 1;
        };

        self.result(outcome)
    }

    fn result(&self, outcome: Outcome) -> RunResult {
        RunResult {
            outcome,
            steps: self.step_count,
            state: self.state.clone(),
            head: self.head,
            tape: self.tape.symbols(),
        }
    }

    /// Runs to completion and reports whether the machine stopped on a halt rule.
    pub fn accepts(&mut self, max_steps: Option<usize>) -> bool {
        self.run(max_steps).is_halted()
    }

    /// Resets the machine to its initial state, head and tape.
    pub fn reset(&mut self) {
        self.state = self.initial_state.clone();
        self.head = self.initial_head;
        self.tape = self.initial_tape.clone();
        self.status = Status::Running;
        self.last_step = None;
        self.step_count = 0;
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the state the machine started in.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn head(&self) -> isize {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    /// Returns the total number of rules applied since creation or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn last_step(&self) -> Option<&StepRecord> {
        self.last_step.as_ref()
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_step.as_ref().map(|record| &record.transition)
    }

    /// The symbol under the head, if the head is on the tape.
    pub fn symbol(&self) -> Option<&Symbol> {
        self.tape.read(self.head).ok()
    }
}
