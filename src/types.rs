//! This module defines the core data structures and types used throughout the interpreter,
//! including program representation, transition rules, head actions, execution results,
//! and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tape symbol. Symbols are opaque tokens; only [`WILDCARD`] carries meaning.
pub type Symbol = String;
/// A machine state name.
pub type State = String;

/// Written in place of a symbol to mean "leave the cell as it is".
pub const WILDCARD: &str = "*";
/// The default blank symbol used when the tape grows.
pub const DEFAULT_BLANK_SYMBOL: &str = " ";
/// The maximum allowed size for a program file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A program definition as produced by the loader.
///
/// Keys follow the camelCase JSON layout of program files
/// (`initialState`, `initialIndex`, `startState`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Display name, used by the built-in catalog.
    #[serde(default)]
    pub name: String,
    /// The master list of states. Transitions may only reference these.
    pub states: Vec<State>,
    /// Transition rules, in declaration order.
    pub transitions: Vec<Transition>,
    /// The state the machine starts in.
    pub initial_state: State,
    /// The initial head position.
    pub initial_index: isize,
    /// Symbol used for cells added when the tape grows.
    #[serde(default = "default_blank")]
    pub blank: Symbol,
    /// Declared alphabet for the exhaustiveness check. Derived from the rules when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<Vec<Symbol>>,
    /// Default tape content shipped with the program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape: Option<TapeInput>,
    /// Human readable description of the expected input.
    #[serde(rename = "tape-format", default, skip_serializing_if = "Option::is_none")]
    pub tape_format: Option<String>,
    /// Human readable description of the produced output.
    #[serde(rename = "output-format", default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

fn default_blank() -> Symbol {
    DEFAULT_BLANK_SYMBOL.to_string()
}

impl Program {
    /// Returns the alphabet used for exhaustiveness checks.
    ///
    /// A declared `alphabet` wins. Otherwise every symbol the program mentions is
    /// collected in first-seen order: the blank, then each rule's read value and its
    /// written value (skipping the wildcard), then the symbols of the bundled tape.
    pub fn alphabet(&self) -> Vec<Symbol> {
        if let Some(alphabet) = &self.alphabet {
            return alphabet.clone();
        }

        let mut symbols: Vec<Symbol> = vec![self.blank.clone()];
        let mentioned = self
            .transitions
            .iter()
            .flat_map(|t| [&t.tape_value, &t.new_tape_value])
            .filter(|s| s.as_str() != WILDCARD)
            .cloned()
            .chain(self.initial_tape());

        for symbol in mentioned {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }

        symbols
    }

    /// Returns the bundled tape as a list of symbols, or an empty tape.
    pub fn initial_tape(&self) -> Vec<Symbol> {
        self.tape
            .as_ref()
            .map(TapeInput::symbols)
            .unwrap_or_default()
    }
}

/// A single transition rule: in `start_state` reading `tape_value`, write
/// `new_tape_value`, switch to `end_state` and perform `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub start_state: State,
    pub tape_value: Symbol,
    pub end_state: State,
    pub new_tape_value: Symbol,
    pub action: Action,
}

impl Transition {
    pub fn new(
        start_state: &str,
        tape_value: &str,
        end_state: &str,
        new_tape_value: &str,
        action: Action,
    ) -> Self {
        Self {
            start_state: start_state.to_string(),
            tape_value: tape_value.to_string(),
            end_state: end_state.to_string(),
            new_tape_value: new_tape_value.to_string(),
            action,
        }
    }

    /// The symbol this rule leaves on the tape when it reads `current`.
    pub fn resolve_write<'a>(&'a self, current: &'a str) -> &'a str {
        if self.new_tape_value == WILDCARD {
            current
        } else {
            &self.new_tape_value
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ➞ {} (tape: {:?} ➞ {:?}) then {}",
            self.start_state, self.end_state, self.tape_value, self.new_tape_value, self.action
        )
    }
}

/// What the head does after a write.
///
/// Program files spell these in any case (`left`, `Right`, `HALT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Action {
    Left,
    Right,
    Stay,
    /// Stop the machine. The head does not move.
    Halt,
}

impl FromStr for Action {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Action::Left, Action::Right, Action::Stay, Action::Halt]
            .into_iter()
            .find(|action| action.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| MachineError::ParseError(format!("Unknown action: {}", s)))
    }
}

impl TryFrom<String> for Action {
    type Error = MachineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Action {
    /// The head movement for this action, or `None` for [`Action::Halt`].
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::Stay => Some(Direction::Stay),
            Action::Halt => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Stay => "stay",
            Action::Halt => "halt",
        };
        f.write_str(name)
    }
}

/// Represents the possible directions a head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

/// Which end of the tape the head ran off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// What happens when the head moves past either end of the tape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Moving off the tape is an [`MachineError::EndOfTape`] error.
    #[default]
    Fail,
    /// The tape grows by one blank cell on the side being accessed.
    Extend,
}

/// Tape content at the loader boundary: a string with one symbol per character,
/// or an explicit list of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TapeInput {
    Text(String),
    Symbols(Vec<Symbol>),
}

impl TapeInput {
    pub fn symbols(&self) -> Vec<Symbol> {
        match self {
            TapeInput::Text(text) => text.chars().map(String::from).collect(),
            TapeInput::Symbols(symbols) => symbols.clone(),
        }
    }
}

impl From<&str> for TapeInput {
    fn from(text: &str) -> Self {
        TapeInput::Text(text.to_string())
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a transition and keeps running.
    Continue,
    /// The machine stopped, either through a halt action or an error.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// A rule with the halt action was applied.
    Ok,

    Err(MachineError),
}

/// Terminal outcome of [`crate::TuringMachine::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Halted,
    Failed(MachineError),
    /// The step budget ran out while the machine was still running.
    StepLimitReached,
}

/// Final report of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub outcome: Outcome,
    /// Total transitions applied since the machine was created or last reset.
    pub steps: usize,
    pub state: State,
    pub head: isize,
    pub tape: Vec<Symbol>,
}

impl RunResult {
    pub fn is_halted(&self) -> bool {
        self.outcome == Outcome::Halted
    }
}

/// A (state, symbol) pair with no rule in the table.
pub type MissingTransition = (State, Symbol);

/// Represents various errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Two rules share the same (state, symbol) key.
    #[error("Duplicate rule for state {state:?} reading {symbol:?}")]
    DuplicateRule { state: State, symbol: Symbol },
    /// No rule is defined for the current state and symbol.
    #[error("No known transition for machine in state {state:?} with tape value of {symbol:?}")]
    NoSuchTransitionRule { state: State, symbol: Symbol },
    /// The head tried to move off the tape under the fail policy.
    #[error("Fell off {side} side: state={state:?} index={index}")]
    EndOfTape {
        side: Side,
        state: State,
        index: isize,
    },
    /// A tape cell outside the addressable range was accessed.
    #[error("Tape index {index} is out of range")]
    OutOfRange { index: isize },
    /// The exhaustiveness check found uncovered (state, symbol) pairs.
    #[error("Missing transitions: {0:?}")]
    NotExhaustive(Vec<MissingTransition>),
    /// Indicates an error during the validation of a program's structure.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error while decoding a program or tape file.
    #[error("Program parsing error: {0}")]
    ParseError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for MachineError {
    fn from(error: serde_json::Error) -> Self {
        MachineError::ParseError(error.to_string())
    }
}
