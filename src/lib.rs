//! This crate provides the core logic for a deterministic tape-machine interpreter.
//! It includes modules for the tape, the transition table, the execution engine,
//! static analysis of programs, loading programs from JSON, and a catalog of bundled programs.

pub mod analyzer;
pub mod config;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the analysis entry points from the analyzer module.
pub use analyzer::{analyze, ensure_exhaustive, missing_transitions, AnalysisError};
/// Re-exports the `MachineConfig` struct from the config module.
pub use config::MachineConfig;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the engine and its observability types from the machine module.
pub use machine::{Status, StepRecord, TuringMachine};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the data model and error types from the types module.
pub use types::{
    Action, Direction, Halt, MachineError, MissingTransition, OutOfBoundsPolicy, Outcome,
    Program, RunResult, Side, State, Step, Symbol, TapeInput, Transition, DEFAULT_BLANK_SYMBOL,
    MAX_PROGRAM_SIZE, WILDCARD,
};
