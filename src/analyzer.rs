//! This module provides static checks over programs and transition tables that run before
//! any simulation: structural validation of a loaded program and the exhaustiveness check
//! over the declared states and alphabet.

use crate::table::TransitionTable;
use crate::types::{MachineError, MissingTransition, Program};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The program declares no states at all.
    NoStates,
    /// A state name appears more than once in the state list.
    DuplicateStates(Vec<String>),
    /// The initial state is not in the state list.
    InvalidStartState(String),
    /// Transitions reference states that are not in the state list.
    UndefinedStates(Vec<String>),
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into a `MachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoStates => {
                MachineError::ValidationError("No states declared".to_string())
            }
            AnalysisError::DuplicateStates(states) => {
                MachineError::ValidationError(format!("Duplicate states: {:?}", states))
            }
            AnalysisError::InvalidStartState(state) => {
                MachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedStates(states) => MachineError::ValidationError(format!(
                "Transitions reference undefined states: {:?}",
                states
            )),
        }
    }
}

/// Analyzes a loaded `Program` before a machine is built from it.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError::ValidationError)` describing the first violated check.
pub fn analyze(program: &Program) -> Result<(), MachineError> {
    let errors = [check_states, check_valid_start_state, check_undefined_states]
        .iter()
        .filter_map(|f| f(program).err())
        .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(first_error) => Err(first_error.into()),
        None => Ok(()),
    }
}

/// Checks that the state list is non-empty and free of duplicates.
fn check_states(program: &Program) -> Result<(), AnalysisError> {
    if program.states.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = program
        .states
        .iter()
        .filter(|state| !seen.insert(state.as_str()))
        .cloned()
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(AnalysisError::DuplicateStates(duplicates));
    }

    Ok(())
}

fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    if !program.states.contains(&program.initial_state) {
        return Err(AnalysisError::InvalidStartState(
            program.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that every transition starts and ends in a declared state.
fn check_undefined_states(program: &Program) -> Result<(), AnalysisError> {
    let declared: HashSet<&str> = program.states.iter().map(String::as_str).collect();

    let mut undefined: Vec<String> = program
        .transitions
        .iter()
        .flat_map(|t| [&t.start_state, &t.end_state])
        .filter(|state| !declared.contains(state.as_str()))
        .cloned()
        .collect();

    if !undefined.is_empty() {
        // Sort the states to make it deterministic
        undefined.sort();
        undefined.dedup();
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Lists every `(state, symbol)` pair of `states × alphabet` that has no rule in `table`,
/// in declaration order (states outer, symbols inner). Repeated states or symbols are
/// counted once, so each missing pair is reported exactly once.
///
/// This is a static check independent of any tape. An empty result guarantees a run can
/// never stop with `NoSuchTransitionRule`; it says nothing about running off the tape.
/// A non-empty result does not mean a particular run will hit a missing pair either.
pub fn missing_transitions<S, A>(
    table: &TransitionTable,
    states: &[S],
    alphabet: &[A],
) -> Vec<MissingTransition>
where
    S: AsRef<str>,
    A: AsRef<str>,
{
    let states = first_seen(states);
    let alphabet = first_seen(alphabet);

    states
        .iter()
        .flat_map(|&state| alphabet.iter().map(move |&symbol| (state, symbol)))
        .filter(|&(state, symbol)| !table.contains(state, symbol))
        .map(|(state, symbol)| (state.to_string(), symbol.to_string()))
        .collect()
}

fn first_seen<T: AsRef<str>>(items: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| seen.insert(*item))
        .collect()
}

/// Fails with `MachineError::NotExhaustive` when any pair of `states × alphabet` is uncovered.
pub fn ensure_exhaustive<S, A>(
    table: &TransitionTable,
    states: &[S],
    alphabet: &[A],
) -> Result<(), MachineError>
where
    S: AsRef<str>,
    A: AsRef<str>,
{
    let missing = missing_transitions(table, states, alphabet);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MachineError::NotExhaustive(missing))
    }
}
