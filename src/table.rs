//! The transition table: rules keyed by `(state, symbol)`, built once and never mutated.

use std::collections::HashMap;

use crate::analyzer;
use crate::types::{MachineError, MissingTransition, State, Symbol, Transition};

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<(State, Symbol), Transition>,
}

impl TransitionTable {
    /// Builds a table from rules in declaration order.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if every `(start_state, tape_value)` key is unique.
    /// * `Err(MachineError::DuplicateRule)` naming the first key that appears twice.
    pub fn build<I>(transitions: I) -> Result<Self, MachineError>
    where
        I: IntoIterator<Item = Transition>,
    {
        let mut rules = HashMap::new();

        for transition in transitions {
            let key = (
                transition.start_state.clone(),
                transition.tape_value.clone(),
            );
            if rules.contains_key(&key) {
                return Err(MachineError::DuplicateRule {
                    state: key.0,
                    symbol: key.1,
                });
            }
            rules.insert(key, transition);
        }

        Ok(Self { rules })
    }

    /// Finds the rule for `state` reading `symbol`. Matching is exact; a rule whose
    /// `tape_value` is the wildcard only matches a cell holding the wildcard itself.
    pub fn lookup(&self, state: &str, symbol: &str) -> Result<&Transition, MachineError> {
        self.get(state, symbol)
            .ok_or_else(|| MachineError::NoSuchTransitionRule {
                state: state.to_string(),
                symbol: symbol.to_string(),
            })
    }

    pub fn get(&self, state: &str, symbol: &str) -> Option<&Transition> {
        // HashMap<(String, String), _> cannot be queried with (&str, &str).
        self.rules.get(&(state.to_string(), symbol.to_string()))
    }

    pub fn contains(&self, state: &str, symbol: &str) -> bool {
        self.get(state, symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.rules.values()
    }

    /// Returns every `(state, symbol)` pair of `states × alphabet` without a rule.
    /// An empty result means no run can fail for lack of a rule.
    pub fn is_exhaustive<S, A>(&self, states: &[S], alphabet: &[A]) -> Vec<MissingTransition>
    where
        S: AsRef<str>,
        A: AsRef<str>,
    {
        analyzer::missing_transitions(self, states, alphabet)
    }
}
