//! Property-based tests for the transition table and the engine.
//!
//! Tables are drawn over a small fixed universe of states and symbols so that
//! coverage and determinism can be checked exhaustively per case.

use proptest::prelude::*;
use tapemachine::{
    Action, OutOfBoundsPolicy, Tape, Transition, TransitionTable, TuringMachine, WILDCARD,
};

const STATES: [&str; 3] = ["A", "B", "C"];
const SYMBOLS: [&str; 3] = ["0", "1", " "];

fn state() -> impl Strategy<Value = String> {
    prop::sample::select(STATES.to_vec()).prop_map(String::from)
}

fn symbol() -> impl Strategy<Value = String> {
    prop::sample::select(SYMBOLS.to_vec()).prop_map(String::from)
}

fn action() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![Action::Left, Action::Right, Action::Stay, Action::Halt])
}

fn policy() -> impl Strategy<Value = OutOfBoundsPolicy> {
    prop_oneof![
        Just(OutOfBoundsPolicy::Fail),
        Just(OutOfBoundsPolicy::Extend)
    ]
}

prop_compose! {
    /// Rules with unique (state, symbol) keys.
    fn rules()(
        keyed in prop::collection::btree_map(
            (state(), symbol()),
            (state(), symbol(), action()),
            0..=STATES.len() * SYMBOLS.len(),
        )
    ) -> Vec<Transition> {
        keyed
            .into_iter()
            .map(|((start_state, tape_value), (end_state, new_tape_value, action))| Transition {
                start_state,
                tape_value,
                end_state,
                new_tape_value,
                action,
            })
            .collect()
    }
}

prop_compose! {
    fn tape()(symbols in prop::collection::vec(symbol(), 1..8))
        (head in 0..symbols.len() as isize, symbols in Just(symbols)) -> (Vec<String>, isize) {
        (symbols, head)
    }
}

fn build_machine(
    rules: &[Transition],
    symbols: &[String],
    head: isize,
    policy: OutOfBoundsPolicy,
) -> TuringMachine {
    let table = TransitionTable::build(rules.to_vec()).unwrap();
    TuringMachine::new(table, "A", head, Tape::new(symbols.to_vec(), " ", policy))
}

proptest! {
    #[test]
    fn lookup_returns_the_rule_for_its_key(rules in rules()) {
        let table = TransitionTable::build(rules.clone()).unwrap();

        for state in STATES {
            for symbol in SYMBOLS {
                let expected = rules
                    .iter()
                    .find(|t| t.start_state == state && t.tape_value == symbol);
                prop_assert_eq!(table.lookup(state, symbol).ok(), expected);
            }
        }
    }

    #[test]
    fn duplicate_keys_are_rejected(rules in rules(), index in any::<prop::sample::Index>()) {
        prop_assume!(!rules.is_empty());
        let mut rules = rules;
        let duplicate = rules[index.index(rules.len())].clone();
        rules.push(duplicate);

        prop_assert!(TransitionTable::build(rules).is_err());
    }

    #[test]
    fn exhaustive_iff_every_pair_is_covered(rules in rules()) {
        let table = TransitionTable::build(rules).unwrap();
        let missing = table.is_exhaustive(&STATES, &SYMBOLS);

        prop_assert_eq!(missing.is_empty(), table.len() == STATES.len() * SYMBOLS.len());
        prop_assert_eq!(missing.len() + table.len(), STATES.len() * SYMBOLS.len());
    }

    #[test]
    fn adding_a_missing_rule_shrinks_missing_set_by_one(
        rules in rules(),
        index in any::<prop::sample::Index>(),
    ) {
        let table = TransitionTable::build(rules.clone()).unwrap();
        let missing = table.is_exhaustive(&STATES, &SYMBOLS);
        prop_assume!(!missing.is_empty());

        let (state, symbol) = missing[index.index(missing.len())].clone();
        let mut extended = rules;
        extended.push(Transition::new(&state, &symbol, &state, &symbol, Action::Stay));
        let table = TransitionTable::build(extended).unwrap();
        let remaining = table.is_exhaustive(&STATES, &SYMBOLS);

        prop_assert_eq!(remaining.len(), missing.len() - 1);
        prop_assert!(!remaining.contains(&(state, symbol)));
    }

    #[test]
    fn runs_are_deterministic(rules in rules(), (symbols, head) in tape(), policy in policy()) {
        let trace = |machine: &mut TuringMachine| {
            let mut records = Vec::new();
            let result = machine.run_with(Some(64), |m| records.push(m.last_step().cloned()));
            (result, records)
        };

        let first = trace(&mut build_machine(&rules, &symbols, head, policy));
        let second = trace(&mut build_machine(&rules, &symbols, head, policy));

        prop_assert_eq!(first, second);
    }

    #[test]
    fn wildcard_write_keeps_the_cell(symbol in symbol(), action in action()) {
        let rules = vec![Transition::new("A", &symbol, "A", WILDCARD, action)];
        let mut machine = build_machine(&rules, &[symbol.clone()], 0, OutOfBoundsPolicy::Extend);

        machine.step();
        prop_assert_eq!(machine.tape().read(0).unwrap(), &symbol);
    }

    #[test]
    fn extend_grows_by_exactly_one_cell(symbols in prop::collection::vec(symbol(), 1..8), left in any::<bool>()) {
        let (head, action) = if left {
            (0, Action::Left)
        } else {
            (symbols.len() as isize - 1, Action::Right)
        };
        let current = symbols[head as usize].clone();
        let rules = vec![Transition::new("A", &current, "B", &current, action)];
        let mut machine = build_machine(&rules, &symbols, head, OutOfBoundsPolicy::Extend);

        machine.step();
        prop_assert_eq!(machine.tape().len(), symbols.len() + 1);
        prop_assert_eq!(machine.tape().read(machine.head()).unwrap().as_str(), " ");
        if left {
            prop_assert_eq!(machine.head(), machine.tape().first_index());
        } else {
            prop_assert_eq!(machine.head(), machine.tape().end_index() - 1);
        }
    }
}
