//! A catalog of programs bundled into the binary, parsed once on first use.

use crate::loader::ProgramLoader;
use crate::types::{MachineError, Program};
use tracing::warn;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../programs/swap.json"),
    include_str!("../programs/bit-flip.json"),
    include_str!("../programs/binary-increment.json"),
    include_str!("../programs/busy-beaver-2.json"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match ProgramLoader::load_program_from_string(text) {
            Ok(program) => Some(program),
            Err(error) => {
                warn!(%error, "skipping embedded program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, MachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            MachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, MachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|program| program.name.clone())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state.clone(),
            initial_tape: program.initial_tape().concat(),
            state_count: program.states.len(),
            transition_count: program.transitions.len(),
        })
    }
}

/// Summary of a catalog entry, for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::machine::TuringMachine;
    use crate::types::{OutOfBoundsPolicy, Outcome};

    fn run(name: &str, config: &MachineConfig) -> (TuringMachine, Outcome) {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        let mut machine =
            TuringMachine::from_program(&program, program.initial_tape(), config).unwrap();
        let outcome = machine.run(Some(1000)).outcome;
        (machine, outcome)
    }

    #[test]
    fn test_all_embedded_programs_load() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
        assert_eq!(
            ProgramManager::list_program_names(),
            vec!["Swap", "Bit Flip", "Binary Increment", "Busy Beaver 2"]
        );
    }

    #[test]
    fn test_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();

        assert_eq!(info.name, "Swap");
        assert_eq!(info.initial_tape, "10");
        assert_eq!(info.state_count, 2);
        assert_eq!(info.transition_count, 2);
        assert!(ProgramManager::get_program_info(99).is_err());
    }

    #[test]
    fn test_lookup_by_name_ignores_case() {
        assert!(ProgramManager::get_program_by_name("bit flip").is_ok());
        assert!(ProgramManager::get_program_by_name("missing").is_err());
    }

    #[test]
    fn test_binary_increment() {
        let (machine, outcome) = run("Binary Increment", &MachineConfig::default());

        assert_eq!(outcome, Outcome::Halted);
        assert_eq!(machine.tape().trimmed(), "1100");
        assert_eq!(machine.step_count(), 8);
    }

    #[test]
    fn test_bit_flip_is_exhaustive() {
        let config = MachineConfig {
            ensure_exhaustive: true,
            ..MachineConfig::default()
        };
        let (machine, outcome) = run("Bit Flip", &config);

        assert_eq!(outcome, Outcome::Halted);
        assert_eq!(machine.tape().trimmed(), "1001");
    }

    #[test]
    fn test_busy_beaver_needs_extend() {
        let (_, outcome) = run("Busy Beaver 2", &MachineConfig::default());
        assert!(matches!(
            outcome,
            Outcome::Failed(MachineError::EndOfTape { .. })
        ));

        let config = MachineConfig {
            out_of_bounds: OutOfBoundsPolicy::Extend,
            ..MachineConfig::default()
        };
        let (machine, outcome) = run("Busy Beaver 2", &config);

        assert_eq!(outcome, Outcome::Halted);
        assert_eq!(machine.step_count(), 6);
        assert_eq!(machine.tape().symbols(), vec!["1", "1", "1", "1"]);
        assert_eq!(machine.tape().first_index(), -2);
    }
}
