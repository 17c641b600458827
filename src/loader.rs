//! This module provides the `ProgramLoader` struct, responsible for loading program and tape
//! definitions from JSON files and strings.

use crate::analyzer::analyze;
use crate::types::{MachineError, Program, Symbol, TapeInput, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading programs and tapes.
/// Every loaded program is validated with [`analyze`] before it is returned.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read, decoded and passes validation.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file is not a valid program document.
    /// * `Err(MachineError::ValidationError)` if the program is inconsistent.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = read_file(path)?;
        Self::load_program_from_string(&content)
    }

    /// Loads a single program from the provided JSON content.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::ValidationError(format!(
                "Program is {} bytes, larger than the {} byte limit",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        let program: Program = serde_json::from_str(content)?;
        analyze(&program)?;

        Ok(program)
    }

    /// Loads a tape from a JSON file holding either a string or a list of symbols.
    pub fn load_tape(path: &Path) -> Result<Vec<Symbol>, MachineError> {
        let content = read_file(path)?;
        Self::load_tape_from_string(&content)
    }

    pub fn load_tape_from_string(content: &str) -> Result<Vec<Symbol>, MachineError> {
        let tape: TapeInput = serde_json::from_str(content)?;
        Ok(tape.symbols())
    }

    /// Loads all program files (`.json` extension) from a given directory.
    ///
    /// Directories and other files are skipped. Each element of the result is either the
    /// path and program that loaded, or the error for a file that did not.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.json files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn read_file(path: &Path) -> Result<String, MachineError> {
    fs::read_to_string(path).map_err(|e| {
        MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}
