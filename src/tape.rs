//! The tape: a finite, double-ended run of cells addressed by signed logical indices.
//!
//! Cells live in a `VecDeque` whose front sits at logical index `origin`. Growing to the
//! left decrements `origin` instead of shifting cells, so indices handed out earlier keep
//! pointing at the same cells and left growth costs O(1) amortized.

use std::collections::VecDeque;
use std::fmt;

use crate::types::{Direction, MachineError, OutOfBoundsPolicy, Side, Symbol, WILDCARD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    origin: isize,
    blank: Symbol,
    policy: OutOfBoundsPolicy,
}

impl Tape {
    /// Creates a tape whose first cell is at index 0.
    pub fn new(symbols: Vec<Symbol>, blank: &str, policy: OutOfBoundsPolicy) -> Self {
        Self {
            cells: symbols.into(),
            origin: 0,
            blank: blank.to_string(),
            policy,
        }
    }

    /// Builds a tape from a string, one symbol per character.
    pub fn from_text(text: &str, blank: &str, policy: OutOfBoundsPolicy) -> Self {
        Self::new(text.chars().map(String::from).collect(), blank, policy)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn blank(&self) -> &str {
        &self.blank
    }

    pub fn policy(&self) -> OutOfBoundsPolicy {
        self.policy
    }

    /// Logical index of the leftmost cell.
    pub fn first_index(&self) -> isize {
        self.origin
    }

    /// Logical index one past the rightmost cell, saturating at `isize::MAX`.
    pub fn end_index(&self) -> isize {
        self.origin.saturating_add(self.cells.len() as isize)
    }

    pub fn contains(&self, index: isize) -> bool {
        self.offset(index).is_some()
    }

    fn offset(&self, index: isize) -> Option<usize> {
        index
            .checked_sub(self.origin)
            .and_then(|offset| usize::try_from(offset).ok())
            .filter(|&offset| offset < self.cells.len())
    }

    fn slot(&self, index: isize) -> Result<usize, MachineError> {
        self.offset(index)
            .ok_or(MachineError::OutOfRange { index })
    }

    pub fn read(&self, index: isize) -> Result<&Symbol, MachineError> {
        let slot = self.slot(index)?;
        Ok(&self.cells[slot])
    }

    /// Overwrites the cell at `index`. Writing the wildcard leaves the cell untouched.
    pub fn write(&mut self, index: isize, symbol: &str) -> Result<(), MachineError> {
        let slot = self.slot(index)?;
        if symbol != WILDCARD {
            self.cells[slot] = symbol.to_string();
        }
        Ok(())
    }

    /// Computes where the head lands when moving from `index` without touching the tape.
    ///
    /// Under [`OutOfBoundsPolicy::Fail`] a destination outside the tape is reported as the
    /// side it falls off; under [`OutOfBoundsPolicy::Extend`] every destination is allowed
    /// except one past the range of `isize`.
    pub fn target(&self, index: isize, direction: Direction) -> Result<isize, Side> {
        let next = match direction {
            Direction::Left => index.checked_sub(1).ok_or(Side::Left)?,
            Direction::Right => index.checked_add(1).ok_or(Side::Right)?,
            Direction::Stay => index,
        };

        match self.policy {
            OutOfBoundsPolicy::Extend => Ok(next),
            OutOfBoundsPolicy::Fail if self.contains(next) => Ok(next),
            OutOfBoundsPolicy::Fail if next < self.first_index() => Err(Side::Left),
            OutOfBoundsPolicy::Fail => Err(Side::Right),
        }
    }

    /// Moves the head from `index` and returns the new index.
    ///
    /// Under the extend policy a move one past either end adds a single blank cell there
    /// first, so the returned index is always addressable. The tape does not know the
    /// machine state, so an `EndOfTape` error from here carries an empty `state`.
    pub fn move_head(&mut self, index: isize, direction: Direction) -> Result<isize, MachineError> {
        let next = self.target(index, direction).map_err(|side| MachineError::EndOfTape {
            side,
            state: String::new(),
            index,
        })?;

        if !self.reach(next) {
            return Err(MachineError::OutOfRange { index: next });
        }

        Ok(next)
    }

    /// Makes `index` addressable and returns whether it is.
    ///
    /// Only the extend policy grows the tape, and only by a single blank cell directly
    /// before the first or after the last cell (or the first cell of an empty tape).
    /// Indices further away are left alone.
    pub fn reach(&mut self, index: isize) -> bool {
        if self.contains(index) {
            return true;
        }
        if self.policy == OutOfBoundsPolicy::Fail {
            return false;
        }

        if self.cells.is_empty() {
            self.cells.push_back(self.blank.clone());
            self.origin = index;
        } else if index.checked_add(1) == Some(self.origin) {
            self.cells.push_front(self.blank.clone());
            self.origin = index;
        } else if self.origin.checked_add(self.cells.len() as isize) == Some(index) {
            self.cells.push_back(self.blank.clone());
        } else {
            return false;
        }

        true
    }

    /// Snapshot of the tape content from left to right.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.cells.iter().cloned().collect()
    }

    /// Iterates over `(index, symbol)` pairs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = (isize, &Symbol)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, symbol)| (self.origin + i as isize, symbol))
    }

    /// The tape joined into one string with leading and trailing blanks removed.
    pub fn trimmed(&self) -> String {
        let first = self.cells.iter().position(|s| *s != self.blank);
        let last = self.cells.iter().rposition(|s| *s != self.blank);

        match (first, last) {
            (Some(first), Some(last)) => self
                .cells
                .range(first..=last)
                .map(String::as_str)
                .collect(),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, symbol) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", symbol)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape(text: &str, policy: OutOfBoundsPolicy) -> Tape {
        Tape::from_text(text, " ", policy)
    }

    #[test]
    fn test_read_write() {
        let mut tape = tape("10", OutOfBoundsPolicy::Fail);

        tape.write(1, "1").unwrap();
        assert_eq!(tape.read(0).unwrap(), "1");
        assert_eq!(tape.read(1).unwrap(), "1");
        assert_eq!(tape.read(2), Err(MachineError::OutOfRange { index: 2 }));
        assert_eq!(tape.read(-1), Err(MachineError::OutOfRange { index: -1 }));
    }

    #[test]
    fn test_write_wildcard_is_noop() {
        let mut tape = tape("1", OutOfBoundsPolicy::Fail);

        tape.write(0, WILDCARD).unwrap();
        assert_eq!(tape.symbols(), vec!["1"]);
    }

    #[test]
    fn test_fail_policy_rejects_moves_off_tape() {
        let mut tape = tape("ab", OutOfBoundsPolicy::Fail);

        assert_eq!(tape.move_head(0, Direction::Right).unwrap(), 1);
        assert_eq!(tape.move_head(1, Direction::Stay).unwrap(), 1);
        assert!(matches!(
            tape.move_head(0, Direction::Left),
            Err(MachineError::EndOfTape { side: Side::Left, index: 0, .. })
        ));
        assert!(matches!(
            tape.move_head(1, Direction::Right),
            Err(MachineError::EndOfTape { side: Side::Right, index: 1, .. })
        ));
        assert_eq!(tape.symbols(), vec!["a", "b"]);
    }

    #[test]
    fn test_extend_left_keeps_indices_stable() {
        let mut tape = tape("ab", OutOfBoundsPolicy::Extend);

        let head = tape.move_head(0, Direction::Left).unwrap();
        assert_eq!(head, -1);
        assert_eq!(tape.first_index(), -1);
        assert_eq!(tape.symbols(), vec![" ", "a", "b"]);
        assert_eq!(tape.read(-1).unwrap(), " ");
        assert_eq!(tape.read(0).unwrap(), "a");
    }

    #[test]
    fn test_extend_right_adds_one_blank() {
        let mut tape = tape("ab", OutOfBoundsPolicy::Extend);

        let head = tape.move_head(1, Direction::Right).unwrap();
        assert_eq!(head, 2);
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.read(2).unwrap(), " ");
    }

    #[test]
    fn test_reach_empty_tape() {
        let mut tape = tape("", OutOfBoundsPolicy::Extend);

        assert!(tape.reach(3));
        assert_eq!(tape.symbols(), vec![" "]);
        assert_eq!(tape.first_index(), 3);
        assert!(tape.reach(2));
        assert!(tape.reach(4));
        assert_eq!(tape.symbols(), vec![" ", " ", " "]);

        let mut fixed = Tape::new(Vec::new(), " ", OutOfBoundsPolicy::Fail);
        assert!(!fixed.reach(0));
        assert!(fixed.is_empty());
    }

    #[test]
    fn test_reach_grows_at_most_one_cell() {
        let mut tape = tape("1", OutOfBoundsPolicy::Extend);

        assert!(!tape.reach(20_000_000));
        assert!(!tape.reach(-2));
        assert_eq!(tape.symbols(), vec!["1"]);

        assert!(tape.reach(-1));
        assert!(tape.reach(1));
        assert_eq!(tape.symbols(), vec![" ", "1", " "]);
    }

    #[test]
    fn test_moves_at_index_limits_do_not_overflow() {
        let mut low = tape("", OutOfBoundsPolicy::Extend);
        assert!(low.reach(isize::MIN));
        assert!(matches!(
            low.move_head(isize::MIN, Direction::Left),
            Err(MachineError::EndOfTape { side: Side::Left, .. })
        ));

        let mut high = tape("", OutOfBoundsPolicy::Extend);
        assert!(high.reach(isize::MAX));
        assert_eq!(high.end_index(), isize::MAX);
        assert_eq!(high.read(isize::MAX).unwrap(), " ");
        assert!(matches!(
            high.move_head(isize::MAX, Direction::Right),
            Err(MachineError::EndOfTape { side: Side::Right, .. })
        ));
        assert_eq!(high.move_head(isize::MAX, Direction::Left).unwrap(), isize::MAX - 1);
        assert_eq!(high.len(), 2);

        let fixed = Tape::new(vec!["1".to_string()], " ", OutOfBoundsPolicy::Fail);
        assert_eq!(fixed.read(isize::MIN), Err(MachineError::OutOfRange { index: isize::MIN }));
        assert_eq!(fixed.target(0, Direction::Right), Err(Side::Right));
    }

    #[test]
    fn test_trimmed_and_display() {
        let tape = tape("  10 1  ", OutOfBoundsPolicy::Fail);

        assert_eq!(tape.trimmed(), "10 1");
        assert_eq!(format!("{}", Tape::from_text("1 ", " ", OutOfBoundsPolicy::Fail)), "[\"1\", \" \"]");
        assert_eq!(Tape::from_text("   ", " ", OutOfBoundsPolicy::Fail).trimmed(), "");
    }
}
