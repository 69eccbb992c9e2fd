//! # Program Repair
//!
//! Finds the single corrupted instruction in a looping program: some `jmp`
//! should have been a `nop` (or the reverse). Every Jmp/Nop is flipped in
//! turn on a private copy of the program and the copy is run. The first
//! flip, by ascending index, whose run completes wins.
//!
//! `acc` instructions are never candidates.

use crate::error::{self, Result};
use crate::interpreter::{self, Outcome};
use crate::opcode::{Instruction, Program};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The winning flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repair {
    /// Position of the corrupted instruction
    pub index: usize,
    /// The instruction as found in the program
    pub original: Instruction,
    /// The instruction that makes the program terminate
    pub patched: Instruction,
    /// Accumulator after the patched program completes
    pub accumulator: i64,
}

/// How to walk the candidate list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairStrategy {
    #[default]
    Sequential,
    Parallel,
}

impl RepairStrategy {
    pub fn run(self, program: &Program) -> Result<Repair> {
        match self {
            RepairStrategy::Sequential => repair(program),
            RepairStrategy::Parallel => repair_parallel(program),
        }
    }
}

impl FromStr for RepairStrategy {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequential" => Ok(RepairStrategy::Sequential),
            "parallel" => Ok(RepairStrategy::Parallel),
            other => Err(error::Error::config_invalid(format!("unknown repair strategy '{}'", other))
                .with_context("strategy", other)),
        }
    }
}

/// Flip the instruction at `index` and run the result.
///
/// Returns `Some` only when the patched program completes. Loops and jumps
/// out of range both just disqualify the candidate.
fn try_candidate(program: &Program, index: usize) -> Option<Repair> {
    let original = program.get(index)?;
    let patched = original.flipped()?;
    let trial = program.with_patch(index, patched)?;

    match interpreter::run(&trial) {
        Ok(Outcome::Completed { accumulator }) => Some(Repair {
            index,
            original,
            patched,
            accumulator,
        }),
        Ok(Outcome::Looped { .. }) => {
            tracing::trace!(index, %original, "candidate still loops");
            None
        }
        Err(err) => {
            tracing::debug!(index, %original, %err, "candidate discarded");
            None
        }
    }
}

/// Search candidates in ascending index order and return the first flip
/// that makes `program` complete.
///
/// `program` itself is never modified; each trial runs on its own copy.
pub fn repair(program: &Program) -> Result<Repair> {
    let mut tried = 0usize;
    for index in program.candidates() {
        tried += 1;
        if let Some(found) = try_candidate(program, index) {
            tracing::debug!(index, tried, accumulator = found.accumulator, "repair found");
            return Ok(found);
        }
    }

    Err(error::no_single_fix(tried).with_operation("repair::search"))
}

/// Same result as [`repair`], with candidates tried on the rayon pool.
///
/// `find_map_first` yields the lowest-index success regardless of which
/// trial finishes first, and skips candidates above an already-found winner.
pub fn repair_parallel(program: &Program) -> Result<Repair> {
    let candidates: Vec<usize> = program.candidates().collect();

    let found = candidates
        .par_iter()
        .find_map_first(|&index| try_candidate(program, index));

    match found {
        Some(found) => {
            tracing::debug!(
                index = found.index,
                candidates = candidates.len(),
                accumulator = found.accumulator,
                "parallel repair found"
            );
            Ok(found)
        }
        None => Err(error::no_single_fix(candidates.len()).with_operation("repair::search_parallel")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn boot_code() -> Program {
        Program::new(vec![
            Instruction::nop(0),
            Instruction::acc(1),
            Instruction::jmp(4),
            Instruction::acc(3),
            Instruction::jmp(-3),
            Instruction::acc(-99),
            Instruction::acc(1),
            Instruction::jmp(-4),
            Instruction::acc(6),
        ])
    }

    #[test]
    fn test_repair_boot_code() {
        let found = repair(&boot_code()).unwrap();
        assert_eq!(
            found,
            Repair {
                index: 7,
                original: Instruction::jmp(-4),
                patched: Instruction::nop(-4),
                accumulator: 8,
            }
        );
    }

    #[test]
    fn test_repair_does_not_mutate() {
        let program = boot_code();
        let before = program.instructions().to_vec();

        repair(&program).unwrap();
        assert_eq!(program.instructions(), before.as_slice());

        let hopeless = Program::new(vec![
            Instruction::jmp(1),
            Instruction::jmp(0),
            Instruction::jmp(-2),
        ]);
        let before = hopeless.instructions().to_vec();
        assert!(repair(&hopeless).is_err());
        assert_eq!(hopeless.instructions(), before.as_slice());
    }

    #[test]
    fn test_all_acc_has_no_fix() {
        let program = Program::new(vec![Instruction::acc(1), Instruction::acc(2)]);
        let err = repair(&program).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSingleFixFound);
        assert_eq!(err.operation(), "repair::search");
        assert_eq!(err.context_value("candidates"), Some("0"));
    }

    #[test]
    fn test_no_fix_counts_candidates() {
        // Every single flip still loops.
        let program = Program::new(vec![
            Instruction::jmp(1),
            Instruction::jmp(0),
            Instruction::jmp(-2),
        ]);
        let err = repair(&program).unwrap_err();
        assert!(err.is_no_fix());
        assert_eq!(err.context_value("candidates"), Some("3"));
    }

    #[test]
    fn test_lowest_index_wins() {
        // Flipping index 0 or index 2 both complete; index 0 must win.
        let program = Program::new(vec![
            Instruction::nop(3),
            Instruction::acc(1),
            Instruction::jmp(-1),
        ]);
        assert_eq!(try_candidate(&program, 2).map(|r| r.accumulator), Some(1));

        let found = repair(&program).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.patched, Instruction::jmp(3));
        assert_eq!(found.accumulator, 0);
    }

    #[test]
    fn test_acc_is_never_a_candidate() {
        let program = Program::new(vec![Instruction::acc(1), Instruction::jmp(-1)]);
        assert!(try_candidate(&program, 0).is_none());
    }

    #[test]
    fn test_out_of_range_candidate_is_skipped() {
        // Flipping index 0 makes the run jump to 6 in a 3-long program;
        // flipping index 2 completes.
        let program = Program::new(vec![
            Instruction::nop(6),
            Instruction::acc(2),
            Instruction::jmp(-2),
        ]);
        let found = repair(&program).unwrap();
        assert_eq!(found.index, 2);
        assert_eq!(found.accumulator, 2);
    }

    #[test]
    fn test_repair_of_terminating_program() {
        // Not meaningful, but still well defined: first flip that completes.
        let program = Program::new(vec![Instruction::nop(1), Instruction::acc(3)]);
        let found = repair(&program).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.accumulator, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let programs = vec![
            boot_code(),
            Program::new(vec![Instruction::nop(3), Instruction::acc(1), Instruction::jmp(-1)]),
            Program::new(vec![Instruction::nop(6), Instruction::acc(2), Instruction::jmp(-2)]),
        ];
        for program in &programs {
            assert_eq!(repair_parallel(program).unwrap(), repair(program).unwrap());
        }

        let none = Program::new(vec![Instruction::acc(1)]);
        let err = repair_parallel(&none).unwrap_err();
        assert!(err.is_no_fix());
        assert_eq!(err.operation(), "repair::search_parallel");
    }

    #[test]
    fn test_strategy() {
        assert_eq!("parallel".parse::<RepairStrategy>().unwrap(), RepairStrategy::Parallel);
        assert!("random".parse::<RepairStrategy>().is_err());
        assert_eq!(
            RepairStrategy::Parallel.run(&boot_code()).unwrap(),
            RepairStrategy::Sequential.run(&boot_code()).unwrap()
        );
    }
}
