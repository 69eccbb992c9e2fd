//! # Handheld Interpreter
//!
//! Runs a [`Program`] from `pc = 0, acc = 0` until it either steps exactly
//! one past the last instruction or is about to execute an instruction for
//! the second time.
//!
//! Every position is marked visited *before* its instruction executes, so a
//! revisit is caught before any of its side effects repeat.

use crate::error::{self, Result};
use crate::opcode::{Opcode, Program};
use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The program counter reached exactly `program.len()`
    Completed { accumulator: i64 },
    /// The instruction at `program_counter` was about to run a second time
    Looped { accumulator: i64, program_counter: usize },
}

impl Outcome {
    pub fn accumulator(&self) -> i64 {
        match self {
            Outcome::Completed { accumulator } | Outcome::Looped { accumulator, .. } => *accumulator,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }
}

/// A run's outcome plus every program counter entered, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub outcome: Outcome,
    pub path: Vec<usize>,
}

/// Machine state for one run. Never outlives the call that created it.
struct ExecutionState<'p> {
    program: &'p Program,
    program_counter: usize,
    accumulator: i64,
    visited: Vec<bool>,
}

impl<'p> ExecutionState<'p> {
    fn new(program: &'p Program) -> Self {
        Self {
            program,
            program_counter: 0,
            accumulator: 0,
            visited: vec![false; program.len()],
        }
    }

    /// Run to termination, reporting each entered position to `on_enter`
    fn execute(mut self, mut on_enter: impl FnMut(usize)) -> Result<Outcome> {
        let len = self.program.len();

        while self.program_counter < len {
            let pc = self.program_counter;
            if self.visited[pc] {
                return Ok(Outcome::Looped {
                    accumulator: self.accumulator,
                    program_counter: pc,
                });
            }
            self.visited[pc] = true;
            on_enter(pc);
            self.step(pc)?;
        }

        Ok(Outcome::Completed {
            accumulator: self.accumulator,
        })
    }

    fn step(&mut self, pc: usize) -> Result<()> {
        let instr = self.program.instructions()[pc];
        match instr.opcode {
            Opcode::Acc => {
                self.accumulator = self
                    .accumulator
                    .checked_add(instr.operand)
                    .ok_or_else(|| error::accumulator_overflow(pc, self.accumulator, instr.operand))?;
                self.program_counter = pc + 1;
            }
            Opcode::Jmp => {
                self.program_counter = self.jump_target(pc, instr.operand)?;
            }
            Opcode::Nop => {
                self.program_counter = pc + 1;
            }
        }
        Ok(())
    }

    /// Resolve a relative jump; anywhere outside `0..=len` is an error
    fn jump_target(&self, pc: usize, offset: i64) -> Result<usize> {
        let len = self.program.len();
        i64::try_from(pc)
            .ok()
            .and_then(|pc| pc.checked_add(offset))
            .and_then(|target| usize::try_from(target).ok())
            .filter(|&target| target <= len)
            .ok_or_else(|| error::pc_out_of_range(pc, offset, len, self.accumulator))
    }
}

/// Execute `program` until it completes or loops.
///
/// `Looped` is an ordinary outcome, not an error. Errors are reserved for a
/// jump that leaves `0..=len` and for accumulator overflow.
pub fn run(program: &Program) -> Result<Outcome> {
    let mut steps = 0usize;
    let outcome = ExecutionState::new(program)
        .execute(|_| steps += 1)
        .map_err(|e| e.with_operation("interpreter::run"))?;

    tracing::debug!(?outcome, steps, "run finished");
    Ok(outcome)
}

/// Like [`run`], also recording the order in which positions were entered
pub fn trace(program: &Program) -> Result<Trace> {
    let mut path = Vec::new();
    let outcome = ExecutionState::new(program)
        .execute(|pc| path.push(pc))
        .map_err(|e| e.with_operation("interpreter::trace"))?;

    tracing::debug!(?outcome, steps = path.len(), "trace finished");
    Ok(Trace { outcome, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::opcode::Instruction;

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
    fn test_boot_code_loops() {
        let outcome = run(&boot_code()).unwrap();
        assert_eq!(
            outcome,
            Outcome::Looped {
                accumulator: 5,
                program_counter: 1
            }
        );
        assert!(!outcome.is_completed());
        assert_eq!(outcome.accumulator(), 5);
    }

    #[test]
    fn test_run_is_deterministic() {
        let program = boot_code();
        let first = run(&program).unwrap();
        for _ in 0..5 {
            assert_eq!(run(&program).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_program_completes() {
        let outcome = run(&Program::new(vec![])).unwrap();
        assert_eq!(outcome, Outcome::Completed { accumulator: 0 });
    }

    #[test]
    fn test_all_acc_completes() {
        let program = Program::new(vec![
            Instruction::acc(2),
            Instruction::acc(-7),
            Instruction::acc(40),
        ]);
        assert_eq!(run(&program).unwrap(), Outcome::Completed { accumulator: 35 });
    }

    #[test]
    fn test_jump_exactly_to_end_completes() {
        let program = Program::new(vec![
            Instruction::acc(1),
            Instruction::jmp(3),
            Instruction::acc(100),
            Instruction::acc(100),
        ]);
        assert_eq!(run(&program).unwrap(), Outcome::Completed { accumulator: 1 });
    }

    #[test]
    fn test_overshoot_is_out_of_range() {
        let program = Program::new(vec![Instruction::acc(4), Instruction::jmp(5)]);
        let err = run(&program).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProgramCounterOutOfRange);
        assert_eq!(err.operation(), "interpreter::run");
        assert_eq!(err.context_value("from"), Some("1"));
        assert_eq!(err.context_value("accumulator"), Some("4"));
    }

    #[test]
    fn test_negative_target_is_out_of_range() {
        let program = Program::new(vec![Instruction::nop(0), Instruction::jmp(-2)]);
        let err = run(&program).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProgramCounterOutOfRange);
    }

    #[test]
    fn test_accumulator_overflow() {
        let program = Program::new(vec![Instruction::acc(i64::MAX), Instruction::acc(1)]);
        let err = run(&program).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccumulatorOverflow);
        assert_eq!(err.context_value("pc"), Some("1"));
    }

    #[test]
    fn test_self_jump_loops_immediately() {
        let program = Program::new(vec![Instruction::jmp(0)]);
        assert_eq!(
            run(&program).unwrap(),
            Outcome::Looped {
                accumulator: 0,
                program_counter: 0
            }
        );
    }

    #[test]
    fn test_trace_has_no_duplicates_before_loop() {
        let t = trace(&boot_code()).unwrap();
        assert_eq!(t.path, vec![0, 1, 2, 6, 7, 3, 4]);

        let mut seen = std::collections::HashSet::new();
        assert!(t.path.iter().all(|pc| seen.insert(*pc)));

        match t.outcome {
            Outcome::Looped { program_counter, .. } => assert!(seen.contains(&program_counter)),
            Outcome::Completed { .. } => panic!("boot code should loop"),
        }
    }

    #[test]
    fn test_trace_matches_run() {
        let program = boot_code();
        assert_eq!(trace(&program).unwrap().outcome, run(&program).unwrap());
    }
}
