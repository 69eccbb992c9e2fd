//! # Handheld VM
//!
//! Interpreter for the handheld game console's boot code.
//!
//! ## Core Concepts
//! - **Instructions**: `acc`, `jmp` and `nop`, each with one signed operand
//! - **Interpreter**: runs until the program counter lands one past the end
//!   (`Completed`) or is about to revisit a position (`Looped`)
//! - **Repair**: finds the single `jmp`/`nop` flip that makes a looping
//!   program complete
//! - **Loader**: reads programs from the line-oriented text format or JSON

pub mod opcode;
pub mod error;
pub mod loader;
pub mod interpreter;
pub mod repair;

pub use opcode::{Instruction, Opcode, Program};
pub use error::{Error, ErrorKind, Result};
pub use loader::{load_file, load_json, parse_program, InputFormat};
pub use interpreter::{run, trace, Outcome, Trace};
pub use repair::{repair, repair_parallel, Repair, RepairStrategy};
