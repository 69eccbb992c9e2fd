//! # Handheld Opcodes
//!
//! The instruction set of the handheld game console: three opcodes, one
//! signed operand each, and a single accumulator register.
//!
//! ## Design
//! - `Opcode` is a closed tag, dispatched with an exhaustive `match`
//! - `Instruction` is a `Copy` value object
//! - `Program` is an immutable, shared instruction list; edits produce a new
//!   `Program` and never touch the original

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Handheld opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    /// Add the operand to the accumulator, then advance by one
    Acc,
    /// Move the program counter by the operand (relative jump)
    Jmp,
    /// Advance by one; the operand is kept but ignored
    Nop,
}

impl Opcode {
    /// Three-letter mnemonic used in the text format
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Acc => "acc",
            Opcode::Jmp => "jmp",
            Opcode::Nop => "nop",
        }
    }

    /// Look up an opcode by its mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "acc" => Some(Opcode::Acc),
            "jmp" => Some(Opcode::Jmp),
            "nop" => Some(Opcode::Nop),
            _ => None,
        }
    }

    /// Jmp and Nop are the only opcodes a repair may swap
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Nop)
    }

    /// The opcode a repair would swap this one for, if any
    pub fn flipped(&self) -> Option<Self> {
        match self {
            Opcode::Jmp => Some(Opcode::Nop),
            Opcode::Nop => Some(Opcode::Jmp),
            Opcode::Acc => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A single instruction: opcode plus signed operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(rename = "op")]
    pub opcode: Opcode,
    #[serde(rename = "arg")]
    pub operand: i64,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: i64) -> Self {
        Self { opcode, operand }
    }

    pub fn acc(operand: i64) -> Self {
        Self::new(Opcode::Acc, operand)
    }

    pub fn jmp(operand: i64) -> Self {
        Self::new(Opcode::Jmp, operand)
    }

    pub fn nop(operand: i64) -> Self {
        Self::new(Opcode::Nop, operand)
    }

    /// The same instruction with Jmp/Nop swapped; `None` for Acc
    pub fn flipped(&self) -> Option<Self> {
        self.opcode
            .flipped()
            .map(|opcode| Self::new(opcode, self.operand))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:+}", self.opcode, self.operand)
    }
}

/// An immutable program. Cloning is cheap; the instruction list is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Instruction>", into = "Vec<Instruction>")]
pub struct Program {
    code: Arc<[Instruction]>,
}

impl Program {
    /// Create a new program
    pub fn new(code: Vec<Instruction>) -> Self {
        Self { code: code.into() }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.code.get(index).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// A new program with `index` replaced by `instruction`.
    ///
    /// Returns `None` when `index` is out of bounds. `self` is left untouched.
    pub fn with_patch(&self, index: usize, instruction: Instruction) -> Option<Self> {
        if index >= self.code.len() {
            return None;
        }
        let mut code = self.code.to_vec();
        code[index] = instruction;
        Some(Self::new(code))
    }

    /// Indices of Jmp/Nop instructions, ascending
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.code
            .iter()
            .enumerate()
            .filter(|(_, instr)| instr.opcode.is_control_flow())
            .map(|(index, _)| index)
    }

    /// Render the program one instruction per line, prefixed by its index
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (i, instr) in self.code.iter().enumerate() {
            out.push_str(&format!("{:4} | {}\n", i, instr));
        }
        out
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(code: Vec<Instruction>) -> Self {
        Self::new(code)
    }
}

impl From<Program> for Vec<Instruction> {
    fn from(program: Program) -> Self {
        program.code.to_vec()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
