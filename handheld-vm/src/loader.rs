//! # Program Loader
//!
//! Turns boot code into a [`Program`]. Two input formats are understood:
//!
//! - **Text**: one `<mnemonic> <signed-int>` per line, e.g. `jmp -4`
//! - **Json**: an array of `{ "op": "jmp", "arg": -4 }` objects

use crate::error::{self, Error, Result};
use crate::opcode::{Instruction, Opcode, Program};
use std::path::Path;
use std::str::FromStr;

/// Input format for [`load_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    Text,
    Json,
    /// Json for `.json` files, Text otherwise
    #[default]
    Auto,
}

impl InputFormat {
    fn resolve(self, path: &Path) -> Self {
        match self {
            InputFormat::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json {
                    InputFormat::Json
                } else {
                    InputFormat::Text
                }
            }
            other => other,
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            "auto" => Ok(InputFormat::Auto),
            other => Err(Error::config_invalid(format!("unknown input format '{}'", other))
                .with_context("format", other)),
        }
    }
}

impl FromStr for Instruction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();

        let mnemonic = tokens
            .next()
            .ok_or_else(|| Error::parse_failed("empty instruction"))?;
        let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| Error::invalid_opcode(mnemonic))?;

        let operand = tokens
            .next()
            .ok_or_else(|| Error::invalid_operand("").with_context("reason", "missing"))?;
        let operand = operand
            .parse::<i64>()
            .map_err(|e| Error::invalid_operand(operand).set_source(e))?;

        if let Some(extra) = tokens.next() {
            return Err(Error::parse_failed(format!("unexpected token '{}'", extra)));
        }

        Ok(Instruction::new(opcode, operand))
    }
}

/// Parse the text format. Blank lines are skipped.
pub fn parse_program(source: &str) -> Result<Program> {
    let mut code = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let instr = line.parse::<Instruction>().map_err(|e| {
            e.with_operation("loader::parse_program")
                .with_context("line", (i + 1).to_string())
                .with_context("text", line)
        })?;
        code.push(instr);
    }
    Ok(Program::new(code))
}

/// Parse the JSON format
pub fn load_json(source: &str) -> Result<Program> {
    serde_json::from_str(source)
        .map_err(|e| error::serialization_error(e).with_operation("loader::load_json"))
}

/// Read and parse a program file
pub fn load_file(path: impl AsRef<Path>, format: InputFormat) -> Result<Program> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context("path", shown.clone()))?;

    let program = match format.resolve(path) {
        InputFormat::Json => load_json(&source),
        _ => parse_program(&source),
    }
    .map_err(|e| e.with_operation("loader::load_file").with_context("path", shown.clone()))?;

    tracing::debug!(path = %shown, instructions = program.len(), "loaded program");
    Ok(program)
}
