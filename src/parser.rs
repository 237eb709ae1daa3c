//! Program parser: tokenizes instruction lines into decoded instructions.
//!
//! A line is `OPCODE operand_list`; operands are separated by any mix of commas
//! and whitespace. Blank lines decode to `None` and execute as no-ops.

use crate::config::OPERAND_SEPARATOR;
use crate::error::{Result, SimError};
use crate::operand::Operand;
use crate::types::{Instruction, Opcode};

/// One program slot: decoded eagerly, surfaced lazily.
///
/// A decode failure is kept in its slot and only reported if the control-flow
/// engine actually fetches that instruction.
pub type DecodedSlot = Result<Option<Instruction>>;

/// Result of parsing a whole program.
#[derive(Clone, Debug)]
pub struct ParseResult {
    pub slots: Vec<DecodedSlot>,
}

impl ParseResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First decode error and the index of its slot, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<(usize, &SimError)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(i, slot)| slot.as_ref().err().map(|e| (i, e)))
    }

    /// Strict view: every line must decode.
    pub fn into_instructions(self) -> Result<Vec<Option<Instruction>>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.map_err(|e| e.at_instruction(i)))
            .collect()
    }
}

pub struct ProgramParser;

impl ProgramParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Split a line into opcode and operand tokens. Empty for blank lines.
    #[must_use]
    pub fn tokenize(line: &str) -> Vec<&str> {
        line.split(|c: char| c == OPERAND_SEPARATOR || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Decode one line. `Ok(None)` only for empty or whitespace-only text;
    /// separator-only text such as `","` has no opcode and is rejected.
    pub fn parse_line(&self, line: &str) -> DecodedSlot {
        if line.trim().is_empty() {
            return Ok(None);
        }
        let tokens = Self::tokenize(line);
        let Some((mnemonic, operand_tokens)) = tokens.split_first() else {
            return Err(SimError::UnknownOpcode {
                mnemonic: line.trim().to_string(),
            });
        };
        let opcode: Opcode = mnemonic.parse()?;
        if operand_tokens.len() != opcode.arity() {
            return Err(SimError::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                found: operand_tokens.len(),
            });
        }
        let operands = operand_tokens
            .iter()
            .map(|t| Operand::parse(t))
            .collect::<Result<Vec<_>>>()?;
        Instruction::new(opcode, operands).map(Some)
    }

    #[must_use]
    pub fn parse_program<S: AsRef<str>>(&self, lines: &[S]) -> ParseResult {
        ParseResult {
            slots: lines.iter().map(|l| self.parse_line(l.as_ref())).collect(),
        }
    }
}

impl Default for ProgramParser {
    fn default() -> Self {
        Self::new()
    }
}
