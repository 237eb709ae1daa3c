//! Simulation errors.
//!
//! Every malformed-program condition is surfaced to the caller and aborts the
//! run. Leaving the instruction range and exhausting the step budget are normal
//! terminations and never appear here.

use thiserror::Error;

use crate::types::Opcode;

/// Simulator result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// The five base failure kinds, independent of where they were raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidOperandFormat,
    UnknownOpcode,
    ArityMismatch,
    RegisterOutOfRange,
    InvalidWriteTarget,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// Operand token is not a mode letter (`V`, `R`, `P`) followed by decimal digits.
    #[error("invalid operand format: {token:?}")]
    InvalidOperandFormat { token: String },

    #[error("unknown opcode: {mnemonic:?}")]
    UnknownOpcode { mnemonic: String },

    #[error("{opcode} expects {expected} operand(s), found {found}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// Direct index, or either hop of a pointer dereference, outside `[0, len)`.
    #[error("register index {index} out of range for {len} register(s)")]
    RegisterOutOfRange { index: i64, len: usize },

    #[error("immediate operand {operand} cannot be written to")]
    InvalidWriteTarget { operand: String },

    /// Any of the above, located at the instruction index that raised it.
    #[error("instruction {index}: {source}")]
    AtInstruction {
        index: usize,
        #[source]
        source: Box<SimError>,
    },
}

impl SimError {
    /// Underlying kind, looking through instruction location wrappers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOperandFormat { .. } => ErrorKind::InvalidOperandFormat,
            Self::UnknownOpcode { .. } => ErrorKind::UnknownOpcode,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::RegisterOutOfRange { .. } => ErrorKind::RegisterOutOfRange,
            Self::InvalidWriteTarget { .. } => ErrorKind::InvalidWriteTarget,
            Self::AtInstruction { source, .. } => source.kind(),
        }
    }

    /// Attach the index of the instruction being executed.
    #[must_use]
    pub fn at_instruction(self, index: usize) -> Self {
        match self {
            located @ Self::AtInstruction { .. } => located,
            other => Self::AtInstruction {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Index of the failing instruction, if known.
    #[must_use]
    pub fn instruction_index(&self) -> Option<usize> {
        match self {
            Self::AtInstruction { index, .. } => Some(*index),
            _ => None,
        }
    }
}
