//! Simulator type definitions: register file, opcodes, flag, execution context.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::config::{
    DEFAULT_STEP_BUDGET, MNEMONIC_ADD, MNEMONIC_CMP, MNEMONIC_HALT, MNEMONIC_JEQ, MNEMONIC_JGT,
    MNEMONIC_JLT, MNEMONIC_JMP, MNEMONIC_MOV, MNEMONIC_MUL, STATUS_ERROR, STATUS_HALTED,
    STATUS_RUNNING,
};
use crate::error::{Result, SimError};
use crate::operand::Operand;

// ============================================================================
// Register file
// ============================================================================

/// Fixed-length signed register vector. Length is set at construction and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    values: Vec<i64>,
}

impl RegisterFile {
    #[must_use]
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bounds-checked slot lookup. Indices are signed so a negative register value
    /// used as a pointer is reported as-is.
    fn slot(&self, index: i64) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.values.len())
            .ok_or(SimError::RegisterOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    pub fn read(&self, index: i64) -> Result<i64> {
        let slot = self.slot(index)?;
        Ok(self.values[slot])
    }

    pub fn write(&mut self, index: i64, value: i64) -> Result<()> {
        let slot = self.slot(index)?;
        self.values[slot] = value;
        Ok(())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<i64> {
        self.values
    }
}

impl From<Vec<i64>> for RegisterFile {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}

impl From<&[i64]> for RegisterFile {
    fn from(values: &[i64]) -> Self {
        Self::new(values.to_vec())
    }
}

// ============================================================================
// Opcodes
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Mov,
    Add,
    Mul,
    Cmp,
    Jmp,
    Jeq,
    Jgt,
    Jlt,
    Halt,
}

impl Opcode {
    pub const COUNT: usize = 9;

    /// Every opcode, in discriminant order.
    pub const ALL: [Opcode; Self::COUNT] = [
        Opcode::Mov,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Cmp,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jgt,
        Opcode::Jlt,
        Opcode::Halt,
    ];

    /// Dense index into per-opcode tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Mov => MNEMONIC_MOV,
            Opcode::Add => MNEMONIC_ADD,
            Opcode::Mul => MNEMONIC_MUL,
            Opcode::Cmp => MNEMONIC_CMP,
            Opcode::Jmp => MNEMONIC_JMP,
            Opcode::Jeq => MNEMONIC_JEQ,
            Opcode::Jgt => MNEMONIC_JGT,
            Opcode::Jlt => MNEMONIC_JLT,
            Opcode::Halt => MNEMONIC_HALT,
        }
    }

    /// Number of operand tokens the opcode takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Halt => 0,
            Opcode::Jmp | Opcode::Jeq | Opcode::Jgt | Opcode::Jlt => 1,
            Opcode::Mov | Opcode::Add | Opcode::Mul | Opcode::Cmp => 2,
        }
    }
}

impl FromStr for Opcode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| SimError::UnknownOpcode {
                mnemonic: s.to_string(),
            })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

// ============================================================================
// Decoded instruction
// ============================================================================

/// Decoded instruction. Arity is checked on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Result<Self> {
        if operands.len() != opcode.arity() {
            return Err(SimError::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                found: operands.len(),
            });
        }
        Ok(Self { opcode, operands })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Comparison flag
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComparisonFlag {
    LessThan,
    #[default]
    Equal,
    GreaterThan,
}

impl From<Ordering> for ComparisonFlag {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => ComparisonFlag::LessThan,
            Ordering::Equal => ComparisonFlag::Equal,
            Ordering::Greater => ComparisonFlag::GreaterThan,
        }
    }
}

// ============================================================================
// Instruction execution result
// ============================================================================

/// What the dispatcher asks the control-flow engine to do after one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionResult {
    /// Fall through to pc + 1.
    Continue,
    /// Taken jump; the target is applied verbatim.
    Jump(i64),
    Halt,
}

// ============================================================================
// Status / termination
// ============================================================================

#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running = STATUS_RUNNING,
    Halted = STATUS_HALTED,
    Error = STATUS_ERROR,
}

/// Why a run reached the halted state. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// A HALT instruction executed.
    Halted,
    /// pc left `[0, instruction_count)`, by fallthrough or by a jump.
    PcOutOfRange,
    StepBudgetExhausted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::Halted => "halt",
            TerminationReason::PcOutOfRange => "pc out of range",
            TerminationReason::StepBudgetExhausted => "step budget exhausted",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Machine configuration
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub step_budget: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

// ============================================================================
// Execution context
// ============================================================================

/// Sole mutable state of one run. Owned by a single machine, never shared.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    pub registers: RegisterFile,
    pub program_counter: i64,
    pub flag: ComparisonFlag,
    pub steps: u64,
    pub step_budget: u64,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(registers: RegisterFile, step_budget: u64) -> Self {
        Self {
            registers,
            program_counter: 0,
            flag: ComparisonFlag::Equal,
            steps: 0,
            step_budget,
        }
    }

    #[must_use]
    pub fn budget_exhausted(&self) -> bool {
        self.steps >= self.step_budget
    }
}
