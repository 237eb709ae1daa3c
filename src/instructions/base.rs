//! Base instruction handler trait and operand helpers.

use crate::error::{Result, SimError};
use crate::operand::Operand;
use crate::types::{ComparisonFlag, InstructionResult, Opcode, RegisterFile};

/// Per-instruction view of the execution context.
///
/// Handlers see the register file, the comparison flag and their own operands;
/// program counter movement stays with the control-flow engine.
pub struct InstructionContext<'a> {
    pub registers: &'a mut RegisterFile,
    pub flag: &'a mut ComparisonFlag,
    pub operands: &'a [Operand],
}

/// Result of parsing a destination and a source operand (MOV, ADD, MUL).
#[derive(Clone, Copy, Debug)]
pub struct TwoOperandsResult {
    pub dst: Operand,
    pub src: Operand,
}

/// Result of parsing a single jump target operand.
#[derive(Clone, Copy, Debug)]
pub struct TargetOnlyResult {
    pub target: Operand,
}

/// Fixed-size operand view; the parser already checked arity, this guards direct callers.
pub fn expect_operands<const N: usize>(opcode: Opcode, operands: &[Operand]) -> Result<[Operand; N]> {
    <[Operand; N]>::try_from(operands).map_err(|_| SimError::ArityMismatch {
        opcode,
        expected: N,
        found: operands.len(),
    })
}

pub fn parse_two_operands(opcode: Opcode, operands: &[Operand]) -> Result<TwoOperandsResult> {
    let [dst, src] = expect_operands::<2>(opcode, operands)?;
    Ok(TwoOperandsResult { dst, src })
}

pub fn parse_target(opcode: Opcode, operands: &[Operand]) -> Result<TargetOnlyResult> {
    let [target] = expect_operands::<1>(opcode, operands)?;
    Ok(TargetOnlyResult { target })
}

pub trait InstructionHandler: Send + Sync {
    fn opcode(&self) -> Opcode;

    fn name(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Execute the instruction against the context.
    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult>;

    fn validate(&self, operands: &[Operand]) -> bool {
        operands.len() == self.opcode().arity()
    }

    fn disassemble(&self, operands: &[Operand]) -> String {
        let rendered: Vec<String> = operands.iter().map(ToString::to_string).collect();
        if rendered.is_empty() {
            self.name().to_string()
        } else {
            format!("{} {}", self.name(), rendered.join(", "))
        }
    }
}
