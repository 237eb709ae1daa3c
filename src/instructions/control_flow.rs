//! Control flow instructions (JMP, HALT).

use crate::error::Result;
use crate::instructions::base::{expect_operands, parse_target, InstructionContext, InstructionHandler};
use crate::types::{InstructionResult, Opcode};

/// JMP target: unconditional jump to read(target).
/// The target is not range-checked here; an out-of-range pc ends the run on the next fetch.
pub struct JumpInstruction;

impl JumpInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for JumpInstruction {
    fn opcode(&self) -> Opcode {
        Opcode::Jmp
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult> {
        let parsed = parse_target(Opcode::Jmp, context.operands)?;
        let target = parsed.target.resolve_read(context.registers)?;
        Ok(InstructionResult::Jump(target))
    }
}

impl Default for JumpInstruction {
    fn default() -> Self {
        Self::new()
    }
}

/// HALT: stop with success. No register or flag effect.
pub struct HaltInstruction;

impl HaltInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for HaltInstruction {
    fn opcode(&self) -> Opcode {
        Opcode::Halt
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult> {
        let [] = expect_operands::<0>(Opcode::Halt, context.operands)?;
        Ok(InstructionResult::Halt)
    }
}

impl Default for HaltInstruction {
    fn default() -> Self {
        Self::new()
    }
}
