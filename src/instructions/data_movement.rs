//! Data movement (MOV).

use crate::instructions::base::{parse_two_operands, InstructionContext, InstructionHandler};
use crate::error::Result;
use crate::types::{InstructionResult, Opcode};

/// MOV dst, src: write(dst, read(src)).
pub struct MovInstruction;

impl MovInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for MovInstruction {
    fn opcode(&self) -> Opcode {
        Opcode::Mov
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult> {
        let parsed = parse_two_operands(Opcode::Mov, context.operands)?;
        let value = parsed.src.resolve_read(context.registers)?;
        parsed.dst.resolve_write(context.registers, value)?;
        Ok(InstructionResult::Continue)
    }
}

impl Default for MovInstruction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::operand::Operand;
    use crate::types::{ComparisonFlag, RegisterFile};

    fn run(registers: &mut RegisterFile, operands: &[Operand]) -> Result<InstructionResult> {
        let mut flag = ComparisonFlag::default();
        let mut context = InstructionContext {
            registers,
            flag: &mut flag,
            operands,
        };
        MovInstruction::new().execute(&mut context)
    }

    #[test]
    fn mov_pointer_destination() {
        let mut regs = RegisterFile::new(vec![1, 2, 0]);
        let result = run(&mut regs, &[Operand::RegisterPointer(1), Operand::Immediate(88)]);
        assert_eq!(result, Ok(InstructionResult::Continue));
        assert_eq!(regs.as_slice(), &[1, 2, 88]);
    }

    #[test]
    fn mov_pointer_source() {
        let mut regs = RegisterFile::new(vec![2, 0, 7]);
        run(&mut regs, &[Operand::RegisterDirect(1), Operand::RegisterPointer(0)]).unwrap();
        assert_eq!(regs.as_slice(), &[2, 7, 7]);
    }

    #[test]
    fn mov_into_immediate_fails_without_side_effects() {
        let mut regs = RegisterFile::new(vec![4]);
        let err = run(&mut regs, &[Operand::Immediate(0), Operand::RegisterDirect(0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWriteTarget);
        assert_eq!(regs.as_slice(), &[4]);
    }
}
