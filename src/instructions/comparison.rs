//! Comparison (CMP). The only writer of the comparison flag.

use crate::error::Result;
use crate::instructions::base::{expect_operands, InstructionContext, InstructionHandler};
use crate::types::{ComparisonFlag, InstructionResult, Opcode};

/// CMP op1, op2: flag = ordering of read(op1) against read(op2).
pub struct CmpInstruction;

impl CmpInstruction {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionHandler for CmpInstruction {
    fn opcode(&self) -> Opcode {
        Opcode::Cmp
    }

    fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult> {
        let [op1, op2] = expect_operands::<2>(Opcode::Cmp, context.operands)?;
        let a = op1.resolve_read(context.registers)?;
        let b = op2.resolve_read(context.registers)?;
        *context.flag = ComparisonFlag::from(a.cmp(&b));
        Ok(InstructionResult::Continue)
    }
}

impl Default for CmpInstruction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::Operand;
    use crate::types::RegisterFile;

    fn compare(registers: &[i64], op1: Operand, op2: Operand, start: ComparisonFlag) -> Result<ComparisonFlag> {
        let mut regs = RegisterFile::from(registers);
        let mut flag = start;
        let operands = [op1, op2];
        let mut context = InstructionContext {
            registers: &mut regs,
            flag: &mut flag,
            operands: &operands,
        };
        CmpInstruction::new().execute(&mut context)?;
        Ok(flag)
    }

    #[test]
    fn sets_each_state() {
        let r = [1, 50, 90];
        let lt = compare(&r, Operand::RegisterDirect(0), Operand::RegisterDirect(1), ComparisonFlag::Equal);
        let gt = compare(&r, Operand::RegisterDirect(2), Operand::Immediate(89), ComparisonFlag::Equal);
        let eq = compare(&r, Operand::RegisterPointer(0), Operand::Immediate(50), ComparisonFlag::LessThan);
        assert_eq!(lt, Ok(ComparisonFlag::LessThan));
        assert_eq!(gt, Ok(ComparisonFlag::GreaterThan));
        assert_eq!(eq, Ok(ComparisonFlag::Equal));
    }

    #[test]
    fn negative_values_compare_signed() {
        let flag = compare(&[-5, 3], Operand::RegisterDirect(0), Operand::RegisterDirect(1), ComparisonFlag::Equal);
        assert_eq!(flag, Ok(ComparisonFlag::LessThan));
    }

    #[test]
    fn out_of_range_leaves_flag_alone() {
        let mut regs = RegisterFile::new(vec![0]);
        let mut flag = ComparisonFlag::GreaterThan;
        let operands = [Operand::RegisterDirect(0), Operand::RegisterDirect(4)];
        let mut context = InstructionContext {
            registers: &mut regs,
            flag: &mut flag,
            operands: &operands,
        };
        assert!(CmpInstruction::new().execute(&mut context).is_err());
        assert_eq!(flag, ComparisonFlag::GreaterThan);
    }
}
