//! Conditional jumps (JEQ, JGT, JLT), taken on the current comparison flag.

use crate::error::Result;
use crate::instructions::base::{parse_target, InstructionContext, InstructionHandler};
use crate::types::{ComparisonFlag, InstructionResult, Opcode};

/// When the flag matches, resolve the target and jump; otherwise fall through.
/// The target operand is still decoded when not taken but never dereferenced.
fn do_branch(
    context: &mut InstructionContext<'_>,
    opcode: Opcode,
    taken_on: ComparisonFlag,
) -> Result<InstructionResult> {
    let parsed = parse_target(opcode, context.operands)?;
    if *context.flag != taken_on {
        return Ok(InstructionResult::Continue);
    }
    let target = parsed.target.resolve_read(context.registers)?;
    Ok(InstructionResult::Jump(target))
}

macro_rules! branch_instruction {
    ($name:ident, $opcode:expr, $taken_on:expr) => {
        pub struct $name;

        impl $name {
            #[must_use]
            pub const fn new() -> Self {
                Self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl InstructionHandler for $name {
            fn opcode(&self) -> Opcode {
                $opcode
            }
            fn execute(&self, context: &mut InstructionContext<'_>) -> Result<InstructionResult> {
                do_branch(context, $opcode, $taken_on)
            }
        }
    };
}

branch_instruction!(JeqInstruction, Opcode::Jeq, ComparisonFlag::Equal);
branch_instruction!(JgtInstruction, Opcode::Jgt, ComparisonFlag::GreaterThan);
branch_instruction!(JltInstruction, Opcode::Jlt, ComparisonFlag::LessThan);
