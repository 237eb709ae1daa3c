//! Arithmetic instructions (ADD, MUL).
//! dst = dst <op> src, 64-bit two's-complement wrapping.

use crate::error::Result;
use crate::instructions::base::{parse_two_operands, InstructionContext, InstructionHandler};
use crate::types::{InstructionResult, Opcode};

/// Read both sides, then write back through the destination operand.
/// The destination is resolved twice, so a pointer destination is re-dereferenced on write.
fn read_modify_write(
    context: &mut InstructionContext<'_>,
    opcode: Opcode,
    op: fn(i64, i64) -> i64,
) -> Result<InstructionResult> {
    let parsed = parse_two_operands(opcode, context.operands)?;
    let lhs = parsed.dst.resolve_read(context.registers)?;
    let rhs = parsed.src.resolve_read(context.registers)?;
    parsed.dst.resolve_write(context.registers, op(lhs, rhs))?;
    Ok(InstructionResult::Continue)
}

macro_rules! arithmetic_instruction {
    ($name:ident, $opcode:expr, $op:expr) => {
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
                read_modify_write(context, $opcode, $op)
            }
        }
    };
}

arithmetic_instruction!(AddInstruction, Opcode::Add, i64::wrapping_add);
arithmetic_instruction!(MulInstruction, Opcode::Mul, i64::wrapping_mul);
