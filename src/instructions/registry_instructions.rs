//! Opcode → handler construction and the shared registry.

use std::sync::OnceLock;

use super::arithmetic::{AddInstruction, MulInstruction};
use super::base::InstructionHandler;
use super::branching::{JeqInstruction, JgtInstruction, JltInstruction};
use super::comparison::CmpInstruction;
use super::control_flow::{HaltInstruction, JumpInstruction};
use super::data_movement::MovInstruction;
use super::registry::InstructionRegistry;
use crate::types::Opcode;

/// Handler for each opcode. Exhaustive, so a new opcode does not compile without one.
#[must_use]
pub fn handler_for(opcode: Opcode) -> Box<dyn InstructionHandler> {
    match opcode {
        Opcode::Mov => Box::new(MovInstruction::new()),
        Opcode::Add => Box::new(AddInstruction::new()),
        Opcode::Mul => Box::new(MulInstruction::new()),
        Opcode::Cmp => Box::new(CmpInstruction::new()),
        Opcode::Jmp => Box::new(JumpInstruction::new()),
        Opcode::Jeq => Box::new(JeqInstruction::new()),
        Opcode::Jgt => Box::new(JgtInstruction::new()),
        Opcode::Jlt => Box::new(JltInstruction::new()),
        Opcode::Halt => Box::new(HaltInstruction::new()),
    }
}

/// Process-wide registry. Handlers are stateless, so sharing it between runs is safe.
pub fn get_registry() -> &'static InstructionRegistry {
    static REGISTRY: OnceLock<InstructionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(InstructionRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_has_matching_handler() {
        let registry = get_registry();
        for opcode in Opcode::ALL {
            let handler = registry.get_handler(opcode);
            assert_eq!(handler.opcode(), opcode);
            assert_eq!(handler.name(), opcode.mnemonic());
        }
    }

    #[test]
    fn fresh_registry_covers_every_opcode() {
        let registry = InstructionRegistry::default();
        for opcode in Opcode::ALL {
            assert_eq!(registry.get_handler(opcode).opcode(), opcode);
        }
    }

    #[test]
    fn disassemble_and_validate() {
        use crate::operand::Operand;
        let add = handler_for(Opcode::Add);
        let ops = [Operand::RegisterPointer(0), Operand::Immediate(3)];
        assert!(add.validate(&ops));
        assert!(!add.validate(&ops[..1]));
        assert_eq!(add.disassemble(&ops), "ADD P0, V3");
        assert_eq!(handler_for(Opcode::Halt).disassemble(&[]), "HALT");
    }
}
