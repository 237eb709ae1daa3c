//! Instruction registry: dense opcode → handler table.

use crate::instructions::base::InstructionHandler;
use crate::instructions::registry_instructions::handler_for;
use crate::types::Opcode;

/// One handler per opcode, indexed by `Opcode::index`. Every opcode is
/// populated at construction, so lookups cannot miss.
pub struct InstructionRegistry {
    handlers: [Box<dyn InstructionHandler>; Opcode::COUNT],
}

impl InstructionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Opcode::ALL.map(handler_for),
        }
    }

    #[must_use]
    pub fn get_handler(&self, opcode: Opcode) -> &dyn InstructionHandler {
        self.handlers[opcode.index()].as_ref()
    }
}

impl Default for InstructionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
