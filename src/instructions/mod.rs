//! Instruction set: one stateless handler per opcode, looked up through the registry.

pub mod registry;
pub mod base;
pub mod control_flow;
pub mod data_movement;
pub mod arithmetic;
pub mod comparison;
pub mod branching;
pub mod registry_instructions;
