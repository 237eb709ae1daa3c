//! Simulator configuration constants.
//! Step budget defaults, operand grammar, mnemonics and status codes.

// ============================================================================
// Step Budget Configuration
// ============================================================================
pub const DEFAULT_STEP_BUDGET: u64 = 500_000;

// ============================================================================
// Operand Grammar
// ============================================================================
/// `V<digits>`: literal value.
pub const MODE_IMMEDIATE: u8 = b'V';
/// `R<digits>`: registers[idx].
pub const MODE_REGISTER: u8 = b'R';
/// `P<digits>`: registers[registers[idx]].
pub const MODE_POINTER: u8 = b'P';

/// Token separator; runs of commas and whitespace both split tokens.
pub const OPERAND_SEPARATOR: char = ',';

// ============================================================================
// Mnemonics
// ============================================================================
pub const MNEMONIC_MOV: &str = "MOV";
pub const MNEMONIC_ADD: &str = "ADD";
pub const MNEMONIC_MUL: &str = "MUL";
pub const MNEMONIC_CMP: &str = "CMP";
pub const MNEMONIC_JMP: &str = "JMP";
pub const MNEMONIC_JEQ: &str = "JEQ";
pub const MNEMONIC_JGT: &str = "JGT";
pub const MNEMONIC_JLT: &str = "JLT";
pub const MNEMONIC_HALT: &str = "HALT";

// ============================================================================
// Status Codes
// ============================================================================
pub const STATUS_RUNNING: i32 = 0;
pub const STATUS_HALTED: i32 = 1;
pub const STATUS_ERROR: i32 = 2;
