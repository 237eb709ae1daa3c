//! Register-file CPU simulator.
//!
//! Executes a small instruction set (`MOV ADD MUL CMP JMP JEQ JGT JLT HALT`) over
//! a fixed-length vector of signed 64-bit registers. Operands use three
//! addressing modes: `V<n>` immediate, `R<n>` register, `P<n>` pointer
//! (`registers[registers[n]]`). `CMP` sets a tri-state flag read by the
//! conditional jumps.
//!
//! A run ends without error on `HALT`, when the program counter leaves the
//! program, or when the step budget is spent. Malformed instructions and
//! out-of-range register accesses abort the run with a [`SimError`].
//!
//! Arithmetic wraps on 64-bit overflow.
//!
//! ```
//! let regs = cpu_sim_rust::simulate(&[5, 10, 0], &["ADD R2, R0", "ADD R2, R1", "HALT"], 100).unwrap();
//! assert_eq!(regs, vec![5, 10, 15]);
//! ```
//!
//! The Node binding (`simulate`, `registerDigest`, `CpuSimulator`) is built with `--features napi`.

/// Compile-time removable per-step tracing. No-op unless built with `--features step_logging`.
#[macro_export]
macro_rules! step_log {
    ($($t:tt)*) => {
        #[cfg(feature = "step_logging")]
        tracing::trace!($($t)*);
    };
}

pub mod config;
pub mod crypto;
pub mod error;
pub mod instructions;
pub mod machine;
pub mod operand;
pub mod parser;
pub mod types;

#[cfg(feature = "napi")]
mod bindings;

pub use crate::config::DEFAULT_STEP_BUDGET;
pub use crate::crypto::register_digest;
pub use crate::error::{ErrorKind, Result, SimError};
pub use crate::machine::{Machine, RunOutcome};
pub use crate::operand::Operand;
pub use crate::types::{
    ComparisonFlag, Instruction, MachineConfig, Opcode, RegisterFile, Status, TerminationReason,
};

/// Run `instructions` against a copy of `initial_registers` and return the final registers.
///
/// The result has the same length as `initial_registers`. Running off either end
/// of the program or exhausting `step_budget` is a normal end; decode and
/// register-range failures are returned as errors.
pub fn simulate<S: AsRef<str>>(
    initial_registers: &[i64],
    instructions: &[S],
    step_budget: u64,
) -> Result<Vec<i64>> {
    let machine = Machine::new(initial_registers, instructions, MachineConfig { step_budget });
    machine.run().map(|outcome| outcome.registers)
}

/// [`simulate`] with [`DEFAULT_STEP_BUDGET`].
pub fn simulate_default<S: AsRef<str>>(initial_registers: &[i64], instructions: &[S]) -> Result<Vec<i64>> {
    simulate(initial_registers, instructions, DEFAULT_STEP_BUDGET)
}
