//! NAPI exports: one-shot `simulate`, register digests, and a stepwise `CpuSimulator` class.
//! Values cross the boundary as JS numbers (i64); u64 counters are clamped into i64.

use napi::bindgen_prelude::Buffer;
use napi_derive::napi;

use crate::config::DEFAULT_STEP_BUDGET;
use crate::error::SimError;
use crate::machine::Machine;
use crate::types::MachineConfig;

fn to_napi_error(err: SimError) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

fn config_from(step_budget: Option<i64>) -> MachineConfig {
    MachineConfig {
        step_budget: step_budget.map_or(DEFAULT_STEP_BUDGET, |b| b.max(0) as u64),
    }
}

#[napi]
pub fn get_default_step_budget() -> i64 {
    DEFAULT_STEP_BUDGET as i64
}

#[napi]
pub fn simulate(
    registers: Vec<i64>,
    instructions: Vec<String>,
    step_budget: Option<i64>,
) -> napi::Result<Vec<i64>> {
    let machine = Machine::new(&registers, &instructions, config_from(step_budget));
    machine
        .run()
        .map(|outcome| outcome.registers)
        .map_err(to_napi_error)
}

#[napi]
pub fn register_digest(registers: Vec<i64>) -> Buffer {
    crate::crypto::register_digest(&registers).to_vec().into()
}

#[napi]
pub fn register_digest_hex(registers: Vec<i64>) -> String {
    crate::crypto::digest_hex(&crate::crypto::register_digest(&registers))
}

#[napi]
pub struct CpuSimulator {
    machine: Machine,
}

#[napi]
impl CpuSimulator {
    #[napi(constructor)]
    pub fn new(registers: Vec<i64>, instructions: Vec<String>, step_budget: Option<i64>) -> Self {
        Self {
            machine: Machine::new(&registers, &instructions, config_from(step_budget)),
        }
    }

    #[napi]
    pub fn next_step(&mut self) -> napi::Result<bool> {
        self.machine.next_step().map_err(to_napi_error)
    }

    #[napi]
    pub fn n_steps(&mut self, steps: i64) -> napi::Result<bool> {
        self.machine
            .n_steps(steps.max(0) as u64)
            .map_err(to_napi_error)
    }

    /// Run to completion and return the final registers.
    #[napi]
    pub fn run(&mut self) -> napi::Result<Vec<i64>> {
        self.machine.run_until_halt().map_err(to_napi_error)?;
        Ok(self.machine.registers().to_vec())
    }

    #[napi]
    pub fn get_registers(&self) -> Vec<i64> {
        self.machine.registers().to_vec()
    }

    #[napi]
    pub fn get_program_counter(&self) -> i64 {
        self.machine.program_counter()
    }

    #[napi]
    pub fn get_steps(&self) -> i64 {
        i64::try_from(self.machine.steps()).unwrap_or(i64::MAX)
    }

    #[napi]
    pub fn get_status(&self) -> i32 {
        self.machine.status() as i32
    }
}
