//! Control-flow engine: fetch/execute loop over a decoded program.
//!
//! Each step:
//!
//! 1. pc outside `[0, len)` or `steps == step_budget` → halted (not an error)
//! 2. `steps += 1`
//! 3. blank slot → `pc += 1`
//! 4. dispatch; `HALT` → halted with pc unchanged
//! 5. taken jump → `pc = target` verbatim
//! 6. otherwise `pc += 1`
//!
//! Any decode or resolve error aborts the run and is returned to the caller.

use tracing::{debug, instrument, warn};

use crate::error::{Result, SimError};
use crate::instructions::base::InstructionContext;
use crate::instructions::registry_instructions::get_registry;
use crate::parser::{DecodedSlot, ProgramParser};
use crate::types::{
    ComparisonFlag, ExecutionContext, Instruction, InstructionResult, MachineConfig, RegisterFile,
    Status, TerminationReason,
};

/// Final state of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub registers: Vec<i64>,
    pub steps: u64,
    pub reason: TerminationReason,
}

/// One simulation run. Owns its context exclusively.
#[derive(Debug)]
pub struct Machine {
    context: ExecutionContext,
    program: Vec<DecodedSlot>,
    status: Status,
    termination: Option<TerminationReason>,
    failure: Option<SimError>,
}

impl Machine {
    /// Build a machine from instruction text. Decode errors surface only when
    /// the failing instruction is fetched.
    #[must_use]
    pub fn new<S: AsRef<str>>(registers: &[i64], instructions: &[S], config: MachineConfig) -> Self {
        let parsed = ProgramParser::new().parse_program(instructions);
        Self::from_slots(RegisterFile::from(registers), parsed.slots, config)
    }

    /// Build a machine from already-decoded instructions (`None` = blank slot).
    #[must_use]
    pub fn from_instructions(
        registers: &[i64],
        instructions: Vec<Option<Instruction>>,
        config: MachineConfig,
    ) -> Self {
        let slots = instructions.into_iter().map(Ok).collect();
        Self::from_slots(RegisterFile::from(registers), slots, config)
    }

    fn from_slots(registers: RegisterFile, program: Vec<DecodedSlot>, config: MachineConfig) -> Self {
        Self {
            context: ExecutionContext::new(registers, config.step_budget),
            program,
            status: Status::Running,
            termination: None,
            failure: None,
        }
    }

    #[must_use]
    pub fn registers(&self) -> &[i64] {
        self.context.registers.as_slice()
    }

    #[must_use]
    pub fn program_counter(&self) -> i64 {
        self.context.program_counter
    }

    #[must_use]
    pub fn flag(&self) -> ComparisonFlag {
        self.context.flag
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.context.steps
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Why the machine halted, once it has.
    #[must_use]
    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.program.len()
    }

    /// Current pc as a program index, if it is inside the program.
    fn fetch_index(&self) -> Option<usize> {
        usize::try_from(self.context.program_counter)
            .ok()
            .filter(|&i| i < self.program.len())
    }

    fn halt(&mut self, reason: TerminationReason) {
        self.status = Status::Halted;
        self.termination = Some(reason);
        debug!(
            %reason,
            steps = self.context.steps,
            pc = self.context.program_counter,
            "machine halted"
        );
    }

    /// Execute one step. Returns `Ok(true)` while running, `Ok(false)` once halted.
    /// After a failure every further call returns the same error.
    pub fn next_step(&mut self) -> Result<bool> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.status == Status::Halted {
            return Ok(false);
        }
        let Some(index) = self.fetch_index() else {
            self.halt(TerminationReason::PcOutOfRange);
            return Ok(false);
        };
        if self.context.budget_exhausted() {
            self.halt(TerminationReason::StepBudgetExhausted);
            return Ok(false);
        }
        self.context.steps += 1;

        match self.execute_at(index) {
            Ok(InstructionResult::Halt) => {
                self.halt(TerminationReason::Halted);
                Ok(false)
            }
            Ok(InstructionResult::Jump(target)) => {
                self.context.program_counter = target;
                Ok(true)
            }
            Ok(InstructionResult::Continue) => {
                self.context.program_counter += 1;
                Ok(true)
            }
            Err(err) => {
                self.status = Status::Error;
                let err = err.at_instruction(index);
                warn!(error = %err, steps = self.context.steps, "run aborted");
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn execute_at(&mut self, index: usize) -> Result<InstructionResult> {
        let instruction = match &self.program[index] {
            Ok(Some(instruction)) => instruction,
            Ok(None) => {
                step_log!(pc = index, steps = self.context.steps, "blank");
                return Ok(InstructionResult::Continue);
            }
            Err(err) => return Err(err.clone()),
        };
        step_log!(pc = index, steps = self.context.steps, instruction = %instruction, "execute");

        let handler = get_registry().get_handler(instruction.opcode);
        let mut context = InstructionContext {
            registers: &mut self.context.registers,
            flag: &mut self.context.flag,
            operands: &instruction.operands,
        };
        handler.execute(&mut context)
    }

    /// Run up to `n` steps. Returns whether the machine is still running.
    pub fn n_steps(&mut self, n: u64) -> Result<bool> {
        for _ in 0..n {
            if !self.next_step()? {
                return Ok(false);
            }
        }
        Ok(self.status == Status::Running)
    }

    /// Step until halted, keeping the machine for inspection.
    #[instrument(skip_all, fields(
        registers = self.context.registers.len(),
        instructions = self.program.len(),
        step_budget = self.context.step_budget,
    ))]
    pub fn run_until_halt(&mut self) -> Result<TerminationReason> {
        debug!(steps = self.context.steps, "run start");
        loop {
            if let Some(reason) = self.termination {
                return Ok(reason);
            }
            self.next_step()?;
        }
    }

    /// Run to a terminal state and hand back the final registers.
    pub fn run(mut self) -> Result<RunOutcome> {
        let reason = self.run_until_halt()?;
        Ok(RunOutcome {
            registers: self.context.registers.into_vec(),
            steps: self.context.steps,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn machine(registers: &[i64], program: &[&str], budget: u64) -> Machine {
        Machine::new(registers, program, MachineConfig { step_budget: budget })
    }

    #[test]
    fn machine_can_move_between_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<Machine>();
        let m = machine(&[1], &["MUL R0, V4"], 10);
        let outcome = std::thread::spawn(move || m.run()).join().unwrap().unwrap();
        assert_eq!(outcome.registers, vec![4]);
    }

    #[test]
    fn halt_keeps_pc() {
        let mut m = machine(&[0], &["ADD R0, V1", "HALT", "ADD R0, V1"], 100);
        assert_eq!(m.next_step(), Ok(true));
        assert_eq!(m.next_step(), Ok(false));
        assert_eq!(m.program_counter(), 1);
        assert_eq!(m.status(), Status::Halted);
        assert_eq!(m.termination(), Some(TerminationReason::Halted));
        assert_eq!(m.registers(), &[1]);
        assert_eq!(m.steps(), 2);
    }

    #[test]
    fn fallthrough_past_end() {
        let outcome = machine(&[1], &["MUL R0, V3", "MUL R0, V3"], 100).run().unwrap();
        assert_eq!(outcome.registers, vec![9]);
        assert_eq!(outcome.steps, 2);
        assert_eq!(outcome.reason, TerminationReason::PcOutOfRange);
    }

    #[test]
    fn negative_jump_target_terminates() {
        let outcome = machine(&[-1], &["JMP R0", "HALT"], 100).run().unwrap();
        assert_eq!(outcome.reason, TerminationReason::PcOutOfRange);
        assert_eq!(outcome.steps, 1);
    }

    #[test]
    fn blank_lines_count_as_steps() {
        let outcome = machine(&[0], &["", "   ", "ADD R0, V5"], 2).run().unwrap();
        assert_eq!(outcome.registers, vec![0]);
        assert_eq!(outcome.steps, 2);
        assert_eq!(outcome.reason, TerminationReason::StepBudgetExhausted);
    }

    #[test]
    fn zero_budget_runs_nothing() {
        let outcome = machine(&[0], &["ADD R0, V1"], 0).run().unwrap();
        assert_eq!(outcome.registers, vec![0]);
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.reason, TerminationReason::StepBudgetExhausted);
    }

    #[test]
    fn empty_program_ends_immediately() {
        let outcome = machine(&[3], &[], 10).run().unwrap();
        assert_eq!(outcome.registers, vec![3]);
        assert_eq!(outcome.reason, TerminationReason::PcOutOfRange);
    }

    #[test]
    fn error_is_located_and_sticky() {
        let mut m = machine(&[0], &["ADD R0, V1", "MOV R5, V1", "HALT"], 100);
        assert_eq!(m.next_step(), Ok(true));
        let err = m.next_step().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegisterOutOfRange);
        assert_eq!(err.instruction_index(), Some(1));
        assert_eq!(m.status(), Status::Error);
        assert_eq!(m.next_step(), Err(err));
        assert_eq!(m.registers(), &[1]);
    }

    #[test]
    fn unreached_decode_error_is_harmless() {
        let outcome = machine(&[0], &["HALT", "NOPE R1"], 10).run().unwrap();
        assert_eq!(outcome.reason, TerminationReason::Halted);
    }

    #[test]
    fn reached_decode_error_aborts() {
        let err = machine(&[0], &["JMP V2", "HALT", "NOPE R1"], 10).run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOpcode);
        assert_eq!(err.instruction_index(), Some(2));
    }

    #[test]
    fn n_steps_stops_at_halt() {
        let mut m = machine(&[0], &["ADD R0, V1", "JMP V0"], 1_000);
        assert_eq!(m.n_steps(10), Ok(true));
        assert_eq!(m.registers(), &[5]);
        let mut m = machine(&[0], &["HALT"], 1_000);
        assert_eq!(m.n_steps(10), Ok(false));
        assert_eq!(m.steps(), 1);
    }

    #[test]
    fn from_decoded_instructions() {
        use crate::operand::Operand;
        use crate::types::Opcode;
        let program = vec![
            Some(Instruction::new(Opcode::Cmp, vec![Operand::RegisterDirect(0), Operand::Immediate(2)]).unwrap()),
            Some(Instruction::new(Opcode::Jlt, vec![Operand::Immediate(3)]).unwrap()),
            None,
            Some(Instruction::new(Opcode::Halt, vec![]).unwrap()),
        ];
        let mut m = Machine::from_instructions(&[1], program, MachineConfig::default());
        assert_eq!(m.instruction_count(), 4);
        assert_eq!(m.n_steps(2), Ok(true));
        assert_eq!(m.flag(), ComparisonFlag::LessThan);
        assert_eq!(m.program_counter(), 3);
    }
}
