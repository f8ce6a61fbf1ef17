use crate::instruction::{Address, Instruction, Register};
use crate::program::Program;
use crate::registers::Registers;

use thiserror::Error;

/// Where execution stands: paused before the instruction at `at`, or stopped
/// after executing the one at `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramCounter {
    Paused(Address),
    Stopped(Address),
}

impl ProgramCounter {
    pub fn at(&self) -> Address {
        match *self {
            ProgramCounter::Paused(at) => at,
            ProgramCounter::Stopped(at) => at,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, ProgramCounter::Stopped(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("the machine has already stopped")]
    AlreadyStopped,

    /// Never produced by the current control flow: running off the end of
    /// the program reports `InvalidAddress` instead.
    #[error("unexpected end of program")]
    UnexpectedEndOfProgram,

    #[error("invalid address {0}")]
    InvalidAddress(Address),

    #[error("invalid register {0}")]
    InvalidRegister(Register),
}

enum Jump {
    Relative(usize),
    Absolute(Address),
}

/// A machine in mid-execution.
///
/// Every transition takes `&self` and returns a fresh `Runtime`, leaving the
/// previous snapshot intact; a failed transition leaves nothing half-updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    program: Program,
    registers: Registers,
    pc: ProgramCounter,
}

impl Runtime {
    /// A machine paused at address 1. Fails with `InvalidAddress(1)` when
    /// the program is empty.
    pub fn new(program: Program, registers: Registers) -> Result<Runtime, RuntimeError> {
        let rt = Runtime {
            program,
            registers,
            pc: ProgramCounter::Paused(0),
        };
        rt.set_pc(1)
    }

    pub fn pc(&self) -> ProgramCounter {
        self.pc
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Installs `Paused(addr)` after checking `addr` against the program.
    /// Every jump, relative or absolute, passes through here, so a paused
    /// machine always sits on a valid address.
    pub fn set_pc(&self, addr: Address) -> Result<Runtime, RuntimeError> {
        if self.program.is_valid_address(addr) {
            Ok(Runtime {
                pc: ProgramCounter::Paused(addr),
                ..self.clone()
            })
        } else {
            Err(RuntimeError::InvalidAddress(addr))
        }
    }

    /// Executes the instruction under the program counter.
    pub fn step(&self) -> Result<Runtime, RuntimeError> {
        match self.pc {
            ProgramCounter::Stopped(_) => Err(RuntimeError::AlreadyStopped),
            ProgramCounter::Paused(at) => {
                let instruction = self
                    .program
                    .read(at)
                    .ok_or(RuntimeError::InvalidAddress(at))?;
                self.exec(at, instruction)
            }
        }
    }

    /// Steps until the machine stops or a step fails.
    ///
    /// A program whose jumps stay in range but never reach `stp` loops
    /// forever; callers wanting a bound must count steps themselves.
    pub fn run(&self) -> Result<Runtime, RuntimeError> {
        let mut rt = self.step()?;
        while !rt.pc.is_stopped() {
            rt = rt.step()?;
        }
        Ok(rt)
    }

    fn exec(&self, at: Address, instruction: Instruction) -> Result<Runtime, RuntimeError> {
        match instruction {
            Instruction::Nop => self.next(at, Jump::Relative(1)),
            Instruction::Inc(reg) => self.arithmetic(at, reg, |v| v.wrapping_add(1)),
            Instruction::Dec(reg) => self.arithmetic(at, reg, |v| v.wrapping_sub(1)),
            Instruction::Isz(reg) => {
                let value = self
                    .registers
                    .read(reg)
                    .ok_or(RuntimeError::InvalidRegister(reg))?;
                let distance = if value == 0 { 2 } else { 1 };
                self.next(at, Jump::Relative(distance))
            }
            Instruction::Jmp(addr) => self.next(at, Jump::Absolute(addr)),
            // `at` is the current address, already known valid
            Instruction::Stp => Ok(Runtime {
                pc: ProgramCounter::Stopped(at),
                ..self.clone()
            }),
        }
    }

    fn arithmetic(
        &self,
        at: Address,
        reg: Register,
        f: impl FnOnce(i64) -> i64,
    ) -> Result<Runtime, RuntimeError> {
        let registers = self
            .registers
            .update(reg, f)
            .ok_or(RuntimeError::InvalidRegister(reg))?;
        let rt = Runtime {
            registers,
            ..self.clone()
        };
        rt.next(at, Jump::Relative(1))
    }

    fn next(&self, at: Address, jump: Jump) -> Result<Runtime, RuntimeError> {
        match jump {
            Jump::Relative(distance) => self.set_pc(at + distance),
            Jump::Absolute(addr) => self.set_pc(addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn machine(lines: Vec<&str>, registers: usize) -> Runtime {
        let program = compile(lines).unwrap();
        Runtime::new(program, Registers::new(registers)).unwrap()
    }

    #[test]
    fn starts_paused_at_one() {
        let rt = machine(vec!["nop"], 1);
        assert_eq!(rt.pc(), ProgramCounter::Paused(1));
    }

    #[test]
    fn empty_program_is_rejected() {
        let result = Runtime::new(Program::from_instructions(Vec::new()), Registers::new(1));
        assert_eq!(result.unwrap_err(), RuntimeError::InvalidAddress(1));
    }

    #[test]
    fn isz_skips_when_zero() {
        let rt = machine(vec!["isz 1", "nop", "stp"], 1);
        let rt = rt.step().unwrap();
        assert_eq!(rt.pc(), ProgramCounter::Paused(3));
    }

    #[test]
    fn isz_falls_through_when_nonzero() {
        let program = compile(vec!["isz 1", "nop", "stp"]).unwrap();
        let registers = Registers::new(1).write(1, 5).unwrap();
        let rt = Runtime::new(program, registers).unwrap();

        let rt = rt.step().unwrap();
        assert_eq!(rt.pc(), ProgramCounter::Paused(2));
    }

    #[test]
    fn inc_and_dec_touch_their_register() {
        let rt = machine(vec!["inc 1", "inc 1", "dec 2", "stp"], 2);

        let rt = rt.step().unwrap().step().unwrap().step().unwrap();
        assert_eq!(rt.registers().to_ordered_values(), [2, -1]);
        assert_eq!(rt.pc(), ProgramCounter::Paused(4));
    }

    #[test]
    fn inc_and_dec_wrap_at_the_integer_limits() {
        let program = compile(vec!["dec 1", "stp"]).unwrap();
        let registers = Registers::new(1).write(1, i64::MIN).unwrap();
        let rt = Runtime::new(program, registers).unwrap();
        let rt = rt.step().unwrap();
        assert_eq!(rt.registers().read(1), Some(i64::MAX));

        let program = compile(vec!["inc 1", "stp"]).unwrap();
        let registers = Registers::new(1).write(1, i64::MAX).unwrap();
        let rt = Runtime::new(program, registers).unwrap();
        let rt = rt.step().unwrap();
        assert_eq!(rt.registers().read(1), Some(i64::MIN));
    }

    #[test]
    fn unknown_register_fails_the_step() {
        let rt = machine(vec!["inc 3", "stp"], 2);
        assert_eq!(rt.step().unwrap_err(), RuntimeError::InvalidRegister(3));

        let rt = machine(vec!["isz 9", "stp"], 2);
        assert_eq!(rt.step().unwrap_err(), RuntimeError::InvalidRegister(9));
    }

    #[test]
    fn jump_out_of_range_fails_and_changes_nothing() {
        let rt = machine(vec!["jmp 7"], 2);
        assert_eq!(rt.step().unwrap_err(), RuntimeError::InvalidAddress(7));
        // the snapshot we stepped from is untouched
        assert_eq!(rt.pc(), ProgramCounter::Paused(1));
        assert_eq!(rt.registers().to_ordered_values(), [0, 0]);
    }

    #[test]
    fn stepping_past_the_end_is_an_invalid_address() {
        let rt = machine(vec!["nop"], 1);
        assert_eq!(rt.step().unwrap_err(), RuntimeError::InvalidAddress(2));
    }

    #[test]
    fn stp_halts_at_its_own_address() {
        let rt = machine(vec!["nop", "stp"], 1);
        let rt = rt.step().unwrap().step().unwrap();
        assert_eq!(rt.pc(), ProgramCounter::Stopped(2));
    }

    #[test]
    fn stopped_machines_refuse_to_step() {
        let rt = machine(vec!["stp"], 1);
        let stopped = rt.step().unwrap();

        assert_eq!(stopped.step().unwrap_err(), RuntimeError::AlreadyStopped);
        assert_eq!(stopped.pc(), ProgramCounter::Stopped(1));
    }

    #[test]
    fn set_pc_validates_its_target() {
        let rt = machine(vec!["nop", "stp"], 1);
        assert_eq!(rt.set_pc(2).unwrap().pc(), ProgramCounter::Paused(2));
        assert_eq!(rt.set_pc(3).unwrap_err(), RuntimeError::InvalidAddress(3));
        assert_eq!(rt.set_pc(0).unwrap_err(), RuntimeError::InvalidAddress(0));
    }

    // Adds register 2 into register 1: loop on `isz 2`/`dec 2`/`inc 1`
    // until register 2 reaches zero, then halt.
    #[test]
    fn addition_program_runs_to_completion() {
        let program =
            compile(vec!["jmp 4", "inc 1", "dec 2", "isz 2", "jmp 2", "stp"]).unwrap();
        let registers = Registers::new(4)
            .write(1, 3)
            .unwrap()
            .write(2, 4)
            .unwrap();
        let rt = Runtime::new(program, registers).unwrap();

        let halted = rt.run().unwrap();
        assert_eq!(halted.pc(), ProgramCounter::Stopped(6));
        assert_eq!(halted.registers().to_ordered_values(), [7, 0, 0, 0]);
    }

    #[test]
    fn addition_program_trace_prefix() {
        let program =
            compile(vec!["jmp 4", "inc 1", "dec 2", "isz 2", "jmp 2", "stp"]).unwrap();
        let registers = Registers::new(4)
            .write(1, 3)
            .unwrap()
            .write(2, 4)
            .unwrap();
        let rt = Runtime::new(program, registers).unwrap();

        // jmp 4; isz 2 (reg2 = 4, fall through); jmp 2; inc 1; dec 2
        let expected = [4, 5, 2, 3, 4];
        let mut rt = rt;
        for &at in &expected {
            rt = rt.step().unwrap();
            assert_eq!(rt.pc(), ProgramCounter::Paused(at));
        }
        assert_eq!(rt.registers().to_ordered_values(), [4, 3, 0, 0]);
    }

    #[test]
    fn run_on_a_stopped_machine_fails() {
        let rt = machine(vec!["stp"], 1);
        let stopped = rt.run().unwrap();
        assert_eq!(stopped.run().unwrap_err(), RuntimeError::AlreadyStopped);
    }
}
