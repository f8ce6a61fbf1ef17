use std::fmt::{self, Display, Formatter};

/// 1-based index into the register bank.
pub type Register = usize;

/// 1-based address of an instruction within a program.
pub type Address = usize;

/// The complete instruction set of the machine.
///
/// Operands are checked to be integers `>= 1` when compiled; whether the
/// register or address actually exists is only known at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    /// Increment a register by one.
    Inc(Register),
    /// Decrement a register by one.
    Dec(Register),
    /// Skip the next instruction if a register is zero.
    Isz(Register),
    /// Jump to an absolute program address.
    Jmp(Address),
    /// Halt the machine.
    Stp,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop => "nop".fmt(f),
            Instruction::Inc(reg) => write!(f, "inc {}", reg),
            Instruction::Dec(reg) => write!(f, "dec {}", reg),
            Instruction::Isz(reg) => write!(f, "isz {}", reg),
            Instruction::Jmp(addr) => write!(f, "jmp {}", addr),
            Instruction::Stp => "stp".fmt(f),
        }
    }
}
