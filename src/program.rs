use crate::instruction::{Address, Instruction};

/// An immutable sequence of instructions addressed from 1 to `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Builds a program where address `i` (1-based) holds the i-th
    /// instruction of the list.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Program {
        Program { instructions }
    }

    pub fn size(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_valid_address(&self, addr: Address) -> bool {
        1 <= addr && addr <= self.instructions.len()
    }

    pub fn read(&self, addr: Address) -> Option<Instruction> {
        if self.is_valid_address(addr) {
            Some(self.instructions[addr - 1])
        } else {
            None
        }
    }
}
