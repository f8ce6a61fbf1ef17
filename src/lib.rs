//! A toy register machine.
//!
//! Text lines compile into a 1-indexed [`Program`](program::Program) of six
//! possible instructions, which a [`Runtime`](runtime::Runtime) executes over
//! a fixed bank of integer [`Registers`](registers::Registers). Every
//! transition returns a fresh runtime value, so keeping an undo
//! [`History`](history::History) is just a stack of snapshots.

pub mod compiler;
pub mod history;
pub mod instruction;
pub mod program;
pub mod registers;
pub mod runtime;
