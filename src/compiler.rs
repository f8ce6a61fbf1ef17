use crate::instruction::{Address, Instruction, Register};
use crate::program::Program;

use thiserror::Error;

use nom::character::complete::{digit1, one_of};
use nom::combinator::{opt, recognize};
use nom::sequence::pair;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("no arguments expected, got `{0}`")]
    NoArgsExpected(String),

    #[error("expected an integer argument, got `{0}`")]
    IntArgExpected(String),

    #[error("expected a register number (at least 1), got {0}")]
    RegisterNumberExpected(i64),

    #[error("expected a program address (at least 1), got {0}")]
    AddressExpected(i64),
}

/// A compile failure, positioned at its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct CompileErrorInfo {
    #[source]
    pub error: CompileError,
    pub line: usize,
}

/// Compiles one instruction per line, the 1-based line number becoming its
/// program address. The first failing line aborts the whole compile.
pub fn compile<'a>(
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<Program, CompileErrorInfo> {
    let mut instructions = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.trim().to_lowercase();
        let instruction = parse_instruction(&line)
            .map_err(|error| CompileErrorInfo {
                error,
                line: index + 1,
            })?;
        instructions.push(instruction);
    }

    Ok(Program::from_instructions(instructions))
}

fn parse_instruction(line: &str) -> Result<Instruction, CompileError> {
    // everything after the first space is the argument text, untrimmed
    let (command, args) = match line.find(' ') {
        Some(space) => (&line[..space], &line[space + 1..]),
        None => (line, ""),
    };

    match command {
        "" | "nop" => parse_none(args, Instruction::Nop),
        "inc" => parse_register(args).map(Instruction::Inc),
        "dec" => parse_register(args).map(Instruction::Dec),
        "isz" => parse_register(args).map(Instruction::Isz),
        "jmp" => parse_address(args).map(Instruction::Jmp),
        "stp" => parse_none(args, Instruction::Stp),
        _ => Err(CompileError::UnknownCommand(command.to_owned())),
    }
}

fn parse_none(args: &str, instruction: Instruction) -> Result<Instruction, CompileError> {
    if args.is_empty() {
        Ok(instruction)
    } else {
        Err(CompileError::NoArgsExpected(args.to_owned()))
    }
}

fn parse_register(args: &str) -> Result<Register, CompileError> {
    match parse_int(args) {
        None => Err(CompileError::IntArgExpected(args.to_owned())),
        Some(value) if value >= 1 => Ok(value as Register),
        Some(value) => Err(CompileError::RegisterNumberExpected(value)),
    }
}

fn parse_address(args: &str) -> Result<Address, CompileError> {
    match parse_int(args) {
        None => Err(CompileError::IntArgExpected(args.to_owned())),
        Some(value) if value >= 1 => Ok(value as Address),
        Some(value) => Err(CompileError::AddressExpected(value)),
    }
}

type PResult<'a, T> = nom::IResult<&'a str, T>;

/// An optional sign followed by digits, with nothing around it.
fn integer(input: &str) -> PResult<&str> {
    recognize(pair(opt(one_of("-+")), digit1))(input)
}

fn parse_int(text: &str) -> Option<i64> {
    match integer(text) {
        Ok(("", digits)) => digits.parse().ok(),
        _ => None,
    }
}
