use std::fs;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rema::compiler;
use rema::instruction::{Instruction, Register};
use rema::registers::Registers;
use rema::runtime::{ProgramCounter, Runtime};

#[derive(StructOpt)]
struct Options {
    /// The source file to execute, one instruction per line.
    source: PathBuf,

    /// Number of registers in the machine.
    #[structopt(short, long, default_value = "4")]
    registers: usize,

    /// Initial register values, as `register=value` pairs.
    #[structopt(long, number_of_values = 1)]
    set: Vec<RegisterInit>,

    /// Print the machine state after every step.
    #[structopt(long)]
    trace: bool,

    /// Give up after this many steps.
    #[structopt(long)]
    limit: Option<usize>,
}

struct RegisterInit {
    register: Register,
    value: i64,
}

impl FromStr for RegisterInit {
    type Err = String;

    fn from_str(text: &str) -> Result<RegisterInit, String> {
        let mut parts = text.splitn(2, '=');
        let register = parts.next().unwrap_or("");
        let value = parts
            .next()
            .ok_or_else(|| format!("expected `register=value`, got `{}`", text))?;

        Ok(RegisterInit {
            register: register
                .parse()
                .map_err(|_| format!("invalid register `{}`", register))?,
            value: value
                .parse()
                .map_err(|_| format!("invalid value `{}`", value))?,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        Ok(()) => (),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::from_args();

    let source = fs::read_to_string(&options.source)?;
    let program = compiler::compile(source.lines())?;
    debug!(addresses = program.size(), "compiled");

    let mut registers = Registers::new(options.registers);
    for init in &options.set {
        registers = registers.write(init.register, init.value).ok_or_else(|| {
            format!(
                "no register {} in a bank of {}",
                init.register,
                registers.size()
            )
        })?;
    }

    let rt = Runtime::new(program, registers)?;
    let halted = execute(rt, &options)?;

    for (index, value) in halted.registers().to_ordered_values().iter().enumerate() {
        println!("r{} = {}", index + 1, value);
    }

    Ok(())
}

fn execute(rt: Runtime, options: &Options) -> Result<Runtime, Box<dyn std::error::Error>> {
    if !options.trace && options.limit.is_none() {
        return Ok(rt.run()?);
    }

    let mut rt = rt;
    let mut steps = 0;
    while !rt.pc().is_stopped() {
        if Some(steps) == options.limit {
            return Err(format!(
                "gave up after {} steps, paused at {}",
                steps,
                rt.pc().at()
            )
            .into());
        }

        rt = rt.step()?;
        steps += 1;

        if options.trace {
            print_step(&rt);
        }
    }

    debug!(steps, "halted");
    Ok(rt)
}

fn print_step(rt: &Runtime) {
    let registers = rt.registers().to_ordered_values();
    match rt.pc() {
        ProgramCounter::Paused(at) => {
            // a paused pc always points at a real instruction
            let next = rt.program().read(at).unwrap_or(Instruction::Nop);
            println!("{:>4}   {:<8} {:?}", at, next.to_string(), registers);
        }
        ProgramCounter::Stopped(at) => {
            println!("{:>4}!  {:<8} {:?}", at, "", registers);
        }
    }
}
