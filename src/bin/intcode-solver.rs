// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run Intcode programs, or search for the noun and verb that make one produce a given value

use clap::{Args, Parser, Subcommand, ValueEnum};
use intcode_solver::loader::Format;
use intcode_solver::prelude::*;
use intcode_solver::search::search;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::fs;
use std::io::{self, Read};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread::available_parallelism;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));
const SOURCE_HELP: &str = "File containing the intcode\nuses stdin if unset or set to '-'";

#[derive(PartialEq, Clone, Copy, ValueEnum)]
enum CodeFormat {
    /// comma-separated ASCII-encoded decimal numbers
    #[value(alias("text"))]
    #[value(alias("aoc"))]
    Ascii,
    /// little-endian 64-bit integers
    #[cfg_attr(target_endian = "little", value(alias("binary-native")))]
    #[value(name("binary-little-endian"), alias("binle"))]
    LittleEndian,
    #[cfg_attr(target_endian = "big", value(alias("binary-native")))]
    #[value(name("binary-big-endian"), alias("binbe"))]
    /// big-endian 64-bit integers
    BigEndian,
}

impl From<CodeFormat> for Format {
    fn from(format: CodeFormat) -> Self {
        match format {
            CodeFormat::Ascii => Format::Text,
            CodeFormat::LittleEndian => Format::LittleEndian,
            CodeFormat::BigEndian => Format::BigEndian,
        }
    }
}

#[derive(PartialEq, Clone, Copy, ValueEnum)]
enum OpcodeSet {
    /// ADD, MUL, and HALT only
    #[value(alias("day2"))]
    Baseline,
    /// everything through the jumps and comparisons
    #[value(alias("day5"))]
    Full,
}

impl From<OpcodeSet> for InstructionSet {
    fn from(set: OpcodeSet) -> Self {
        match set {
            OpcodeSet::Baseline => InstructionSet::Baseline,
            OpcodeSet::Full => InstructionSet::Full,
        }
    }
}

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode interpreter and noun/verb solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ProgramArgs {
    #[arg(help = SOURCE_HELP.split_once("\n").unwrap().0)]
    #[arg(long_help = SOURCE_HELP)]
    source: Option<PathBuf>,
    #[arg(help = "Input format for the intcode")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(help = "Which opcodes the program may use")]
    #[arg(short = 's', long)]
    #[arg(default_value = "full")]
    instruction_set: OpcodeSet,
    #[arg(help = "Give up after this many instructions (0 for no limit)")]
    #[arg(short = 'l', long)]
    #[arg(default_value_t = intcode_solver::DEFAULT_STEP_LIMIT)]
    step_limit: u64,
    #[arg(help = "Comma-separated values to feed to IN instructions")]
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    inputs: Vec<i64>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the program once, and print its diagnostic value
    Run {
        #[command(flatten)]
        program: ProgramArgs,
        #[arg(help = "Value to write to address 1 before starting")]
        #[arg(long, requires = "verb")]
        noun: Option<i64>,
        #[arg(help = "Value to write to address 2 before starting")]
        #[arg(long, requires = "noun")]
        verb: Option<i64>,
        #[arg(help = "Print each executed instruction to stderr")]
        #[arg(short, long)]
        trace: bool,
        #[arg(help = "Print the final memory instead of the diagnostic value")]
        #[arg(short, long)]
        dump: bool,
    },
    /// Find the first noun and verb for which the program reports TARGET, and print 100*noun+verb
    Search {
        #[command(flatten)]
        program: ProgramArgs,
        #[arg(help = "The diagnostic value to search for")]
        #[arg(short, long, allow_negative_numbers = true)]
        target: i64,
        #[arg(help = "Number of worker threads (defaults to the available parallelism)")]
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,
    },
}

impl ProgramArgs {
    fn load(&self) -> Result<Interpreter, DisplayedError> {
        let input = match self.source.as_deref() {
            Some(path) if path.as_os_str() != "-" => fs::read(path)?,
            _ => {
                let mut v = Vec::new();
                io::stdin().read_to_end(&mut v)?;
                v
            }
        };
        let code = Format::from(self.format).parse(&input)?;
        Ok(Interpreter::new(code)
            .with_instruction_set(self.instruction_set.into())
            .with_step_limit((self.step_limit != 0).then_some(self.step_limit)))
    }
}

fn main() -> Result<(), DisplayedError> {
    match Cli::parse().command {
        Command::Run {
            program,
            noun,
            verb,
            trace,
            dump,
        } => {
            let mut interp = program.load()?;
            if let (Some(noun), Some(verb)) = (noun, verb) {
                NounVerb { noun, verb }.apply(&mut interp)?;
            }
            if trace {
                interp.start_trace();
            }
            let run = interp.run_through_inputs(program.inputs.iter().copied());
            if let Some(trace) = interp.end_trace() {
                eprint!("{trace}");
            }
            let (outputs, state) = run?;
            if state == State::Awaiting {
                return Err(InterpreterError::InputExhausted {
                    ip: interp.instr_ptr(),
                }
                .into());
            }
            let result = ExecutionResult {
                memory: interp.memory().clone(),
                outputs,
                steps: interp.steps(),
            };
            if dump {
                println!("{}", result.memory);
            } else {
                println!("{}", result.diagnostic());
            }
        }
        Command::Search {
            program,
            target,
            threads,
        } => {
            let interp = program.load()?;
            let threads = threads
                .or_else(|| available_parallelism().ok())
                .unwrap_or(NonZeroUsize::MIN);
            let config = SearchConfig {
                inputs: program.inputs,
                threads,
            };
            let found = search(&interp, target, &config)?;
            eprintln!("found {found}");
            println!("{}", found.encode());
        }
    }
    Ok(())
}

/// a wrapper around a [`Box`ed][Box] [dyn Error][Error] that uses its implementation of [Display]
/// for the [Debug] impl, to display the Error if returned from `main`
struct DisplayedError(Box<dyn Error>);
impl<E: Error + 'static> From<E> for DisplayedError {
    fn from(e: E) -> Self {
        Self(Box::from(e))
    }
}

impl Debug for DisplayedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
