// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing a bounds-checked Intcode interpreter and a noun/verb parameter search
//!
//! The interpreter supports the [Opcodes] used up through [Day 5] (`ADD`, `MUL`, `IN`, `OUT`,
//! `JNZ`, `JZ`, `LT`, `EQ`, and `HALT`) and the positional and immediate [Parameter Modes].
//! Memory never grows: any access outside of the loaded program is reported as an error.
//!
//! # Example
//!
//! ```rust
//! use intcode_solver::prelude::*;
//! let mut interpreter = Interpreter::new(vec![104, 1024, 99]);
//!
//! assert_eq!(
//!     interpreter.run_through_inputs(std::iter::empty()).unwrap(),
//!     (vec![1024], State::Halted)
//! );
//! ```
//!
//! The [search] module brute-forces the two inputs that [Day 2] programs take:
//!
//! ```rust
//! use intcode_solver::prelude::*;
//! use intcode_solver::search::search;
//! // mem[0] = mem[noun] + mem[verb], followed by cells that hold their own addresses
//! let mut code = vec![1, 0, 0, 0, 99];
//! code.extend(5..120);
//! let found = search(&Interpreter::new(code), 150, &SearchConfig::default()).unwrap();
//! assert_eq!(found, NounVerb { noun: 2, verb: 75 });
//! assert_eq!(found.encode(), 275);
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes
//! [Parameter Modes]: https://esolangs.org/wiki/Intcode#Parameter_Modes
//! [Day 2]: https://adventofcode.com/2019/day/2
//! [Day 5]: https://adventofcode.com/2019/day/5

mod internals;
pub mod loader;
pub mod mem;
pub mod search;
pub mod trace;

use mem::{OutOfBounds, ProgramMemory};
use std::error::Error;
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};
use trace::Trace;

/// A small module that re-exports items needed when working with the Intcode interpreter
pub mod prelude {
    pub use crate::search::{NounVerb, SearchConfig, SearchError};
    pub use crate::{
        ExecutionResult, InstructionSet, Interpreter, InterpreterError, State, StepOutcome,
    };
    pub use std::iter::empty;
}

/// The number of instructions an [Interpreter] will execute before giving up, unless configured
/// otherwise with [Interpreter::with_step_limit]
pub const DEFAULT_STEP_LIMIT: u64 = 1 << 24;

/// The state of the intcode system, returned whenever the intcode system has stopped.
///
/// [Awaiting](State::Awaiting) means that there are more instructions to execute, but all input
/// has been consumed and the next instruction requires input.
///
/// [Halted](State::Halted) means that a `HALT` instruction has been executed. Once it's been
/// returned, no more instructions will be executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution is awaiting input
    Awaiting,
    /// Execution has halted
    Halted,
}

/// The outcome of successfully executing a single instruction
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    /// There are more instructions to run
    Running,
    /// Execution stopped in the given [State]
    Stopped(State),
}

/// Which generation of the Intcode instruction set an [Interpreter] accepts
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum InstructionSet {
    /// Only `ADD`, `MUL`, and `HALT`, as in [Day 2](https://adventofcode.com/2019/day/2)
    Baseline,
    /// Everything up to and including the comparison and jump instructions of
    /// [Day 5](https://adventofcode.com/2019/day/5)
    #[default]
    Full,
}

/// An error occured when executing an intcode instruction
///
/// Every variant is fatal: the [Interpreter] that returned it is poisoned, and will refuse to
/// execute any further instructions.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterpreterError {
    /// An instruction referenced memory that isn't allocated
    OutOfBounds(OutOfBounds),
    /// An opcode that isn't part of the active [InstructionSet] was encountered
    InvalidOpcode {
        /// the full int the opcode was extracted from
        op: i64,
        /// the address of the instruction
        ip: i64,
    },
    /// A parameter mode digit other than `0` or `1` was encountered
    UnknownMode {
        /// the offending digit
        mode: i64,
        /// the address of the instruction
        ip: i64,
    },
    /// An instruction tried to write to an immediate destination
    WriteToImmediate {
        /// the address of the instruction
        ip: i64,
    },
    /// The instruction pointer moved past the end of memory without reaching a `HALT`, either by
    /// running off the end or by jumping there
    MalformedProgram {
        /// where the instruction pointer ended up
        ip: i64,
    },
    /// The configured number of instructions was executed without the program halting
    StepLimitExceeded {
        /// the limit that was reached
        limit: u64,
    },
    /// An `ADD` or `MUL` produced a result that doesn't fit into an `i64`
    ArithmeticOverflow {
        /// the address of the instruction
        ip: i64,
    },
    /// [Interpreter::execute] ran out of inputs to provide to an `IN` instruction
    InputExhausted {
        /// the address of the `IN` instruction
        ip: i64,
    },
    /// The interpreter previously failed, so its state can't be trusted
    Poisoned,
}

impl Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(e) => Display::fmt(e, f),
            Self::InvalidOpcode { op, ip } => {
                write!(f, "encountered unrecognized opcode {op} at address {ip}")
            }
            Self::UnknownMode { mode, ip } => {
                write!(f, "encountered unknown parameter mode {mode} at address {ip}")
            }
            Self::WriteToImmediate { ip } => {
                write!(f, "instruction at address {ip} attempted to write to an immediate")
            }
            Self::MalformedProgram { ip } => {
                write!(f, "instruction pointer {ip} ran past the end of the program")
            }
            Self::StepLimitExceeded { limit } => {
                write!(f, "program did not halt within {limit} instructions")
            }
            Self::ArithmeticOverflow { ip } => {
                write!(f, "instruction at address {ip} overflowed")
            }
            Self::InputExhausted { ip } => {
                write!(f, "instruction at address {ip} needed input, but none was left")
            }
            Self::Poisoned => write!(f, "interpreter was used after a previous error"),
        }
    }
}

impl Error for InterpreterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfBounds(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OutOfBounds> for InterpreterError {
    fn from(err: OutOfBounds) -> Self {
        Self::OutOfBounds(err)
    }
}

/// Parameter mode for Intcode instruction
///
/// Intcode instruction parameters each have a mode: [positional] or [immediate].
///
/// When executing an intcode instruction, the instruction's parameters are interpreted in
/// accordance with their associated modes.
///
/// [positional]: ParamMode::Positional
/// [immediate]: ParamMode::Immediate
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ParamMode {
    /// Positional Mode
    ///
    /// A parameter in positional mode evaluates to the value at the address specified by the
    /// parameter.
    Positional = 0,
    /// Immediate Mode
    ///
    /// A parameter in immediate mode evaluates directly to the value specified. Instructions which
    /// write to memory may not use immediate mode for their destinations.
    #[doc(alias = "#")]
    Immediate = 1,
}

impl Display for ParamMode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamMode::Positional => Ok(()),
            ParamMode::Immediate => write!(fmt, "#"),
        }
    }
}

/// An Intcode opcode
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(missing_docs, reason = "trivial")]
pub enum OpCode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    Lt = 7,
    Eq = 8,
    Halt = 99,
}

impl OpCode {
    /// The number of parameters that instructions with this opcode take
    pub const fn arity(self) -> usize {
        match self {
            OpCode::Add | OpCode::Mul | OpCode::Lt | OpCode::Eq => 3,
            OpCode::Jnz | OpCode::Jz => 2,
            OpCode::In | OpCode::Out => 1,
            OpCode::Halt => 0,
        }
    }

    /// Whether `set` includes this opcode
    pub const fn in_set(self, set: InstructionSet) -> bool {
        match set {
            InstructionSet::Full => true,
            InstructionSet::Baseline => matches!(self, OpCode::Add | OpCode::Mul | OpCode::Halt),
        }
    }
}

impl TryFrom<i64> for OpCode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            1 => Ok(OpCode::Add),
            2 => Ok(OpCode::Mul),
            3 => Ok(OpCode::In),
            4 => Ok(OpCode::Out),
            5 => Ok(OpCode::Jnz),
            6 => Ok(OpCode::Jz),
            7 => Ok(OpCode::Lt),
            8 => Ok(OpCode::Eq),
            99 => Ok(OpCode::Halt),
            _ => Err(i),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpCode::Add => "ADD",
            OpCode::Mul => "MUL",
            OpCode::In => "IN",
            OpCode::Out => "OUT",
            OpCode::Jnz => "JNZ",
            OpCode::Jz => "JZ",
            OpCode::Lt => "LT",
            OpCode::Eq => "EQ",
            OpCode::Halt => "HALT",
        };
        f.write_str(name)
    }
}

/// The final memory and outputs of a program that ran until it halted
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExecutionResult {
    /// the contents of memory at the time of the `HALT`
    pub memory: ProgramMemory,
    /// every value passed to an `OUT` instruction, in order
    pub outputs: Vec<i64>,
    /// the number of instructions that were executed, including the `HALT`
    pub steps: u64,
}

impl ExecutionResult {
    /// The value that the program reported
    ///
    /// That's the last value output, or for programs that never output anything, the value left
    /// at address `0`.
    pub fn diagnostic(&self) -> i64 {
        self.outputs
            .last()
            .copied()
            .unwrap_or_else(|| self.memory.as_slice().first().copied().unwrap_or_default())
    }
}

/// An intcode interpreter, which provides optional tracing of instructions executed.
///
/// Each interpreter owns its memory outright. To run the same program several times, clone the
/// interpreter before running it.
#[derive(Clone)]
pub struct Interpreter {
    index: i64,
    code: ProgramMemory,
    instruction_set: InstructionSet,
    step_limit: Option<u64>,
    steps: u64,
    poisoned: bool,
    trace: Option<Trace>,
}

// ignore the trace field
impl PartialEq for Interpreter {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.code == other.code
            && self.instruction_set == other.instruction_set
            && self.step_limit == other.step_limit
            && self.steps == other.steps
            && self.poisoned == other.poisoned
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Interpreter")
            .field("code", &self.code)
            .field("ip", &self.index)
            .field("instruction_set", &self.instruction_set)
            .field("steps", &self.steps)
            .field("step_limit", &self.step_limit)
            .field("poisoned", &self.poisoned)
            .field("tracing", &self.trace.is_some())
            .finish()
    }
}

/// Panics if `i` is out of bounds. Use [Interpreter::mem_get] to handle that case.
impl Index<i64> for Interpreter {
    type Output = i64;

    fn index(&self, i: i64) -> &Self::Output {
        self.code.index(i)
    }
}

/// Panics if `i` is out of bounds. Use [Interpreter::mem_set] to handle that case.
impl IndexMut<i64> for Interpreter {
    fn index_mut(&mut self, i: i64) -> &mut Self::Output {
        self.code.index_mut(i)
    }
}

impl Interpreter {
    /// Create a new interpreter. Collects `code` into the starting memory state.
    ///
    /// The interpreter accepts the [full](InstructionSet::Full) instruction set, and has a step
    /// limit of [DEFAULT_STEP_LIMIT].
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self {
            index: 0,
            code: code.into_iter().collect(),
            instruction_set: InstructionSet::default(),
            step_limit: Some(DEFAULT_STEP_LIMIT),
            steps: 0,
            poisoned: false,
            trace: None,
        }
    }

    /// Restrict which opcodes are accepted
    ///
    /// ```
    /// use intcode_solver::prelude::*;
    /// let mut interp = Interpreter::new([3, 0, 99]).with_instruction_set(InstructionSet::Baseline);
    /// assert_eq!(
    ///     interp.run_through_inputs([1]),
    ///     Err(InterpreterError::InvalidOpcode { op: 3, ip: 0 })
    /// );
    /// ```
    pub fn with_instruction_set(mut self, instruction_set: InstructionSet) -> Self {
        self.instruction_set = instruction_set;
        self
    }

    /// Set the maximum number of instructions to execute, or remove the limit with [`None`]
    pub fn with_step_limit(mut self, step_limit: Option<u64>) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Get the memory at `address`
    #[doc(alias = "peek")]
    pub fn mem_get(&self, address: i64) -> Result<i64, OutOfBounds> {
        self.code.get(address)
    }

    /// Manually set a memory location
    #[doc(alias("poke", "write"))]
    pub fn mem_set(&mut self, address: i64, value: i64) -> Result<(), OutOfBounds> {
        self.code.set(address, value)
    }

    /// A view of the interpreter's memory
    pub fn memory(&self) -> &ProgramMemory {
        &self.code
    }

    /// The address of the next instruction to execute
    pub fn instr_ptr(&self) -> i64 {
        self.index
    }

    /// The number of instructions executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether a previous error has left the interpreter unusable
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Execute a single instruction
    ///
    /// If the instruction is an `IN` and `inputs` is empty, nothing is executed, and
    /// [`StepOutcome::Stopped(State::Awaiting)`](State::Awaiting) is returned.
    ///
    /// On error, the interpreter is marked as poisoned, and all future calls return
    /// [InterpreterError::Poisoned].
    pub fn exec_instruction(
        &mut self,
        inputs: &mut impl Iterator<Item = i64>,
        outputs: &mut Vec<i64>,
    ) -> Result<StepOutcome, InterpreterError> {
        if self.poisoned {
            return Err(InterpreterError::Poisoned);
        }
        let result = self.step(inputs, outputs);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Execute until either the program halts, or it tries to read nonexistent input.
    /// If the interpreter halted, returns `Ok((v, s))`, where `v` is a [`Vec<i64>`] containing all
    /// outputs that it found, and `s` is the [`State`] at the time it stopped.
    ///
    /// If it stopped in the [Awaiting](State::Awaiting) state, it can be resumed with another call
    /// to this function.
    ///
    /// On error, it will return an [`InterpreterError`] that reflects the error.
    pub fn run_through_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<i64>, State), InterpreterError> {
        let mut outputs = Vec::new();
        let mut inputs = inputs.into_iter();
        loop {
            match self.exec_instruction(&mut inputs, &mut outputs)? {
                StepOutcome::Running => (),
                StepOutcome::Stopped(state) => break Ok((outputs, state)),
            }
        }
    }

    /// Run the program to completion, feeding it `inputs` in order
    ///
    /// Unlike [Interpreter::run_through_inputs], running out of input is an error.
    ///
    /// # Example
    ///
    /// ```
    /// use intcode_solver::prelude::*;
    /// let result = Interpreter::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50])
    ///     .execute(empty())
    ///     .unwrap();
    /// assert_eq!(result.diagnostic(), 3500);
    /// assert_eq!(result.steps, 3);
    /// ```
    pub fn execute(
        mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<ExecutionResult, InterpreterError> {
        match self.run_through_inputs(inputs)? {
            (outputs, State::Halted) => Ok(ExecutionResult {
                memory: self.code,
                outputs,
                steps: self.steps,
            }),
            (_, State::Awaiting) => Err(InterpreterError::InputExhausted { ip: self.index }),
        }
    }

    fn step(
        &mut self,
        inputs: &mut impl Iterator<Item = i64>,
        outputs: &mut Vec<i64>,
    ) -> Result<StepOutcome, InterpreterError> {
        if let Some(limit) = self.step_limit
            && self.steps >= limit
        {
            return Err(InterpreterError::StepLimitExceeded { limit });
        }

        let ip = self.index;
        let instruction = self
            .code
            .get(ip)
            .map_err(|_| InterpreterError::MalformedProgram { ip })?;
        // opcodes outside the instruction set are rejected before their mode digits are examined
        let opcode = OpCode::try_from(instruction % 100)
            .ok()
            .filter(|opcode| opcode.in_set(self.instruction_set))
            .ok_or(InterpreterError::InvalidOpcode {
                op: instruction,
                ip,
            })?;
        let modes = ParamMode::extract(instruction, opcode.arity(), ip)?;

        let outcome = match opcode {
            OpCode::Add => self.op3(modes, i64::checked_add)?,
            OpCode::Mul => self.op3(modes, i64::checked_mul)?,
            OpCode::Lt => self.op3(modes, |a, b| Some((a < b).into()))?,
            OpCode::Eq => self.op3(modes, |a, b| Some((a == b).into()))?,
            OpCode::In => {
                let dest = self.resolve_dest(modes[0], 1)?;
                let Some(input) = inputs.next() else {
                    return Ok(StepOutcome::Stopped(State::Awaiting));
                };
                self.code.set(dest, input)?;
                self.trace(instruction, [(dest, input)]);
                self.index += 2;
                StepOutcome::Running
            }
            OpCode::Out => {
                let val = self.resolve_param(modes[0], 1)?;
                let raw = self.code.get(ip + 1)?;
                self.trace(instruction, [(raw, val)]);
                outputs.push(val);
                self.index += 2;
                StepOutcome::Running
            }
            OpCode::Jnz => self.jump(modes, |i| i != 0)?,
            OpCode::Jz => self.jump(modes, |i| i == 0)?,
            OpCode::Halt => {
                self.trace(instruction, []);
                StepOutcome::Stopped(State::Halted)
            }
        };
        self.steps += 1;
        Ok(outcome)
    }
}
