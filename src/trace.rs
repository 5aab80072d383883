// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Tracing of executed instructions
//!
//! A [Trace] is the interpreter's log: once started with [Interpreter::start_trace], every
//! instruction that runs to completion is recorded, along with the values its parameters resolved
//! to.
use std::fmt::{self, Debug, Display};

use super::{Interpreter, OpCode, ParamMode};

#[derive(Clone, Copy, PartialEq, Eq)]
struct PackedModes(u8);
impl PackedModes {
    const fn pack(modes: [ParamMode; 3]) -> Self {
        Self(modes[0] as u8 | ((modes[1] as u8) << 1) | ((modes[2] as u8) << 2))
    }
    const fn unpack(self) -> [ParamMode; 3] {
        const fn unpack_bit(bit: u8) -> ParamMode {
            if bit == 0 {
                ParamMode::Positional
            } else {
                ParamMode::Immediate
            }
        }
        [
            unpack_bit(self.0 & 0b1),
            unpack_bit(self.0 & 0b10),
            unpack_bit(self.0 & 0b100),
        ]
    }
}

/// Each parameter is stored as `(raw, resolved)`
#[derive(Clone, Copy, PartialEq, Eq)]
enum TracedOp {
    Add((i64, i64), (i64, i64), (i64, i64)),
    Mul((i64, i64), (i64, i64), (i64, i64)),
    In((i64, i64)),
    Out((i64, i64)),
    Jnz((i64, i64), (i64, i64)),
    Jz((i64, i64), (i64, i64)),
    Lt((i64, i64), (i64, i64), (i64, i64)),
    Eq((i64, i64), (i64, i64), (i64, i64)),
    Halt,
}

#[derive(Clone, PartialEq, Eq)]
/// An opaque type containing information about what instruction was executed, which can be queried
/// with its various methods, or converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    op: TracedOp,
    op_int: i64,
    instr_ptr: i64,
    packed_modes: PackedModes,
    opcode: OpCode,
}

impl TracedInstr {
    /// Return the instruction pointer's position when the traced instruction was executed
    pub fn instr_ptr(&self) -> i64 {
        self.instr_ptr
    }

    /// Return the actual integer of the traced instruction
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    /// Return the opcode of the traced instruction
    pub fn op_code(&self) -> OpCode {
        self.opcode
    }

    /// If the instruction stored a value, return that value
    pub fn stored_val(&self) -> Option<i64> {
        match self.op {
            TracedOp::Add(_, _, (_, v))
            | TracedOp::Mul(_, _, (_, v))
            | TracedOp::Lt(_, _, (_, v))
            | TracedOp::Eq(_, _, (_, v))
            | TracedOp::In((_, v)) => Some(v),
            TracedOp::Out(_) | TracedOp::Jnz(..) | TracedOp::Jz(..) | TracedOp::Halt => None,
        }
    }

    /// Return an array of the parameter modes of the traced instruction
    pub fn param_modes(&self) -> [ParamMode; 3] {
        self.packed_modes.unpack()
    }

    fn build(op_int: i64, instr_ptr: i64, resolved_params: &[(i64, i64)]) -> Self {
        let (opcode, modes) =
            Interpreter::parse_op(op_int, instr_ptr).expect("previously parsed successfully");
        macro_rules! op {
            {$id: ident(_, _, _)} => {{
                debug_assert_eq!(resolved_params.len(), 3);
                TracedOp::$id(resolved_params[0], resolved_params[1], resolved_params[2])
            }};
            {$id: ident(_, _)} => {{
                debug_assert_eq!(resolved_params.len(), 2);
                TracedOp::$id(resolved_params[0], resolved_params[1])
            }};
            {$id: ident(_)} => {{
                debug_assert_eq!(resolved_params.len(), 1);
                TracedOp::$id(resolved_params[0])
            }};
            {$id: ident} => {{
                debug_assert_eq!(resolved_params.len(), 0);
                TracedOp::$id
            }}
        }

        let op = match opcode {
            OpCode::Add => op! { Add(_, _, _) },
            OpCode::Mul => op! { Mul(_, _, _) },
            OpCode::In => op! { In(_) },
            OpCode::Out => op! { Out(_) },
            OpCode::Jnz => op! { Jnz(_, _) },
            OpCode::Jz => op! { Jz(_, _) },
            OpCode::Lt => op! { Lt(_, _, _) },
            OpCode::Eq => op! { Eq(_, _, _) },
            OpCode::Halt => op! { Halt },
        };
        Self {
            op_int,
            instr_ptr,
            op,
            packed_modes: PackedModes::pack(modes),
            opcode,
        }
    }
}

impl Interpreter {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    /// use intcode_solver::prelude::*;
    /// let mut interp = Interpreter::new([1101, 90, 9, 0, 99]);
    /// assert!(interp.start_trace().is_none());
    /// interp.run_through_inputs(empty()).unwrap();
    /// let trace = interp.end_trace().unwrap();
    /// assert_eq!(trace.0.len(), 2);
    /// assert_eq!(trace.0[0].stored_val(), Some(99));
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions into a [Trace]. If no trace was active, returns [`None`]
    ///
    /// see [Interpreter::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Record `op_int` as executed at the instruction pointer, if tracing is active
    ///
    /// `op_int` is passed in because the instruction may have overwritten its own opcode.
    pub(crate) fn trace<const N: usize>(&mut self, op_int: i64, resolved_params: [(i64, i64); N]) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(op_int, self.index, &resolved_params);
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// A log of instructions that an [Interpreter] has executed since a call to
/// [Interpreter::start_trace]
///
/// see [Interpreter::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn push(&mut self, op_int: i64, instr_ptr: i64, resolved_params: &[(i64, i64)]) {
        self.0.push(TracedInstr::build(op_int, instr_ptr, resolved_params))
    }

    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

/// One traced instruction per line
impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.0 {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}

impl Debug for TracedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! arg {
            ($arg: ident) => {
                format_args!("{} => {}", $arg.0, $arg.1)
            };
        }
        macro_rules! variant {
            ($name: literal, ($($arg: ident),*)) => {
                f.debug_tuple($name)
                $(.field(&arg!($arg) ))*
                .finish()
            }
        }
        match self {
            Self::Add(a0, a1, a2) => variant!("Add", (a0, a1, a2)),
            Self::Mul(a0, a1, a2) => variant!("Mul", (a0, a1, a2)),
            Self::In(a0) => variant!("In", (a0)),
            Self::Out(a0) => variant!("Out", (a0)),
            Self::Jnz(a0, a1) => variant!("Jnz", (a0, a1)),
            Self::Jz(a0, a1) => variant!("Jz", (a0, a1)),
            Self::Lt(a0, a1, a2) => variant!("Lt", (a0, a1, a2)),
            Self::Eq(a0, a1, a2) => variant!("Eq", (a0, a1, a2)),
            Self::Halt => write!(f, "Halt"),
        }
    }
}

impl Debug for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedInstr")
            .field("op", &self.op)
            .field("op_int", &self.op_int)
            .field("instr_ptr", &self.instr_ptr)
            .field("modes", &self.packed_modes.unpack())
            .field("opcode", &self.opcode)
            .finish()
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: op int {: <5} | ",
            self.instr_ptr, self.op_int
        )?;
        let modes = self.packed_modes.unpack();

        match self.op {
            TracedOp::Add((pa, va), (pb, vb), (dest, val))
            | TracedOp::Mul((pa, va), (pb, vb), (dest, val))
            | TracedOp::Lt((pa, va), (pb, vb), (dest, val))
            | TracedOp::Eq((pa, va), (pb, vb), (dest, val)) => {
                write!(
                    f,
                    "[{} {}{pa} (resolves to {va}), {}{pb} (resolves to {vb}), {dest} (stored {val})]",
                    self.opcode, modes[0], modes[1],
                )
            }
            TracedOp::Jnz((p_base, v_base), (p_dest, v_dest)) => {
                write!(
                    f,
                    "[{} {}{p_base} (resolves to {v_base}), {}{p_dest} ({} to {v_dest})]",
                    self.opcode,
                    modes[0],
                    modes[1],
                    if v_base != 0 { "jumped" } else { "didn't jump" }
                )
            }
            TracedOp::Jz((p_base, v_base), (p_dest, v_dest)) => {
                write!(
                    f,
                    "[{} {}{p_base} (resolves to {v_base}), {}{p_dest} ({} to {v_dest})]",
                    self.opcode,
                    modes[0],
                    modes[1],
                    if v_base == 0 { "jumped" } else { "didn't jump" }
                )
            }
            TracedOp::In((p, v)) => {
                write!(f, "[{} {p} (stored {v})]", self.opcode)
            }
            TracedOp::Out((p, v)) => {
                write!(f, "[{} {}{p} (resolves to {v})]", self.opcode, modes[0])
            }
            TracedOp::Halt => {
                write!(f, "[HALT]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::empty;

    #[test]
    fn param_mode_packing() {
        const MODES: [ParamMode; 2] = [ParamMode::Positional, ParamMode::Immediate];

        for a in MODES {
            for b in MODES {
                for c in MODES {
                    assert_eq!(PackedModes::pack([a, b, c]).unpack(), [a, b, c]);
                }
            }
        }
    }

    #[test]
    fn display_format() {
        let mut interp = Interpreter::new([1002, 4, 3, 4, 33]);
        interp.start_trace();
        interp.run_through_inputs(empty()).unwrap();
        let Trace(trace) = interp.end_trace().unwrap();
        assert_eq!(
            trace[0].to_string(),
            "ran instruction at 0000: op int 1002  | [MUL 4 (resolves to 33), #3 (resolves to 3), 4 (stored 99)]"
        );
        assert_eq!(
            trace[1].to_string(),
            "ran instruction at 0004: op int 99    | [HALT]"
        );
    }

    #[test]
    fn jumps_report_whether_they_jumped() {
        let mut interp = Interpreter::new([1106, 0, 4, 99, 1105, 0, 3, 99]);
        interp.start_trace();
        interp.run_through_inputs(empty()).unwrap();
        let Trace(trace) = interp.end_trace().unwrap();
        assert_eq!(trace.len(), 3);
        assert!(trace[0].to_string().ends_with("[JZ #0 (resolves to 0), #4 (jumped to 4)]"));
        assert!(trace[1].to_string().ends_with("(didn't jump to 3)]"));
        assert_eq!(trace[2].instr_ptr(), 7);
    }

    #[test]
    fn failed_instructions_are_not_traced() {
        let mut interp = Interpreter::new([1101, 1, 1, 9, 99]);
        interp.start_trace();
        assert!(interp.run_through_inputs(empty()).is_err());
        assert!(interp.show_trace().unwrap().0.is_empty());

        let mut interp = Interpreter::new([1105, 1, -3, 99]);
        interp.start_trace();
        assert!(interp.run_through_inputs(empty()).is_err());
        assert!(interp.show_trace().unwrap().0.is_empty());
    }
}
