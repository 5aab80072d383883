// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;

impl ParamMode {
    /// Extract the modes of the first `arity` parameters of `op`. Modes of parameters the
    /// instruction doesn't take default to positional, and their digits are ignored.
    pub(crate) fn extract(
        op: i64,
        arity: usize,
        ip: i64,
    ) -> Result<[ParamMode; 3], InterpreterError> {
        let mut modes = [ParamMode::Positional; 3];
        let mut digits = op / 100;
        for mode in modes.iter_mut().take(arity) {
            *mode = match digits % 10 {
                0 => ParamMode::Positional,
                1 => ParamMode::Immediate,
                n => return Err(InterpreterError::UnknownMode { mode: n, ip }),
            };
            digits /= 10;
        }
        Ok(modes)
    }
}

impl Interpreter {
    // Given a 5 digit number, digits ABCDE are used as follows:
    // DE is the two-digit opcode
    // C is the 1st parameter's mode
    // B is the 2nd parameter's mode
    // A is the 3rd parameter's mode
    //
    // So *0*1002 would be parsed as follows:
    //
    // Opcode 02 is multiply
    // C=0: 1st parameter is in positional mode
    // B=1: 2nd parameter is in immediate mode
    // A=0: 3rd parameter is in positional mode
    pub(crate) fn parse_op(op: i64, ip: i64) -> Result<(OpCode, [ParamMode; 3]), InterpreterError> {
        let opcode =
            OpCode::try_from(op % 100).map_err(|_| InterpreterError::InvalidOpcode { op, ip })?;
        Ok((opcode, ParamMode::extract(op, opcode.arity(), ip)?))
    }

    /// Processes the int in memory at `offset` past the instruction pointer into a concrete value
    /// using the method appropriate for `mode`.
    pub(crate) fn resolve_param(&self, mode: ParamMode, offset: i64) -> Result<i64, OutOfBounds> {
        let raw = self.code.get(self.index + offset)?;
        match mode {
            ParamMode::Positional => self.code.get(raw),
            ParamMode::Immediate => Ok(raw),
        }
    }

    /// Turns the int in memory at `offset` past the instruction pointer into a destination
    /// address. Destinations can't be immediate.
    pub(crate) fn resolve_dest(
        &self,
        mode: ParamMode,
        offset: i64,
    ) -> Result<i64, InterpreterError> {
        match mode {
            ParamMode::Positional => Ok(self.code.get(self.index + offset)?),
            ParamMode::Immediate => Err(InterpreterError::WriteToImmediate { ip: self.index }),
        }
    }

    /// common logic of all 4 instructions that take 3 parameters
    pub(crate) fn op3(
        &mut self,
        modes: [ParamMode; 3],
        operation: impl Fn(i64, i64) -> Option<i64>,
    ) -> Result<StepOutcome, InterpreterError> {
        let op_int = self.code.get(self.index)?;
        let a = self.resolve_param(modes[0], 1)?;
        let b = self.resolve_param(modes[1], 2)?;
        let dest = self.resolve_dest(modes[2], 3)?;
        let val = operation(a, b).ok_or(InterpreterError::ArithmeticOverflow { ip: self.index })?;
        // read the raw params before the write, which may overwrite them
        let raw = [
            self.code.get(self.index + 1)?,
            self.code.get(self.index + 2)?,
        ];
        self.code.set(dest, val)?;
        self.trace(op_int, [(raw[0], a), (raw[1], b), (dest, val)]);
        self.index += 4;
        Ok(StepOutcome::Running)
    }

    pub(crate) fn jump(
        &mut self,
        modes: [ParamMode; 3],
        func: impl Fn(i64) -> bool,
    ) -> Result<StepOutcome, InterpreterError> {
        let op_int = self.code.get(self.index)?;
        let expr = self.resolve_param(modes[0], 1)?;
        let dest = self.resolve_param(modes[1], 2)?;
        let raw = [
            self.code.get(self.index + 1)?,
            self.code.get(self.index + 2)?,
        ];
        if func(expr) {
            // a target at or past the end is only caught when the next instruction is fetched,
            // as MalformedProgram
            if dest < 0 {
                return Err(OutOfBounds {
                    address: dest,
                    len: self.code.len(),
                }
                .into());
            }
            self.trace(op_int, [(raw[0], expr), (raw[1], dest)]);
            self.index = dest;
        } else {
            self.trace(op_int, [(raw[0], expr), (raw[1], dest)]);
            self.index += 3;
        }
        Ok(StepOutcome::Running)
    }
}
