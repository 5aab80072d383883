//! Test that examples from Advent of Code problem descriptions behave as described.
// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use either::Either;
use intcode_solver::mem::OutOfBounds;
use intcode_solver::prelude::*;
use intcode_solver::search::{search, trial};
use intcode_solver::trace::{Trace, TracedInstr};
use intcode_solver::{OpCode, ParamMode};
use itertools::Itertools;

// first, some groundwork for common elements of different tests

/// Construct a new interpreter with the given starting code
macro_rules! interp {
    [$($i:expr),*] => {{
        Interpreter::new([$($i),*])
    }}
}

/// Run an interpreter to end, returning its output.
/// Borrows the interpreter in case it's trace is useful
fn run_to_end(
    interp: &mut Interpreter,
    inputs: impl IntoIterator<Item = i64>,
) -> Result<Vec<i64>, Either<InterpreterError, Awaiting>> {
    let (output, state) = interp.run_through_inputs(inputs).map_err(Either::Left)?;
    if state == State::Halted {
        Ok(output)
    } else {
        Err(Either::Right(Awaiting { output }))
    }
}

/// A struct with the information about expected traced instruction
struct ExpectedOp {
    op_int: i64,
    instr_ptr: i64,
    stored_val: Option<i64>,
}

impl ExpectedOp {
    const fn new(op_int: i64, instr_ptr: i64, stored_val: Option<i64>) -> Self {
        Self {
            op_int,
            instr_ptr,
            stored_val,
        }
    }

    fn validate(self, traced: TracedInstr) {
        assert_eq!(self.op_int, traced.op_int());
        assert_eq!(self.instr_ptr, traced.instr_ptr());
        assert_eq!(self.stored_val, traced.stored_val());
    }
}

fn validate_trace(expected: impl IntoIterator<Item = ExpectedOp>, Trace(trace): Trace) {
    expected
        .into_iter()
        .zip_eq(trace)
        .for_each(|(op, instr)| op.validate(instr))
}

mod day2_examples {
    mod part1 {
        use crate::*;

        /// the extended example used to help illustrate the basics
        #[test]
        fn extended_example() {
            let mut interp = interp![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
            interp.start_trace();
            let output = run_to_end(&mut interp, empty()).unwrap();
            assert!(output.is_empty());
            assert_eq!(interp[0], 3500);
            const EXPECTED: [ExpectedOp; 3] = [
                ExpectedOp::new(1, 0, Some(70)),
                ExpectedOp::new(2, 4, Some(3500)),
                ExpectedOp::new(99, 8, None),
            ];
            validate_trace(EXPECTED, interp.end_trace().unwrap());
        }

        /// the extra, smaller examples that are listed after the extended example
        #[test]
        fn small_examples() {
            macro_rules! example {
                ($($code: literal),+ becomes $($output: literal),+) => {{
                    let result = interp![$($code),*]
                        .with_instruction_set(InstructionSet::Baseline)
                        .execute(empty())
                        .unwrap();
                    assert_eq!(result.memory.as_slice(), &[$($output),+]);
                }}
            }
            example!(1,0,0,0,99 becomes 2,0,0,0,99);
            example!(2,3,0,3,99 becomes 2,3,0,6,99);
            example!(2,4,4,5,99,0 becomes 2,4,4,5,99,9801);
            example!(1,1,1,4,99,5,6,0,99 becomes 30,1,1,4,2,5,6,0,99);
        }

        /// restoring the "1202 program alarm" state gives the same answer every time
        #[test]
        fn noun_and_verb_are_deterministic() {
            let program = interp![1, 0, 0, 3, 1, 1, 2, 3, 1, 3, 4, 3, 2, 3, 9, 0, 99, 0, 0];
            let pair = NounVerb { noun: 12, verb: 2 };
            let first = trial(&program, pair, &[]);
            assert!(first.is_ok());
            assert_eq!(trial(&program, pair, &[]), first);
            // the search works on clones, so the original still has its starting values
            assert_eq!(program[1], 0);
            assert_eq!(program[2], 0);
        }
    }

    mod part2 {
        use crate::*;

        /// `mem[0] = mem[noun] * mem[verb] + noun`, padded with cells that hold their own
        /// addresses so that any noun or verb is in bounds
        fn program() -> Interpreter {
            Interpreter::new(
                [2, 0, 0, 17, 1, 17, 1, 0, 99]
                    .into_iter()
                    .chain(9..17)
                    .chain([0])
                    .chain(18..100),
            )
        }

        #[test]
        fn found_pair_reproduces_target_and_is_first() {
            let program = program();
            for target in [0, 30, 110, 2550, 9900] {
                let found = search(&program, target, &SearchConfig::default()).unwrap();
                assert_eq!(trial(&program, found, &[]), Ok(target));
                assert!(
                    NounVerb::all()
                        .take_while(|&pair| pair < found)
                        .all(|pair| trial(&program, pair, &[]) != Ok(target)),
                    "an earlier pair than {found} produced {target}"
                );
            }
        }

        #[test]
        fn exhausted_search() {
            assert_eq!(
                search(&program(), -1, &SearchConfig::default()),
                Err(SearchError::NotFound { target: -1 })
            );
        }
    }
}

mod day5_examples {
    mod part1 {
        use crate::*;

        #[test]
        fn echo_input() {
            let template = interp![3, 0, 4, 0, 99];
            for i in -128..128 {
                assert_eq!(run_to_end(&mut template.clone(), [i]).unwrap(), vec![i]);
            }
            let result = template.execute([42]).unwrap();
            assert_eq!(result.diagnostic(), 42);
        }

        #[test]
        fn immediate_mode_example() {
            let mut interp = interp![1002, 4, 3, 4, 33];
            interp.start_trace();
            let output = run_to_end(&mut interp, []).unwrap();
            assert!(output.is_empty());
            const EXPECTED: [ExpectedOp; 2] = [
                ExpectedOp::new(1002, 0, Some(99)),
                ExpectedOp::new(99, 4, None),
            ];
            let trace = interp.end_trace().unwrap();
            assert_eq!(
                trace.0[0].param_modes(),
                [
                    ParamMode::Positional,
                    ParamMode::Immediate,
                    ParamMode::Positional
                ]
            );
            validate_trace(EXPECTED, trace);
        }

        /// both operands immediate, so neither is used as an address
        #[test]
        fn immediate_operands() {
            let mut interp = interp![1101, 4, 3, 0, 99];
            run_to_end(&mut interp, []).unwrap();
            assert_eq!(interp[0], 7);
        }

        #[test]
        fn negative_numbers() {
            let mut interp = interp![1101, 100, -1, 4, 0];
            run_to_end(&mut interp, []).unwrap();
            assert_eq!(interp[4], 99);
        }
    }
    mod part2 {
        use crate::*;

        #[test]
        fn comparison_examples() {
            let templates = [
                interp![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8],
                interp![3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8],
                interp![3, 3, 1108, -1, 8, 3, 4, 3, 99],
                interp![3, 3, 1107, -1, 8, 3, 4, 3, 99],
            ];

            let expected_builder = |mode, cmp_op, input| {
                let val = if cmp_op == OpCode::Lt {
                    input < 8
                } else {
                    input == 8
                } as i64;
                let expected = [
                    ExpectedOp::new(OpCode::In as i64, 0, Some(input)),
                    ExpectedOp::new(cmp_op as i64 + (mode as i64 * 1100), 2, Some(val)),
                    ExpectedOp::new(OpCode::Out as i64, 6, None),
                    ExpectedOp::new(OpCode::Halt as i64, 8, None),
                ];
                (expected, val)
            };

            let expected = |i: i64| {
                [
                    expected_builder(ParamMode::Positional, OpCode::Eq, i),
                    expected_builder(ParamMode::Positional, OpCode::Lt, i),
                    expected_builder(ParamMode::Immediate, OpCode::Eq, i),
                    expected_builder(ParamMode::Immediate, OpCode::Lt, i),
                ]
            };

            for input in [7, 8, 9] {
                let mut interps = templates.clone();
                let expected_traces = expected(input);
                for (interp, (trace, out)) in interps.iter_mut().zip(expected_traces) {
                    interp.start_trace();
                    let output = run_to_end(interp, [input]).unwrap();
                    assert_eq!(output, vec![out]);
                    validate_trace(trace, interp.end_trace().unwrap());
                }
            }
        }

        #[test]
        fn part2_jump_examples() {
            let templates = [
                interp![3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9],
                interp![3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1],
            ];

            for i in [0, 1] {
                let mut interps = templates.clone();
                let mut v = vec![];
                for interp in interps.iter_mut() {
                    interp
                        .exec_instruction(&mut std::iter::once(i), &mut v)
                        .unwrap();
                    interp.start_trace();
                    interp.exec_instruction(&mut empty(), &mut v).unwrap();
                    assert!(v.is_empty());
                }
                let modes: [[ParamMode; 3]; 2] = core::array::from_fn(|i| {
                    let Trace(trace) = interps[i].end_trace().unwrap();
                    assert_eq!(trace.len(), 1);
                    trace[0].param_modes()
                });
                for mut interp in interps {
                    assert_eq!(run_to_end(&mut interp, empty()).unwrap(), vec![i]);
                }
                assert_eq!(
                    modes,
                    [
                        [ParamMode::Positional; 3],
                        [
                            ParamMode::Immediate,
                            ParamMode::Immediate,
                            ParamMode::Positional
                        ]
                    ]
                );
            }
        }

        /// `JZ` on an immediate zero takes the branch that writes 222, rather than falling
        /// through to the one that writes 111
        #[test]
        fn jump_if_false_transfers_control() {
            let branches = |cond| {
                interp![
                    1106, cond, 8, // JZ #cond, #8
                    1101, 111, 0, 0, // mem[0] = 111
                    99,
                    1101, 222, 0, 0, // mem[0] = 222
                    99
                ]
            };
            let taken = branches(0).execute(empty()).unwrap();
            assert_eq!(taken.diagnostic(), 222);
            assert_eq!(taken.steps, 3);
            let not_taken = branches(1).execute(empty()).unwrap();
            assert_eq!(not_taken.diagnostic(), 111);
        }

        #[test]
        fn larger_example() {
            let template = interp![
                3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36,
                98, 0, 0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000,
                1, 20, 4, 20, 1105, 1, 46, 98, 99
            ];
            for (input, expected) in [(7, 999), (8, 1000), (9, 1001)] {
                assert_eq!(template.clone().execute([input]).unwrap().diagnostic(), expected);
            }
        }
    }
}

mod malformed_programs {
    use crate::*;

    #[test]
    fn destination_past_end() {
        let mut interp = interp![1, 0, 0, 7, 99];
        assert_eq!(
            run_to_end(&mut interp, empty()).unwrap_err().left(),
            Some(InterpreterError::OutOfBounds(OutOfBounds { address: 7, len: 5 }))
        );
        assert_eq!(interp.memory().len(), 5);
    }

    #[test]
    fn missing_halt() {
        let mut interp = interp![1, 0, 0, 0];
        assert_eq!(
            run_to_end(&mut interp, empty()).unwrap_err().left(),
            Some(InterpreterError::MalformedProgram { ip: 4 })
        );
    }

    #[test]
    fn unsupported_opcode_in_baseline() {
        let result = interp![1, 0, 0, 0, 4, 0, 99]
            .with_instruction_set(InstructionSet::Baseline)
            .execute(empty());
        assert_eq!(result, Err(InterpreterError::InvalidOpcode { op: 4, ip: 4 }));
    }

    #[test]
    fn awaiting_input() {
        let mut interp = interp![4, 0, 3, 0, 99];
        let Err(Either::Right(Awaiting { output })) = run_to_end(&mut interp, empty()) else {
            panic!("expected the interpreter to wait for input");
        };
        assert_eq!(output, vec![4]);
    }
}

#[derive(Debug)]
struct Awaiting {
    output: Vec<i64>,
}
