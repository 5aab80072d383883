// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 2 built using the `intcode_solver` library.

use intcode_solver::loader::parse_text;
use intcode_solver::prelude::*;
use intcode_solver::search::{search, trial};
use std::num::NonZeroUsize;
use std::thread::available_parallelism;

fn part1(program: &Interpreter) -> i64 {
    trial(program, NounVerb { noun: 12, verb: 2 }, &[]).expect("intcode did not run to completion")
}

fn part2(program: &Interpreter) -> i64 {
    let config = SearchConfig {
        threads: available_parallelism().unwrap_or(NonZeroUsize::MIN),
        ..SearchConfig::default()
    };
    #[allow(clippy::unreadable_literal, reason = "from Advent of Code")]
    let found = search(program, 19690720, &config).expect("no answer found for part 2");
    found.encode()
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let code = parse_text(&input).unwrap();
    let interpreter = Interpreter::new(code).with_instruction_set(InstructionSet::Baseline);
    println!("part 1: {}", part1(&interpreter));
    println!("part 2: {}", part2(&interpreter));
}
