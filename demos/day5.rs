// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 5 built using the `intcode_solver` library.

use intcode_solver::loader::parse_text;
use intcode_solver::prelude::*;

/// Run the diagnostic program for the system with ID `system_id`
fn diagnose(i: Interpreter, system_id: i64) -> i64 {
    let result = i.execute([system_id]).unwrap();
    let (diagnostic, checks) = result.outputs.split_last().expect("no diagnostic code output");
    assert!(checks.iter().all(|&i| i == 0), "diagnostic failed");
    assert_eq!(*diagnostic, result.diagnostic());

    *diagnostic
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let interpreter = Interpreter::new(parse_text(&input).unwrap());
    println!("part 1: {}", diagnose(interpreter.clone(), 1));
    println!("part 2: {}", diagnose(interpreter, 5));
}
