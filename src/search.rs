// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Brute-force search for the inputs of a [Day 2] style program
//!
//! Those programs take two inputs, the *noun* and *verb*, which are written to addresses `1` and
//! `2` before the program starts. Each is in the range `0..=99`, so there are only 10,000 possible
//! pairs, and they can all be tried.
//!
//! Every pair is run against a fresh clone of the original [Interpreter], so nothing one trial
//! writes can affect another. Pairs are tried in row-major order (noun ascending, then verb
//! ascending), and the first pair that produces the target is the one reported, even when the
//! search is split across several threads.
//!
//! A trial that halts with the wrong [diagnostic](crate::ExecutionResult::diagnostic) is just a
//! non-match. A trial that fails in any other way means the program is broken or incompatible, so
//! the whole search stops with [SearchError::Fault].
//!
//! [Day 2]: https://adventofcode.com/2019/day/2

use super::{Interpreter, InterpreterError};
use crate::mem::OutOfBounds;
use itertools::iproduct;
use std::error::Error;
use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// A noun and verb to start a program with
///
/// The derived ordering is row-major: by noun first, then by verb.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct NounVerb {
    /// the value written to address `1`
    pub noun: i64,
    /// the value written to address `2`
    pub verb: i64,
}

impl NounVerb {
    /// The largest value that either the noun or the verb can take
    pub const MAX: i64 = 99;

    /// Combine into a single number, as `100 * noun + verb`
    pub const fn encode(self) -> i64 {
        100 * self.noun + self.verb
    }

    /// Write the noun and verb into `interp`'s memory
    pub fn apply(self, interp: &mut Interpreter) -> Result<(), OutOfBounds> {
        interp.mem_set(1, self.noun)?;
        interp.mem_set(2, self.verb)
    }

    /// Every possible pair, in the order they're searched
    pub fn all() -> impl Iterator<Item = Self> {
        iproduct!(0..=Self::MAX, 0..=Self::MAX).map(|(noun, verb)| Self { noun, verb })
    }

    /// The position of `self` in [NounVerb::all]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, reason = "both in 0..=99")]
    fn position(self) -> usize {
        (self.noun * (Self::MAX + 1) + self.verb) as usize
    }
}

impl Display for NounVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "noun {}, verb {}", self.noun, self.verb)
    }
}

/// Settings for [search]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Inputs supplied to `IN` instructions during every trial
    pub inputs: Vec<i64>,
    /// The number of worker threads to split the search across
    pub threads: NonZeroUsize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            threads: NonZeroUsize::MIN,
        }
    }
}

/// The search didn't produce a match
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SearchError {
    /// Every pair ran successfully, but none produced the target
    NotFound {
        /// the value that was searched for
        target: i64,
    },
    /// Running the program with `pair` failed
    Fault {
        /// the pair that was being tried
        pair: NounVerb,
        /// what went wrong
        error: InterpreterError,
    },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NotFound { target } => {
                write!(f, "no noun and verb in 0..=99 produce {target}")
            }
            SearchError::Fault { pair, error } => write!(f, "running with {pair} failed: {error}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::NotFound { .. } => None,
            SearchError::Fault { error, .. } => Some(error),
        }
    }
}

/// Run a clone of `program` with `pair`, returning its diagnostic value
///
/// ```
/// use intcode_solver::prelude::*;
/// use intcode_solver::search::trial;
/// let program = Interpreter::new([1, 0, 0, 0, 99]);
/// assert_eq!(trial(&program, NounVerb { noun: 4, verb: 4 }, &[]), Ok(198));
/// // the original is untouched
/// assert_eq!(program[1], 0);
/// ```
pub fn trial(
    program: &Interpreter,
    pair: NounVerb,
    inputs: &[i64],
) -> Result<i64, InterpreterError> {
    let mut interp = program.clone();
    interp.end_trace();
    pair.apply(&mut interp)?;
    Ok(interp.execute(inputs.iter().copied())?.diagnostic())
}

/// Find the first [NounVerb] for which `program` reports `target`
///
/// `program` is never modified. Its step limit and instruction set apply to every trial.
///
/// # Example
///
/// ```
/// use intcode_solver::prelude::*;
/// use intcode_solver::search::search;
/// use std::num::NonZeroUsize;
/// // address 0 gets mem[noun] * mem[verb]
/// let mut code = vec![2, 0, 0, 0, 99];
/// code.extend(5..100);
/// let program = Interpreter::new(code);
///
/// let config = SearchConfig { threads: NonZeroUsize::new(4).unwrap(), ..Default::default() };
/// let found = search(&program, 91, &config).unwrap();
/// assert_eq!(found, NounVerb { noun: 1, verb: 91 });
///
/// assert_eq!(
///     search(&program, -1, &config),
///     Err(SearchError::NotFound { target: -1 })
/// );
/// ```
pub fn search(
    program: &Interpreter,
    target: i64,
    config: &SearchConfig,
) -> Result<NounVerb, SearchError> {
    let first = if config.threads.get() == 1 {
        scan(program, target, &config.inputs, NounVerb::all(), None)
    } else {
        scan_parallel(program, target, &config.inputs, config.threads.get())
    };
    match first {
        None => Err(SearchError::NotFound { target }),
        Some((pair, Ok(()))) => Ok(pair),
        Some((pair, Err(error))) => Err(SearchError::Fault { pair, error }),
    }
}

type Event = (NounVerb, Result<(), InterpreterError>);

/// Try each of `pairs` in order, stopping at the first match or fault
///
/// If `cutoff` is set, gives up once another thread has found an event at an earlier position.
fn scan(
    program: &Interpreter,
    target: i64,
    inputs: &[i64],
    pairs: impl Iterator<Item = NounVerb>,
    cutoff: Option<&AtomicUsize>,
) -> Option<Event> {
    for pair in pairs {
        if cutoff.is_some_and(|c| c.load(Ordering::Relaxed) <= pair.position()) {
            return None;
        }
        let event = match trial(program, pair, inputs) {
            Ok(diagnostic) if diagnostic == target => Ok(()),
            Ok(_) => continue,
            Err(error) => Err(error),
        };
        if let Some(c) = cutoff {
            c.fetch_min(pair.position(), Ordering::Relaxed);
        }
        return Some((pair, event));
    }
    None
}

/// Split the nouns between `threads` workers, interleaved so each worker's pairs are still in
/// ascending order
fn scan_parallel(
    program: &Interpreter,
    target: i64,
    inputs: &[i64],
    threads: usize,
) -> Option<Event> {
    let cutoff = AtomicUsize::new(usize::MAX);
    thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let cutoff = &cutoff;
                s.spawn(move || {
                    let pairs = NounVerb::all()
                        .filter(|pair| pair.noun as usize % threads == worker);
                    scan(program, target, inputs, pairs, Some(cutoff))
                })
            })
            .collect();
        workers
            .into_iter()
            .filter_map(|w| w.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .min_by_key(|(pair, _)| *pair)
    })
}
