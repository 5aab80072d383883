// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Loading Intcode programs
//!
//! Programs are usually distributed as comma-separated decimal integers, but they can also be
//! stored as packed 64-bit integers of either endianness.

use std::error::Error;
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::Utf8Error;

/// The encoding of a stored Intcode program
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Format {
    /// decimal integers, separated by commas, whitespace, or both
    #[default]
    Text,
    /// little-endian 64-bit integers
    LittleEndian,
    /// big-endian 64-bit integers
    BigEndian,
}

/// A program couldn't be loaded
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LoadError {
    /// [Text](Format::Text) input wasn't valid UTF-8
    NotUtf8(Utf8Error),
    /// A token in [Text](Format::Text) input wasn't an integer
    BadInt {
        /// the offending token
        token: Box<str>,
        /// why it couldn't be parsed
        source: ParseIntError,
    },
    /// Binary input ended partway through an integer
    IncompleteI64(Box<[u8]>),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotUtf8(e) => write!(f, "error parsing input: {e}"),
            LoadError::BadInt { token, source } => {
                write!(f, "error parsing input: {token:?}: {source}")
            }
            LoadError::IncompleteI64(rem) => {
                write!(f, "expected 8 bytes, got {}: {:02x?}", rem.len(), rem)
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::NotUtf8(e) => Some(e),
            LoadError::BadInt { source, .. } => Some(source),
            LoadError::IncompleteI64(_) => None,
        }
    }
}

/// Parse decimal integers separated by commas and/or whitespace
///
/// Empty input is an empty program.
///
/// ```
/// use intcode_solver::loader::parse_text;
/// assert_eq!(parse_text("1,9,10,3,\n2,3,11,0, 99\n"), Ok(vec![1, 9, 10, 3, 2, 3, 11, 0, 99]));
/// assert_eq!(parse_text("104 -5 99"), Ok(vec![104, -5, 99]));
/// assert!(parse_text("1,,2").is_err());
/// ```
pub fn parse_text(input: &str) -> Result<Vec<i64>, LoadError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut program = Vec::new();
    for field in input.split(',') {
        // a blank field between commas is parsed as an empty token, which is rejected
        let blank = field.trim().is_empty().then_some("");
        for token in field.split_whitespace().chain(blank) {
            program.push(token.parse().map_err(|source| LoadError::BadInt {
                token: Box::from(token),
                source,
            })?);
        }
    }
    Ok(program)
}

fn load_bin<F: Fn([u8; 8]) -> i64>(input: &[u8], func: F) -> Result<Vec<i64>, LoadError> {
    let (chunks, remainder) = input.as_chunks::<8>();
    if remainder.is_empty() {
        Ok(chunks.iter().copied().map(func).collect())
    } else {
        Err(LoadError::IncompleteI64(Box::from(remainder)))
    }
}

impl Format {
    /// Parse `input` as a program stored in this format
    pub fn parse(self, input: &[u8]) -> Result<Vec<i64>, LoadError> {
        match self {
            Format::Text => parse_text(str::from_utf8(input).map_err(LoadError::NotUtf8)?),
            Format::LittleEndian => load_bin(input, i64::from_le_bytes),
            Format::BigEndian => load_bin(input, i64::from_be_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_separators() {
        assert_eq!(parse_text("1, 0,0 0\t99\n"), Ok(vec![1, 0, 0, 0, 99]));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_text(" \n"), Ok(vec![]));
        assert_eq!(Format::LittleEndian.parse(&[]), Ok(vec![]));
    }

    #[test]
    fn double_comma_rejected() {
        assert!(matches!(
            parse_text("1,,2"),
            Err(LoadError::BadInt { token, .. }) if token.is_empty()
        ));
    }

    #[test]
    fn bad_token() {
        let err = parse_text("1,x,2").unwrap_err();
        assert!(err.to_string().contains("\"x\""), "{err}");
    }

    #[test]
    fn binary_formats() {
        let le: Vec<u8> = [1i64, -1, 99].iter().flat_map(|i| i.to_le_bytes()).collect();
        let be: Vec<u8> = [1i64, -1, 99].iter().flat_map(|i| i.to_be_bytes()).collect();
        assert_eq!(Format::LittleEndian.parse(&le), Ok(vec![1, -1, 99]));
        assert_eq!(Format::BigEndian.parse(&be), Ok(vec![1, -1, 99]));
    }

    #[test]
    fn incomplete_binary() {
        assert_eq!(
            Format::BigEndian.parse(&[0; 11]),
            Err(LoadError::IncompleteI64(Box::from([0u8; 3].as_slice())))
        );
    }
}
