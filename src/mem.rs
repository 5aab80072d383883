// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Fixed-size program memory
//!
//! Unlike a paged or growable memory, a [ProgramMemory] never changes length once it's been
//! created. Every read and write is checked, and accessing an address outside of the allocated
//! cells returns an [OutOfBounds] error instead of growing the buffer.

use itertools::Itertools;
use std::error::Error;
use std::fmt::{self, Display};

/// An attempt was made to access memory at an address that was never allocated
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OutOfBounds {
    /// the offending address
    pub address: i64,
    /// the number of allocated cells at the time
    pub len: usize,
}

impl Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address {} is out of bounds for memory of length {}",
            self.address, self.len
        )
    }
}

impl Error for OutOfBounds {}

/// The mutable integer array an Intcode program executes against
///
/// Code and data share the same cells, so programs can (and do) modify themselves.
///
/// # Example
///
/// ```
/// use intcode_solver::mem::{OutOfBounds, ProgramMemory};
/// let mut mem = ProgramMemory::from(vec![1, 0, 0, 0, 99]);
/// mem.set(0, 2).unwrap();
/// assert_eq!(mem.get(0), Ok(2));
/// assert_eq!(mem.get(5), Err(OutOfBounds { address: 5, len: 5 }));
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ProgramMemory {
    cells: Box<[i64]>,
}

impl ProgramMemory {
    /// The number of allocated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are allocated at all
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert `address` into an index into `self.cells` if it's in range
    fn slot(&self, address: i64) -> Result<usize, OutOfBounds> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or(OutOfBounds {
                address,
                len: self.cells.len(),
            })
    }

    /// Read the cell at `address`
    #[doc(alias = "peek")]
    pub fn get(&self, address: i64) -> Result<i64, OutOfBounds> {
        self.slot(address).map(|i| self.cells[i])
    }

    /// Write `value` into the cell at `address`
    #[doc(alias("poke", "write"))]
    pub fn set(&mut self, address: i64, value: i64) -> Result<(), OutOfBounds> {
        let i = self.slot(address)?;
        self.cells[i] = value;
        Ok(())
    }

    /// View the whole memory as a slice
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Consume the memory, returning its cells
    pub fn into_vec(self) -> Vec<i64> {
        self.cells.into_vec()
    }
}

impl From<Vec<i64>> for ProgramMemory {
    fn from(cells: Vec<i64>) -> Self {
        Self {
            cells: cells.into_boxed_slice(),
        }
    }
}

impl FromIterator<i64> for ProgramMemory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ProgramMemory {
    type Item = i64;
    type IntoIter = std::vec::IntoIter<i64>;
    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// Panics if `i` is out of bounds. Use [ProgramMemory::get] to handle that case.
impl std::ops::Index<i64> for ProgramMemory {
    type Output = i64;
    fn index(&self, i: i64) -> &i64 {
        match self.slot(i) {
            Ok(slot) => &self.cells[slot],
            Err(e) => panic!("{e}"),
        }
    }
}

/// Panics if `i` is out of bounds. Use [ProgramMemory::set] to handle that case.
impl std::ops::IndexMut<i64> for ProgramMemory {
    fn index_mut(&mut self, i: i64) -> &mut i64 {
        match self.slot(i) {
            Ok(slot) => &mut self.cells[slot],
            Err(e) => panic!("{e}"),
        }
    }
}

/// Formats as comma-separated decimal integers, which is the same format
/// [parse_text](crate::loader::parse_text) accepts.
impl Display for ProgramMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cells.iter().format(","))
    }
}

impl fmt::Debug for ProgramMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cells.iter()).finish()
    }
}
