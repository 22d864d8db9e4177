//! LDPC code definitions.
//!
//! A [`Code`] is the immutable definition of an `(n, k)` LDPC code through its
//! `m x n` parity check matrix, with `k = n - m`. Codes are validated when they
//! are constructed and shared read-only (through [`Arc`]) by any number of
//! encoders and decoders.
//!
//! The [`CodeTable`] holds all the [IEEE 802.11 codes](ieee80211), built once
//! per process on first use.

use crate::sparse::SparseMatrix;
use ieee80211::Ieee80211Code;
pub use ieee80211::{BlockLength, Rate};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

pub mod ieee80211;

/// Code definition error.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The rate and block length do not correspond to a code in the table.
    #[error("no code with rate {rate} and block length {block_length}")]
    UnknownCode {
        /// Requested rate.
        rate: String,
        /// Requested block length.
        block_length: String,
    },
    /// The parity check matrix is not well formed.
    #[error("malformed code: {0}")]
    MalformedCode(String),
    /// The string does not name a code rate.
    #[error("invalid code rate: {0}")]
    InvalidRate(String),
    /// The string does not name a block length.
    #[error("invalid block length: {0}")]
    InvalidBlockLength(String),
}

/// A [`Result`](std::result::Result) type with a code definition [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// LDPC code definition.
///
/// Invariants, checked on construction: each row of H is an ascending list of
/// distinct column indices smaller than `n`, every column contains at least a
/// one, and there are fewer checks than codeword bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    h: SparseMatrix,
    circulant_size: Option<usize>,
}

impl Code {
    /// Creates a code of length `n` from the rows of its parity check matrix.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::codes::Code;
    /// let code = Code::new(
    ///     8,
    ///     vec![vec![1, 3, 4, 7], vec![0, 1, 2, 5], vec![2, 5, 6, 7], vec![0, 3, 4, 6]],
    /// )
    /// .unwrap();
    /// assert_eq!((code.n(), code.m(), code.k()), (8, 4, 4));
    /// assert!(Code::new(8, vec![vec![3, 1]]).is_err());
    /// ```
    pub fn new(n: usize, rows: Vec<Vec<usize>>) -> Result<Code> {
        if rows.is_empty() || rows.len() >= n {
            return Err(Error::MalformedCode(format!(
                "{} checks for {} codeword bits",
                rows.len(),
                n
            )));
        }
        for (r, row) in rows.iter().enumerate() {
            if let Some(&c) = row.iter().find(|&&c| c >= n) {
                return Err(Error::MalformedCode(format!(
                    "row {r} references column {c} >= {n}"
                )));
            }
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::MalformedCode(format!(
                    "row {r} is not strictly ascending"
                )));
            }
        }
        let h = SparseMatrix::from_rows(n, &rows)
            .map_err(|e| Error::MalformedCode(e.to_string()))?;
        if let Some(c) = (0..n).find(|&c| h.col_weight(c) == 0) {
            return Err(Error::MalformedCode(format!(
                "column {c} is not checked by any row"
            )));
        }
        Ok(Code {
            h,
            circulant_size: None,
        })
    }

    /// Creates a quasi-cyclic code by expanding a base matrix.
    ///
    /// Each entry `s >= 0` of the base matrix at block `(br, bc)` becomes the
    /// `z x z` identity matrix cyclically shifted by `s`: row `br * z + r` has
    /// a one at column `bc * z + (r + s) % z`. Negative entries are zero
    /// blocks.
    pub fn from_base_matrix<R: AsRef<[i16]>>(base: &[R], z: usize) -> Result<Code> {
        let block_cols = base.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut rows = Vec::with_capacity(base.len() * z);
        for (br, base_row) in base.iter().enumerate() {
            let base_row = base_row.as_ref();
            if base_row.len() != block_cols {
                return Err(Error::MalformedCode(format!(
                    "base matrix row {br} has {} blocks instead of {block_cols}",
                    base_row.len()
                )));
            }
            if let Some(s) = base_row.iter().find(|&&s| usize::try_from(s).map_or(false, |s| s >= z))
            {
                return Err(Error::MalformedCode(format!(
                    "shift {s} in base matrix row {br} exceeds circulant size {z}"
                )));
            }
            for r in 0..z {
                rows.push(
                    base_row
                        .iter()
                        .enumerate()
                        .filter_map(|(bc, &s)| {
                            usize::try_from(s).ok().map(|s| bc * z + (r + s) % z)
                        })
                        .collect(),
                );
            }
        }
        let mut code = Code::new(block_cols * z, rows)?;
        code.circulant_size = Some(z);
        Ok(code)
    }

    /// Returns the codeword length `n`.
    pub fn n(&self) -> usize {
        self.h.num_cols()
    }

    /// Returns the number of parity checks `m`.
    pub fn m(&self) -> usize {
        self.h.num_rows()
    }

    /// Returns the number of message bits `k = n - m`.
    pub fn k(&self) -> usize {
        self.n() - self.m()
    }

    /// Returns the parity check matrix.
    pub fn h(&self) -> &SparseMatrix {
        &self.h
    }

    /// Returns the circulant size if the code was expanded from a base matrix.
    pub fn circulant_size(&self) -> Option<usize> {
        self.circulant_size
    }
}

/// Registry of the IEEE 802.11 codes.
///
/// Built once with [`CodeTable::global`] and read-only afterwards.
#[derive(Debug)]
pub struct CodeTable {
    codes: HashMap<(Rate, BlockLength), Arc<Code>>,
}

static TABLE: OnceLock<Result<CodeTable>> = OnceLock::new();

impl CodeTable {
    /// Builds a table containing every rate and block length.
    pub fn new() -> Result<CodeTable> {
        let mut codes = HashMap::new();
        for definition in enum_iterator::all::<Rate>().flat_map(|rate| {
            enum_iterator::all::<BlockLength>()
                .map(move |block_length| Ieee80211Code::new(rate, block_length))
        }) {
            codes.insert(
                (definition.rate(), definition.block_length()),
                Arc::new(definition.code()?),
            );
        }
        Ok(CodeTable { codes })
    }

    /// Returns the process-wide table, building it on first use.
    pub fn global() -> Result<&'static CodeTable> {
        TABLE
            .get_or_init(CodeTable::new)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the code with a given rate and block length.
    pub fn get(&self, rate: Rate, block_length: BlockLength) -> Result<Arc<Code>> {
        self.codes
            .get(&(rate, block_length))
            .cloned()
            .ok_or_else(|| Error::UnknownCode {
                rate: rate.to_string(),
                block_length: block_length.to_string(),
            })
    }

    /// Looks up a code by its rate and block length strings.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::codes::CodeTable;
    /// let table = CodeTable::global().unwrap();
    /// let code = table.lookup("3/4", "1944").unwrap();
    /// assert_eq!(code.k(), 1458);
    /// assert!(table.lookup("3/4", "2000").is_err());
    /// ```
    pub fn lookup(&self, rate: &str, block_length: &str) -> Result<Arc<Code>> {
        let unknown = || Error::UnknownCode {
            rate: rate.to_string(),
            block_length: block_length.to_string(),
        };
        let r = rate.parse::<Rate>().map_err(|_| unknown())?;
        let b = block_length.parse::<BlockLength>().map_err(|_| unknown())?;
        self.get(r, b)
    }

    /// Returns an [Iterator] over the codes, sorted by rate and block length.
    pub fn iter(&self) -> impl Iterator<Item = (Rate, BlockLength, &Arc<Code>)> + '_ {
        let mut keys: Vec<_> = self.codes.keys().copied().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(move |k| self.codes.get(&k).map(|code| (k.0, k.1, code)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn toy_code() -> Code {
        Code::new(
            8,
            vec![
                vec![1, 3, 4, 7],
                vec![0, 1, 2, 5],
                vec![2, 5, 6, 7],
                vec![0, 3, 4, 6],
            ],
        )
        .unwrap()
    }

    #[test]
    fn toy() {
        let code = toy_code();
        assert_eq!(code.n(), 8);
        assert_eq!(code.m(), 4);
        assert_eq!(code.k(), 4);
        assert_eq!(code.circulant_size(), None);
        assert!(code.h().contains(2, 6));
    }

    #[test]
    fn malformed() {
        let bad = [
            (4, vec![vec![0, 1], vec![2, 4]]),
            (4, vec![vec![1, 0], vec![2, 3]]),
            (4, vec![vec![0, 0, 1], vec![2, 3]]),
            (4, vec![vec![0, 1], vec![1, 2]]),
            (2, vec![vec![0], vec![1]]),
            (4, vec![]),
        ];
        for (n, rows) in bad {
            assert!(matches!(Code::new(n, rows), Err(Error::MalformedCode(_))));
        }
    }

    #[test]
    fn base_matrix_expansion() {
        let base = [[1i16, 0, -1], [-1, 2, 0]];
        let code = Code::from_base_matrix(&base, 3).unwrap();
        assert_eq!(code.n(), 9);
        assert_eq!(code.m(), 6);
        assert_eq!(code.circulant_size(), Some(3));
        assert_eq!(code.h().rows()[0], [1, 3]);
        assert_eq!(code.h().rows()[2], [0, 5]);
        assert_eq!(code.h().rows()[4], [3, 7]);
        assert!(Code::from_base_matrix(&[[3i16, 0]], 3).is_err());
    }

    #[test]
    fn table() {
        let table = CodeTable::global().unwrap();
        let edges = [
            ((Rate::R1_2, BlockLength::N648), 2376),
            ((Rate::R2_3, BlockLength::N648), 2376),
            ((Rate::R3_4, BlockLength::N648), 2376),
            ((Rate::R5_6, BlockLength::N648), 2376),
            ((Rate::R1_2, BlockLength::N1296), 4644),
            ((Rate::R2_3, BlockLength::N1296), 4752),
            ((Rate::R3_4, BlockLength::N1296), 4752),
            ((Rate::R5_6, BlockLength::N1296), 4590),
            ((Rate::R1_2, BlockLength::N1944), 6966),
            ((Rate::R2_3, BlockLength::N1944), 7128),
            ((Rate::R3_4, BlockLength::N1944), 6885),
            ((Rate::R5_6, BlockLength::N1944), 6399),
        ];
        for ((rate, block_length), ones) in edges {
            let code = table.get(rate, block_length).unwrap();
            let (num, den) = rate.fraction();
            assert_eq!(code.n(), block_length.n());
            assert_eq!(code.k(), block_length.n() * num / den);
            assert_eq!(code.circulant_size(), Some(block_length.circulant_size()));
            assert_eq!(code.h().num_ones(), ones);
            for row in code.h().rows() {
                assert!(row.windows(2).all(|w| w[0] < w[1]));
            }
        }
        assert_eq!(table.iter().count(), 12);
    }

    #[test]
    fn lookup() {
        let table = CodeTable::global().unwrap();
        let a = table.lookup("1/2", "648").unwrap();
        let b = table.get(Rate::R1_2, BlockLength::N648).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.k(), 324);
        assert_eq!(
            table.lookup("7/8", "648").unwrap_err(),
            Error::UnknownCode {
                rate: "7/8".to_string(),
                block_length: "648".to_string()
            }
        );
        assert!(matches!(
            table.lookup("1/2", "1000"),
            Err(Error::UnknownCode { .. })
        ));
    }

    #[test]
    fn iter_is_sorted() {
        let table = CodeTable::global().unwrap();
        let keys: Vec<_> = table.iter().map(|(r, b, _)| (r, b)).collect();
        assert_eq!(keys.first(), Some(&(Rate::R1_2, BlockLength::N648)));
        assert_eq!(keys.last(), Some(&(Rate::R5_6, BlockLength::N1944)));
    }
}
