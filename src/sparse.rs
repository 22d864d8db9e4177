//! # Sparse binary matrix representation and GF(2) algebra
//!
//! This module implements a representation for sparse binary matrices based on
//! the alist format used to handle LDPC parity check matrices, together with
//! the GF(2) products used by the encoder and the decoder: row and matrix
//! products with a dense vector and back-substitution through a lower
//! triangular matrix.

use crate::gf2::GF2;
use num_traits::Zero;
use std::ops::Range;
use std::slice::Iter;
use thiserror::Error;

/// Sparse matrix algebra error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A row references a column outside the bounds of the vector it is
    /// multiplied with.
    #[error("row {row} references index {index} of a vector of length {len}")]
    IndexOutOfRange {
        /// Row containing the offending entry.
        row: usize,
        /// Column index of the entry.
        index: usize,
        /// Length of the vector.
        len: usize,
    },
    /// A row references a column above the diagonal during back-substitution.
    #[error("entry ({row}, {col}) is above the diagonal of a lower triangular matrix")]
    NotLowerTriangular {
        /// Row containing the offending entry.
        row: usize,
        /// Column index of the entry.
        col: usize,
    },
    /// The vector length does not match the matrix dimension.
    #[error("expected a vector of length {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Length found.
        found: usize,
    },
}

/// A [`Result`](std::result::Result) type with a sparse algebra [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A sparse binary matrix
///
/// The internal representation for this matrix is based on the alist format:
/// both the list of ones in each row and the list of ones in each column are
/// kept.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct SparseMatrix {
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
}

impl SparseMatrix {
    /// Create a new sparse matrix of a given size
    ///
    /// The matrix is inizialized to the zero matrix.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::sparse::SparseMatrix;
    /// let h = SparseMatrix::new(4, 8);
    /// assert_eq!(h.num_rows(), 4);
    /// assert_eq!(h.num_cols(), 8);
    /// ```
    pub fn new(nrows: usize, ncols: usize) -> SparseMatrix {
        SparseMatrix {
            rows: vec![Vec::new(); nrows],
            cols: vec![Vec::new(); ncols],
        }
    }

    /// Creates a matrix with `ncols` columns from the list of ones of each row
    ///
    /// Returns an error if some row references a column `>= ncols`.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::sparse::SparseMatrix;
    /// let h = SparseMatrix::from_rows(4, &[vec![0, 2], vec![1, 3]]).unwrap();
    /// assert!(h.contains(1, 3));
    /// assert!(SparseMatrix::from_rows(3, &[vec![0, 3]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[usize]>>(ncols: usize, rows: &[R]) -> Result<SparseMatrix> {
        let mut h = SparseMatrix::new(rows.len(), ncols);
        for (r, row) in rows.iter().enumerate() {
            for &c in row.as_ref() {
                if c >= ncols {
                    return Err(Error::IndexOutOfRange {
                        row: r,
                        index: c,
                        len: ncols,
                    });
                }
                h.insert(r, c);
            }
        }
        Ok(h)
    }

    /// Returns the number of rows of the matrix
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns of the matrix
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    /// Returns the number of entries equal to one in a row
    pub fn row_weight(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Returns the number of entries equal to one in a column
    pub fn col_weight(&self, col: usize) -> usize {
        self.cols[col].len()
    }

    /// Returns the total number of entries equal to one
    ///
    /// This is the number of edges of the Tanner graph of the matrix.
    pub fn num_ones(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the entry corresponding to a particular
    /// row and column is a one
    pub fn contains(&self, row: usize, col: usize) -> bool {
        // typically columns are shorter, so we search in the column
        self.cols[col].contains(&row)
    }

    /// Inserts a one in a particular row and column
    ///
    /// Entries are appended, so inserting in increasing row and column order
    /// keeps the row and column lists sorted.
    pub fn insert(&mut self, row: usize, col: usize) {
        self.rows[row].push(col);
        self.cols[col].push(row);
    }

    /// Returns an [Iterator] over the entries equal to one
    /// in a particular row
    pub fn iter_row(&self, row: usize) -> Iter<'_, usize> {
        self.rows[row].iter()
    }

    /// Returns an [Iterator] over the entries equal to one
    /// in a particular column
    pub fn iter_col(&self, col: usize) -> Iter<'_, usize> {
        self.cols[col].iter()
    }

    /// Returns an [Iterator] over all the `(row, col)` entries equal to one
    pub fn iter_all(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |&c| (r, c)))
    }

    /// Returns the row lists of the matrix
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Extracts the submatrix formed by a range of rows and a range of columns
    ///
    /// The indices of the submatrix are relative to the start of the ranges.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::sparse::SparseMatrix;
    /// let h = SparseMatrix::from_rows(4, &[vec![0, 2], vec![1, 3], vec![2, 3]]).unwrap();
    /// let s = h.submatrix(1..3, 2..4);
    /// assert_eq!(s.rows(), &[vec![1], vec![0, 1]]);
    /// ```
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> SparseMatrix {
        let mut s = SparseMatrix::new(rows.len(), cols.len());
        for (j, r) in rows.enumerate() {
            for &c in self.rows[r].iter().filter(|c| cols.contains(c)) {
                s.insert(j, c - cols.start);
            }
        }
        s
    }

    /// Multiplies a single row by a vector over GF(2)
    ///
    /// The result is the XOR of the entries of `v` selected by the ones of
    /// `row`.
    pub fn mul_row(&self, row: usize, v: &[GF2]) -> Result<GF2> {
        self.rows[row].iter().try_fold(GF2::zero(), |acc, &c| {
            v.get(c).map(|&x| acc + x).ok_or(Error::IndexOutOfRange {
                row,
                index: c,
                len: v.len(),
            })
        })
    }

    /// Multiplies the matrix by a column vector over GF(2)
    ///
    /// The result has one element per row of the matrix.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::{gf2::GF2, sparse::SparseMatrix};
    /// let h = SparseMatrix::from_rows(3, &[vec![0, 1], vec![1, 2]]).unwrap();
    /// let v = GF2::from_bits(&[1, 1, 0]);
    /// assert_eq!(GF2::to_bits(&h.mul_vec(&v).unwrap()), [0, 1]);
    /// ```
    pub fn mul_vec(&self, v: &[GF2]) -> Result<Vec<GF2>> {
        (0..self.num_rows()).map(|r| self.mul_row(r, v)).collect()
    }

    /// Solves `T y = rhs` where `T` is this matrix, by back-substitution
    ///
    /// The matrix is taken as unit lower triangular: `y[0] = rhs[0]` and
    /// `y[i]` is `rhs[i]` plus the sum of the `y[j]` for the ones at `j < i`
    /// in row `i`. A one on the diagonal is implied whether it is stored or
    /// not, so the parity blocks of the code tables, which store their
    /// diagonal, are accepted as they are. Only ones strictly above the
    /// diagonal make the substitution ill-defined, and they are reported as
    /// [`Error::NotLowerTriangular`].
    pub fn back_substitute(&self, rhs: &[GF2]) -> Result<Vec<GF2>> {
        if rhs.len() != self.num_rows() {
            return Err(Error::DimensionMismatch {
                expected: self.num_rows(),
                found: rhs.len(),
            });
        }
        let mut y: Vec<GF2> = Vec::with_capacity(rhs.len());
        for (i, (row, &b)) in self.rows.iter().zip(rhs.iter()).enumerate() {
            let mut acc = b;
            for &j in row {
                if j > i {
                    return Err(Error::NotLowerTriangular { row: i, col: j });
                }
                if j < i {
                    acc += y[j];
                }
            }
            y.push(acc);
        }
        Ok(y)
    }

    /// Returns `true` if the matrix is square, lower triangular and has
    /// ones on its whole diagonal
    ///
    /// These are the matrices that [`SparseMatrix::back_substitute`] inverts.
    pub fn is_unit_lower_triangular(&self) -> bool {
        self.num_rows() == self.num_cols()
            && self
                .rows
                .iter()
                .enumerate()
                .all(|(i, row)| row.contains(&i) && row.iter().all(|&j| j <= i))
    }

    /// Writes the matrix in alist format to a writer
    ///
    /// # Errors
    /// If a call to `write!()` returns an error, this function returns
    /// such an error.
    pub fn write_alist<W: std::fmt::Write>(&self, w: &mut W) -> std::fmt::Result {
        fn max_len(lists: &[Vec<usize>]) -> usize {
            lists.iter().map(Vec::len).max().unwrap_or(0)
        }
        writeln!(w, "{} {}", self.num_cols(), self.num_rows())?;
        writeln!(w, "{} {} ", max_len(&self.cols), max_len(&self.rows))?;
        for lists in [&self.cols, &self.rows] {
            for l in lists.iter() {
                write!(w, "{} ", l.len())?;
            }
            writeln!(w)?;
        }
        // alist indices are 1-based
        for lists in [&self.cols, &self.rows] {
            for l in lists.iter() {
                let mut sorted = l.clone();
                sorted.sort_unstable();
                for x in sorted {
                    write!(w, "{} ", x + 1)?;
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }

    /// Returns a [`String`] with the alist representation of the matrix
    pub fn alist(&self) -> String {
        let mut s = String::new();
        // writing to a String cannot fail
        let _ = self.write_alist(&mut s);
        s
    }
}

/// Appends zeros to a vector until it reaches `len` elements
///
/// A vector that already has `len` or more elements is returned unchanged;
/// it is never truncated.
///
/// # Examples
/// ```
/// # use ldpc802::sparse::zero_pad;
/// assert_eq!(zero_pad(&[1u8, 2, 3], 5), [1, 2, 3, 0, 0]);
/// assert_eq!(zero_pad(&[1u8, 2, 3], 2), [1, 2, 3]);
/// ```
pub fn zero_pad<T: Zero + Clone>(v: &[T], len: usize) -> Vec<T> {
    let mut out = v.to_vec();
    if out.len() < len {
        out.resize(len, T::zero());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(b: &[u8]) -> Vec<GF2> {
        GF2::from_bits(b)
    }

    #[test]
    fn test_insert() {
        let mut h = SparseMatrix::new(100, 300);
        assert!(!h.contains(27, 154));
        h.insert(27, 154);
        assert!(h.contains(27, 154));
        assert!(!h.contains(28, 154));
        assert_eq!(h.num_ones(), 1);
    }

    #[test]
    fn multiply() {
        // 1 0 1 1
        // 0 1 0 1
        // 1 1 0 0
        // 1 1 1 1
        let h = SparseMatrix::from_rows(4, &[vec![0, 2, 3], vec![1, 3], vec![0, 1], vec![0, 1, 2, 3]])
            .unwrap();
        let v = bits(&[1, 0, 1, 0]);
        assert_eq!(h.mul_vec(&v).unwrap(), bits(&[0, 0, 1, 0]));
        assert_eq!(h.mul_row(2, &v).unwrap(), GF2::from(true));
    }

    #[test]
    fn multiply_out_of_range() {
        let h = SparseMatrix::from_rows(6, &[vec![0, 1], vec![2, 5]]).unwrap();
        assert_eq!(
            h.mul_vec(&bits(&[1, 0, 1])),
            Err(Error::IndexOutOfRange {
                row: 1,
                index: 5,
                len: 3
            })
        );
    }

    #[test]
    fn back_substitution() {
        // 1 0 0 0 0
        // 0 1 0 0 0
        // 1 1 1 0 0
        // 1 0 1 1 0
        // 0 1 1 0 1
        let t = SparseMatrix::from_rows(
            5,
            &[vec![0], vec![1], vec![0, 1, 2], vec![0, 2, 3], vec![1, 2, 4]],
        )
        .unwrap();
        assert!(t.is_unit_lower_triangular());
        let v = bits(&[1, 0, 1, 0, 1]);
        let x = t.mul_vec(&v).unwrap();
        assert_eq!(x, bits(&[1, 0, 0, 0, 0]));
        assert_eq!(t.back_substitute(&x).unwrap(), v);
    }

    #[test]
    fn back_substitution_implicit_diagonal() {
        let strict = SparseMatrix::from_rows(3, &[vec![], vec![0], vec![0, 1]]).unwrap();
        let unit = SparseMatrix::from_rows(3, &[vec![0], vec![0, 1], vec![0, 1, 2]]).unwrap();
        let rhs = bits(&[1, 1, 0]);
        assert_eq!(
            strict.back_substitute(&rhs).unwrap(),
            unit.back_substitute(&rhs).unwrap()
        );
        assert!(!strict.is_unit_lower_triangular());
    }

    #[test]
    fn back_substitution_malformed() {
        let t = SparseMatrix::from_rows(3, &[vec![0], vec![1, 2], vec![2]]).unwrap();
        assert!(!t.is_unit_lower_triangular());
        assert_eq!(
            t.back_substitute(&bits(&[0, 1, 1])),
            Err(Error::NotLowerTriangular { row: 1, col: 2 })
        );
        assert_eq!(
            t.back_substitute(&bits(&[0, 1])),
            Err(Error::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn submatrix() {
        let h = SparseMatrix::from_rows(6, &[vec![0, 3, 4], vec![1, 2, 5], vec![0, 5]]).unwrap();
        let s = h.submatrix(0..2, 3..6);
        assert_eq!(s.num_rows(), 2);
        assert_eq!(s.num_cols(), 3);
        assert_eq!(s.rows(), &[vec![0, 1], vec![2]]);
        assert!(s.contains(1, 2));
    }

    #[test]
    fn padding() {
        let v = bits(&[1, 1]);
        assert_eq!(zero_pad(&v, 4), bits(&[1, 1, 0, 0]));
        assert_eq!(zero_pad(&v, 1), v);
        assert_eq!(zero_pad(&[1u8, 2, 3, 4, 5, 6], 9), [1, 2, 3, 4, 5, 6, 0, 0, 0]);
    }

    #[test]
    fn test_alist() {
        let mut h = SparseMatrix::new(4, 12);
        for j in 0..4 {
            h.insert(j, j);
            h.insert(j, j + 4);
            h.insert(j, j + 8);
        }
        let expected = "12 4
1 3
1 1 1 1 1 1 1 1 1 1 1 1
3 3 3 3
1
2
3
4
1
2
3
4
1
2
3
4
1 5 9
2 6 10
3 7 11
4 8 12
";
        assert_eq!(h.alist(), expected);
    }
}
