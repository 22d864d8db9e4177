//! LDPC systematic encoder.
//!
//! This module implements a systematic encoder for an `(n, k)` [`Code`]. The
//! first `k` symbols of the codeword are the message and the last `n - k` are
//! parity. Writing the parity check matrix as `H = [H0 H1]`, with `H1` square,
//! the parity `p` solves `H1 p = H0 s` over GF(2) for the message `s`.
//!
//! The encoder chooses one of three strategies when it is constructed,
//! depending on the structure of H.
//!
//! In the triangular case, `H1` is unit lower triangular, so the parity is
//! obtained by back-substitution through `H1` after multiplying `H0` by the
//! message. Encoding is linear in the number of ones of H.
//!
//! The dual-diagonal case covers the IEEE 802.11 codes, whose parity part is
//! a staircase of identity blocks preceded by one block column of weight
//! three. With a gap of one circulant `g = Z`, H is split as
//!
//! ```text
//!     [ A B T ]   rows 0..m-g
//!     [ C D E ]   rows m-g..m
//! ```
//!
//! where T is unit lower triangular. When `E T^-1 B + D = I`, the first `g`
//! parity bits are `p1 = E T^-1 A s + C s` and the rest are
//! `p2 = T^-1 (A s + B p1)`, with `T^-1` applied by back-substitution. This
//! is also linear in the number of ones of H.
//!
//! In the general case, the encoder computes `G0 = H1^-1 H0` by Gaussian
//! elimination, which in general is a dense matrix, and the parity is `G0 s`.
//! Encoding complexity is O(n^2). If `H1` is singular the parity bits that
//! Gaussian elimination leaves free are set to zero, which still yields a
//! codeword as long as `H0 s` lies in the column space of `H1` for every
//! message.

use crate::{bits, codes::Code, gf2::GF2, sparse, sparse::SparseMatrix};
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1};
use num_traits::{One, Zero};
use thiserror::Error;

mod gauss;

/// LDPC encoder error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The message length is not `k`.
    #[error("expected a message of {expected} bits, found {found}")]
    LengthMismatch {
        /// Number of message bits of the code.
        expected: usize,
        /// Length of the message.
        found: usize,
    },
    /// The parity bits cannot be solved for every message.
    #[error("the parity check matrix does not admit a systematic encoder")]
    NotSystematic,
    /// Sparse algebra error, caused by a malformed parity check matrix.
    #[error(transparent)]
    Sparse(#[from] sparse::Error),
}

/// A [`Result`](std::result::Result) type with an encoder [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// LDPC systematic encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    n: usize,
    k: usize,
    encoder: EncoderType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EncoderType {
    // H1 is unit lower triangular.
    Triangular {
        h0: SparseMatrix,
        h1: SparseMatrix,
    },
    // Block layout of the 802.11 codes.
    DualDiagonal {
        a: SparseMatrix,
        b: SparseMatrix,
        c: SparseMatrix,
        e: SparseMatrix,
        t: SparseMatrix,
    },
    // General dense generator matrix for the parity.
    DenseGenerator { gen_matrix: Array2<GF2> },
}

impl EncoderType {
    fn name(&self) -> &'static str {
        match self {
            EncoderType::Triangular { .. } => "triangular",
            EncoderType::DualDiagonal { .. } => "dual-diagonal",
            EncoderType::DenseGenerator { .. } => "dense generator",
        }
    }
}

impl Encoder {
    /// Creates the systematic encoder corresponding to a code.
    ///
    /// Fails with [`Error::NotSystematic`] when H cannot be solved for the
    /// parity bits of every message.
    pub fn new(code: &Code) -> Result<Encoder> {
        let h = code.h();
        let (n, k, m) = (code.n(), code.k(), code.m());

        let h1 = h.submatrix(0..m, k..n);
        let encoder = if h1.is_unit_lower_triangular() {
            EncoderType::Triangular {
                h0: h.submatrix(0..m, 0..k),
                h1,
            }
        } else if let Some(dual) = code
            .circulant_size()
            .map(|g| dual_diagonal(h, k, g))
            .transpose()?
            .flatten()
        {
            dual
        } else {
            dense_generator(h, k)?
        };
        log::debug!(
            "({n}, {k}) code uses a {} encoder",
            encoder.name()
        );
        Ok(Encoder { n, k, encoder })
    }

    /// Returns the number of message bits `k`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the codeword length `n`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Encodes a message into a codeword.
    ///
    /// The message must have `k` elements. The codeword has `n` elements and
    /// starts with the message.
    pub fn encode<S>(&self, message: &ArrayBase<S, Ix1>) -> Result<Array1<GF2>>
    where
        S: Data<Elem = GF2>,
    {
        if message.len() != self.k {
            return Err(Error::LengthMismatch {
                expected: self.k,
                found: message.len(),
            });
        }
        let parity: Vec<GF2> = match &self.encoder {
            EncoderType::Triangular { h0, h1 } => {
                h1.back_substitute(&h0.mul_vec(&message.to_vec())?)?
            }
            EncoderType::DualDiagonal { a, b, c, e, t } => {
                let s = message.to_vec();
                let a_s = a.mul_vec(&s)?;
                let p1 = add(&e.mul_vec(&t.back_substitute(&a_s)?)?, &c.mul_vec(&s)?);
                let p2 = t.back_substitute(&add(&a_s, &b.mul_vec(&p1)?))?;
                p1.into_iter().chain(p2).collect()
            }
            EncoderType::DenseGenerator { gen_matrix } => gen_matrix.dot(message).to_vec(),
        };
        Ok(message.iter().copied().chain(parity).collect())
    }

    /// Encodes a message given as unpacked bits.
    ///
    /// Returns the codeword as unpacked bits.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::{codes::CodeTable, encoder::Encoder};
    /// let code = CodeTable::global().unwrap().lookup("1/2", "648").unwrap();
    /// let encoder = Encoder::new(&code).unwrap();
    /// let codeword = encoder.encode_bits(&vec![1; 324]).unwrap();
    /// assert_eq!(codeword.len(), 648);
    /// assert!(codeword[..324].iter().all(|&b| b == 1));
    /// ```
    pub fn encode_bits(&self, message: &[u8]) -> Result<Vec<u8>> {
        let message = Array1::from(GF2::from_bits(message));
        Ok(GF2::to_bits(&self.encode(&message)?))
    }

    /// Encodes a message given as bytes.
    ///
    /// The bytes are unpacked MSB first and zero-padded up to `k` bits. The
    /// codeword is returned as unpacked bits.
    pub fn encode_bytes(&self, message: &[u8]) -> Result<Vec<u8>> {
        let message = bits::bytes_to_bits_be(message);
        if message.len() > self.k {
            return Err(Error::LengthMismatch {
                expected: self.k,
                found: message.len(),
            });
        }
        self.encode_bits(&sparse::zero_pad(&message, self.k))
    }
}

fn add(x: &[GF2], y: &[GF2]) -> Vec<GF2> {
    x.iter().zip(y.iter()).map(|(&a, &b)| a + b).collect()
}

// Splits H into the A, B, C, D, E, T blocks for a gap g and checks that
// E T^-1 B + D is the identity. Returns None if the structure does not hold.
fn dual_diagonal(h: &SparseMatrix, k: usize, g: usize) -> Result<Option<EncoderType>> {
    let (m, n) = (h.num_rows(), h.num_cols());
    if g >= m {
        return Ok(None);
    }
    let top = 0..m - g;
    let bottom = m - g..m;
    let t = h.submatrix(top.clone(), k + g..n);
    if !t.is_unit_lower_triangular() {
        return Ok(None);
    }
    let b = h.submatrix(top.clone(), k..k + g);
    let d = h.submatrix(bottom.clone(), k..k + g);
    let e = h.submatrix(bottom.clone(), k + g..n);
    for j in 0..g {
        let mut b_col = vec![GF2::zero(); m - g];
        for &r in b.iter_col(j) {
            b_col[r] = GF2::one();
        }
        let mut phi_col = e.mul_vec(&t.back_substitute(&b_col)?)?;
        for &r in d.iter_col(j) {
            phi_col[r] += GF2::one();
        }
        if phi_col
            .iter()
            .enumerate()
            .any(|(r, x)| x.is_one() != (r == j))
        {
            return Ok(None);
        }
    }
    Ok(Some(EncoderType::DualDiagonal {
        a: h.submatrix(top, 0..k),
        b,
        c: h.submatrix(bottom, 0..k),
        e,
        t,
    }))
}

fn dense_generator(h: &SparseMatrix, k: usize) -> Result<EncoderType> {
    let (m, n) = (h.num_rows(), h.num_cols());
    // If H = [H0 H1] with H0 m x k and H1 m x m, then A = [H1 H0].
    let mut a = Array2::zeros((m, n));
    for (j, c) in h.iter_all() {
        let t = if c < k { c + m } else { c - k };
        a[[j, t]] = GF2::one();
    }

    let pivots = gauss::gauss_reduction(&mut a, m);

    // Rows without a pivot must be zero in the H0 part too, otherwise some
    // messages cannot be encoded.
    if a
        .slice(s![pivots.len().., m..])
        .iter()
        .any(|x| !x.is_zero())
    {
        return Err(Error::NotSystematic);
    }

    // Free parity bits are zero, so each pivot row gives its parity bit.
    let mut gen_matrix = Array2::zeros((m, k));
    for (row, &p) in pivots.iter().enumerate() {
        gen_matrix.row_mut(p).assign(&a.slice(s![row, m..]));
    }
    Ok(EncoderType::DenseGenerator { gen_matrix })
}
