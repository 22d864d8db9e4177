//! LDPC belief propagation decoder.
//!
//! This module provides a soft-decision LDPC decoder using belief propagation
//! with a flooding schedule. The check node rule is given by a
//! [`DecoderArithmetic`](arithmetic::DecoderArithmetic) implementation, and
//! [`factory`] builds decoders that select it at runtime.
//!
//! A decode proceeds as follows. The received signal is scaled to channel
//! LLRs `2 * y / variance`, where the noise variance is either supplied in the
//! [`Config`] or estimated with [`calc_variance`]. A positive signal sample
//! stands for a zero bit. If the hard decision on the channel LLRs is already
//! a codeword, the decoder stops with zero iterations. Otherwise each
//! iteration updates all check nodes, then all variable nodes, and checks the
//! hard decision on the total LLRs against H. Decoding stops as soon as all the
//! checks are satisfied ([`DecodeStatus::Converged`]) or after the maximum
//! number of iterations ([`DecodeStatus::Exhausted`]). In the latter case the
//! last hard decision is still returned.
//!
//! The variance estimate is taken over the whole signal, including its
//! antipodal component, so for a `±1` signal with little noise it is close to
//! one and the channel LLRs stay near `±2` whatever the actual noise level.
//! This is enough for the rate 1/2, 2/3 and 3/4 codes. The high degree checks
//! of the rate 5/6 codes need the real variance in [`Config::noise_variance`]
//! to decode with [`SumProduct`](arithmetic::SumProduct).
//! [`MinSum`](arithmetic::MinSum) is insensitive to the LLR scale.
//!
//! The decoder keeps only read-only data. Each decode allocates its own
//! messages, so a decoder can be shared between threads.

use crate::{bits, codes::Code, gf2::GF2, sparse, sparse::SparseMatrix};
use arithmetic::DecoderArithmetic;
use num_traits::One;
use std::sync::Arc;
use tanner::TannerGraph;
use thiserror::Error;

pub mod arithmetic;
pub mod factory;
pub mod tanner;

/// LDPC decoder error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The input length is not the codeword length `n`.
    #[error("expected {expected} samples, found {found}")]
    LengthMismatch {
        /// Codeword length.
        expected: usize,
        /// Length of the input.
        found: usize,
    },
    /// Sparse algebra error, caused by a malformed parity check matrix.
    #[error(transparent)]
    Sparse(#[from] sparse::Error),
}

/// A [`Result`](std::result::Result) type with a decoder [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Channel noise variance.
    ///
    /// If `None`, the variance is estimated from each received signal.
    pub noise_variance: Option<f64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_iterations: 100,
            noise_variance: None,
        }
    }
}

/// Final state of a decode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DecodeStatus {
    /// The hard decision satisfies all the parity checks.
    Converged,
    /// The maximum number of iterations was reached without satisfying all
    /// the parity checks.
    Exhausted,
}

/// LDPC decoder output.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DecoderOutput {
    /// Decoded codeword.
    ///
    /// Contains the hard decision bits of the whole codeword.
    pub codeword: Vec<u8>,
    /// Number of iterations.
    ///
    /// Number of iterations used in decoding. It is zero when the channel
    /// hard decision is already a codeword.
    pub iterations: usize,
    /// Whether decoding converged.
    pub status: DecodeStatus,
}

impl DecoderOutput {
    /// Returns `true` if the decoded codeword satisfies all the checks.
    pub fn converged(&self) -> bool {
        self.status == DecodeStatus::Converged
    }
}

/// LDPC belief propagation flooding decoder.
#[derive(Debug, Clone)]
pub struct Decoder<A: DecoderArithmetic> {
    arithmetic: A,
    code: Arc<Code>,
    graph: TannerGraph,
    config: Config,
}

impl<A: DecoderArithmetic> Decoder<A> {
    /// Creates a new flooding LDPC decoder with the default [`Config`].
    pub fn new(code: Arc<Code>, arithmetic: A) -> Self {
        let graph = TannerGraph::new(code.h());
        Decoder {
            arithmetic,
            code,
            graph,
            config: Config::default(),
        }
    }

    /// Replaces the configuration used by [`Decoder::decode`].
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the code of the decoder.
    pub fn code(&self) -> &Arc<Code> {
        &self.code
    }

    /// Returns the configuration used by [`Decoder::decode`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decodes a received signal into the `k` message bits.
    ///
    /// The signal must have `n` samples. Decoding is best effort: if it does
    /// not converge, the message bits of the last hard decision are returned.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::{codes::CodeTable, decoder::{arithmetic::SumProduct, Decoder}};
    /// let code = CodeTable::global().unwrap().lookup("1/2", "648").unwrap();
    /// let decoder = Decoder::new(code, SumProduct::new());
    /// // the all-zero codeword
    /// let message = decoder.decode(&vec![1.0; 648]).unwrap();
    /// assert_eq!(message, vec![0; 324]);
    /// ```
    pub fn decode(&self, signal: &[f64]) -> Result<Vec<u8>> {
        let mut output = self.decode_with(signal, &self.config)?;
        output.codeword.truncate(self.code.k());
        Ok(output.codeword)
    }

    /// Decodes a received signal using a particular configuration.
    ///
    /// Returns the hard decision on the whole codeword. Unless
    /// `config.noise_variance` is set, the LLR scale comes from
    /// [`calc_variance`] on `signal`. See the [module documentation](self)
    /// for when this estimate is too coarse.
    pub fn decode_with(&self, signal: &[f64], config: &Config) -> Result<DecoderOutput> {
        self.check_len(signal.len())?;
        let variance = config
            .noise_variance
            .unwrap_or_else(|| calc_variance(signal));
        let variance = if variance.is_finite() && variance > 0.0 {
            variance
        } else {
            log::warn!("degenerate noise variance {variance}, using 1.0");
            1.0
        };
        let llrs: Vec<f64> = signal.iter().map(|&y| 2.0 * y / variance).collect();
        self.decode_llrs(&llrs, config.max_iterations)
    }

    /// Decodes a received signal and packs the hard decision on the whole
    /// codeword into bytes, MSB first.
    pub fn decode_bytes(&self, signal: &[f64]) -> Result<Vec<u8>> {
        let output = self.decode_with(signal, &self.config)?;
        Ok(bits::bits_to_bytes_be(&output.codeword))
    }

    /// Decodes a codeword given its channel LLRs.
    ///
    /// A positive LLR favours a zero bit.
    pub fn decode_llrs(&self, llrs: &[f64], max_iterations: usize) -> Result<DecoderOutput> {
        self.check_len(llrs.len())?;
        let h = self.code.h();
        let graph = &self.graph;

        let mut hard = hard_decisions(llrs);
        if satisfies_checks(h, &hard)? {
            // No bit errors case
            return Ok(self.output(&hard, 0, DecodeStatus::Converged));
        }

        // Messages are indexed by edge. First variable messages use only
        // input LLRs.
        let mut var_messages: Vec<f64> = (0..graph.num_edges())
            .map(|e| llrs[graph.edge_variable(e)])
            .collect();
        let mut check_messages = vec![0.0; graph.num_edges()];
        let mut total_llrs = llrs.to_vec();

        for iteration in 1..=max_iterations {
            for c in 0..graph.num_checks() {
                let edges = graph.check_edges(c);
                self.arithmetic.send_check_messages(
                    &var_messages[edges.clone()],
                    &mut check_messages[edges],
                );
            }
            for (v, (total, &llr)) in total_llrs.iter_mut().zip(llrs.iter()).enumerate() {
                let edges = graph.variable_edges(v);
                *total = llr + edges.iter().map(|&e| check_messages[e]).sum::<f64>();
                // Exclude the contribution of each check node to generate
                // the message for that check node
                for &e in edges {
                    var_messages[e] = *total - check_messages[e];
                }
            }
            hard = hard_decisions(&total_llrs);
            if satisfies_checks(h, &hard)? {
                log::debug!("decoding converged after {iteration} iterations");
                return Ok(self.output(&hard, iteration, DecodeStatus::Converged));
            }
            log::trace!("iteration {iteration} did not satisfy the parity checks");
        }
        log::debug!("decoding did not converge after {max_iterations} iterations");
        Ok(self.output(&hard, max_iterations, DecodeStatus::Exhausted))
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.code.n() {
            return Err(Error::LengthMismatch {
                expected: self.code.n(),
                found: len,
            });
        }
        Ok(())
    }

    fn output(&self, hard: &[GF2], iterations: usize, status: DecodeStatus) -> DecoderOutput {
        DecoderOutput {
            codeword: GF2::to_bits(hard),
            iterations,
            status,
        }
    }
}

/// Computes the sample variance of a sequence.
///
/// This is the unbiased estimator, dividing by `n - 1`, computed in a single
/// pass with Welford's algorithm. Sequences with fewer than two samples have
/// zero variance.
///
/// # Examples
/// ```
/// # use ldpc802::decoder::calc_variance;
/// assert!((calc_variance(&[1.0, 2.0, 3.0, 4.0]) - 5.0 / 3.0).abs() < 1e-12);
/// ```
pub fn calc_variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mut mean = 0.0;
    let mut sum_sq = 0.0;
    for (j, &x) in samples.iter().enumerate() {
        let old_mean = mean;
        mean += (x - mean) / (j + 1) as f64;
        sum_sq += (x - mean) * (x - old_mean);
    }
    sum_sq / (samples.len() - 1) as f64
}

fn hard_decisions(llrs: &[f64]) -> Vec<GF2> {
    llrs.iter().map(|&llr| GF2::from(llr < 0.0)).collect()
}

// Checks H c = 0, stopping at the first unsatisfied check.
fn satisfies_checks(h: &SparseMatrix, codeword: &[GF2]) -> Result<bool> {
    for r in 0..h.num_rows() {
        if h.mul_row(r, codeword)?.is_one() {
            return Ok(false);
        }
    }
    Ok(true)
}
