//! LDPC decoder arithmetic.
//!
//! This module contains the trait [`DecoderArithmetic`], which defines the
//! check node rule used by the belief propagation decoder, and implementors of
//! that trait. The LDPC decoder [`Decoder`](super::Decoder) is generic over the
//! `DecoderArithmetic` trait, so it can be used to obtain monomorphized
//! implementations for different check node rules. The variable node rule is
//! the same for all of them.
//!
//! # References
//!
//! [1] Sarah J. Johnson, Iterative Error Correction: Turbo, Low-Density
//! Parity-Check and Repeat-Accumulate Codes. Cambridge University Press. June
//! 2012.

use crate::phi::atanh_approx;

/// Variable node messages are limited to this magnitude before they enter a
/// check node update.
pub const MESSAGE_CLAMP: f64 = 20.0;

/// LDPC decoder arithmetic.
///
/// This trait models the check node update of a belief propagation LDPC
/// decoder. The methods depend only on `&self`, so a single arithmetic object
/// can be shared by concurrent decodes.
pub trait DecoderArithmetic: std::fmt::Debug + Send + Sync {
    /// Computes the messages sent by a check node.
    ///
    /// `var_messages` holds the messages arriving from each of the variable
    /// nodes connected to the check node. The message sent back along edge `i`
    /// must be written to `check_messages[i]` and may only depend on the
    /// arriving messages of the other edges. Both slices have the same length.
    fn send_check_messages(&self, var_messages: &[f64], check_messages: &mut [f64]);
}

fn clamp(x: f64) -> f64 {
    x.clamp(-MESSAGE_CLAMP, MESSAGE_CLAMP)
}

// Writes 2 * f(prod_{j != i} tanh(x_j / 2)) to check_messages[i]. The
// product excluding each edge is the product of the prefix before it and the
// suffix after it, so no division is needed.
fn tanh_rule<F>(var_messages: &[f64], check_messages: &mut [f64], atanh: F)
where
    F: Fn(f64) -> f64,
{
    let half_tanh = |x: f64| (0.5 * clamp(x)).tanh();
    let mut prefix = 1.0;
    for (out, &x) in check_messages.iter_mut().zip(var_messages.iter()) {
        *out = prefix;
        prefix *= half_tanh(x);
    }
    let mut suffix = 1.0;
    for (out, &x) in check_messages.iter_mut().zip(var_messages.iter()).rev() {
        *out = 2.0 * atanh(*out * suffix);
        suffix *= half_tanh(x);
    }
}

/// Sum-product arithmetic with the piecewise-linear `atanh`.
///
/// Check messages are `2 * atanh(prod tanh(x / 2))` over the other edges, with
/// `atanh` replaced by [`atanh_approx`]. Messages are therefore bounded by
/// `2 * SATURATION`.
///
/// See (2.29) in [1].
#[derive(Debug, Clone, Copy, Default)]
pub struct SumProduct {}

impl SumProduct {
    /// Creates a new [`SumProduct`] decoder arithmetic object.
    pub fn new() -> SumProduct {
        SumProduct::default()
    }
}

impl DecoderArithmetic for SumProduct {
    fn send_check_messages(&self, var_messages: &[f64], check_messages: &mut [f64]) {
        tanh_rule(var_messages, check_messages, atanh_approx);
    }
}

/// Sum-product arithmetic with the exact `atanh`.
///
/// Variable messages are clamped to `±MESSAGE_CLAMP`, so the product of
/// tanh's stays below one and `atanh` is finite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh {}

impl Tanh {
    /// Creates a new [`Tanh`] decoder arithmetic object.
    pub fn new() -> Tanh {
        Tanh::default()
    }
}

impl DecoderArithmetic for Tanh {
    fn send_check_messages(&self, var_messages: &[f64], check_messages: &mut [f64]) {
        tanh_rule(var_messages, check_messages, f64::atanh);
    }
}

/// Min-sum arithmetic.
///
/// The message along each edge has the sign of the product of the other
/// messages and the smallest of their magnitudes.
///
/// See (2.36) in [1].
#[derive(Debug, Clone, Copy, Default)]
pub struct MinSum {}

impl MinSum {
    /// Creates a new [`MinSum`] decoder arithmetic object.
    pub fn new() -> MinSum {
        MinSum::default()
    }
}

impl DecoderArithmetic for MinSum {
    fn send_check_messages(&self, var_messages: &[f64], check_messages: &mut [f64]) {
        // Two smallest magnitudes and the edge holding the smallest
        let mut min1 = MESSAGE_CLAMP;
        let mut min2 = MESSAGE_CLAMP;
        let mut argmin = usize::MAX;
        let mut negative = false;
        for (j, &x) in var_messages.iter().enumerate() {
            let x = clamp(x);
            negative ^= x < 0.0;
            let a = x.abs();
            if a < min1 {
                min2 = min1;
                min1 = a;
                argmin = j;
            } else if a < min2 {
                min2 = a;
            }
        }
        for (j, (out, &x)) in check_messages
            .iter_mut()
            .zip(var_messages.iter())
            .enumerate()
        {
            let magnitude = if j == argmin { min2 } else { min1 };
            // exclude the sign of this edge
            *out = if negative ^ (x < 0.0) {
                -magnitude
            } else {
                magnitude
            };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;

    // Excluded-edge products computed directly.
    fn reference<F: Fn(f64) -> f64>(x: &[f64], atanh: F) -> Vec<f64> {
        (0..x.len())
            .map(|i| {
                let p: f64 = x
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &y)| (0.5 * clamp(y)).tanh())
                    .product();
                2.0 * atanh(p)
            })
            .collect()
    }

    const MESSAGES: [f64; 6] = [1.2, -0.4, 3.5, -2.25, 0.05, 30.0];

    #[test]
    fn tanh_matches_reference() {
        let mut out = [0.0; 6];
        Tanh::new().send_check_messages(&MESSAGES, &mut out);
        for (a, b) in out.iter().zip(reference(&MESSAGES, f64::atanh)) {
            assert_float_eq!(*a, b, abs <= 1e-12);
        }
    }

    #[test]
    fn sum_product_matches_reference() {
        let mut out = [0.0; 6];
        SumProduct::new().send_check_messages(&MESSAGES, &mut out);
        for (a, b) in out.iter().zip(reference(&MESSAGES, atanh_approx)) {
            assert_float_eq!(*a, b, abs <= 1e-12);
        }
        assert!(out.iter().all(|x| x.abs() <= 10.0));
    }

    #[test]
    fn min_sum() {
        let mut out = [0.0; 6];
        MinSum::new().send_check_messages(&MESSAGES, &mut out);
        // edges 1 and 3 see an odd number of other negative messages, and
        // edge 4 holds the smallest magnitude
        assert_eq!(out, [0.05, -0.05, 0.05, -0.05, 0.4, 0.05]);
    }

    #[test]
    fn signs() {
        let x = [2.0, 2.0, -2.0];
        let rules: [&dyn DecoderArithmetic; 3] = [&SumProduct::new(), &Tanh::new(), &MinSum::new()];
        for arithmetic in rules {
            let mut out = [0.0; 3];
            arithmetic.send_check_messages(&x, &mut out);
            assert!(out[0] < 0.0 && out[1] < 0.0 && out[2] > 0.0);
        }
    }
}
