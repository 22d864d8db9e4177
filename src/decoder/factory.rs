//! LDPC decoder factory.
//!
//! This module contains routines to build an LDPC decoder generically over the
//! arithmetic implementation. Such decoders are represented by `Box<dyn
//! LdpcDecoder>`, using the trait [`LdpcDecoder`].

use super::{
    arithmetic::{DecoderArithmetic, MinSum, SumProduct, Tanh},
    Config, Decoder, DecoderOutput, Result,
};
use crate::codes::Code;
use std::sync::Arc;

/// Generic LDPC decoder.
///
/// This trait is used to form LDPC decoder trait objects, abstracting over the
/// implementation of the decoder arithmetic.
pub trait LdpcDecoder: std::fmt::Debug + Send + Sync {
    /// Returns the code of the decoder.
    fn code(&self) -> &Arc<Code>;

    /// Decodes a received signal using a particular configuration.
    ///
    /// See [`Decoder::decode_with`].
    fn decode_with(&self, signal: &[f64], config: &Config) -> Result<DecoderOutput>;

    /// Decodes a codeword given its channel LLRs.
    ///
    /// See [`Decoder::decode_llrs`].
    fn decode_llrs(&self, llrs: &[f64], max_iterations: usize) -> Result<DecoderOutput>;
}

impl<A: DecoderArithmetic> LdpcDecoder for Decoder<A> {
    fn code(&self) -> &Arc<Code> {
        Decoder::code(self)
    }

    fn decode_with(&self, signal: &[f64], config: &Config) -> Result<DecoderOutput> {
        Decoder::decode_with(self, signal, config)
    }

    fn decode_llrs(&self, llrs: &[f64], max_iterations: usize) -> Result<DecoderOutput> {
        Decoder::decode_llrs(self, llrs, max_iterations)
    }
}

/// LDPC decoder implementation.
///
/// This enum lists the LDPC decoder implementations corresponding to different
/// arithmetic rules.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, clap::ValueEnum)]
pub enum DecoderImplementation {
    /// The [`SumProduct`] implementation, using the piecewise-linear `atanh`.
    #[default]
    SumProduct,
    /// The [`Tanh`] implementation, using the exact `atanh`.
    Tanh,
    /// The [`MinSum`] implementation.
    MinSum,
}

impl DecoderImplementation {
    /// Builds an LDPC decoder.
    ///
    /// Given a code, this function builds an LDPC decoder corresponding to
    /// this decoder implementation.
    pub fn build_decoder(&self, code: Arc<Code>) -> Box<dyn LdpcDecoder> {
        match self {
            DecoderImplementation::SumProduct => Box::new(Decoder::new(code, SumProduct::new())),
            DecoderImplementation::Tanh => Box::new(Decoder::new(code, Tanh::new())),
            DecoderImplementation::MinSum => Box::new(Decoder::new(code, MinSum::new())),
        }
    }
}

impl std::str::FromStr for DecoderImplementation {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "sum-product" => DecoderImplementation::SumProduct,
            "tanh" => DecoderImplementation::Tanh,
            "min-sum" => DecoderImplementation::MinSum,
            _ => return Err("invalid decoder implementation"),
        })
    }
}

impl std::fmt::Display for DecoderImplementation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DecoderImplementation::SumProduct => "sum-product",
                DecoderImplementation::Tanh => "tanh",
                DecoderImplementation::MinSum => "min-sum",
            }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codes::CodeTable;

    #[test]
    fn parse() {
        for implementation in [
            DecoderImplementation::SumProduct,
            DecoderImplementation::Tanh,
            DecoderImplementation::MinSum,
        ] {
            assert_eq!(
                implementation.to_string().parse::<DecoderImplementation>(),
                Ok(implementation)
            );
        }
        assert!("phi".parse::<DecoderImplementation>().is_err());
    }

    #[test]
    fn build() {
        let code = CodeTable::global().unwrap().lookup("2/3", "648").unwrap();
        for implementation in [
            DecoderImplementation::SumProduct,
            DecoderImplementation::Tanh,
            DecoderImplementation::MinSum,
        ] {
            let decoder = implementation.build_decoder(code.clone());
            assert!(Arc::ptr_eq(decoder.code(), &code));
            let output = decoder.decode_with(&[1.0; 648], &Config::default()).unwrap();
            assert_eq!(output.iterations, 0);
            assert!(output.codeword.iter().all(|&b| b == 0));
        }
    }
}
