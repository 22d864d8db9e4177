//! # ldpc802
//!
//! `ldpc802` is an encoder and soft-decision decoder for the LDPC codes of
//! IEEE 802.11n/ac. It contains the twelve codes of the standard (rates 1/2,
//! 2/3, 3/4 and 5/6, codeword lengths 648, 1296 and 1944), a systematic
//! encoder, a belief propagation decoder with several check node rules, and
//! the shortening and puncturing used to fit a payload in a given number of
//! transmitted bits.
//!
//! It can be used as a Rust library, through a C ABI, or as a CLI tool. See
//! [`cli`] for documentation about the usage of the CLI tool.
//!
//! # Examples
//! ```
//! use ldpc802::{
//!     codes::CodeTable,
//!     decoder::{arithmetic::SumProduct, Decoder},
//!     encoder::Encoder,
//! };
//!
//! let code = CodeTable::global()?.lookup("1/2", "648")?;
//! let encoder = Encoder::new(&code)?;
//! let decoder = Decoder::new(code.clone(), SumProduct::new());
//!
//! let message: Vec<u8> = (0..code.k()).map(|j| (j % 7 == 0) as u8).collect();
//! let codeword = encoder.encode_bits(&message)?;
//! // BPSK: a zero bit is sent as +1
//! let mut signal: Vec<f64> = codeword
//!     .iter()
//!     .map(|&b| if b == 0 { 1.0 } else { -1.0 })
//!     .collect();
//! signal[5] = -signal[5];
//! assert_eq!(decoder.decode(&signal)?, message);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod bits;
pub mod cli;
pub mod codes;
pub mod decoder;
pub mod encoder;
pub mod gf2;
pub mod phi;
pub mod rate_matching;
pub mod sparse;

mod c_api;
