//! `ldpc802` CLI application
//!
//! The CLI application is organized in several subcommands. The
//! supported subcommands can be seen by running `ldpc802`.
//! See the modules below for examples and more information about
//! how to use each subcommand.

use crate::{
    codes::{BlockLength, Code, CodeTable, Rate},
    rate_matching::RateMatcher,
};
use clap::Parser;
use std::{error::Error, sync::Arc};

pub mod alist;
pub mod codes;
pub mod decode;
pub mod encode;

/// Trait to run a CLI subcommand
pub trait Run {
    /// Run the CLI subcommand
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(author, version, name = "ldpc802", about = "IEEE 802.11 LDPC codec")]
pub enum Args {
    /// alist subcommand
    Alist(alist::Args),
    /// codes subcommand
    Codes(codes::Args),
    /// decode subcommand
    Decode(decode::Args),
    /// encode subcommand
    Encode(encode::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::Alist(x) => x.run(),
            Args::Codes(x) => x.run(),
            Args::Decode(x) => x.run(),
            Args::Encode(x) => x.run(),
        }
    }
}

/// Code selection arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct CodeArgs {
    /// Coding rate (1/2, 2/3, 3/4 or 5/6)
    #[arg(short, long)]
    pub rate: Rate,
    /// Codeword length (648, 1296 or 1944)
    #[arg(short, long)]
    pub block_length: BlockLength,
}

impl CodeArgs {
    /// Returns the selected code.
    pub fn code(&self) -> Result<Arc<Code>, Box<dyn Error>> {
        Ok(CodeTable::global()?.get(self.rate, self.block_length)?)
    }
}

/// Shortening and puncturing arguments.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RateMatchingArgs {
    /// Payload bits per codeword (the rest of the message is shortened)
    #[arg(long)]
    pub payload: Option<usize>,
    /// Transmitted bits per codeword (parity bits beyond this are punctured)
    #[arg(long, requires = "payload")]
    pub available: Option<usize>,
}

impl RateMatchingArgs {
    /// Returns the rate matcher for a code, if rate matching is enabled.
    pub fn rate_matcher(&self, code: &Code) -> Result<Option<RateMatcher>, Box<dyn Error>> {
        let Some(payload) = self.payload else {
            return Ok(None);
        };
        let available = self.available.unwrap_or(code.n());
        Ok(Some(RateMatcher::new(code, payload, available)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse() {
        assert!(Args::try_parse_from(["ldpc802", "codes"]).is_ok());
        assert!(Args::try_parse_from(["ldpc802", "alist", "-r", "5/6", "-b", "1296"]).is_ok());
        assert!(Args::try_parse_from(["ldpc802", "alist", "-r", "7/8", "-b", "648"]).is_err());
        // --available requires --payload
        assert!(Args::try_parse_from([
            "ldpc802", "encode", "-r", "1/2", "-b", "648", "--available", "600", "a", "b"
        ])
        .is_err());
    }

    #[test]
    fn no_rate_matching() {
        let code = CodeArgs {
            rate: Rate::R1_2,
            block_length: BlockLength::N648,
        }
        .code()
        .unwrap();
        assert!(RateMatchingArgs::default()
            .rate_matcher(&code)
            .unwrap()
            .is_none());
        let matcher = RateMatchingArgs {
            payload: Some(300),
            available: None,
        }
        .rate_matcher(&code)
        .unwrap()
        .unwrap();
        assert_eq!(matcher.punctured(), 0);
        // an empty frame would never advance the encode and decode loops
        for available in [Some(0), None] {
            assert!(RateMatchingArgs {
                payload: Some(0),
                available,
            }
            .rate_matcher(&code)
            .is_err());
        }
    }
}
