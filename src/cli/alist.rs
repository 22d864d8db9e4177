//! alist CLI subcommand.
//!
//! This subcommand prints the alist of the parity check matrix of one of the
//! IEEE 802.11 LDPC codes to `stdout`, so that it can be used by other LDPC
//! tools.
//!
//! # Examples
//! The r=3/4, n=1944 parity check matrix can be generated with
//! ```shell
//! $ ldpc802 alist --rate 3/4 --block-length 1944
//! ```

use crate::cli::*;

/// alist CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Prints the alist of an IEEE 802.11 LDPC code")]
pub struct Args {
    #[command(flatten)]
    code: CodeArgs,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        print!("{}", self.code.code()?.h().alist());
        Ok(())
    }
}
