//! Encode CLI subcommand.
//!
//! This command encodes a file of messages with one of the IEEE 802.11 LDPC
//! codes. Input and output files contain unpacked bits (one byte per bit, with
//! value 0 or 1). The input is read in blocks of `k` bits, or of `--payload`
//! bits when rate matching is used, and an incomplete final block is ignored.
//!
//! # Examples
//! Encode payloads of 816 bits with the r=3/4, n=1944 code, sending 1248 bits
//! per codeword:
//! ```shell
//! $ ldpc802 encode --rate 3/4 --block-length 1944 \
//!       --payload 816 --available 1248 payload.u8 codewords.u8
//! ```

use crate::{cli::*, encoder::Encoder};
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Read, Write},
    path::PathBuf,
};

/// Encode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Performs LDPC encoding")]
pub struct Args {
    #[command(flatten)]
    code: CodeArgs,
    #[command(flatten)]
    rate_matching: RateMatchingArgs,
    /// input file (messages as unpacked bits)
    input: PathBuf,
    /// output file (transmitted codewords as unpacked bits)
    output: PathBuf,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = self.code.code()?;
        let encoder = Encoder::new(&code)?;
        let matcher = self.rate_matching.rate_matcher(&code)?;
        let frame_len = matcher.map_or(code.k(), |m| m.payload_len());

        let mut input = BufReader::new(File::open(&self.input)?);
        let mut output = BufWriter::new(File::create(&self.output)?);
        let mut frame = vec![0; frame_len];
        loop {
            match input.read_exact(&mut frame[..]) {
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                ret => ret?,
            };
            output.write_all(&encode_frame(&encoder, matcher.as_ref(), &frame)?)?;
        }
        output.flush()?;
        Ok(())
    }
}

fn encode_frame(
    encoder: &Encoder,
    matcher: Option<&RateMatcher>,
    frame: &[u8],
) -> Result<Vec<u8>, Box<dyn Error>> {
    Ok(match matcher {
        Some(m) => m.transmit(&encoder.encode_bits(&m.pad(frame)?)?)?,
        None => encoder.encode_bits(frame)?,
    })
}
