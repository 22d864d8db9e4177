//! Decode CLI subcommand.
//!
//! This command decodes a file of received samples with one of the IEEE 802.11
//! LDPC codes. The input contains `f32` samples in little-endian format, where
//! a positive sample stands for a zero bit, and is read in blocks of `n`
//! samples (or of the transmitted length when rate matching is used). The
//! output contains the decoded message bits (or payload bits) unpacked, one
//! byte per bit. Codewords are decoded in parallel.
//!
//! A summary with the number of codewords that did not converge is printed to
//! `stdout`.
//!
//! # Examples
//! Decode the output of the [encode](super::encode) example after it has gone
//! through a channel:
//! ```shell
//! $ ldpc802 decode --rate 3/4 --block-length 1944 \
//!       --payload 816 --available 1248 --implementation min-sum \
//!       received.f32 payload.u8
//! ```

use crate::{
    cli::*,
    decoder::{
        factory::{DecoderImplementation, LdpcDecoder},
        Config, DecoderOutput,
    },
};
use rayon::prelude::*;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

/// Decode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Performs LDPC decoding")]
pub struct Args {
    #[command(flatten)]
    code: CodeArgs,
    #[command(flatten)]
    rate_matching: RateMatchingArgs,
    /// Decoder implementation
    #[arg(long, value_enum, default_value_t = DecoderImplementation::SumProduct)]
    implementation: DecoderImplementation,
    /// Maximum number of iterations
    #[arg(long, default_value = "100")]
    max_iter: usize,
    /// Channel noise variance (estimated from each codeword if not given)
    #[arg(long)]
    noise_variance: Option<f64>,
    /// input file (received samples as f32 little-endian)
    input: PathBuf,
    /// output file (decoded messages as unpacked bits)
    output: PathBuf,
}

type FrameResult = Result<(Vec<u8>, DecoderOutput), Box<dyn Error + Send + Sync>>;

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = self.code.code()?;
        let matcher = self.rate_matching.rate_matcher(&code)?;
        let decoder = self.implementation.build_decoder(code);
        let config = Config {
            max_iterations: self.max_iter,
            noise_variance: self.noise_variance,
        };

        let samples = read_samples(&std::fs::read(&self.input)?);
        let frame_len = matcher.map_or(decoder.code().n(), |m| m.transmitted_len());
        let results = samples
            .par_chunks_exact(frame_len)
            .map(|frame| decode_frame(decoder.as_ref(), matcher.as_ref(), &config, frame))
            .collect::<Vec<FrameResult>>();

        let mut output = BufWriter::new(File::create(&self.output)?);
        let mut failures = 0;
        let mut iterations = 0;
        for result in results.iter() {
            let (message, decoded) = result.as_ref().map_err(|e| e.to_string())?;
            output.write_all(message)?;
            if !decoded.converged() {
                failures += 1;
            }
            iterations += decoded.iterations;
        }
        output.flush()?;

        let frames = results.len();
        println!(
            "codewords = {frames}, failures = {failures}, average iterations = {:.2}",
            if frames > 0 {
                iterations as f64 / frames as f64
            } else {
                0.0
            }
        );
        Ok(())
    }
}

fn read_samples(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(4)
        .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
        .collect()
}

fn decode_frame(
    decoder: &dyn LdpcDecoder,
    matcher: Option<&RateMatcher>,
    config: &Config,
    frame: &[f64],
) -> FrameResult {
    let k = decoder.code().k();
    Ok(match matcher {
        Some(m) => {
            let decoded = decoder.decode_with(&m.receive(frame)?, config)?;
            (m.extract_payload(&decoded.codeword[..k])?.to_vec(), decoded)
        }
        None => {
            let decoded = decoder.decode_with(frame, config)?;
            (decoded.codeword[..k].to_vec(), decoded)
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    fn samples() {
        let bytes: Vec<u8> = [1.0f32, -0.5, 0.25]
            .iter()
            .flat_map(|x| x.to_le_bytes())
            .chain([0xff, 0xff])
            .collect();
        assert_eq!(read_samples(&bytes), [1.0, -0.5, 0.25]);
    }

    #[test]
    fn frames() {
        let code = CodeTable::global().unwrap().lookup("2/3", "1296").unwrap();
        let encoder = Encoder::new(&code).unwrap();
        let decoder = DecoderImplementation::MinSum.build_decoder(code.clone());
        let matcher = RateMatcher::new(&code, 800, 1200).unwrap();
        let config = Config::default();

        let payload: Vec<u8> = (0..800).map(|j| (j % 3 == 0) as u8).collect();
        let codeword = encoder
            .encode_bits(&matcher.pad(&payload).unwrap())
            .unwrap();
        let transmitted = matcher.transmit(&codeword).unwrap();
        let signal: Vec<f64> = transmitted
            .iter()
            .map(|&b| if b == 0 { 1.0 } else { -1.0 })
            .collect();

        let (message, decoded) =
            decode_frame(decoder.as_ref(), Some(&matcher), &config, &signal).unwrap();
        assert_eq!(message, payload);
        assert!(decoded.converged());
        assert!(decode_frame(decoder.as_ref(), Some(&matcher), &config, &signal[1..]).is_err());

        let signal: Vec<f64> = codeword
            .iter()
            .map(|&b| if b == 0 { 1.0 } else { -1.0 })
            .collect();
        let (message, decoded) = decode_frame(decoder.as_ref(), None, &config, &signal).unwrap();
        assert_eq!(message, matcher.pad(&payload).unwrap());
        assert_eq!(decoded.iterations, 0);
    }
}
