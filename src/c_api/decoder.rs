use super::{c_to_string, slice_from_raw, slice_from_raw_mut, INVALID_ARGUMENT};
use crate::{
    codes::CodeTable,
    decoder::factory::{DecoderImplementation, LdpcDecoder},
};
use libc::size_t;
use std::{
    convert::TryFrom,
    error::Error,
    ffi::{c_char, c_void},
};

#[derive(Debug)]
struct Decoder {
    decoder: Box<dyn LdpcDecoder>,
}

impl Decoder {
    fn new(
        rate: &str,
        block_length: &str,
        implementation: &str,
    ) -> Result<Decoder, Box<dyn Error>> {
        let code = CodeTable::global()?.lookup(rate, block_length)?;
        let implementation: DecoderImplementation = implementation.parse()?;
        let decoder = implementation.build_decoder(code);
        Ok(Decoder { decoder })
    }

    // Returns the number of iterations, -1 if decoding did not converge, or
    // INVALID_ARGUMENT.
    fn decode_f64(&self, output: &mut [u8], llrs: &[f64], max_iterations: u32) -> i32 {
        if output.len() > self.decoder.code().n() {
            return INVALID_ARGUMENT;
        }
        let Ok(max_iterations) = usize::try_from(max_iterations) else {
            return INVALID_ARGUMENT;
        };
        let decoded = match self.decoder.decode_llrs(llrs, max_iterations) {
            Ok(decoded) => decoded,
            Err(_) => return INVALID_ARGUMENT,
        };
        output.copy_from_slice(&decoded.codeword[..output.len()]);
        if decoded.converged() {
            i32::try_from(decoded.iterations).unwrap_or(i32::MAX)
        } else {
            -1
        }
    }

    fn decode_f32(&self, output: &mut [u8], llrs: &[f32], max_iterations: u32) -> i32 {
        let llrs_f64 = llrs.iter().copied().map(f64::from).collect::<Vec<f64>>();
        self.decode_f64(output, &llrs_f64, max_iterations)
    }
}

#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_decoder_ctor(
    rate: *const c_char,
    block_length: *const c_char,
    implementation: *const c_char,
) -> *mut c_void {
    let (Some(rate), Some(block_length), Some(implementation)) = (
        c_to_string(rate),
        c_to_string(block_length),
        c_to_string(implementation),
    ) else {
        return std::ptr::null_mut();
    };
    match Decoder::new(&rate, &block_length, &implementation) {
        Ok(decoder) => Box::into_raw(Box::new(decoder)) as *mut c_void,
        Err(e) => {
            log::error!("cannot create decoder: {e}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_decoder_dtor(decoder: *mut c_void) {
    if !decoder.is_null() {
        drop(Box::from_raw(decoder as *mut Decoder));
    }
}

/// Decodes `llrs_len` channel LLRs and writes the first `output_len` bits of
/// the codeword. Returns the number of iterations, -1 if decoding did not
/// converge, or -2 if the lengths do not match the code.
#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_decoder_decode_f64(
    decoder: *mut c_void,
    output: *mut u8,
    output_len: size_t,
    llrs: *const f64,
    llrs_len: size_t,
    max_iterations: u32,
) -> i32 {
    let (Some(output), Some(llrs)) = (
        slice_from_raw_mut(output, output_len),
        slice_from_raw(llrs, llrs_len),
    ) else {
        return INVALID_ARGUMENT;
    };
    let decoder = &*(decoder as *const Decoder);
    decoder.decode_f64(output, llrs, max_iterations)
}

/// See `ldpc802_decoder_decode_f64`.
#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_decoder_decode_f32(
    decoder: *mut c_void,
    output: *mut u8,
    output_len: size_t,
    llrs: *const f32,
    llrs_len: size_t,
    max_iterations: u32,
) -> i32 {
    let (Some(output), Some(llrs)) = (
        slice_from_raw_mut(output, output_len),
        slice_from_raw(llrs, llrs_len),
    ) else {
        return INVALID_ARGUMENT;
    };
    let decoder = &*(decoder as *const Decoder);
    decoder.decode_f32(output, llrs, max_iterations)
}
