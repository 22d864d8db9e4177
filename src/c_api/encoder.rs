use super::{c_to_string, slice_from_raw, slice_from_raw_mut, INVALID_ARGUMENT};
use crate::{codes::CodeTable, encoder::Encoder as LdpcEncoder};
use libc::size_t;
use std::{
    error::Error,
    ffi::{c_char, c_void},
};

#[derive(Debug)]
struct Encoder {
    encoder: LdpcEncoder,
}

impl Encoder {
    fn new(rate: &str, block_length: &str) -> Result<Encoder, Box<dyn Error>> {
        let code = CodeTable::global()?.lookup(rate, block_length)?;
        let encoder = LdpcEncoder::new(&code)?;
        Ok(Encoder { encoder })
    }

    fn encode(&self, output: &mut [u8], input: &[u8]) -> i32 {
        if output.len() != self.encoder.n() {
            return INVALID_ARGUMENT;
        }
        match self.encoder.encode_bits(input) {
            Ok(codeword) => {
                output.copy_from_slice(&codeword);
                0
            }
            Err(_) => INVALID_ARGUMENT,
        }
    }
}

#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_encoder_ctor(
    rate: *const c_char,
    block_length: *const c_char,
) -> *mut c_void {
    let (Some(rate), Some(block_length)) = (c_to_string(rate), c_to_string(block_length)) else {
        return std::ptr::null_mut();
    };
    match Encoder::new(&rate, &block_length) {
        Ok(encoder) => Box::into_raw(Box::new(encoder)) as *mut c_void,
        Err(e) => {
            log::error!("cannot create encoder: {e}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_encoder_dtor(encoder: *mut c_void) {
    if !encoder.is_null() {
        drop(Box::from_raw(encoder as *mut Encoder));
    }
}

/// Returns 0 on success and -2 if the lengths do not match the code.
#[no_mangle]
pub(super) unsafe extern "C" fn ldpc802_encoder_encode(
    encoder: *mut c_void,
    output: *mut u8,
    output_len: size_t,
    input: *const u8,
    input_len: size_t,
) -> i32 {
    let (Some(output), Some(input)) = (
        slice_from_raw_mut(output, output_len),
        slice_from_raw(input, input_len),
    ) else {
        return INVALID_ARGUMENT;
    };
    let encoder = &*(encoder as *const Encoder);
    encoder.encode(output, input)
}
