//! C ABI.
//!
//! Encoders and decoders are created from the rate and block length strings
//! of a table code (for instance `"3/4"` and `"1944"`) and handed to C as
//! opaque pointers. Constructors return a null pointer on failure.

use libc::size_t;
use std::{
    convert::TryFrom,
    ffi::{c_char, CStr},
    ptr::NonNull,
};

mod decoder;
mod encoder;

// Return codes of the encode and decode functions.
const INVALID_ARGUMENT: i32 = -2;

unsafe fn c_to_string(s: *const c_char) -> Option<String> {
    if s.is_null() {
        return None;
    }
    Some(String::from_utf8_lossy(CStr::from_ptr(s).to_bytes()).to_string())
}

#[allow(clippy::useless_conversion)]
fn size_t_to_usize(n: size_t) -> Option<usize> {
    usize::try_from(n).ok()
}

// Null pointers are accepted for empty slices only.
unsafe fn slice_from_raw<'a, T>(ptr: *const T, len: size_t) -> Option<&'a [T]> {
    let len = size_t_to_usize(len)?;
    let ptr = match (ptr.is_null(), len) {
        (false, _) => ptr,
        (true, 0) => NonNull::<T>::dangling().as_ptr().cast_const(),
        (true, _) => return None,
    };
    Some(std::slice::from_raw_parts(ptr, len))
}

unsafe fn slice_from_raw_mut<'a, T>(ptr: *mut T, len: size_t) -> Option<&'a mut [T]> {
    let len = size_t_to_usize(len)?;
    let ptr = match (ptr.is_null(), len) {
        (false, _) => ptr,
        (true, 0) => NonNull::<T>::dangling().as_ptr(),
        (true, _) => return None,
    };
    Some(std::slice::from_raw_parts_mut(ptr, len))
}

#[cfg(test)]
mod test {
    use super::{decoder::*, encoder::*, INVALID_ARGUMENT};
    use std::ffi::CString;

    #[test]
    fn encode_decode() {
        let rate = CString::new("1/2").unwrap();
        let block_length = CString::new("648").unwrap();
        let implementation = CString::new("min-sum").unwrap();
        unsafe {
            let encoder = ldpc802_encoder_ctor(rate.as_ptr(), block_length.as_ptr());
            assert!(!encoder.is_null());
            let decoder = ldpc802_decoder_ctor(
                rate.as_ptr(),
                block_length.as_ptr(),
                implementation.as_ptr(),
            );
            assert!(!decoder.is_null());

            let message: Vec<u8> = (0..324).map(|j| ((j * 7) % 3 == 0) as u8).collect();
            let mut codeword = vec![0u8; 648];
            assert_eq!(
                ldpc802_encoder_encode(
                    encoder,
                    codeword.as_mut_ptr(),
                    codeword.len(),
                    message.as_ptr(),
                    message.len()
                ),
                0
            );
            assert_eq!(&codeword[..324], &message[..]);

            let mut llrs: Vec<f32> = codeword
                .iter()
                .map(|&b| if b == 0 { 4.0 } else { -4.0 })
                .collect();
            llrs[10] = -llrs[10];
            let mut decoded = vec![0u8; 324];
            let iterations = ldpc802_decoder_decode_f32(
                decoder,
                decoded.as_mut_ptr(),
                decoded.len(),
                llrs.as_ptr(),
                llrs.len(),
                50,
            );
            assert!(iterations > 0);
            assert_eq!(decoded, message);

            let llrs: Vec<f64> = llrs.iter().map(|&x| f64::from(x)).collect();
            assert_eq!(
                ldpc802_decoder_decode_f64(
                    decoder,
                    decoded.as_mut_ptr(),
                    decoded.len(),
                    llrs.as_ptr(),
                    llrs.len() - 1,
                    50,
                ),
                INVALID_ARGUMENT
            );

            ldpc802_encoder_dtor(encoder);
            ldpc802_decoder_dtor(decoder);
        }
    }

    #[test]
    fn invalid_codes() {
        let rate = CString::new("7/8").unwrap();
        let block_length = CString::new("648").unwrap();
        let implementation = CString::new("phi").unwrap();
        let good_rate = CString::new("1/2").unwrap();
        unsafe {
            assert!(ldpc802_encoder_ctor(rate.as_ptr(), block_length.as_ptr()).is_null());
            assert!(ldpc802_encoder_ctor(std::ptr::null(), block_length.as_ptr()).is_null());
            assert!(ldpc802_decoder_ctor(
                good_rate.as_ptr(),
                block_length.as_ptr(),
                implementation.as_ptr()
            )
            .is_null());
        }
    }
}
