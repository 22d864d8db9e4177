//! Shortening and puncturing.
//!
//! IEEE 802.11 fits a payload that is shorter than the `k` message bits of a
//! code by shortening: the message is completed with known zero bits before
//! encoding, and those bits are not transmitted. If the remaining codeword
//! still does not fit in the available number of bits, the last parity bits
//! are punctured (not transmitted either).
//!
//! [`RateMatcher`] computes both counts for a codeword and applies them on
//! transmission and reception. The free functions implement the individual
//! steps for callers that compute the counts themselves.

use crate::{codes::Code, sparse::zero_pad};
use thiserror::Error;

/// Rate matching error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The payload does not fit in the message bits.
    #[error("payload of {payload} bits exceeds the {k} message bits")]
    PayloadTooLong {
        /// Payload length.
        payload: usize,
        /// Number of message bits of the code.
        k: usize,
    },
    /// The input does not have the expected length.
    #[error("expected {expected} elements, found {found}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Length found.
        found: usize,
    },
    /// The payload is empty, so nothing would be transmitted.
    #[error("the payload must contain at least one bit")]
    EmptyPayload,
    /// More bits must be punctured than there are parity bits.
    #[error("cannot puncture {requested} bits out of {available}")]
    NotEnoughParity {
        /// Number of bits to puncture.
        requested: usize,
        /// Number of bits that can be punctured.
        available: usize,
    },
}

/// A [`Result`](std::result::Result) type with a rate matching [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Received sample inserted at shortened positions.
///
/// This is the noiseless antipodal sample for a zero bit.
pub const KNOWN_ZERO: f64 = 1.0;

/// Received sample inserted at punctured positions (an erasure).
pub const ERASURE: f64 = 0.0;

/// Zero-extends a payload to the `k` message bits of a code.
///
/// # Examples
/// ```
/// # use ldpc802::rate_matching::pad_for_shortening;
/// assert_eq!(pad_for_shortening(&[1, 1, 0], 5).unwrap(), [1, 1, 0, 0, 0]);
/// assert!(pad_for_shortening(&[1, 1, 0], 2).is_err());
/// ```
pub fn pad_for_shortening(payload: &[u8], k: usize) -> Result<Vec<u8>> {
    if payload.len() > k {
        return Err(Error::PayloadTooLong {
            payload: payload.len(),
            k,
        });
    }
    Ok(zero_pad(payload, k))
}

/// Removes the shortening bits from a systematic codeword.
///
/// The codeword keeps its first `payload_len` bits and its parity bits, which
/// start at position `k`.
pub fn shorten<T: Clone>(codeword: &[T], payload_len: usize, k: usize) -> Result<Vec<T>> {
    if payload_len > k {
        return Err(Error::PayloadTooLong {
            payload: payload_len,
            k,
        });
    }
    if codeword.len() < k {
        return Err(Error::LengthMismatch {
            expected: k,
            found: codeword.len(),
        });
    }
    Ok(codeword[..payload_len]
        .iter()
        .chain(codeword[k..].iter())
        .cloned()
        .collect())
}

/// Removes the last `count` bits.
pub fn puncture<T: Clone>(bits: &[T], count: usize) -> Result<Vec<T>> {
    if count > bits.len() {
        return Err(Error::NotEnoughParity {
            requested: count,
            available: bits.len(),
        });
    }
    Ok(bits[..bits.len() - count].to_vec())
}

/// Shortening and puncturing of one codeword.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct RateMatcher {
    n: usize,
    k: usize,
    payload_len: usize,
    shortened: usize,
    punctured: usize,
}

impl RateMatcher {
    /// Creates a rate matcher for a payload of `payload_len` bits that must
    /// be sent using at most `available` bits.
    ///
    /// `k - payload_len` bits are shortened, and as many parity bits as
    /// needed to fit in `available` are punctured. At most `m` bits can be
    /// punctured, so the transmitted length is never smaller than the
    /// payload, which must not be empty.
    ///
    /// # Examples
    /// ```
    /// # use ldpc802::{codes::CodeTable, rate_matching::RateMatcher};
    /// let code = CodeTable::global().unwrap().lookup("3/4", "1944").unwrap();
    /// let matcher = RateMatcher::new(&code, 816, 1248).unwrap();
    /// assert_eq!(matcher.shortened(), 642);
    /// assert_eq!(matcher.punctured(), 54);
    /// assert_eq!(matcher.transmitted_len(), 1248);
    /// ```
    pub fn new(code: &Code, payload_len: usize, available: usize) -> Result<RateMatcher> {
        let (n, k) = (code.n(), code.k());
        if payload_len == 0 {
            return Err(Error::EmptyPayload);
        }
        if payload_len > k {
            return Err(Error::PayloadTooLong {
                payload: payload_len,
                k,
            });
        }
        let shortened = k - payload_len;
        let punctured = (n - shortened).saturating_sub(available);
        if punctured > code.m() {
            return Err(Error::NotEnoughParity {
                requested: punctured,
                available: code.m(),
            });
        }
        Ok(RateMatcher {
            n,
            k,
            payload_len,
            shortened,
            punctured,
        })
    }

    /// Returns the payload length.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Returns the number of shortened bits.
    pub fn shortened(&self) -> usize {
        self.shortened
    }

    /// Returns the number of punctured parity bits.
    pub fn punctured(&self) -> usize {
        self.punctured
    }

    /// Returns the number of transmitted bits.
    pub fn transmitted_len(&self) -> usize {
        self.n - self.shortened - self.punctured
    }

    /// Pads a payload to the message length of the code.
    pub fn pad(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.expect_len(self.payload_len, payload.len())?;
        pad_for_shortening(payload, self.k)
    }

    /// Shortens and punctures an encoded codeword.
    pub fn transmit(&self, codeword: &[u8]) -> Result<Vec<u8>> {
        self.expect_len(self.n, codeword.len())?;
        puncture(&shorten(codeword, self.payload_len, self.k)?, self.punctured)
    }

    /// Rebuilds a full-length signal from the transmitted samples.
    ///
    /// Shortened positions receive [`KNOWN_ZERO`] and punctured positions
    /// receive [`ERASURE`].
    pub fn receive(&self, signal: &[f64]) -> Result<Vec<f64>> {
        self.expect_len(self.transmitted_len(), signal.len())?;
        let (payload, parity) = signal.split_at(self.payload_len);
        let mut out = Vec::with_capacity(self.n);
        out.extend_from_slice(payload);
        out.resize(self.k, KNOWN_ZERO);
        out.extend_from_slice(parity);
        out.resize(self.n, ERASURE);
        Ok(out)
    }

    /// Returns the payload bits of a decoded message.
    pub fn extract_payload<'a>(&self, message: &'a [u8]) -> Result<&'a [u8]> {
        if message.len() < self.payload_len {
            return Err(Error::LengthMismatch {
                expected: self.payload_len,
                found: message.len(),
            });
        }
        Ok(&message[..self.payload_len])
    }

    fn expect_len(&self, expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(Error::LengthMismatch { expected, found });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        codes::CodeTable,
        decoder::{arithmetic::SumProduct, Decoder},
        encoder::Encoder,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn free_functions() {
        let codeword = [1, 2, 3, 0, 0, 6, 7, 8, 9];
        assert_eq!(shorten(&codeword, 3, 5).unwrap(), [1, 2, 3, 6, 7, 8, 9]);
        assert_eq!(puncture(&[1, 2, 3, 6, 7, 8, 9], 2).unwrap(), [1, 2, 3, 6, 7]);
        assert_eq!(
            puncture(&[1, 2], 3),
            Err(Error::NotEnoughParity {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(
            shorten(&codeword, 6, 5),
            Err(Error::PayloadTooLong { payload: 6, k: 5 })
        );
        assert_eq!(pad_for_shortening(&[], 3).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn counts() {
        let table = CodeTable::global().unwrap();
        let code = table.lookup("1/2", "648").unwrap();
        // everything fits
        let matcher = RateMatcher::new(&code, 300, 1000).unwrap();
        assert_eq!(matcher.shortened(), 24);
        assert_eq!(matcher.punctured(), 0);
        assert_eq!(matcher.transmitted_len(), 624);
        assert_eq!(
            RateMatcher::new(&code, 325, 1000),
            Err(Error::PayloadTooLong {
                payload: 325,
                k: 324
            })
        );
        assert!(matches!(
            RateMatcher::new(&code, 324, 300),
            Err(Error::NotEnoughParity { .. })
        ));
    }

    #[test]
    fn lengths() {
        let code = CodeTable::global().unwrap().lookup("1/2", "648").unwrap();
        let matcher = RateMatcher::new(&code, 100, 400).unwrap();
        assert_eq!(
            matcher.pad(&[0; 99]),
            Err(Error::LengthMismatch {
                expected: 100,
                found: 99
            })
        );
        assert!(matcher.transmit(&[0; 647]).is_err());
        assert!(matcher.receive(&[0.0; 401]).is_err());
        assert_eq!(
            matcher.extract_payload(&[0; 50]),
            Err(Error::LengthMismatch {
                expected: 100,
                found: 50
            })
        );
    }

    #[test]
    fn empty_payload() {
        let code = CodeTable::global().unwrap().lookup("1/2", "648").unwrap();
        // nothing left to transmit
        assert_eq!(RateMatcher::new(&code, 0, 0), Err(Error::EmptyPayload));
        assert_eq!(RateMatcher::new(&code, 0, 648), Err(Error::EmptyPayload));
        // all the parity punctured still leaves the payload
        let matcher = RateMatcher::new(&code, 1, 0).unwrap();
        assert_eq!(matcher.punctured(), 324);
        assert_eq!(matcher.transmitted_len(), 1);
    }

    #[test]
    fn round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let code = CodeTable::global().unwrap().lookup("3/4", "1944").unwrap();
        let encoder = Encoder::new(&code).unwrap();
        let decoder = Decoder::new(code.clone(), SumProduct::new());
        let matcher = RateMatcher::new(&code, 816, 1248).unwrap();

        let payload: Vec<u8> = (0..816).map(|_| rng.gen_range(0..=1)).collect();
        let codeword = encoder.encode_bits(&matcher.pad(&payload).unwrap()).unwrap();
        let transmitted = matcher.transmit(&codeword).unwrap();
        assert_eq!(transmitted.len(), 1248);
        assert_eq!(&transmitted[..816], &payload[..]);
        assert_eq!(&transmitted[816..], &codeword[1458..1890]);

        let signal: Vec<f64> = transmitted
            .iter()
            .map(|&b| if b == 0 { 1.0 } else { -1.0 })
            .collect();
        let received = matcher.receive(&signal).unwrap();
        assert_eq!(received.len(), 1944);
        assert!(received[816..1458].iter().all(|&x| x == KNOWN_ZERO));
        assert!(received[1890..].iter().all(|&x| x == ERASURE));

        let message = decoder.decode(&received).unwrap();
        assert_eq!(matcher.extract_payload(&message).unwrap(), &payload[..]);
    }
}
