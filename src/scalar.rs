//! Scalar-field and curve utility surface: uniform sampling over `Fₙ`, big-endian scalar
//! encode/decode, per-slot bit-slicing of a correlation, SEC1 point encode/decode, and the
//! slot-keyed hash used to derandomize the correlated OT.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, Scalar};
use rand_core::{CryptoRng, RngCore};

use crate::error::Error;
use crate::LAMBDA;

/// Samples a uniform scalar in `[1, n-1]`, retrying a bounded number of times if zero is drawn.
pub(crate) fn sample_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Scalar, Error> {
    for _ in 0..8 {
        let candidate = Scalar::generate_biased(rng);
        if !bool::from(candidate.is_zero()) {
            return Ok(candidate);
        }
    }
    Err(Error::RandomnessError)
}

pub(crate) fn is_zero(s: &Scalar) -> bool {
    bool::from(Field::is_zero(s))
}

/// 32-byte big-endian encoding of a scalar, matching `k256`'s canonical `Fₙ` representation.
pub(crate) fn encode_scalar(s: &Scalar) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(s.to_repr().as_slice());
    out
}

/// Decodes 32 big-endian bytes as an `Fₙ` element, reducing modulo `n` rather than rejecting
/// out-of-range values (the bytes reaching here are XOR-masked ciphertext, not a fresh scalar).
pub(crate) fn decode_scalar(bytes: &[u8; 32]) -> Scalar {
    use k256::elliptic_curve::ops::Reduce;
    use k256::U256;

    let field_bytes = FieldBytes::clone_from_slice(bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&field_bytes)
}

/// Decomposes `b` into its `LAMBDA` bits, least-significant first, as read off the big-endian
/// scalar encoding.
pub(crate) fn bit_decompose(b: &Scalar) -> Box<[bool; LAMBDA]> {
    let bytes = encode_scalar(b);
    let mut bits = Vec::with_capacity(LAMBDA);
    for i in 0..LAMBDA {
        let byte = bytes[31 - i / 8];
        bits.push((byte >> (i % 8)) & 1 == 1);
    }
    Box::new(into_array(bits))
}

/// The per-slot correlations `a · 2^i` for `i ∈ [0, LAMBDA)`, computed by repeated doubling.
pub(crate) fn bit_slice_factors(a: &Scalar) -> Box<[Scalar; LAMBDA]> {
    let mut factors = Vec::with_capacity(LAMBDA);
    let mut current = *a;
    for _ in 0..LAMBDA {
        factors.push(current);
        current += current;
    }
    Box::new(into_array(factors))
}

/// 33-byte SEC1 compressed encoding of an affine point.
pub(crate) fn encode_point(point: &AffinePoint) -> [u8; 33] {
    let encoded = point.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// Decodes a 33-byte SEC1 compressed point, rejecting non-canonical prefixes and points not on
/// the curve.
pub(crate) fn decode_point(bytes: &[u8; 33]) -> Result<AffinePoint, Error> {
    if bytes[0] != 0x02 && bytes[0] != 0x03 {
        return Err(Error::WireFormatError);
    }
    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::WireFormatError)?;
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded)).ok_or(Error::WireFormatError)
}

/// `H(slot ‖ point)`, a 32-byte CSPRF used to derandomize the Diffie-Hellman key in the base OT.
pub(crate) fn hash_slot(slot: u32, point: &AffinePoint) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&slot.to_be_bytes());
    hasher.update(&encode_point(point));
    *hasher.finalize().as_bytes()
}

/// Byte-wise XOR of two 32-byte buffers (the OT's one-time-pad mask).
pub(crate) fn xor32(lhs: [u8; 32], rhs: [u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = lhs[i] ^ rhs[i];
    }
    out
}

/// Converts a `Vec<T>` of known length `N` into `[T; N]`. Panics only if called with the wrong
/// length, which would be an internal bug (every caller constructs the vector with exactly `N`
/// elements beforehand).
pub(crate) fn into_array<T, const N: usize>(v: Vec<T>) -> [T; N] {
    match v.try_into() {
        Ok(arr) => arr,
        Err(_) => unreachable!("vector length must equal N by construction"),
    }
}
