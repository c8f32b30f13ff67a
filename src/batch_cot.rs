//! Batch Correlated Oblivious Transfer: `LAMBDA` parallel instances of the single-slot OT in
//! [`crate::ot`], recombined into additive shares of a scalar product `a·b mod n`.

use k256::Scalar;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::Error;
use crate::ot;
use crate::scalar::{self, into_array};
use crate::LAMBDA;

/// The sender's published setup: one `A_i = y_i·G` per slot.
#[derive(Clone, Debug, PartialEq)]
pub struct COTSenderSetup(pub(crate) Box<[ot::SenderSetup; LAMBDA]>);

/// The sender's private state between [`cot_sender_init`] and [`cot_sender_complete`]. The
/// one-time-pad keys derived from this state are only secure if it is consumed exactly once;
/// `cot_sender_complete` takes it by value to make reuse a compile error, and its secret
/// contents are zeroized on drop.
pub struct COTSenderState {
    a: Scalar,
    secrets: Box<[ot::SenderSecret; LAMBDA]>,
}

impl Drop for COTSenderState {
    fn drop(&mut self) {
        self.a.zeroize();
        for secret in self.secrets.iter_mut() {
            secret.zeroize();
        }
    }
}

/// The receiver's published response: one `B_i` per slot.
#[derive(Clone, Debug, PartialEq)]
pub struct COTResponse(pub(crate) Box<[ot::ReceiverResponse; LAMBDA]>);

/// The receiver's private state between [`cot_receiver_respond`] and [`cot_receiver_complete`],
/// zeroized on drop for the same reason as [`COTSenderState`].
pub struct COTReceiverState {
    b: Scalar,
    secrets: Box<[ot::ReceiverSecret; LAMBDA]>,
}

impl Drop for COTReceiverState {
    fn drop(&mut self) {
        self.b.zeroize();
        for secret in self.secrets.iter_mut() {
            secret.zeroize();
        }
    }
}

/// One slot's masked correlation values, `e0 = k0 ⊕ encode(-s)` and `e1 = k1 ⊕ encode(a·2^i - s)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncryptedSlot {
    /// Mask for the `choice = 0` branch.
    pub e0: [u8; 32],
    /// Mask for the `choice = 1` branch.
    pub e1: [u8; 32],
}

/// The sender's ciphertext batch, produced by [`cot_sender_complete`] and consumed by
/// [`cot_receiver_complete`].
#[derive(Clone, Debug, PartialEq)]
pub struct COTEncrypted(pub(crate) Box<[EncryptedSlot; LAMBDA]>);

/// Starts a Batch-COT session as the sender, contributing the correlation `a`. `a = 0` is
/// rejected as cryptographically degenerate.
pub fn cot_sender_init<R: RngCore + CryptoRng>(
    rng: &mut R,
    a: Scalar,
) -> Result<(COTSenderState, COTSenderSetup), Error> {
    if scalar::is_zero(&a) {
        return Err(Error::RandomnessError);
    }

    let mut secrets = Vec::with_capacity(LAMBDA);
    let mut setups = Vec::with_capacity(LAMBDA);
    for _ in 0..LAMBDA {
        let (secret, setup) = ot::sender_init(rng);
        secrets.push(secret);
        setups.push(setup);
    }

    let state = COTSenderState {
        a,
        secrets: Box::new(into_array(secrets)),
    };
    let setup = COTSenderSetup(Box::new(into_array(setups)));
    Ok((state, setup))
}

/// Responds to a [`COTSenderSetup`] as the receiver, contributing the selection scalar `b`
/// (bit-decomposed into the `LAMBDA` choice bits). `b = 0` is rejected as cryptographically
/// degenerate.
pub fn cot_receiver_respond<R: RngCore + CryptoRng>(
    rng: &mut R,
    setup: &COTSenderSetup,
    b: Scalar,
) -> Result<(COTReceiverState, COTResponse), Error> {
    if setup.0.len() != LAMBDA {
        return Err(Error::WireFormatError);
    }
    if scalar::is_zero(&b) {
        return Err(Error::RandomnessError);
    }

    let bits = scalar::bit_decompose(&b);
    let mut secrets = Vec::with_capacity(LAMBDA);
    let mut responses = Vec::with_capacity(LAMBDA);
    for i in 0..LAMBDA {
        let (secret, response) = ot::receiver_respond(rng, i as u32, &setup.0[i], bits[i]);
        secrets.push(secret);
        responses.push(response);
    }

    let state = COTReceiverState {
        b,
        secrets: Box::new(into_array(secrets)),
    };
    let response = COTResponse(Box::new(into_array(responses)));
    Ok((state, response))
}

/// Completes the sender's side given the receiver's [`COTResponse`], producing the sender's
/// additive share and the ciphertext batch to send the receiver. Consumes `sender_state` by
/// value: the one-time-pad keys it holds must never be used twice.
pub fn cot_sender_complete<R: RngCore + CryptoRng>(
    rng: &mut R,
    sender_state: COTSenderState,
    response: &COTResponse,
) -> Result<(Scalar, COTEncrypted), Error> {
    if response.0.len() != LAMBDA {
        return Err(Error::WireFormatError);
    }

    let factors = scalar::bit_slice_factors(&sender_state.a);
    let mut sender_share = Scalar::ZERO;
    let mut slots = Vec::with_capacity(LAMBDA);

    for i in 0..LAMBDA {
        let (k0, k1) = ot::sender_keys(i as u32, &sender_state.secrets[i], &response.0[i]);
        let s_i = Scalar::generate_biased(rng);
        sender_share += s_i;

        let e0 = scalar::xor32(k0, scalar::encode_scalar(&(-s_i)));
        let e1 = scalar::xor32(k1, scalar::encode_scalar(&(factors[i] - s_i)));
        slots.push(EncryptedSlot { e0, e1 });
    }

    let encrypted = COTEncrypted(Box::new(into_array(slots)));
    Ok((sender_share, encrypted))
}

/// Completes the receiver's side given the sender's [`COTEncrypted`] batch, producing the
/// receiver's additive share.
pub fn cot_receiver_complete(
    receiver_state: COTReceiverState,
    encrypted: &COTEncrypted,
) -> Result<Scalar, Error> {
    if encrypted.0.len() != LAMBDA {
        return Err(Error::WireFormatError);
    }

    let mut receiver_share = Scalar::ZERO;
    for i in 0..LAMBDA {
        let secret = &receiver_state.secrets[i];
        let key = ot::receiver_key(secret);
        let masked = if ot::receiver_choice(secret) {
            encrypted.0[i].e1
        } else {
            encrypted.0[i].e0
        };
        receiver_share += scalar::decode_scalar(&scalar::xor32(key, masked));
    }
    Ok(receiver_share)
}

/// Test helper: true iff `sender_share + receiver_share ≡ a·b (mod n)`. Not part of the live
/// protocol — no enclosing party can check this without learning both inputs.
pub fn verify_cot_result(a: Scalar, b: Scalar, sender_share: Scalar, receiver_share: Scalar) -> bool {
    sender_share + receiver_share == a * b
}

impl COTSenderSetup {
    /// Serializes to `LAMBDA` concatenated 33-byte SEC1 compressed points, no length prefix.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(LAMBDA * 33);
        for slot in self.0.iter() {
            buffer.extend_from_slice(&crate::scalar::encode_point(&slot.big_a));
        }
        buffer
    }

    /// Inverse of [`Self::serialize`]. Rejects any length other than `LAMBDA * 33` bytes or a
    /// non-canonical point encoding.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != LAMBDA * 33 {
            return Err(Error::WireFormatError);
        }
        let mut setups = Vec::with_capacity(LAMBDA);
        for chunk in bytes.chunks_exact(33) {
            let mut buf = [0u8; 33];
            buf.copy_from_slice(chunk);
            let big_a = crate::scalar::decode_point(&buf)?;
            setups.push(ot::SenderSetup { big_a });
        }
        Ok(COTSenderSetup(Box::new(into_array(setups))))
    }
}

impl COTResponse {
    /// Serializes to `LAMBDA` concatenated 33-byte SEC1 compressed points, no length prefix.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(LAMBDA * 33);
        for slot in self.0.iter() {
            buffer.extend_from_slice(&crate::scalar::encode_point(&slot.big_b));
        }
        buffer
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != LAMBDA * 33 {
            return Err(Error::WireFormatError);
        }
        let mut responses = Vec::with_capacity(LAMBDA);
        for chunk in bytes.chunks_exact(33) {
            let mut buf = [0u8; 33];
            buf.copy_from_slice(chunk);
            let big_b = crate::scalar::decode_point(&buf)?;
            responses.push(ot::ReceiverResponse { big_b });
        }
        Ok(COTResponse(Box::new(into_array(responses))))
    }
}

impl COTEncrypted {
    /// Serializes to `LAMBDA` concatenated `e0 ‖ e1` pairs (64 bytes each), no length prefix.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(LAMBDA * 64);
        for slot in self.0.iter() {
            buffer.extend_from_slice(&slot.e0);
            buffer.extend_from_slice(&slot.e1);
        }
        buffer
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != LAMBDA * 64 {
            return Err(Error::WireFormatError);
        }
        let mut slots = Vec::with_capacity(LAMBDA);
        for chunk in bytes.chunks_exact(64) {
            let mut e0 = [0u8; 32];
            let mut e1 = [0u8; 32];
            e0.copy_from_slice(&chunk[..32]);
            e1.copy_from_slice(&chunk[32..]);
            slots.push(EncryptedSlot { e0, e1 });
        }
        Ok(COTEncrypted(Box::new(into_array(slots))))
    }
}
