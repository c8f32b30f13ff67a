//! The four-round Multiplicative-to-Additive protocol, wrapping one Batch-COT execution with a
//! session identifier, wire messages, and explicit per-role state machines.

use k256::Scalar;
use rand_core::{CryptoRng, RngCore};

use crate::batch_cot::{
    cot_receiver_complete, cot_receiver_respond, cot_sender_complete, cot_sender_init,
    COTEncrypted, COTReceiverState, COTResponse, COTSenderSetup, COTSenderState,
};
use crate::error::Error;

/// Alice's per-round continuation. Holds her [`COTSenderState`] (and so zeroizes it on drop)
/// between round 1 and round 3; there is nothing to hold once round 3 returns her final share.
pub enum AliceState {
    /// Waiting for Bob's round-2 message, for the session bound to `session_id`.
    AwaitingBob {
        /// Session identifier fixed at round 1.
        session_id: [u8; 32],
        /// The Batch-COT sender state from round 1.
        cot_state: COTSenderState,
    },
    /// Terminal state: round 3 has already run. Any further round called against this value
    /// fails with [`Error::ProtocolStateError`].
    Done,
}

/// Bob's per-round continuation, symmetric to [`AliceState`].
pub enum BobState {
    /// Waiting for Alice's round-3 message, for the session bound to `session_id`.
    AwaitingAlice {
        /// Session identifier echoed from round 1.
        session_id: [u8; 32],
        /// The Batch-COT receiver state from round 2.
        cot_state: COTReceiverState,
    },
    /// Terminal state: round 4 has already run.
    Done,
}

/// Alice's round-1 message: a fresh session id plus her Batch-COT sender setup.
#[derive(Clone, Debug, PartialEq)]
pub struct MtaAliceRound1Msg {
    /// Session identifier for this MtA exchange.
    pub session_id: [u8; 32],
    /// Batch-COT sender setup (`LAMBDA` published points).
    pub setup: COTSenderSetup,
}

/// Bob's round-2 message: the session id echoed back, plus his Batch-COT response.
#[derive(Clone, Debug, PartialEq)]
pub struct MtaBobRound2Msg {
    /// Session identifier, must equal the one from round 1.
    pub session_id: [u8; 32],
    /// Batch-COT receiver response (`LAMBDA` published points).
    pub response: COTResponse,
}

/// Alice's round-3 message: the session id echoed back, plus her ciphertext batch.
#[derive(Clone, Debug, PartialEq)]
pub struct MtaAliceRound3Msg {
    /// Session identifier, must equal the one from round 1.
    pub session_id: [u8; 32],
    /// Batch-COT ciphertext batch (`LAMBDA` masked correlation pairs).
    pub encrypted: COTEncrypted,
}

/// Round 1 (Alice → Bob). Alice contributes `a` and generates a fresh session id.
pub fn mta_alice_round1<R: RngCore + CryptoRng>(
    rng: &mut R,
    a: Scalar,
) -> Result<(AliceState, MtaAliceRound1Msg), Error> {
    let (cot_state, setup) = cot_sender_init(rng, a)?;

    let mut session_id = [0u8; 32];
    rng.try_fill_bytes(&mut session_id)
        .map_err(|_| Error::RandomnessError)?;

    let state = AliceState::AwaitingBob {
        session_id,
        cot_state,
    };
    let msg = MtaAliceRound1Msg { session_id, setup };
    Ok((state, msg))
}

/// Round 2 (Bob → Alice). Bob contributes `b` and responds to Alice's round-1 message.
pub fn mta_bob_round2<R: RngCore + CryptoRng>(
    rng: &mut R,
    b: Scalar,
    msg1: &MtaAliceRound1Msg,
) -> Result<(BobState, MtaBobRound2Msg), Error> {
    let (cot_state, response) = cot_receiver_respond(rng, &msg1.setup, b)?;

    let state = BobState::AwaitingAlice {
        session_id: msg1.session_id,
        cot_state,
    };
    let msg = MtaBobRound2Msg {
        session_id: msg1.session_id,
        response,
    };
    Ok((state, msg))
}

/// Round 3 (Alice → Bob). Consumes `alice_state` (fails with [`Error::ProtocolStateError`] if it
/// is not [`AliceState::AwaitingBob`]), checks the session id, and produces Alice's final share
/// plus the ciphertext batch for Bob.
pub fn mta_alice_round3<R: RngCore + CryptoRng>(
    rng: &mut R,
    alice_state: AliceState,
    msg2: &MtaBobRound2Msg,
) -> Result<(Scalar, MtaAliceRound3Msg), Error> {
    let (session_id, cot_state) = match alice_state {
        AliceState::AwaitingBob {
            session_id,
            cot_state,
        } => (session_id, cot_state),
        AliceState::Done => return Err(Error::ProtocolStateError),
    };
    if session_id != msg2.session_id {
        return Err(Error::SessionMismatch);
    }

    let (alice_share, encrypted) = cot_sender_complete(rng, cot_state, &msg2.response)?;
    let msg = MtaAliceRound3Msg {
        session_id,
        encrypted,
    };
    Ok((alice_share, msg))
}

/// Round 4 (Bob, local). Consumes `bob_state`, checks the session id, and produces Bob's final
/// share.
pub fn mta_bob_round4(bob_state: BobState, msg3: &MtaAliceRound3Msg) -> Result<Scalar, Error> {
    let (session_id, cot_state) = match bob_state {
        BobState::AwaitingAlice {
            session_id,
            cot_state,
        } => (session_id, cot_state),
        BobState::Done => return Err(Error::ProtocolStateError),
    };
    if session_id != msg3.session_id {
        return Err(Error::SessionMismatch);
    }

    cot_receiver_complete(cot_state, &msg3.encrypted)
}

/// Pipelines all four rounds in-process, for callers that don't need a real transport between
/// Alice and Bob.
pub fn execute_mta<R: RngCore + CryptoRng>(
    rng: &mut R,
    a: Scalar,
    b: Scalar,
) -> Result<(Scalar, Scalar), Error> {
    let (alice_state, msg1) = mta_alice_round1(rng, a)?;
    let (bob_state, msg2) = mta_bob_round2(rng, b, &msg1)?;
    let (alice_share, msg3) = mta_alice_round3(rng, alice_state, &msg2)?;
    let bob_share = mta_bob_round4(bob_state, &msg3)?;
    Ok((alice_share, bob_share))
}

/// Test helper: true iff `alice_share + bob_share ≡ a·b (mod n)`.
pub fn verify_mta_result(a: Scalar, b: Scalar, alice_share: Scalar, bob_share: Scalar) -> bool {
    alice_share + bob_share == a * b
}

impl MtaAliceRound1Msg {
    /// Serializes to `session_id(32) ‖ setup` — 32 + `LAMBDA`*33 bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(32 + crate::LAMBDA * 33);
        buffer.extend_from_slice(&self.session_id);
        buffer.extend_from_slice(&self.setup.serialize());
        buffer
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 32 + crate::LAMBDA * 33 {
            return Err(Error::WireFormatError);
        }
        let mut session_id = [0u8; 32];
        session_id.copy_from_slice(&bytes[..32]);
        let setup = COTSenderSetup::deserialize(&bytes[32..])?;
        Ok(Self { session_id, setup })
    }
}

impl MtaBobRound2Msg {
    /// Serializes to `session_id(32) ‖ response` — 32 + `LAMBDA`*33 bytes. Byte-identical in
    /// shape to [`MtaAliceRound1Msg::serialize`]; the spec adds no message-type tag, so
    /// distinguishing the two is the caller's responsibility, not the decoder's.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(32 + crate::LAMBDA * 33);
        buffer.extend_from_slice(&self.session_id);
        buffer.extend_from_slice(&self.response.serialize());
        buffer
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 32 + crate::LAMBDA * 33 {
            return Err(Error::WireFormatError);
        }
        let mut session_id = [0u8; 32];
        session_id.copy_from_slice(&bytes[..32]);
        let response = COTResponse::deserialize(&bytes[32..])?;
        Ok(Self {
            session_id,
            response,
        })
    }
}

impl MtaAliceRound3Msg {
    /// Serializes to `session_id(32) ‖ encrypted` — 32 + `LAMBDA`*64 bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(32 + crate::LAMBDA * 64);
        buffer.extend_from_slice(&self.session_id);
        buffer.extend_from_slice(&self.encrypted.serialize());
        buffer
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 32 + crate::LAMBDA * 64 {
            return Err(Error::WireFormatError);
        }
        let mut session_id = [0u8; 32];
        session_id.copy_from_slice(&bytes[..32]);
        let encrypted = COTEncrypted::deserialize(&bytes[32..])?;
        Ok(Self {
            session_id,
            encrypted,
        })
    }
}
