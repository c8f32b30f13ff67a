//! Two-party Multiplicative-to-Additive (MtA) conversion over secp256k1, built on a batched
//! correlated oblivious transfer, for use by DKLS-style threshold-ECDSA signing.
//!
//! Alice holds a secret scalar `a`, Bob holds a secret scalar `b`, both elements of the scalar
//! field `Fₙ` of secp256k1. After a four-message exchange each party holds an additive share —
//! `α` for Alice, `β` for Bob — such that `α + β ≡ a·b (mod n)`, without either party learning
//! the other's scalar. This is the core primitive DKLS-family signing protocols invoke twice per
//! signature, to convert multiplicative shares of `k⁻¹` and `sk/k` into additive ones.
//!
//! The crate does not include the zero-knowledge consistency checks that bind MtA outputs to a
//! committed public key (those belong to the enclosing DKLS rounds), nor any transport: callers
//! own the sending and receiving of the four messages.
//!
//! # Example
//!
//! ```
//! use dkls_mta::{execute_mta, verify_mta_result};
//! use k256::Scalar;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::from_entropy();
//! let a = Scalar::from(2u64);
//! let b = Scalar::from(3u64);
//!
//! let (alice_share, bob_share) = execute_mta(&mut rng, a, b).unwrap();
//! assert!(verify_mta_result(a, b, alice_share, bob_share));
//! ```
//!
//! Running the four rounds over a real transport looks the same, one round at a time:
//!
//! ```
//! use dkls_mta::{mta_alice_round1, mta_alice_round3, mta_bob_round2, mta_bob_round4, verify_mta_result};
//! use k256::Scalar;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::from_entropy();
//! let (a, b) = (Scalar::from(2u64), Scalar::from(3u64));
//!
//! let (alice_state, msg1) = mta_alice_round1(&mut rng, a).unwrap();
//! let (bob_state, msg2) = mta_bob_round2(&mut rng, b, &msg1).unwrap();
//! let (alice_share, msg3) = mta_alice_round3(&mut rng, alice_state, &msg2).unwrap();
//! let bob_share = mta_bob_round4(bob_state, &msg3).unwrap();
//!
//! assert!(verify_mta_result(a, b, alice_share, bob_share));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod batch_cot;
mod error;
mod mta;
mod ot;
mod scalar;

pub use batch_cot::{
    cot_receiver_complete, cot_receiver_respond, cot_sender_complete, cot_sender_init,
    verify_cot_result, COTEncrypted, COTReceiverState, COTResponse, COTSenderSetup, COTSenderState,
    EncryptedSlot,
};
pub use error::Error;
pub use mta::{
    execute_mta, mta_alice_round1, mta_alice_round3, mta_bob_round2, mta_bob_round4,
    verify_mta_result, AliceState, BobState, MtaAliceRound1Msg, MtaAliceRound3Msg, MtaBobRound2Msg,
};

/// The batch size and security parameter: one correlated OT per bit of the secp256k1 scalar
/// field, so `LAMBDA` matches the 256-bit scalar length.
pub const LAMBDA: usize = 256;
