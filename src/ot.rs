//! Single-slot correlated oblivious transfer: the "Simplest OT" Diffie-Hellman construction,
//! kept independent of batching so that [`crate::batch_cot`] is visibly "`LAMBDA` copies of one
//! OT instance plus a recombination step".

use k256::elliptic_curve::subtle::{Choice, ConditionallySelectable};
use k256::{AffinePoint, ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::scalar::hash_slot;

/// Published by the sender at slot setup: `A = y·G`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SenderSetup {
    pub(crate) big_a: AffinePoint,
}

/// The sender's slot secret `y`, kept until completion and then dropped.
#[derive(Clone, Copy, Zeroize)]
pub(crate) struct SenderSecret {
    y: Scalar,
}

/// Published by the receiver in response to a [`SenderSetup`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ReceiverResponse {
    pub(crate) big_b: AffinePoint,
}

/// The receiver's slot secret: its choice bit and the key it already derived from `x·A`.
#[derive(Clone, Copy, Zeroize)]
pub(crate) struct ReceiverSecret {
    key: [u8; 32],
    choice: bool,
}

/// Sender init for one slot: sample `y`, publish `A = y·G`.
pub(crate) fn sender_init<R: RngCore + CryptoRng>(rng: &mut R) -> (SenderSecret, SenderSetup) {
    let y = Scalar::generate_biased(rng);
    let big_a = (ProjectivePoint::GENERATOR * y).to_affine();
    (SenderSecret { y }, SenderSetup { big_a })
}

/// Receiver response for one slot: sample `x`, compute `B = x·G + c·A` via constant-time
/// selection (so the choice bit `c` is not leaked through a data-dependent branch), and derive
/// the key `H(slot ‖ x·A)` the receiver will need at completion.
pub(crate) fn receiver_respond<R: RngCore + CryptoRng>(
    rng: &mut R,
    slot: u32,
    setup: &SenderSetup,
    choice: bool,
) -> (ReceiverSecret, ReceiverResponse) {
    let x = Scalar::generate_biased(rng);
    let big_a = ProjectivePoint::from(setup.big_a);

    let mut big_b = ProjectivePoint::GENERATOR * x;
    big_b.conditional_assign(&(big_b + big_a), Choice::from(choice as u8));

    let key = hash_slot(slot, &(big_a * x).to_affine());

    (
        ReceiverSecret { key, choice },
        ReceiverResponse {
            big_b: big_b.to_affine(),
        },
    )
}

/// Sender-side key derivation for one slot: `k0 = H(slot ‖ y·B)`, `k1 = H(slot ‖ y·(B - A))`.
/// `A` is recomputed from `y` rather than carried in the sender's state.
pub(crate) fn sender_keys(
    slot: u32,
    secret: &SenderSecret,
    response: &ReceiverResponse,
) -> ([u8; 32], [u8; 32]) {
    let big_b = ProjectivePoint::from(response.big_b);
    let big_a = ProjectivePoint::GENERATOR * secret.y;

    let k0 = hash_slot(slot, &(big_b * secret.y).to_affine());
    let k1 = hash_slot(slot, &((big_b - big_a) * secret.y).to_affine());
    (k0, k1)
}

/// The receiver's already-derived key `k_{choice}` for one slot.
pub(crate) fn receiver_key(secret: &ReceiverSecret) -> [u8; 32] {
    secret.key
}

/// The receiver's choice bit for one slot.
pub(crate) fn receiver_choice(secret: &ReceiverSecret) -> bool {
    secret.choice
}
